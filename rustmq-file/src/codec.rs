//! Line codec for the file store
//!
//! One message per line: `<epochMillis>:<receiptHandle>:<id>:<content>`,
//! four colon-delimited fields, the first a base-10 integer holding the
//! visibility timestamp as epoch milliseconds.
//!
//! The format performs no escaping: content containing a newline corrupts
//! the store, and content containing the delimiter is not supported. The
//! timestamp is materialized in the decoding process's local time zone, so
//! processes sharing a store must agree on a time zone for rendered
//! wall-clock values to line up. Both are inherited format limitations;
//! callers get the documented caveat, not a silently changed wire format.

use chrono::{Local, TimeZone};
use rustmq_core::Message;
use thiserror::Error;

/// Field delimiter of the line format
pub const DELIMITER: char = ':';

/// Errors from decoding a store line
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("line is missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid visibility timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Encode a message as one line of text.
pub fn encode(message: &Message) -> String {
    format!(
        "{millis}{d}{receipt}{d}{id}{d}{content}",
        millis = message.visible_from.timestamp_millis(),
        receipt = message.receipt_handle,
        id = message.id,
        content = message.content,
        d = DELIMITER,
    )
}

/// Decode one line of text back into a message.
///
/// Splits positionally: the first three fields must not contain the
/// delimiter, the content field is the remainder of the line.
pub fn decode(line: &str) -> Result<Message, CodecError> {
    let mut fields = line.splitn(4, DELIMITER);

    let millis = fields
        .next()
        .filter(|field| !field.is_empty())
        .ok_or(CodecError::MissingField("visibility timestamp"))?;
    let receipt_handle = fields
        .next()
        .ok_or(CodecError::MissingField("receipt handle"))?;
    let id = fields.next().ok_or(CodecError::MissingField("id"))?;
    let content = fields.next().ok_or(CodecError::MissingField("content"))?;

    let millis: i64 = millis
        .parse()
        .map_err(|_| CodecError::InvalidTimestamp(millis.to_string()))?;
    let visible_from = Local
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| CodecError::InvalidTimestamp(millis.to_string()))?;

    Ok(Message::from_parts(id, receipt_handle, content, visible_from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_message() {
        let message = Message::new("hello world");
        let decoded = decode(&encode(&message)).unwrap();

        assert_eq!(decoded.id, message.id);
        assert_eq!(decoded.receipt_handle, message.receipt_handle);
        assert_eq!(decoded.content, message.content);
        // the line format carries millisecond precision
        assert_eq!(
            decoded.visible_from.timestamp_millis(),
            message.visible_from.timestamp_millis()
        );
    }

    #[test]
    fn test_round_trip_empty_content() {
        let message = Message::new("");
        let decoded = decode(&encode(&message)).unwrap();
        assert_eq!(decoded.content, "");
    }

    #[test]
    fn test_decode_known_line() {
        let message = decode("1700000000000:handle-1:id-1:payload").unwrap();

        assert_eq!(message.visible_from.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(message.receipt_handle, "handle-1");
        assert_eq!(message.id, "id-1");
        assert_eq!(message.content, "payload");
    }

    #[test]
    fn test_decode_rejects_truncated_line() {
        assert!(matches!(
            decode("1700000000000:handle-1:id-1"),
            Err(CodecError::MissingField("content"))
        ));
        assert!(matches!(decode(""), Err(CodecError::MissingField(_))));
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        assert!(matches!(
            decode("not-a-number:handle-1:id-1:payload"),
            Err(CodecError::InvalidTimestamp(_))
        ));
    }
}
