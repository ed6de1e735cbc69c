//! Inter-process queue locking
//!
//! Mutual exclusion for a queue across unrelated processes sharing a
//! filesystem, built from a single primitive: `fs::create_dir`, which is
//! atomic on the target filesystem and fails if the marker already exists.
//! The marker lives at `<parent>/<queue>/.lock`; absence means unlocked.
//! Locks on different queue names are independent.
//!
//! A process that crashes while holding a lock strands the marker, and the
//! queue stays inaccessible until an operator removes it by hand.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::warn;

/// Name of the lock marker directory
pub const LOCK_DIR_NAME: &str = ".lock";
/// Pause between acquisition attempts
pub const RETRY_PERIOD: Duration = Duration::from_millis(50);
/// Bound on a whole acquisition attempt
pub const TRY_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from lock acquisition
#[derive(Debug, Error)]
pub enum LockError {
    /// The marker stayed held for the whole timeout. The caller must not
    /// proceed to storage.
    #[error("lock was still held after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Hands out per-queue locks below one parent directory.
#[derive(Debug, Clone)]
pub struct LockManager {
    parent_dir: PathBuf,
    retry_period: Duration,
    try_timeout: Duration,
}

impl LockManager {
    pub fn new(parent_dir: impl Into<PathBuf>) -> Self {
        Self {
            parent_dir: parent_dir.into(),
            retry_period: RETRY_PERIOD,
            try_timeout: TRY_TIMEOUT,
        }
    }

    /// Override retry period and timeout (tests shorten both bounds).
    #[must_use]
    pub fn with_timing(mut self, retry_period: Duration, try_timeout: Duration) -> Self {
        self.retry_period = retry_period;
        self.try_timeout = try_timeout;
        self
    }

    /// Path of the lock marker for a queue.
    pub fn lock_path(&self, queue_url: &str) -> PathBuf {
        self.parent_dir.join(queue_url).join(LOCK_DIR_NAME)
    }

    /// Acquire the lock for a queue, polling until the marker could be
    /// created or the timeout elapsed.
    ///
    /// Returns a guard that removes the marker when dropped, so every exit
    /// path of the caller releases exactly once.
    pub fn acquire(&self, queue_url: &str) -> Result<LockGuard, LockError> {
        let path = self.lock_path(queue_url);
        // the marker's parent must exist before create_dir can run
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let started = Instant::now();
        loop {
            match fs::create_dir(&path) {
                Ok(()) => return Ok(LockGuard { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if started.elapsed() >= self.try_timeout {
                        warn!(queue = %queue_url, "gave up waiting for queue lock");
                        return Err(LockError::Timeout {
                            timeout: self.try_timeout,
                        });
                    }
                    thread::sleep(self.retry_period);
                }
                Err(e) => return Err(LockError::Io(e)),
            }
        }
    }
}

/// Scoped ownership of a queue lock.
#[must_use = "dropping the guard releases the lock"]
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove lock marker");
        }
    }
}
