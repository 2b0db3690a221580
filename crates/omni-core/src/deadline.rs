//! Nested deadline hierarchy
//!
//! The activation run is bounded at three nesting levels: the whole run,
//! each artifact's total processing, and each page-load attempt within it.
//! A [`Deadline`] is a plain point in time; a child scope's expiry instant is
//! clamped to its parent's, so expiry of an outer scope is observed by every
//! operation bounded under it without any cancel-function bookkeeping.

use crate::error::{OmniError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// A point in time bounding a scope of work.
///
/// Deadlines nest: `run.child(..)` can never outlive `run`. There is no
/// cancel handle to release; dropping the value releases everything.
///
/// # Example
///
/// ```
/// use omni_core::Deadline;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let run = Deadline::start(Duration::from_secs(600));
///     let artifact = run.child(Duration::from_secs(300));
///     let load = artifact.child(Duration::from_secs(30));
///     assert!(load.remaining() <= artifact.remaining());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    /// Open a root scope expiring `duration` from now
    pub fn start(duration: Duration) -> Self {
        Self {
            expires_at: Instant::now() + duration,
        }
    }

    /// Open a nested scope expiring after `duration` or when `self` expires,
    /// whichever comes first
    pub fn child(&self, duration: Duration) -> Self {
        Self {
            expires_at: (Instant::now() + duration).min(self.expires_at),
        }
    }

    /// Time left before expiry (zero if already expired)
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Await `fut`, unblocking with [`OmniError::DeadlineExceeded`] the
    /// moment this scope (or, by clamping, any ancestor) expires.
    ///
    /// `what` names the bounded operation in the error message.
    pub async fn bound<F, T>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        match tokio::time::timeout_at(self.expires_at, fut).await {
            Ok(value) => Ok(value),
            Err(_) => Err(OmniError::DeadlineExceeded(what.to_string())),
        }
    }

    /// Sleep for `interval`, erroring instead if the deadline arrives first
    pub async fn sleep(&self, interval: Duration, what: &str) -> Result<()> {
        self.bound(what, tokio::time::sleep(interval)).await
    }
}
