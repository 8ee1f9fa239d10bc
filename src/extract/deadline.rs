//! Wall-clock deadline for the URL pass
//!
//! A `Deadline` is created per extraction run and checked cooperatively
//! between matches. Nothing here touches process-wide state, so concurrent
//! runs each carry their own budget.

use crate::error::{Result, TokenizeError};
use std::time::{Duration, Instant};

/// Default URL pass budget
pub const DEFAULT_URL_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest text excerpt carried in a timeout error
const MAX_ERROR_TEXT_CHARS: usize = 280;

/// A point in time after which the guarded work must stop
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    limit: Duration,
    expires_at: Instant,
}

impl Deadline {
    /// Deadline expiring `limit` from now
    pub fn after(limit: Duration) -> Self {
        Self {
            limit,
            expires_at: Instant::now() + limit,
        }
    }

    /// Configured budget
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Whether the budget is spent
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Fail with `TimeoutExceeded` carrying `text` once the budget is spent
    pub fn check(&self, text: &str) -> Result<()> {
        if self.is_expired() {
            return Err(TokenizeError::TimeoutExceeded {
                limit: self.limit,
                text: text.chars().take(MAX_ERROR_TEXT_CHARS).collect(),
            });
        }
        Ok(())
    }
}
