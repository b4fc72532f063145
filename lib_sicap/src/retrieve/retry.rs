//! # Retry Policy
//!
//! One policy wraps every retry-enabled portal call: up to three attempts,
//! a fixed one-second blocking pause between them, and a retry predicate that
//! fires for any status other than exactly 200. When attempts run out the
//! last response is returned instead of an error.
//!
//! Transport errors (`Err` from the call) are propagated on the spot and are
//! never retried.

use std::thread::sleep;
use std::time::Duration;

use tracing::{error, warn};

use super::http::HttpResponse;
use crate::error::Result;

/// Default number of attempts, the first one included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Default pause between two attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Retries anything that is not an exact 200.
pub fn status_is_not_ok(response: &HttpResponse) -> bool {
    !response.is_ok()
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts. Zero behaves like one.
    pub max_attempts: u32,
    /// Fixed delay slept between attempts.
    pub delay: Duration,
    /// Decides whether a response warrants another attempt.
    pub retry_on: fn(&HttpResponse) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delay: RETRY_DELAY,
            retry_on: status_is_not_ok,
        }
    }
}

impl RetryPolicy {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Runs `call` under the policy.
    ///
    /// `label` identifies the request in log output (usually its path).
    pub fn run<F>(&self, label: &str, mut call: F) -> Result<HttpResponse>
    where
        F: FnMut() -> Result<HttpResponse>,
    {
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let response = call()?;

            if !(self.retry_on)(&response) {
                return Ok(response);
            }

            if attempts >= self.max_attempts {
                error!(
                    path = label,
                    status = response.status,
                    attempts,
                    "Final failure: giving up after {} attempts",
                    attempts
                );
                return Ok(response);
            }

            warn!(
                path = label,
                status = response.status,
                attempt = attempts,
                max_attempts = self.max_attempts,
                "HTTP request failed, retrying in {:?}",
                self.delay
            );
            sleep(self.delay);
        }
    }
}
