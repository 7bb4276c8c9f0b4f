//! Bounded retry of executor-driven promises.
//!
//! [`retry`] runs an executor until it resolves or until the attempt budget is
//! spent. The budget is expressed as `max_retry` extra attempts after the
//! first, so at most `max_retry + 1` attempts run, strictly one after the
//! other. No delay is inserted between attempts; an executor that wants
//! backoff can compute it from the attempt index it receives.
//!
//! # Quick Start
//!
//! ```rust
//! use tilly::retry;
//!
//! # tokio_test::block_on(async {
//! let result = retry(3, |resolve, reject, attempt, max_retry| {
//!     if attempt == max_retry {
//!         resolve.resolve("At the last attempt");
//!     } else {
//!         reject.reject("Failed attempt");
//!     }
//! })
//! .await;
//!
//! assert_eq!(result, Ok("At the last attempt"));
//! # });
//! ```
//!
//! # Failure reporting
//!
//! When every attempt fails, the promise rejects with the failure of the
//! *first* attempt, which is usually the most informative one.

use crate::failure::Failure;
use crate::promise::{Payload, Promise, Reject, Resolve};

/// Bookkeeping for one `retry` invocation.
#[derive(Debug)]
struct RetryState {
    attempt: u32,
    max_retry: u32,
    failures: Vec<Failure>,
}

impl RetryState {
    fn new(max_retry: u32) -> Self {
        RetryState {
            attempt: 0,
            max_retry,
            failures: Vec::new(),
        }
    }

    /// Record the failure of the current attempt.
    ///
    /// Returns `true` and advances to the next attempt while budget remains.
    fn record(&mut self, failure: Failure) -> bool {
        self.failures.push(failure);

        if self.attempt < self.max_retry {
            self.attempt += 1;
            true
        } else {
            false
        }
    }

    #[cfg_attr(not(any(test, feature = "tracing")), allow(dead_code))]
    fn attempts(&self) -> usize {
        self.failures.len()
    }

    fn into_first_failure(self) -> Failure {
        self.failures
            .into_iter()
            .next()
            .unwrap_or_else(|| Failure::new("retry finished without any attempt"))
    }
}

/// Run `executor` until it resolves, at most `max_retry + 1` times.
///
/// Each attempt calls `executor(resolve, reject, attempt, max_retry)` with a
/// 0-based attempt index and waits for that attempt to settle before deciding
/// whether to start the next one. The first successful payload settles the
/// returned promise. If all attempts fail, the promise rejects with the
/// earliest failure.
///
/// Attempts start once the returned promise is awaited.
///
/// # Example
///
/// ```rust
/// use tilly::retry;
///
/// # tokio_test::block_on(async {
/// let result = retry::<(), _>(2, |_resolve, reject, attempt, _max_retry| {
///     reject.reject(format!("attempt {} failed", attempt));
/// })
/// .await;
///
/// assert_eq!(result.unwrap_err().message(), "attempt 0 failed");
/// # });
/// ```
pub fn retry<T, F>(max_retry: u32, mut executor: F) -> Promise<T>
where
    T: Payload,
    F: FnMut(Resolve<T>, Reject<T>, u32, u32) + Send + 'static,
{
    Promise::from_future(async move {
        let mut state = RetryState::new(max_retry);

        loop {
            let attempt = state.attempt;
            let pending = Promise::new(|resolve, reject| {
                executor(resolve, reject, attempt, max_retry)
            });

            match pending.await {
                Ok(value) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, max_retry, "retry attempt succeeded");
                    return Ok(value);
                }
                Err(failure) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, max_retry, error = %failure, "retry attempt failed");

                    if !state.record(failure) {
                        break;
                    }
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(attempts = state.attempts(), "retry budget exhausted");

        Err(state.into_first_failure())
    })
}
