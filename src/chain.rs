//! Sequential transformation pipelines.
//!
//! [`chain`] starts from any [`Source`] and applies a list of [`Step`]s one at
//! a time, left to right. Each step sees the payload produced by the previous
//! one. The first failure short-circuits the rest of the pipeline.
//!
//! For pipelines whose payload type changes between stages, chain
//! [`Promise::then`] and [`Promise::and_then`] directly.

use std::fmt;

use crate::constructors::from;
use crate::failure::Failure;
use crate::promise::{Payload, Promise, Source};

type Apply<T> = Box<dyn FnOnce(T) -> Source<T> + Send>;

/// One stage of a [`chain`].
pub struct Step<T> {
    apply: Apply<T>,
}

impl<T: Payload> Step<T> {
    /// A stage returning a plain value.
    pub fn map<F>(f: F) -> Self
    where
        F: FnOnce(T) -> T + Send + 'static,
    {
        Step {
            apply: Box::new(move |payload| Source::Value(f(payload))),
        }
    }

    /// A stage that may fail. An `Err` stops the pipeline.
    pub fn try_map<F>(f: F) -> Self
    where
        F: FnOnce(T) -> Result<T, Failure> + Send + 'static,
    {
        Step {
            apply: Box::new(move |payload| match f(payload) {
                Ok(value) => Source::Value(value),
                Err(failure) => Source::Promise(Promise::rejected(failure)),
            }),
        }
    }

    /// A stage returning a promise (or any other [`Source`]), which is
    /// awaited before the next stage runs.
    pub fn then<F, S>(f: F) -> Self
    where
        F: FnOnce(T) -> S + Send + 'static,
        S: Into<Source<T>>,
    {
        Step {
            apply: Box::new(move |payload| f(payload).into()),
        }
    }
}

impl<T> fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").finish_non_exhaustive()
    }
}

/// Run `start`, then feed its payload through `steps` in order.
///
/// # Example
///
/// ```rust
/// use tilly::{chain, Source, Step};
///
/// # tokio_test::block_on(async {
/// let result = chain(
///     Source::executor(|resolve, _reject| {
///         resolve.resolve(2);
///     }),
///     [Step::map(|value| value * 2), Step::map(|value| value + 3)],
/// )
/// .await;
///
/// assert_eq!(result, Ok(7));
/// # });
/// ```
pub fn chain<T, S, I>(start: S, steps: I) -> Promise<T>
where
    T: Payload,
    S: Into<Source<T>>,
    I: IntoIterator<Item = Step<T>>,
{
    steps
        .into_iter()
        .fold(from(start), |promise, step| promise.and_then(step.apply))
}
