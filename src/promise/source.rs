//! Inputs that can be normalized into a promise.

use std::fmt;
use std::future::Future;

use super::{Payload, Promise, Reject, Resolve};
use crate::Failure;

/// A boxed executor callback, as accepted by [`Source::Executor`].
pub type Executor<T> = Box<dyn FnOnce(Resolve<T>, Reject<T>) + Send>;

/// Anything [`from`](crate::from) accepts: an existing promise, an executor,
/// or a plain value.
///
/// # Example
///
/// ```rust
/// use tilly::{from, ok, Source};
///
/// # tokio_test::block_on(async {
/// assert_eq!(from(ok(1)).await, Ok(1));
/// assert_eq!(from(Source::value(2)).await, Ok(2));
/// assert_eq!(from(Source::executor(|resolve, _| { resolve.resolve(3); })).await, Ok(3));
/// # });
/// ```
pub enum Source<T> {
    /// An existing promise, adopted as-is.
    Promise(Promise<T>),
    /// An executor run through [`Promise::new`].
    Executor(Executor<T>),
    /// A payload for an already-fulfilled promise.
    Value(T),
}

impl<T: Payload> Source<T> {
    /// A plain payload.
    pub fn value(value: T) -> Self {
        Source::Value(value)
    }

    /// An executor callback.
    pub fn executor<F>(executor: F) -> Self
    where
        F: FnOnce(Resolve<T>, Reject<T>) + Send + 'static,
    {
        Source::Executor(Box::new(executor))
    }

    /// Any future producing `Result<T, Failure>`.
    pub fn future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<T, Failure>> + Send + 'static,
    {
        Source::Promise(Promise::from_future(future))
    }

    /// Normalize into a promise. Promises are returned unchanged, so
    /// identity is preserved.
    pub fn into_promise(self) -> Promise<T> {
        match self {
            Source::Promise(promise) => promise,
            Source::Executor(executor) => Promise::new(executor),
            Source::Value(value) => Promise::resolved(value),
        }
    }
}

impl<T> From<Promise<T>> for Source<T> {
    fn from(promise: Promise<T>) -> Self {
        Source::Promise(promise)
    }
}

impl From<()> for Source<()> {
    fn from(_: ()) -> Self {
        Source::Value(())
    }
}

impl<T: fmt::Debug + Payload> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Promise(promise) => f.debug_tuple("Promise").field(promise).finish(),
            Source::Executor(_) => f.write_str("Executor(..)"),
            Source::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}
