//! The shared, single-settlement promise every helper in this crate builds on.
//!
//! A [`Promise<T>`] is a cloneable handle to one asynchronous computation that
//! settles exactly once with `Result<T, Failure>`. Any number of clones may
//! await it; all of them observe the same settlement.
//!
//! # Creating promises
//!
//! - [`Promise::new`] runs an executor immediately, handing it [`Resolve`] and
//!   [`Reject`] handles.
//! - [`Promise::from_future`] adopts any `Send + 'static` future.
//! - [`Promise::resolved`] / [`Promise::rejected`] are already settled.
//!
//! # Polling model
//!
//! Executors run synchronously inside [`Promise::new`], but continuations
//! (`then`, `and_then`, the bodies of `from_future`) only make progress while
//! some clone of the promise is being awaited. Nothing settles before the call
//! that created the promise has returned.
//!
//! ```rust
//! use tilly::Promise;
//!
//! # tokio_test::block_on(async {
//! let promise = Promise::new(|resolve, _reject| {
//!     resolve.resolve("Resolved!");
//! });
//! let observer = promise.clone();
//!
//! assert_eq!(promise.await, Ok("Resolved!"));
//! assert_eq!(observer.await, Ok("Resolved!"));
//! # });
//! ```

mod settle;
mod source;

pub use settle::{Reject, Resolve};
pub use source::{Executor, Source};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::Failure;

/// Bound shared by every promise payload.
///
/// Payloads are cloned out to each observer of a settled promise and may be
/// moved across threads by the runtime driving it.
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Payload for T {}

/// A cloneable, single-settlement asynchronous value.
///
/// See the [module documentation](self) for details.
#[must_use = "promises only make progress when awaited"]
pub struct Promise<T> {
    inner: Shared<BoxFuture<'static, Result<T, Failure>>>,
    /// Shared by every clone; `Shared::ptr_eq` forgets a completed handle.
    identity: Arc<()>,
}

impl<T: Payload> Promise<T> {
    /// Create a promise from an executor.
    ///
    /// The executor is invoked before `new` returns. The first call to
    /// [`Resolve::resolve`] or [`Reject::reject`] settles the promise; later
    /// calls are ignored. If every handle is dropped without settling, the
    /// promise rejects with "promise dropped without settling".
    ///
    /// # Example
    ///
    /// ```rust
    /// use tilly::Promise;
    ///
    /// # tokio_test::block_on(async {
    /// let promise = Promise::<i32>::new(|_resolve, reject| {
    ///     reject.reject("nope");
    /// });
    /// assert_eq!(promise.await.unwrap_err().message(), "nope");
    /// # });
    /// ```
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Resolve<T>, Reject<T>),
    {
        let (resolve, reject, settled) = settle::channel();
        executor(resolve, reject);

        Promise::from_future(async move {
            match settled.await {
                Ok(promise) => promise.await,
                Err(_) => Err(Failure::new("promise dropped without settling")),
            }
        })
    }

    /// Adopt a future as a promise.
    pub fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<T, Failure>> + Send + 'static,
    {
        Promise {
            inner: future.boxed().shared(),
            identity: Arc::new(()),
        }
    }

    /// A promise that succeeds with `value`.
    pub fn resolved(value: T) -> Self {
        Promise::from_future(futures::future::ready(Ok(value)))
    }

    /// A promise that fails with `reason`.
    pub fn rejected(reason: impl Into<Failure>) -> Self {
        Promise::from_future(futures::future::ready(Err(reason.into())))
    }

    /// Transform the payload once this promise succeeds.
    ///
    /// Failures pass through untouched.
    ///
    /// ```rust
    /// use tilly::ok;
    ///
    /// # tokio_test::block_on(async {
    /// let len = ok("four").then(|s| s.len());
    /// assert_eq!(len.await, Ok(4));
    /// # });
    /// ```
    pub fn then<U, F>(self, f: F) -> Promise<U>
    where
        U: Payload,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Promise::from_future(async move { self.await.map(f) })
    }

    /// Continue with another promise, value or executor once this promise
    /// succeeds. The result of `f` is flattened.
    ///
    /// ```rust
    /// use tilly::{ko, ok, Promise};
    ///
    /// # tokio_test::block_on(async {
    /// let doubled = ok(21).and_then(|n| ok(n * 2));
    /// assert_eq!(doubled.await, Ok(42));
    ///
    /// let failed: Promise<i32> = ok(21).and_then(|_| ko("gave up"));
    /// assert!(failed.await.is_err());
    /// # });
    /// ```
    pub fn and_then<U, F, S>(self, f: F) -> Promise<U>
    where
        U: Payload,
        F: FnOnce(T) -> S + Send + 'static,
        S: Into<Source<U>>,
    {
        Promise::from_future(async move {
            let payload = self.await?;
            let next = f(payload).into().into_promise();
            next.await
        })
    }

    /// Recover from a failure with a replacement payload.
    pub fn catch<F>(self, f: F) -> Promise<T>
    where
        F: FnOnce(Failure) -> T + Send + 'static,
    {
        Promise::from_future(async move { Ok(self.await.unwrap_or_else(f)) })
    }

    /// Returns `true` if both handles refer to the same computation,
    /// including after either has been awaited.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.identity, &other.identity)
    }

    /// The settlement, if this promise has already settled.
    pub fn peek(&self) -> Option<&Result<T, Failure>> {
        self.inner.peek()
    }

    /// Returns `true` once the promise has settled.
    pub fn is_settled(&self) -> bool {
        self.peek().is_some()
    }
}

impl<T: Payload> Future for Promise<T> {
    type Output = Result<T, Failure>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Promise {
            inner: self.inner.clone(),
            identity: self.identity.clone(),
        }
    }
}

impl<T: fmt::Debug + Payload> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(settled) => f.debug_tuple("Promise").field(settled).finish(),
            None => f.write_str("Promise(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests;
