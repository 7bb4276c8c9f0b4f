//! Constructor functions for creating promises.
//!
//! These functions are shortcuts for the common ways of starting a promise
//! chain without spelling out [`Promise`] constructors.

use crate::failure::Failure;
use crate::promise::{Payload, Promise, Source};

/// Normalize a promise, executor or plain value into a promise.
///
/// An existing promise is returned unchanged (identity is preserved), an
/// executor is run immediately, and a plain value becomes a fulfilled promise.
/// `from` itself never fails.
///
/// # Example
///
/// ```rust
/// use tilly::{from, ok, Source};
///
/// # tokio_test::block_on(async {
/// let result = from(Source::executor(|resolve, _reject| {
///     resolve.resolve("Resolved!");
/// }))
/// .await;
/// assert_eq!(result, Ok("Resolved!"));
///
/// let original = ok(1);
/// assert!(from(original.clone()).ptr_eq(&original));
/// # });
/// ```
pub fn from<T, S>(data: S) -> Promise<T>
where
    T: Payload,
    S: Into<Source<T>>,
{
    data.into().into_promise()
}

/// Create a promise that succeeds with the given value.
///
/// # Example
///
/// ```rust
/// use tilly::ok;
///
/// # tokio_test::block_on(async {
/// assert_eq!(ok("Resolved!").await, Ok("Resolved!"));
/// # });
/// ```
pub fn ok<T: Payload>(value: T) -> Promise<T> {
    Promise::resolved(value)
}

/// Create a promise that fails with the given reason.
///
/// Text is wrapped into a [`Failure`] carrying it as the message; a
/// `Failure` is used as-is.
///
/// # Example
///
/// ```rust
/// use tilly::ko;
///
/// # tokio_test::block_on(async {
/// let failure = ko::<()>("Something went wrong").await.unwrap_err();
/// assert_eq!(failure.message(), "Something went wrong");
/// # });
/// ```
pub fn ko<T: Payload>(reason: impl Into<Failure>) -> Promise<T> {
    Promise::rejected(reason)
}
