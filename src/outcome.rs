//! Non-throwing settlement results.
//!
//! [`to`] turns any promise into one that always succeeds with an
//! [`Outcome`], so a failure can be inspected with ordinary pattern matching
//! instead of being propagated with `?`.

use crate::failure::Failure;
use crate::promise::{Payload, Promise, Source};

/// How a promise settled: fulfilled with a payload, or rejected with a reason.
///
/// # Example
///
/// ```rust
/// use tilly::{ko, ok, to, Outcome};
///
/// # tokio_test::block_on(async {
/// let good = to(ok("Resolved!")).await.unwrap();
/// assert_eq!(good, Outcome::Fulfilled("Resolved!"));
///
/// let bad = to(ko::<&str>("Something went wrong")).await.unwrap();
/// assert!(!bad.is_success());
/// assert_eq!(bad.error().map(|e| e.message()), Some("Something went wrong"));
/// # });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The promise succeeded with this payload.
    Fulfilled(T),
    /// The promise failed with this reason.
    Rejected(Failure),
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Fulfilled`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Fulfilled(_))
    }

    /// The payload, if fulfilled.
    pub fn payload(&self) -> Option<&T> {
        match self {
            Outcome::Fulfilled(payload) => Some(payload),
            Outcome::Rejected(_) => None,
        }
    }

    /// The failure, if rejected.
    pub fn error(&self) -> Option<&Failure> {
        match self {
            Outcome::Fulfilled(_) => None,
            Outcome::Rejected(error) => Some(error),
        }
    }

    /// Convert back into a `Result`.
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Fulfilled(payload) => Ok(payload),
            Outcome::Rejected(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, Failure>> for Outcome<T> {
    fn from(result: Result<T, Failure>) -> Self {
        match result {
            Ok(payload) => Outcome::Fulfilled(payload),
            Err(error) => Outcome::Rejected(error),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Failure> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}

/// Await `data` without propagating failure.
///
/// The returned promise always succeeds: with [`Outcome::Fulfilled`] when
/// `data` succeeds, with [`Outcome::Rejected`] when it fails.
pub fn to<T, S>(data: S) -> Promise<Outcome<T>>
where
    T: Payload,
    S: Into<Source<T>>,
{
    let promise = data.into().into_promise();
    Promise::from_future(async move { Ok(Outcome::from(promise.await)) })
}

/// Serializes as `{"success": true, "payload": ..}` or
/// `{"success": false, "error": ..}`.
#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Outcome<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Fulfilled(payload) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("payload", payload)?;
            }
            Outcome::Rejected(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}
