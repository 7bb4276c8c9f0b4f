//! Testing utilities and helpers for tilly
//!
//! This module provides assertion macros for settled promises and, with the
//! `proptest` feature, property-based testing support.
//!
//! # Examples
//!
//! ## Assertion Macros
//!
//! ```rust
//! use tilly::{assert_fulfilled, assert_rejected, ko, ok};
//!
//! # tokio_test::block_on(async {
//! let value = assert_fulfilled!(ok(42).await);
//! assert_eq!(value, 42);
//!
//! let failure = assert_rejected!(ko::<i32>("error").await);
//! assert_eq!(failure.message(), "error");
//! # });
//! ```

/// Assert that a settlement is fulfilled, evaluating to the payload.
///
/// Accepts a `Result<T, Failure>` or an [`Outcome`](crate::Outcome). Panics
/// if it is a rejection.
///
/// # Example
///
/// ```rust
/// use tilly::{assert_fulfilled, Outcome};
///
/// let payload = assert_fulfilled!(Outcome::Fulfilled("ready"));
/// assert_eq!(payload, "ready");
/// ```
#[macro_export]
macro_rules! assert_fulfilled {
    ($settled:expr) => {
        match $crate::Outcome::from($settled) {
            $crate::Outcome::Fulfilled(payload) => payload,
            $crate::Outcome::Rejected(e) => {
                panic!("Expected Fulfilled, got Rejected: {:?}", e);
            }
        }
    };
}

/// Assert that a settlement is rejected, evaluating to the [`Failure`](crate::Failure).
///
/// # Example
///
/// ```rust
/// use tilly::{assert_rejected, Failure};
///
/// let failure = assert_rejected!(Err::<i32, _>(Failure::new("broken")));
/// assert_eq!(failure.message(), "broken");
/// ```
#[macro_export]
macro_rules! assert_rejected {
    ($settled:expr) => {
        match $crate::Outcome::from($settled) {
            $crate::Outcome::Rejected(failure) => failure,
            $crate::Outcome::Fulfilled(v) => {
                panic!("Expected Rejected, got Fulfilled: {:?}", v);
            }
        }
    };
}

/// Assert that a settlement is rejected with the given message.
///
/// # Example
///
/// ```rust
/// use tilly::{assert_rejected_with, Failure};
///
/// assert_rejected_with!(Err::<i32, _>(Failure::new("broken")), "broken");
/// ```
#[macro_export]
macro_rules! assert_rejected_with {
    ($settled:expr, $message:expr) => {
        match $crate::Outcome::from($settled) {
            $crate::Outcome::Rejected(failure) => {
                assert_eq!(failure.message(), $message);
            }
            $crate::Outcome::Fulfilled(v) => {
                panic!(
                    "Expected Rejected with message {:?}, got Fulfilled: {:?}",
                    $message, v
                );
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::Failure {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            any::<String>(),
            prop::collection::vec(any::<String>(), 0..4),
        )
            .prop_map(|(message, context)| {
                context
                    .into_iter()
                    .fold(crate::Failure::new(message), crate::Failure::context)
            })
            .boxed()
    }
}

#[cfg(feature = "proptest")]
impl<T> Arbitrary for crate::Outcome<T>
where
    T: Arbitrary + 'static,
{
    type Parameters = T::Parameters;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any_with::<T>(args).prop_map(crate::Outcome::Fulfilled),
            any::<crate::Failure>().prop_map(crate::Outcome::Rejected),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Failure, Outcome};

    #[test]
    fn assert_fulfilled_macro() {
        let value = assert_fulfilled!(Ok::<_, Failure>(42));
        assert_eq!(value, 42);
    }

    #[test]
    fn assert_rejected_macro() {
        let failure = assert_rejected!(Outcome::<i32>::Rejected(Failure::new("error")));
        assert_eq!(failure.message(), "error");
    }

    #[test]
    fn assert_rejected_with_macro() {
        assert_rejected_with!(Err::<i32, _>(Failure::new("error")), "error");
    }

    #[test]
    #[should_panic(expected = "Expected Fulfilled, got Rejected")]
    fn assert_fulfilled_panics_on_rejection() {
        let _ = assert_fulfilled!(Err::<i32, _>(Failure::new("error")));
    }

    #[test]
    #[should_panic(expected = "Expected Rejected, got Fulfilled")]
    fn assert_rejected_panics_on_fulfillment() {
        let _ = assert_rejected!(Outcome::Fulfilled(42));
    }

    #[test]
    #[should_panic(expected = "Expected Rejected with message")]
    fn assert_rejected_with_panics_on_fulfillment() {
        assert_rejected_with!(Ok::<_, Failure>(42), "error");
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn outcome_arbitrary_generates_valid_instances(
                outcome in any::<Outcome<i32>>()
            ) {
                match &outcome {
                    Outcome::Fulfilled(_) => prop_assert!(outcome.is_success()),
                    Outcome::Rejected(_) => prop_assert!(!outcome.is_success()),
                }
            }

            #[test]
            fn failure_arbitrary_keeps_trail_bounded(failure in any::<Failure>()) {
                prop_assert!(failure.context_trail().len() < 4);
            }
        }
    }
}
