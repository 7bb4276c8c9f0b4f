//! # tilly
//!
//! Small, composable helpers for async Rust built around one shared
//! [`Promise`] type.
//!
//! ## What's inside
//!
//! - **Constructors**: [`from`], [`ok`], [`ko`]
//! - **Concurrent combinators**: [`all`], [`race`], [`every`]
//! - **Non-throwing adapter**: [`to`] and [`Outcome`]
//! - **Pipelines**: [`chain`] with [`Step`]s
//! - **Timers**: [`sleep`], [`delay`]
//! - **Retry**: [`retry`] runs an executor up to `max_retry + 1` times
//! - **Memoization**: [`cache`] shares one promise between callers, with
//!   optional sliding expiry
//!
//! ## Quick Example
//!
//! ```rust
//! use std::time::Duration;
//! use tilly::{cache, chain, retry, Step};
//!
//! # tokio_test::block_on(async {
//! // Try up to three times, succeeding on the last attempt
//! let token = retry(2, |resolve, reject, attempt, max_retry| {
//!     if attempt == max_retry {
//!         resolve.resolve(String::from("token"));
//!     } else {
//!         reject.reject("backend unavailable");
//!     }
//! });
//!
//! // Share the result between callers for a minute after the last use
//! let tokens = cache(move || token.clone(), Duration::from_secs(60));
//! assert!(tokens.get().ptr_eq(&tokens.get()));
//!
//! let len = chain(
//!     tokens.get().then(|t| t.len()),
//!     [Step::map(|n| n * 2)],
//! )
//! .await;
//! assert_eq!(len, Ok(10));
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing`: debug events for retry attempts and cache invalidation, plus
//!   [`PromiseTracingExt::instrument`]
//! - `serde`: `Serialize` for [`Outcome`] and [`Failure`]
//! - `proptest`: `Arbitrary` for [`Outcome`] and [`Failure`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod chain;
pub mod constructors;
pub mod failure;
#[cfg(feature = "tracing")]
pub mod instrument;
pub mod outcome;
pub mod parallel;
pub mod promise;
pub mod retry;
pub mod testing;
pub mod time;

// Re-exports
pub use cache::{cache, Cache};
pub use chain::{chain, Step};
pub use constructors::{from, ko, ok};
pub use failure::Failure;
#[cfg(feature = "tracing")]
pub use instrument::PromiseTracingExt;
pub use outcome::{to, Outcome};
pub use parallel::{all, every, race};
pub use promise::{Executor, Payload, Promise, Reject, Resolve, Source};
pub use retry::retry;
pub use time::{delay, sleep};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::{cache, Cache};
    pub use crate::chain::{chain, Step};
    pub use crate::constructors::{from, ko, ok};
    pub use crate::failure::Failure;
    #[cfg(feature = "tracing")]
    pub use crate::instrument::PromiseTracingExt;
    pub use crate::outcome::{to, Outcome};
    pub use crate::parallel::{all, every, race};
    pub use crate::promise::{Promise, Source};
    pub use crate::retry::retry;
    pub use crate::time::{delay, sleep};
}
