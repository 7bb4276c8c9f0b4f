//! Tracing support for promises.
//!
//! This module provides the `instrument` method for driving a promise inside
//! a tracing span. Feature-gated behind `#[cfg(feature = "tracing")]`.

use crate::promise::{Payload, Promise};

/// Extension trait for adding tracing instrumentation to promises.
///
/// This trait is only available when the `tracing` feature is enabled.
pub trait PromiseTracingExt<T> {
    /// Drive this promise inside `span`.
    ///
    /// The span is entered every time the returned promise is polled, so
    /// events emitted by continuations are attributed to it.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tilly::{ok, PromiseTracingExt};
    /// use tracing::info_span;
    ///
    /// let user = fetch_user(id).instrument(info_span!("fetch_user", %id));
    /// ```
    fn instrument(self, span: tracing::Span) -> Promise<T>;
}

impl<T: Payload> PromiseTracingExt<T> for Promise<T> {
    fn instrument(self, span: tracing::Span) -> Promise<T> {
        Promise::from_future(tracing::Instrument::instrument(self, span))
    }
}
