//! Settle handles passed to promise executors.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;

use super::{Payload, Promise, Source};
use crate::Failure;

/// One-shot slot shared by a promise's `Resolve` and `Reject` handles.
struct Settler<T> {
    sender: Mutex<Option<oneshot::Sender<Promise<T>>>>,
}

impl<T> Settler<T> {
    fn settle(&self, promise: Promise<T>) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(sender) => {
                // The receiver is gone only if nobody can observe the promise.
                let _ = sender.send(promise);
                true
            }
            None => false,
        }
    }

    fn is_settled(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

pub(crate) fn channel<T>() -> (Resolve<T>, Reject<T>, oneshot::Receiver<Promise<T>>) {
    let (sender, receiver) = oneshot::channel();
    let settler = Arc::new(Settler {
        sender: Mutex::new(Some(sender)),
    });

    (
        Resolve {
            settler: settler.clone(),
        },
        Reject { settler },
        receiver,
    )
}

/// Fulfills the promise it was created for.
///
/// Cloneable so it can be moved into callbacks and spawned tasks. Only the
/// first settle call across all `Resolve`/`Reject` clones takes effect.
pub struct Resolve<T> {
    settler: Arc<Settler<T>>,
}

impl<T: Payload> Resolve<T> {
    /// Fulfill with `value`.
    ///
    /// Returns `false` if the promise had already been settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settler.settle(Promise::resolved(value))
    }

    /// Settle with whatever `source` settles with.
    ///
    /// A promise passed here is adopted: if it later fails, so does the
    /// promise this handle belongs to.
    pub fn resolve_with(&self, source: impl Into<Source<T>>) -> bool {
        self.settler.settle(source.into().into_promise())
    }

    /// Returns `true` once any handle has settled the promise.
    pub fn is_settled(&self) -> bool {
        self.settler.is_settled()
    }
}

impl<T> Clone for Resolve<T> {
    fn clone(&self) -> Self {
        Resolve {
            settler: self.settler.clone(),
        }
    }
}

impl<T> fmt::Debug for Resolve<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve")
            .field("settled", &self.settler.is_settled())
            .finish()
    }
}

/// Rejects the promise it was created for.
pub struct Reject<T> {
    settler: Arc<Settler<T>>,
}

impl<T: Payload> Reject<T> {
    /// Reject with `reason`. Text is wrapped into a [`Failure`].
    ///
    /// Returns `false` if the promise had already been settled.
    pub fn reject(&self, reason: impl Into<Failure>) -> bool {
        self.settler.settle(Promise::rejected(reason))
    }

    /// Returns `true` once any handle has settled the promise.
    pub fn is_settled(&self) -> bool {
        self.settler.is_settled()
    }
}

impl<T> Clone for Reject<T> {
    fn clone(&self) -> Self {
        Reject {
            settler: self.settler.clone(),
        }
    }
}

impl<T> fmt::Debug for Reject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reject")
            .field("settled", &self.settler.is_settled())
            .finish()
    }
}
