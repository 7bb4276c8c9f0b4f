//! Timed promises.
//!
//! Both functions measure the interval from the moment they are called, not
//! from the first poll, using the Tokio timer. The promise must be awaited
//! inside a Tokio runtime with the time driver enabled.

use std::time::Duration;

use tokio::time::Instant;

use crate::constructors::from;
use crate::promise::{Payload, Promise, Source};

/// Settle with `data` once `time` has elapsed.
///
/// `data` is normalized with [`from`] at call time and awaited after the
/// timer fires. Pass `()` when no payload is needed.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tilly::{sleep, Source};
///
/// # tokio_test::block_on(async {
/// let result = sleep(Duration::from_millis(30), Source::value("wake up!")).await;
/// assert_eq!(result, Ok("wake up!"));
///
/// sleep(Duration::from_millis(10), ()).await.unwrap();
/// # });
/// ```
pub fn sleep<T, S>(time: Duration, data: S) -> Promise<T>
where
    T: Payload,
    S: Into<Source<T>>,
{
    let deadline = Instant::now().checked_add(time);
    let data = from(data);

    Promise::from_future(async move {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => tokio::time::sleep(time).await,
        }
        data.await
    })
}

/// [`sleep`] with the arguments swapped, for call sites that lead with the
/// payload.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tilly::{delay, ok};
///
/// # tokio_test::block_on(async {
/// let result = delay(ok("wake up!"), Duration::from_millis(30)).await;
/// assert_eq!(result, Ok("wake up!"));
/// # });
/// ```
pub fn delay<T, S>(data: S, time: Duration) -> Promise<T>
where
    T: Payload,
    S: Into<Source<T>>,
{
    sleep(time, data)
}
