//! Concurrent combination of promises.
//!
//! This module provides functions for awaiting several promises at once:
//! - `all` - Wait for every input, fail-fast on the first failure
//! - `race` - Settle with whichever input settles first
//! - `every` - Wait for every input, collecting an [`Outcome`] per input
//!
//! Every function takes a single ordered collection of inputs; each element
//! is normalized with [`from`], so promises, executors and plain values may
//! be used interchangeably. Inputs interleave cooperatively on the task that
//! awaits the combined promise.
//!
//! Once `all` has failed or `race` has settled, the inputs it no longer needs
//! are not cancelled: inside a Tokio runtime they are spawned and run to
//! completion, their results discarded.

use crate::constructors::from;
use crate::outcome::{to, Outcome};
use crate::promise::{Payload, Promise, Source};

/// Wait for every input to succeed.
///
/// Succeeds with the payloads in input order, regardless of the order in
/// which the inputs settled. Fails with the first failure to arrive; the
/// remaining inputs keep running but their results are discarded.
///
/// # Example
///
/// ```rust
/// use tilly::{all, ok};
///
/// # tokio_test::block_on(async {
/// let result = all([ok("Result #1"), ok("Result #2"), ok("Result #3")]).await;
/// assert_eq!(result, Ok(vec!["Result #1", "Result #2", "Result #3"]));
/// # });
/// ```
pub fn all<T, I>(items: I) -> Promise<Vec<T>>
where
    T: Payload,
    I: IntoIterator,
    I::Item: Into<Source<T>>,
{
    let promises: Vec<Promise<T>> = items.into_iter().map(from).collect();

    Promise::from_future(async move {
        let result = futures::future::try_join_all(promises.iter().cloned()).await;
        if result.is_err() {
            detach(promises);
        }
        result
    })
}

/// Settle with the first input to settle, success or failure.
///
/// Ties go to whichever input is polled first. An empty input never settles.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tilly::{delay, race, Source};
///
/// # tokio_test::block_on(async {
/// let result = race([
///     delay(Source::value("One"), Duration::from_millis(60)),
///     delay(Source::value("Two"), Duration::from_millis(20)),
///     delay(Source::value("Three"), Duration::from_millis(40)),
/// ])
/// .await;
/// assert_eq!(result, Ok("Two"));
/// # });
/// ```
pub fn race<T, I>(items: I) -> Promise<T>
where
    T: Payload,
    I: IntoIterator,
    I::Item: Into<Source<T>>,
{
    let promises: Vec<Promise<T>> = items.into_iter().map(from).collect();

    if promises.is_empty() {
        return Promise::from_future(futures::future::pending());
    }

    Promise::from_future(async move {
        let (result, _index, remaining) = futures::future::select_all(promises).await;
        detach(remaining);
        result
    })
}

/// Wait for every input to settle, capturing each settlement.
///
/// Equivalent to [`all`] over [`to`] applied to each input: never fails, and
/// the outcomes keep input order.
///
/// # Example
///
/// ```rust
/// use tilly::{every, ko, ok, Outcome};
///
/// # tokio_test::block_on(async {
/// let outcomes = every([ok("Result #1"), ko("Error #2"), ok("Result #3")])
///     .await
///     .unwrap();
///
/// assert_eq!(outcomes[0], Outcome::Fulfilled("Result #1"));
/// assert_eq!(outcomes[1].error().map(|e| e.message()), Some("Error #2"));
/// assert_eq!(outcomes[2], Outcome::Fulfilled("Result #3"));
/// # });
/// ```
pub fn every<T, I>(items: I) -> Promise<Vec<Outcome<T>>>
where
    T: Payload,
    I: IntoIterator,
    I::Item: Into<Source<T>>,
{
    all(items.into_iter().map(to::<T, I::Item>))
}

/// Drive inputs nobody awaits any more to completion on the ambient runtime.
fn detach<T: Payload>(promises: Vec<Promise<T>>) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        return;
    };

    for promise in promises.into_iter().filter(|p| !p.is_settled()) {
        runtime.spawn(async move {
            let _ = promise.await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chain, delay, ko, ok, sleep, Step};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_all_preserves_input_order() {
        let result = all([
            delay(Source::value(1), Duration::from_millis(30)),
            delay(Source::value(2), Duration::from_millis(10)),
            delay(Source::value(3), Duration::from_millis(20)),
        ])
        .await;

        assert_eq!(result, Ok(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_all_accepts_mixed_sources() {
        let result = all(vec![
            Source::from(ok(1)),
            Source::value(2),
            Source::executor(|resolve, _| {
                resolve.resolve(3);
            }),
        ])
        .await;

        assert_eq!(result, Ok(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_all_fails_fast() {
        let result = all([
            delay(Source::value(1), Duration::from_secs(60)),
            ko("first failure"),
        ])
        .await;

        assert_eq!(result.unwrap_err().message(), "first failure");
    }

    fn counted_after(counter: &Arc<AtomicU32>, wait: Duration) -> Promise<i32> {
        let counter = counter.clone();
        chain(
            sleep(wait, Source::value(1)),
            [Step::map(move |x| {
                counter.fetch_add(1, Ordering::SeqCst);
                x
            })],
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failure_keeps_other_inputs_running() {
        let counter = Arc::new(AtomicU32::new(0));

        let result = all([
            counted_after(&counter, Duration::from_millis(5)),
            ko("fast"),
        ])
        .await;
        assert_eq!(result.unwrap_err().message(), "fast");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_keeps_losers_running() {
        let counter = Arc::new(AtomicU32::new(0));

        let result = race([ok(0), counted_after(&counter, Duration::from_millis(5))]).await;
        assert_eq!(result, Ok(0));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_empty() {
        let result = all(Vec::<Promise<i32>>::new()).await;
        assert_eq!(result, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_race_first_rejection_wins() {
        let result = race([
            delay(Source::value(1), Duration::from_millis(50)),
            ko("fast failure"),
        ])
        .await;

        assert_eq!(result.unwrap_err().message(), "fast failure");
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_empty_never_settles() {
        let result = tokio::time::timeout(
            Duration::from_secs(3600),
            race(Vec::<Promise<i32>>::new()),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_every_collects_outcomes_in_order() {
        let outcomes = every([
            delay(ko("slow failure"), Duration::from_millis(20)),
            ok(2),
        ])
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0].error().map(|e| e.message()),
            Some("slow failure")
        );
        assert_eq!(outcomes[1], Outcome::Fulfilled(2));
    }
}
