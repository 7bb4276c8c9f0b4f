//! Tests for the promise primitive and its settle handles.

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_pending, assert_ready_eq};

#[tokio::test]
async fn test_executor_runs_before_new_returns() {
    let calls = Arc::new(AtomicU32::new(0));

    let promise = Promise::new({
        let calls = calls.clone();
        move |resolve, _reject| {
            calls.fetch_add(1, Ordering::SeqCst);
            resolve.resolve(7);
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(promise.await, Ok(7));
}

#[tokio::test]
async fn test_not_settled_before_polled() {
    let promise = Promise::new(|resolve, _| {
        resolve.resolve("x");
    });

    assert!(!promise.is_settled());
    assert_eq!(promise.clone().await, Ok("x"));
    assert_eq!(promise.peek(), Some(&Ok("x")));
}

#[tokio::test]
async fn test_first_settlement_wins() {
    let promise = Promise::new(|resolve, reject| {
        assert!(resolve.resolve(1));
        assert!(!reject.reject("too late"));
        assert!(!resolve.resolve(2));
        assert!(resolve.is_settled());
    });

    assert_eq!(promise.await, Ok(1));
}

#[tokio::test]
async fn test_dropped_handles_reject() {
    let promise = Promise::<i32>::new(|_resolve, _reject| {});

    let failure = promise.await.unwrap_err();
    assert_eq!(failure.message(), "promise dropped without settling");
}

#[tokio::test]
async fn test_resolve_from_spawned_task() {
    let promise = Promise::new(|resolve, _| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            resolve.resolve("late");
        });
    });

    assert_eq!(promise.await, Ok("late"));
}

#[tokio::test]
async fn test_resolve_with_adopts_rejection() {
    let promise = Promise::<i32>::new(|resolve, _| {
        resolve.resolve_with(Promise::rejected("inner"));
    });

    assert_eq!(promise.await.unwrap_err().message(), "inner");
}

#[tokio::test]
async fn test_all_clones_observe_same_settlement() {
    let promise = Promise::new(|resolve, _| {
        resolve.resolve(vec![1, 2, 3]);
    });
    let a = promise.clone();
    let b = promise.clone();

    assert_eq!(a.await, Ok(vec![1, 2, 3]));
    assert_eq!(b.await, Ok(vec![1, 2, 3]));
    assert_eq!(promise.await, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_ptr_eq_tracks_identity() {
    let a = Promise::resolved(1);
    let b = a.clone();
    let c = Promise::resolved(1);

    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));
}

#[tokio::test]
async fn test_ptr_eq_survives_completion() {
    let mut awaited = Promise::resolved("done");
    let observer = awaited.clone();

    assert_eq!((&mut awaited).await, Ok("done"));
    assert!(awaited.ptr_eq(&observer));
    assert!(observer.ptr_eq(&awaited));
}

#[tokio::test]
async fn test_then_and_and_then() {
    let promise = Promise::resolved(2)
        .then(|n| n + 1)
        .and_then(|n| Promise::resolved(n * 5))
        .and_then(|n| Source::value(n + 6));

    assert_eq!(promise.await, Ok(21));
}

#[tokio::test]
async fn test_then_skipped_on_failure() {
    let calls = Arc::new(AtomicU32::new(0));

    let promise = Promise::<i32>::rejected("boom").then({
        let calls = calls.clone();
        move |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            n
        }
    });

    assert_eq!(promise.await.unwrap_err().message(), "boom");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_catch_recovers() {
    let promise = Promise::<usize>::rejected("five").catch(|f| f.message().len());
    assert_eq!(promise.await, Ok(4));
}

#[test]
fn test_pending_until_resolved() {
    let (resolve, _reject, receiver) = settle::channel::<u8>();
    let promise = Promise::from_future(async move {
        match receiver.await {
            Ok(inner) => inner.await,
            Err(_) => Err(Failure::new("dropped")),
        }
    });

    let mut task = tokio_test::task::spawn(promise);
    assert_pending!(task.poll());

    resolve.resolve(9);
    assert!(task.is_woken());
    assert_ready_eq!(task.poll(), Ok(9));
}

#[test]
fn test_debug_shows_state() {
    let promise = Promise::resolved(3);
    assert_eq!(format!("{:?}", promise), "Promise(<pending>)");

    let _ = futures::executor::block_on(promise.clone());
    assert_eq!(format!("{:?}", promise), "Promise(Ok(3))");
}
