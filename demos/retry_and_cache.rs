//! Retry and cache example
//!
//! A flaky "token service" that fails twice before answering, wrapped in
//! `retry` and shared between callers with `cache`.
//!
//! Run with: cargo run --example retry_and_cache

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tilly::prelude::*;

// ============================================================================
// Simulated backend
// ============================================================================

#[derive(Debug, Default)]
struct TokenService {
    calls: AtomicU32,
}

impl TokenService {
    /// Fails on the first two calls, then hands out tokens.
    fn request(self: &Arc<Self>) -> Promise<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < 2 {
            delay(ko(format!("service unavailable (call {})", call)), Duration::from_millis(50))
        } else {
            delay(Source::value(format!("token-{}", call)), Duration::from_millis(50))
        }
    }
}

fn fetch_token(service: Arc<TokenService>) -> Promise<String> {
    retry(3, move |resolve, reject, attempt, max_retry| {
        println!("  attempt {}/{}", attempt + 1, max_retry + 1);
        let request = service.request();
        tokio::spawn(async move {
            match request.await {
                Ok(token) => resolve.resolve(token),
                Err(failure) => reject.reject(failure.context("requesting token")),
            };
        });
    })
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    println!("=== retry ===");
    let service = Arc::new(TokenService::default());
    match fetch_token(service.clone()).await {
        Ok(token) => println!("got {}", token),
        Err(failure) => println!("gave up: {}", failure),
    }

    println!("\n=== cache ===");
    let tokens = cache(
        {
            let service = service.clone();
            move || fetch_token(service.clone())
        },
        Duration::from_millis(200),
    );

    let first = tokens.get();
    let second = tokens.get();
    println!("same promise while in flight: {}", first.ptr_eq(&second));

    let results = all([first, second.clone()]).await;
    println!("both callers see: {:?}", results);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let refreshed = tokens.get();
    println!("new promise after expiry: {}", !refreshed.ptr_eq(&second));
    println!("refreshed: {:?}", refreshed.await);

    println!("\n=== every ===");
    let outcomes = every([ok("fast"), ko("broken"), sleep(Duration::from_millis(10), Source::value("slow"))]).await;
    for outcome in outcomes.into_iter().flatten() {
        match outcome {
            Outcome::Fulfilled(value) => println!("  ok: {}", value),
            Outcome::Rejected(failure) => println!("  failed: {}", failure.message()),
        }
    }
}
