//! Tracing integration example
//!
//! Shows the debug events emitted by `retry` and `cache`, and how
//! `instrument` attributes work inside a promise to a span.
//!
//! Run with: cargo run --example tracing_demo --features tracing

use std::time::Duration;

use tilly::prelude::*;
use tracing::{info, info_span, Level};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    info!("retrying a flaky operation");
    let result = retry(2, |resolve, reject, attempt, max_retry| {
        if attempt < max_retry {
            reject.reject(Failure::new("timeout").context(format!("attempt {}", attempt)));
        } else {
            resolve.resolve(attempt);
        }
    })
    .instrument(info_span!("flaky_operation"))
    .await;
    info!(?result, "retry finished");

    info!("caching a failing generator");
    let cached = cache(|| ko::<u32>("cold start"), Duration::ZERO);
    let _ = cached.get().await;
    let _ = cached.get().await;

    info!("pipeline inside a span");
    let total = chain(
        ok(3),
        [
            Step::map(|x| {
                info!(x, "doubling");
                x * 2
            }),
            Step::then(|x| delay(Source::value(x + 1), Duration::from_millis(10))),
        ],
    )
    .instrument(info_span!("pipeline", input = 3))
    .await;
    info!(?total, "pipeline finished");
}
