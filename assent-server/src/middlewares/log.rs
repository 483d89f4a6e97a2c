use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::response::Response;
use tracing::info;

use assent_slo::Result;

use crate::pipeline::{authorization_request, Middleware, Next, Scope};

/// Emits one access line per served request. The response is returned
/// untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Log;

#[async_trait]
impl Middleware for Log {
    async fn handle(&self, scope: Scope, next: Next) -> Result<Response> {
        let method = scope.method().clone();
        let uri = scope.uri().clone();
        let request = authorization_request(&scope);

        let start = Instant::now();
        let response = next.run(scope).await?;
        let latency = start.elapsed();

        let request = request?;
        info!(
            method = %method,
            path = %uri,
            latency = ?latency,
            latency_us = micros(latency),
            request = ?request,
            "request served"
        );
        Ok(response)
    }
}

/// Whole microseconds, saturating at `u64::MAX`.
fn micros(latency: Duration) -> u64 {
    u64::try_from(latency.as_micros()).unwrap_or(u64::MAX)
}
