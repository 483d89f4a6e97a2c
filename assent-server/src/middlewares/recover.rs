use std::{any::Any, panic::AssertUnwindSafe};

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;
use tracing::error;

use assent_slo::{errors, FailureRecord, Result};

use crate::pipeline::{Middleware, Next, Scope};

/// Outermost stage: turns every failure of the rest of the chain, returned
/// or panicked, into exactly one rendered error response.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recover;

#[async_trait]
impl Middleware for Recover {
    async fn handle(&self, scope: Scope, next: Next) -> Result<Response> {
        let record = match AssertUnwindSafe(next.run(scope)).catch_unwind().await
        {
            Ok(Ok(response)) => return Ok(response),
            Ok(Err(record)) => record,
            Err(payload) => classify(payload),
        };
        error!("recovered: {:?}", record);
        Ok(record.into_response())
    }
}

/// Maps a panic payload onto a failure record: records are reused, plain
/// messages become a `500` carrying the message, anything else a generic
/// `500`.
fn classify(payload: Box<dyn Any + Send>) -> FailureRecord {
    let payload = match payload.downcast::<FailureRecord>() {
        Ok(record) => return *record,
        Err(payload) => payload,
    };
    if let Some(message) = payload.downcast_ref::<String>() {
        return errors::internal(message);
    }
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return errors::internal(*message);
    }
    errors::internal("unexpected fault while handling the request")
}
