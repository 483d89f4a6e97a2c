use std::sync::Arc;

use async_trait::async_trait;
use axum::{body, response::Response};
use tracing::debug;

use assent_pim::Request as AuthorizationRequest;
use assent_slo::{errors, Result};

use crate::pipeline::{Middleware, Next, Scope, PARSE_FAILURE};

/// Decodes the body as an access request and stores it in the scope context.
/// Unreadable, empty or malformed bodies are rejected with `400`.
#[derive(Debug, Clone, Copy)]
pub struct Parse {
    limit: usize,
}

impl Parse {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

#[async_trait]
impl Middleware for Parse {
    async fn handle(&self, mut scope: Scope, next: Next) -> Result<Response> {
        let bytes = body::to_bytes(scope.take_body(), self.limit)
            .await
            .map_err(|err| errors::bad_request(&format!("{PARSE_FAILURE}: {err}")))?;
        let request: AuthorizationRequest = serde_json::from_slice(&bytes)
            .map_err(|err| errors::bad_request(&format!("{PARSE_FAILURE}: {err}")))?;
        debug!(?request, "decoded access request");
        scope.context_mut().insert(Arc::new(request));
        next.run(scope).await
    }
}
