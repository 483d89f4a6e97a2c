use axum::{
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use http::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use assent_slo::{errors, Result};

use crate::{
    pipeline::{authorization_request, Chain, Next, Scope},
    AppState,
};

use super::not_found;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResponse {
    #[serde(rename = "IsAllowed")]
    pub is_allowed: bool,
}

pub fn new_router(state: AppState, chain: &Chain) -> Router {
    let endpoint = Next::new(move |scope| check_access(state.clone(), scope));
    Router::new().route(
        "/check",
        post(chain.then(endpoint).into_handler()).fallback(not_found),
    )
}

/// Answers whether the parsed request is allowed. A denial, an engine error
/// and an engine timeout all answer `IsAllowed: false` with `200`.
async fn check_access(app: AppState, scope: Scope) -> Result<Response> {
    if scope.method() != Method::POST {
        return Err(errors::method_not_allowed("Use POST requests"));
    }
    let request = authorization_request(&scope)?;

    let deadline = app.config.engine_timeout();
    let is_allowed = match tokio::time::timeout(deadline, app.warden.is_allowed(&request)).await {
        Ok(Ok(())) => {
            info!(subject = %request.subject, "Allowed");
            true
        }
        Ok(Err(err)) => {
            info!(subject = %request.subject, reason = %err, "Access denied");
            false
        }
        Err(_) => {
            warn!(
                subject = %request.subject,
                timeout = ?deadline,
                "Access denied, warden did not answer in time"
            );
            false
        }
    };

    Ok(Json(AccessResponse { is_allowed }).into_response())
}
