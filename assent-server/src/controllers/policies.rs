use axum::{
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use assent_slo::Result;

use crate::{
    pipeline::{Chain, Next, Scope},
    AppState,
};

use super::not_found;

pub fn new_router(state: AppState, chain: &Chain) -> Router {
    let endpoint = Next::new(move |scope| policy_index(state.clone(), scope));
    Router::new().route(
        "/policy",
        post(chain.then(endpoint).into_handler()).fallback(not_found),
    )
}

/// Returns the warden's sample request, for callers exploring the request
/// shape.
async fn policy_index(app: AppState, _scope: Scope) -> Result<Response> {
    Ok(Json(app.warden.sample_request()).into_response())
}
