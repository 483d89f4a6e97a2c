use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use assent_slo::Result;

use crate::pipeline::{Chain, Next, Scope};

use super::not_found;

pub fn new_router(chain: &Chain) -> Router {
    Router::new().route(
        "/",
        get(chain.then(Next::new(index)).into_handler()).fallback(not_found),
    )
}

async fn index(_scope: Scope) -> Result<Response> {
    Ok("Welcome!\n".into_response())
}
