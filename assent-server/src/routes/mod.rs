use axum::{
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    Router,
};
use http::HeaderValue;
use tower::Layer;
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::{
    controllers::{access, home, not_found, policies, todos},
    middlewares::{Log, MakeSpanWithTrace, Parse, Recover, TRACE_ID},
    pipeline::Chain,
    AppState,
};

pub struct AppRouter;

impl AppRouter {
    /// Chain wrapped around every pipeline route: recovery outermost, then
    /// parsing, then logging.
    pub fn chain(state: &AppState) -> Chain {
        Chain::new()
            .with(Recover)
            .with(Parse::new(state.config.max_body_size))
            .with(Log)
    }

    pub fn build(state: AppState) -> NormalizePath<Router> {
        let chain = Self::chain(&state);

        let router = Router::new()
            .merge(home::new_router(&chain))
            .merge(access::new_router(state.clone(), &chain))
            .merge(policies::new_router(state, &chain))
            .merge(todos::new_router())
            .fallback(not_found)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(MakeSpanWithTrace)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(LatencyUnit::Millis),
                    ),
            )
            .layer(middleware::from_fn(Self::trace));

        NormalizePathLayer::trim_trailing_slash().layer(router)
    }

    /// Propagates `X-Trace-Id`, generating one when the caller sent none.
    async fn trace(mut request: Request, next: Next) -> impl IntoResponse {
        let trace_id = match request.headers().get(&TRACE_ID) {
            Some(v) => v.clone(),
            None => {
                let generated = HeaderValue::try_from(
                    uuid::Uuid::new_v4().hyphenated().to_string(),
                )
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
                request
                    .headers_mut()
                    .insert(TRACE_ID.clone(), generated.clone());
                generated
            }
        };
        let mut response = next.run(request).await;
        response.headers_mut().insert(TRACE_ID.clone(), trace_id);
        response
    }
}

impl std::fmt::Debug for AppRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AppRouter")
    }
}
