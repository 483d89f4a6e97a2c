use http::{HeaderName, Request};
use tower_http::trace::MakeSpan;
use tracing::Span;

pub static TRACE_ID: HeaderName = HeaderName::from_static("x-trace-id");

/// Opens the `request` span of every inbound request, tagged with its
/// `X-Trace-Id` so every line logged while serving it can be correlated.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeSpanWithTrace;

impl<B> MakeSpan<B> for MakeSpanWithTrace {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let trace_id = request
            .headers()
            .get(&TRACE_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        tracing::info_span!(
            "request",
            trace_id = %trace_id,
            method = %request.method(),
            uri = %request.uri(),
        )
    }
}
