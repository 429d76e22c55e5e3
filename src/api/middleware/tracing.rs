//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// Each request gets an `INFO` span with method, URI and version. The
/// response is logged at `INFO` with status and latency in milliseconds;
/// 5xx responses are additionally logged at `ERROR`. Request headers are not
/// recorded, so bearer tokens never reach the logs.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST uri=/links version=HTTP/1.1}: finished processing request latency=12 ms status=201
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
