//! Per-request span, request id, metrics and completion logging.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Requests that bypass logging and metrics.
const UNOBSERVED_PATHS: [&str; 2] = ["/metrics", "/healthcheck"];

/// What is known about a request before its handler runs.
#[derive(Debug)]
struct RequestInfo {
    id: String,
    method: String,
    path: String,
    route: String,
}

impl RequestInfo {
    fn span(&self, req: &Request, otel_name: &str) -> Span {
        tracing::info_span!(
            parent: None,
            "http.request",
            otel.name = %otel_name,
            otel.kind = "server",
            request_id = %self.id,
            method = %self.method,
            path = %self.path,
            remote_addr = %req.remote_addr(),
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        )
    }

    fn finish(&self, span: &Span, status: StatusCode, elapsed: Duration) {
        let status_code = status.as_u16();
        let duration_ms = elapsed.as_millis();
        let threshold_ms = u128::from(settings::slow_request_threshold_ms());

        metrics::observe_request(&self.method, &self.route, status_code, elapsed.as_secs_f64());

        span.record("status", status_code);
        span.record("duration_ms", duration_ms);

        let _entered = span.enter();

        info!(status = status_code, duration_ms, "request.completed");

        if status.is_server_error() {
            error!(status = status_code, method = %self.method, path = %self.path, "server error response");
        } else if status.is_client_error() {
            warn!(status = status_code, method = %self.method, path = %self.path, "client error response");
        }

        if duration_ms > threshold_ms {
            warn!(
                method = %self.method,
                path = %self.path,
                duration_ms,
                threshold_ms,
                "slow request detected"
            );
        }
    }
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNOBSERVED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let _in_flight = metrics::InFlightRequestGuard::track();

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let names = spans::request_span_name(&method, &path);

    let info = RequestInfo {
        id: request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER)),
        method,
        path,
        route: names.otel_path,
    };

    depot.insert(REQUEST_ID_DEPOT_KEY, info.id.clone());
    request_ids::set_request_id_header(res, &info.id);

    let span = info.span(req, &names.otel_span_name);

    if settings::otel_parent_propagation_enabled()
        && let Some(parent) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    info.finish(
        &span,
        request_ids::response_status_or_ok(res.status_code),
        started.elapsed(),
    );
}
