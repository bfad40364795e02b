//! Logging, tracing and metrics for the server.
//!
//! [`Observability::init`] installs the `tracing` subscriber (and the OTLP
//! pipeline when enabled). [`request_logging`] wraps every request in a span,
//! assigns it a request id and records it in the Prometheus registry served by
//! [`metrics_handler`].

use thiserror::Error;

mod init;
mod logging;
mod metrics;
mod otel;
mod request;
mod settings;

pub(crate) use init::Observability;
pub(crate) use metrics::{CatalogWrite, metrics_handler, record_catalog_write};
pub(crate) use request::request_logging;

#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    #[error("could not build the OTLP span exporter: {0}")]
    OtlpExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("a global tracing subscriber is already installed: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}
