//! Telemetry and structured logging for invoice jobs.

use crate::job::{InvoiceJob, JobStatus};
use opentelemetry::trace::{Span, Tracer};
use opentelemetry::{global, KeyValue};
use tracing::{info, warn};

const TRACER_NAME: &str = "listing-invoice";

/// Renders slower than this are logged as warnings.
const SLOW_RENDER_MS: i64 = 5000;

/// Records telemetry for a completed or failed job.
///
/// Emits a structured log line and an OpenTelemetry span carrying the job
/// id, listing id, status, output size and duration.
pub fn record_job_telemetry(job: &InvoiceJob) {
    let tracer = global::tracer(TRACER_NAME);
    let mut span = tracer.start("invoice_render_job");

    span.set_attribute(KeyValue::new("job_id", job.job_id.clone()));
    span.set_attribute(KeyValue::new("status", job.status.to_string()));
    span.set_attribute(KeyValue::new("has_recipient", job.recipient.is_some()));
    if let Some(listing_id) = job.listing_id {
        span.set_attribute(KeyValue::new("listing_id", listing_id.to_string()));
    }
    if let Some(byte_len) = job.byte_len {
        span.set_attribute(KeyValue::new("byte_len", byte_len as i64));
    }
    if let Some(ref number) = job.invoice_number {
        span.set_attribute(KeyValue::new("invoice_number", number.clone()));
    }

    if let Some(duration_ms) = job.processing_duration_ms() {
        span.set_attribute(KeyValue::new("duration_ms", duration_ms));

        info!(
            job_id = %job.job_id,
            duration_ms = duration_ms,
            status = %job.status,
            "Invoice job finished"
        );

        if duration_ms > SLOW_RENDER_MS {
            warn!(
                job_id = %job.job_id,
                duration_ms = duration_ms,
                "Invoice job exceeded performance threshold ({}ms)",
                SLOW_RENDER_MS
            );
        }
    }

    if job.status == JobStatus::Failed {
        if let Some(ref error) = job.error {
            span.set_attribute(KeyValue::new("error", error.clone()));
            warn!(job_id = %job.job_id, error = %error, "Invoice job failed");
        }
    }

    span.end();
}

/// Initializes OpenTelemetry with an OTLP exporter.
///
/// Must be called from inside a Tokio runtime; the batch exporter runs on
/// it.
pub fn init_telemetry(endpoint: &str, service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::Config;

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(Config::default().with_resource(
            opentelemetry_sdk::Resource::new(vec![
                KeyValue::new("service.name", service_name.to_string()),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            ]),
        ))
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    let provider = tracer.provider().ok_or("tracer provider already shut down")?;
    global::set_tracer_provider(provider);

    info!(endpoint = %endpoint, "Telemetry initialized");
    Ok(())
}

/// Flushes and shuts down the global tracer provider.
pub fn shutdown_telemetry() {
    global::shutdown_tracer_provider();
}
