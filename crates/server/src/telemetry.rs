use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::{BatchConfigBuilder, BatchSpanProcessor, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::errors::ServerError;

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;

const SERVICE_NAME: &str = "donotsubmit";

/// Environment variable naming the OTLP/HTTP endpoint spans are exported to
pub const OTLP_ENDPOINT_KEY: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Reads the OTLP endpoint through `lookup`. An empty value counts as unset.
///
/// Read on its own, ahead of the rest of the configuration, so that logging is in place before
/// configuration errors are reported.
pub fn otlp_endpoint_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(OTLP_ENDPOINT_KEY).filter(|v| !v.trim().is_empty())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global `tracing` subscriber.
///
/// Log lines always go to stdout. When `otlp_endpoint` is given, spans are also exported over
/// OTLP/HTTP and the returned provider must be shut down on exit to flush them.
pub fn init_telemetry(
    otlp_endpoint: Option<&str>,
) -> Result<Option<SdkTracerProvider>, ServerError> {
    let Some(endpoint) = otlp_endpoint else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| {
                ServerError::TelemetryError(format!("Failed to initialize logging: {}", e))
            })?;
        return Ok(None);
    };

    let provider = create_tracer_provider(endpoint)?;
    let tracer = provider.tracer("donotsubmit_server");

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|e| ServerError::TelemetryError(format!("Failed to initialize tracing: {}", e)))?;

    Ok(Some(provider))
}

fn create_tracer_provider(endpoint: &str) -> Result<SdkTracerProvider, ServerError> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| {
            ServerError::TelemetryError(format!(
                "Failed to create the OTLP exporter for '{}': {}",
                endpoint, e
            ))
        })?;

    let processor = BatchSpanProcessor::builder(exporter)
        .with_batch_config(
            BatchConfigBuilder::default()
                .with_max_queue_size(4096)
                .build(),
        )
        .build();

    let resource = Resource::builder()
        .with_attribute(opentelemetry::KeyValue::new("service.name", SERVICE_NAME))
        .build();

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_span_processor(processor)
        .build())
}
