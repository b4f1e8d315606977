// Telemetry module for structured logging, metrics, and tracing

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const SERVICE_NAME: &str = "lightbnb-query-gateway";

/// Initialize structured logging with JSON formatting and trace context
///
/// `RUST_LOG` wins over `log_level` when set. When `tracing_endpoint` is
/// given, spans are also exported over OTLP.
#[tracing::instrument(skip_all)]
pub fn init_logging(log_level: &str, tracing_endpoint: Option<&str>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(json_layer);

    if let Some(endpoint) = tracing_endpoint {
        let tracer = init_tracer(endpoint)?;
        let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        registry
            .with(telemetry_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;
    } else {
        registry
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;
    }

    tracing::info!(
        log_level = log_level,
        tracing_endpoint = tracing_endpoint,
        "Structured logging initialized"
    );

    Ok(())
}

/// Initialize OpenTelemetry tracer with OTLP exporter
#[tracing::instrument(skip_all)]
fn init_tracer(endpoint: &str) -> Result<opentelemetry_sdk::trace::Tracer> {
    use opentelemetry_sdk::runtime::Tokio;

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint)
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to build span exporter: {}", e))?;

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(exporter, Tokio)
        .with_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(Resource::new(vec![
                    KeyValue::new("service.name", SERVICE_NAME),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                ])),
        )
        .build();

    global::set_tracer_provider(tracer_provider.clone());
    let tracer = tracer_provider.tracer(SERVICE_NAME);

    tracing::info!(endpoint = endpoint, "OpenTelemetry tracer initialized");

    Ok(tracer)
}

/// Flush remaining spans on shutdown
pub fn shutdown_tracer() {
    global::shutdown_tracer_provider();
}

/// Initialize Prometheus metrics exporter
///
/// Registers:
/// - gateway_queries_total: counter labelled by operation and outcome
/// - gateway_query_duration_seconds: histogram labelled by operation
#[tracing::instrument(skip_all)]
pub fn init_metrics(metrics_port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", metrics_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid metrics port: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_counter!(
        "gateway_queries_total",
        "Total number of gateway operations by outcome"
    );
    describe_histogram!(
        "gateway_query_duration_seconds",
        "Duration of gateway operations in seconds"
    );

    tracing::info!(
        metrics_port = metrics_port,
        "Prometheus metrics exporter initialized"
    );

    Ok(())
}

/// Record one finished gateway operation
///
/// `outcome` is "ok" or a `DatabaseError::kind()` label.
#[inline]
pub fn record_query(operation: &'static str, outcome: &'static str, elapsed: Duration) {
    counter!(
        "gateway_queries_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_query_duration_seconds", "operation" => operation)
        .record(elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_only_installs_once() {
        // Whichever call installs the global subscriber, a later one must fail
        let _ = init_logging("info", None);
        assert!(init_logging("info", None).is_err());
    }

    #[test]
    fn test_metrics_recording() {
        // No recorder installed: must be a no-op, not a panic
        record_query("fetch_user_by_email", "ok", Duration::from_millis(3));
        record_query("create_user", "constraint", Duration::from_millis(12));
    }
}
