//! Logging and trace export.
//!
//! Logs go to stderr so they never interleave with command output: pretty on
//! a terminal, JSON lines otherwise. Spans are additionally exported over
//! OTLP when one of the standard `OTEL_EXPORTER_OTLP_*ENDPOINT` variables is
//! set.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const SERVICE_NAME: &str = "unicli";

/// Not exported by opentelemetry_sdk.
const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";

/// Flushes exported spans when dropped. Keep it alive for the whole run.
pub struct TelemetryGuard {
	tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
	fn drop(&mut self) {
		if let Some(provider) = self.tracer_provider.take() {
			if let Err(e) = provider.shutdown() {
				eprintln!("failed to flush traces: {e}");
			}
		}
	}
}

/// Install the global subscriber.
///
/// The filter is `log_level` when given, else `RUST_LOG`, else `warn`.
/// Must be called from within a tokio runtime when OTLP export is enabled.
pub fn init(log_level: Option<Level>) -> Result<TelemetryGuard> {
	let filter = match log_level {
		Some(level) => EnvFilter::new(level.as_str()),
		None => EnvFilter::builder()
			.with_default_directive(Level::WARN.into())
			.from_env_lossy(),
	};

	let fmt = if std::io::stderr().is_terminal() {
		tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.with_target(false)
			.pretty()
			.boxed()
	} else {
		tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.json()
			.boxed()
	};

	let tracer_provider = otel_export_enabled()
		.then(build_tracer_provider)
		.transpose()?;

	let otel = tracer_provider.as_ref().map(|provider| {
		tracing_opentelemetry::layer()
			.with_error_records_to_exceptions(true)
			.with_tracer(provider.tracer(SERVICE_NAME))
	});

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt)
		.with(otel)
		.try_init()
		.context("installing tracing subscriber")?;

	Ok(TelemetryGuard { tracer_provider })
}

fn otel_export_enabled() -> bool {
	std::env::var_os(opentelemetry_otlp::OTEL_EXPORTER_OTLP_ENDPOINT).is_some()
		|| std::env::var_os(opentelemetry_otlp::OTEL_EXPORTER_OTLP_TRACES_ENDPOINT).is_some()
}

fn build_tracer_provider() -> Result<SdkTracerProvider> {
	// The builder reads OTEL_SERVICE_NAME and OTEL_RESOURCE_ATTRIBUTES itself.
	let mut resource = Resource::builder();
	if std::env::var_os(OTEL_SERVICE_NAME).is_none() {
		resource = resource.with_service_name(SERVICE_NAME);
	}

	let protocol = std::env::var(opentelemetry_otlp::OTEL_EXPORTER_OTLP_PROTOCOL);
	let exporter = match protocol
		.as_deref()
		.unwrap_or(opentelemetry_otlp::OTEL_EXPORTER_OTLP_PROTOCOL_DEFAULT)
	{
		"grpc" => opentelemetry_otlp::SpanExporter::builder()
			.with_tonic()
			.build(),
		_ => opentelemetry_otlp::SpanExporter::builder()
			.with_http()
			.build(),
	}
	.context("building OTLP span exporter")?;

	let provider = SdkTracerProvider::builder()
		.with_resource(resource.build())
		.with_batch_exporter(exporter)
		.build();

	opentelemetry::global::set_tracer_provider(provider.clone());
	Ok(provider)
}
