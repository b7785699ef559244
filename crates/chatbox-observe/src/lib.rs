//! Observability setup for chatbox: tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
