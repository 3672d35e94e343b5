//! Observability setup for menubot: the process-wide tracing subscriber.

pub mod tracing_setup;
