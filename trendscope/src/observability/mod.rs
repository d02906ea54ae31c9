//! Observability utilities.

mod subscriber;
mod tracing;

pub use self::tracing::{LoggingTracingEmitter, PassSpanAttributes, TracingEmitter};
pub use subscriber::{init_tracing, LogFormat};
