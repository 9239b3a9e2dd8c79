//! Observability setup for linkdex.

pub mod tracing_setup;

pub use self::tracing_setup::{
    LogFormat, TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing,
};
