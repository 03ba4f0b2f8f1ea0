//! Shared utilities for the quartile screener
//!
//! This crate provides the logging setup used by the screener binary and
//! the configuration type that drives it.

pub mod config;
pub mod logging;

pub use config::{LogFormat, LoggingConfig};
pub use logging::{init_tracing, init_tracing_with};
