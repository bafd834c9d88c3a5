//! Shared utilities for the market dashboard
//!
//! This crate provides common functionality used across the workspace:
//! tracing subscriber setup and the configuration that drives it.

pub mod config;
pub mod logging;

pub use config::{ConfigError, LogConfig, LogFormat};
pub use logging::{init_tracing, try_init_tracing};
