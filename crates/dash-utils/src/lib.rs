//! Shared utilities for the stock dashboard
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup, `.env` loading, and application settings.

pub mod config;
pub mod logging;

pub use config::{Config, EnvFile, load_env};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
