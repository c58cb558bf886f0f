//! Application settings and environment loading

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of looking for a `.env` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing,
    /// The file exists but could not be read or parsed
    Invalid(String),
}

impl EnvFile {
    fn from_result(result: dotenv::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::Missing,
            Err(e) => Self::Invalid(e.to_string()),
        }
    }

    /// Log the outcome; call once the subscriber is installed
    pub fn report(&self) {
        match self {
            Self::Loaded(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Self::Missing => tracing::debug!("No .env file found"),
            Self::Invalid(reason) => tracing::warn!("Failed to parse .env file: {reason}"),
        }
    }
}

/// Load variables from a `.env` file in the working directory (or a parent).
///
/// Variables already present in the process environment are never overridden.
/// Nothing is logged here, since settings read from the file usually decide
/// how tracing is set up; pass the result to [`EnvFile::report`] afterwards.
pub fn load_env() -> EnvFile {
    EnvFile::from_result(dotenv::dotenv())
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stock-dashboard".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Build settings, taking the environment name from `DASH_ENV` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(env) = std::env::var("DASH_ENV") {
            if !env.trim().is_empty() {
                config.environment = env.trim().to_string();
            }
        }
        config
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
            || self.environment.eq_ignore_ascii_case("prod")
    }
}
