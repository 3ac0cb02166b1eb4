use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Process level settings, unrelated to integrations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RuntimeConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    #[validate(length(min = 1))]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// HTTP transport timeout (seconds)
    #[serde(default = "default_http_timeout")]
    #[validate(range(min = 1, max = 600))]
    pub http_timeout_secs: u64,

    /// User agent sent to remote services
    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1, max = 255))]
    pub user_agent: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from an optional file and environment
    ///
    /// Environment variables are prefixed with `CHYLE_RUNTIME_`, e.g.
    /// `CHYLE_RUNTIME_HTTP_TIMEOUT_SECS=30`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let runtime: RuntimeConfig = builder
            .add_source(config::Environment::with_prefix("CHYLE_RUNTIME").try_parsing(true))
            .build()?
            .try_deserialize()?;

        runtime.validate()?;

        Ok(runtime)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("chyle/{}", env!("CARGO_PKG_VERSION"))
}
