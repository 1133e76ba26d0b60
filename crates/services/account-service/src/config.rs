//! Account service configuration.

use std::env;
use std::sync::Arc;

use common::{LogFormat, ServiceConfig};
use domain::{OsTokenGenerator, SeededTokenGenerator, TokenGenerator};

/// Account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Seed for reproducible verification tokens (local runs only)
    pub token_seed: Option<u64>,
}

impl AccountServiceConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            log_level: env::var("ACCOUNT_SERVICE_LOG_LEVEL")
                .or_else(|_| env::var("LOG_LEVEL"))
                .unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("ACCOUNT_SERVICE_LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            token_seed: env::var("ACCOUNT_SERVICE_TOKEN_SEED")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Shared service settings for telemetry.
    pub fn service(&self) -> ServiceConfig {
        ServiceConfig {
            service_name: "account-service".to_string(),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }

    /// Token generator selected by the configuration.
    pub fn token_generator(&self) -> Arc<dyn TokenGenerator> {
        match self.token_seed {
            Some(seed) => {
                tracing::warn!("using seeded verification tokens; do not use in production");
                Arc::new(SeededTokenGenerator::new(seed))
            }
            None => Arc::new(OsTokenGenerator),
        }
    }
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            token_seed: None,
        }
    }
}
