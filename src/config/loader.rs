use std::{env, str::FromStr, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, LoggingConfig, PipelineConfig,
};
use crate::domain::SuppressionPolicy;

const DEFAULT_ENDPOINT: &str = "http://localhost:8000/checkurl";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint_raw =
            env::var("CLASSIFIER_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint_raw).map_err(|_| ConfigError::Invalid {
            key: "CLASSIFIER_ENDPOINT",
            value: endpoint_raw,
        })?;

        let classifier = ClassifierConfig {
            endpoint,
            timeout: parse_millis("CLASSIFIER_TIMEOUT_MS", 10_000)?,
        };

        let pipeline = PipelineConfig {
            debounce_window: parse_millis("DEBOUNCE_WINDOW_MS", 1_000)?,
            cache_ttl: parse_secs("RESULT_CACHE_TTL_SECS", 300)?,
            suppression_ttl: parse_secs("SUPPRESSION_TTL_SECS", 300)?,
            evidence_ttl: parse_secs("EVIDENCE_TTL_SECS", 300)?,
            suppression_policy: parse_policy("SUPPRESSION_POLICY")?,
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            db_filename: env::var("DB_FILENAME").unwrap_or_else(|_| "phishguard.db".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            classifier,
            pipeline,
            directories,
            logging,
        })
    }
}

fn parse_policy(key: &'static str) -> Result<SuppressionPolicy, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            SuppressionPolicy::from_str(&value).map_err(|_| ConfigError::Invalid { key, value })
        }
        Err(_) => Ok(SuppressionPolicy::default()),
    }
}

fn parse_millis(key: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    parse_u64(key, default_ms).map(Duration::from_millis)
}

fn parse_secs(key: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    parse_u64(key, default_secs).map(Duration::from_secs)
}

fn parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
