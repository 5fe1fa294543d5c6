//! Configuration management for the ledger indexer

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::core::{IndexerError, IndexerResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IndexerConfig {
    #[validate]
    pub source: SourceConfig,
    #[validate]
    pub elastic: ElasticConfig,
    #[validate]
    pub export: ExportSettings,
    #[validate]
    pub ingest: IngestSettings,
    #[validate]
    pub retry: RetryConfig,
    pub monitoring: MonitoringConfig,
}

/// Raw ledger data location
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ElasticConfig {
    #[validate(url)]
    pub url: String,
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
    /// Page size when listing indexed ledger sequences
    #[validate(range(min = 100, max = 10000))]
    pub scan_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExportSettings {
    #[validate(range(min = 1, max = 256))]
    pub concurrency: usize,
    /// Ledgers per bulk submission
    #[validate(range(min = 1, max = 10000))]
    pub batch_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IngestSettings {
    /// How often a tailing source checks for new ledgers
    #[validate(range(min = 10, max = 60000))]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RetryConfig {
    #[validate(range(max = 1000))]
    pub retries: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "./data/ledgers.ndjson".into(),
        }
    }
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            request_timeout_secs: 60,
            scan_page_size: 5000,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            concurrency: 5,
            batch_size: 50,
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 25,
            min_delay_ms: 5_000,
            max_delay_ms: 15_000,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl IndexerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> IndexerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| IndexerError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: defaults, then the file when it exists, then
    /// `INDEXER__<SECTION>__<KEY>` variables, then the short variables
    /// `LEDGER_SOURCE`, `ES_URL` and `CONCURRENCY`.
    pub fn load(path: Option<&Path>) -> IndexerResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let config: Self = builder
            .add_source(Environment::with_prefix("INDEXER").separator("__"))
            .set_override_option("source.path", std::env::var("LEDGER_SOURCE").ok())
            .and_then(|b| b.set_override_option("elastic.url", std::env::var("ES_URL").ok()))
            .and_then(|b| {
                b.set_override_option("export.concurrency", std::env::var("CONCURRENCY").ok())
            })
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .map_err(|e| IndexerError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Field ranges plus the checks that span fields
    pub fn validate(&self) -> IndexerResult<()> {
        Validate::validate(self).map_err(|e| IndexerError::Configuration(e.to_string()))?;

        if self.retry.min_delay_ms > self.retry.max_delay_ms {
            return Err(IndexerError::Configuration(format!(
                "retry.min_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.min_delay_ms, self.retry.max_delay_ms
            )));
        }
        if self.source.path.as_os_str().is_empty() {
            return Err(IndexerError::Configuration(
                "Ledger source path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
