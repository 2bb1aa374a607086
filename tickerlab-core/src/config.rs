//! Serializable quote source configuration.

use crate::data::{CsvQuoteSource, QuoteError, QuoteSource, YahooQuoteSource};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Which quote source to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
}

/// Yahoo chart API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub user_agent: String,
    /// First day of history; the full history when unset.
    pub start: Option<NaiveDate>,
    /// Last day of history; today when unset.
    pub end: Option<NaiveDate>,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            base_delay_ms: 500,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            start: None,
            end: None,
        }
    }
}

/// Top-level configuration for where quotes come from.
///
/// ```toml
/// provider = "csv"
/// csv_dir = "quotes"
///
/// [yahoo]
/// max_retries = 5
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSourceConfig {
    pub provider: ProviderKind,
    pub csv_dir: Option<PathBuf>,
    pub yahoo: YahooConfig,
}

impl QuoteSourceConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider == ProviderKind::Csv && self.csv_dir.is_none() {
            return Err(ConfigError::Invalid(
                "provider \"csv\" requires csv_dir".into(),
            ));
        }
        if let (Some(start), Some(end)) = (self.yahoo.start, self.yahoo.end) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "yahoo.start {start} is after yahoo.end {end}"
                )));
            }
        }
        Ok(())
    }

    /// Build the configured quote source.
    pub fn build_source(&self) -> Result<Box<dyn QuoteSource>, ConfigError> {
        self.validate()?;
        match self.provider {
            ProviderKind::Yahoo => Ok(Box::new(YahooQuoteSource::new(self.yahoo.clone())?)),
            ProviderKind::Csv => {
                let dir = self
                    .csv_dir
                    .clone()
                    .ok_or_else(|| ConfigError::Invalid("csv_dir is not set".into()))?;
                Ok(Box::new(CsvQuoteSource::new(dir)))
            }
        }
    }
}
