use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub matching: MatchingSettings,
    #[serde(default)]
    #[validate(nested)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub fixtures: FixtureSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Normalization and acceptance constants used by the matcher
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MatchingSettings {
    /// Name tokens dropped before similarity comparison
    #[serde(default = "default_suffix_list")]
    pub suffix_list: Vec<String>,
    /// Names denoting the bookkeeping company itself, never a counterparty
    #[serde(default)]
    pub own_company_names: Vec<String>,
    /// Decimal places amounts are rounded to before comparison
    #[serde(default = "default_amount_precision")]
    #[validate(range(max = 6))]
    pub amount_precision: u32,
    #[serde(default = "default_date_decay_window_days")]
    #[validate(range(min = 1))]
    pub date_decay_window_days: u32,
    #[serde(default = "default_name_similarity_threshold")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub name_similarity_threshold: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            suffix_list: default_suffix_list(),
            own_company_names: Vec::new(),
            amount_precision: default_amount_precision(),
            date_decay_window_days: default_date_decay_window_days(),
            name_similarity_threshold: default_name_similarity_threshold(),
        }
    }
}

fn default_suffix_list() -> Vec<String> {
    ["inc", "ltd", "llc", "gmbh", "corp", "co", "oy", "oyj", "tmi"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_amount_precision() -> u32 { 2 }
fn default_date_decay_window_days() -> u32 { 30 }
fn default_name_similarity_threshold() -> f64 { 0.5 }

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ScoringSettings {
    #[serde(default)]
    #[validate(nested)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeightsConfig {
    #[serde(default = "default_name_weight")]
    #[validate(range(min = 0.0), custom(function = "finite_weight"))]
    pub name: f64,
    #[serde(default = "default_date_weight")]
    #[validate(range(min = 0.0), custom(function = "finite_weight"))]
    pub date: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            name: default_name_weight(),
            date: default_date_weight(),
        }
    }
}

fn finite_weight(weight: f64) -> Result<(), ValidationError> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite_weight"))
    }
}

fn default_name_weight() -> f64 { 1.0 }
fn default_date_weight() -> f64 { 1.0 }

/// Fixture file locations for the command line runner
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureSettings {
    #[serde(default = "default_transactions_path")]
    pub transactions: PathBuf,
    #[serde(default = "default_attachments_path")]
    pub attachments: PathBuf,
    #[serde(default)]
    pub expected: Option<PathBuf>,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            transactions: default_transactions_path(),
            attachments: default_attachments_path(),
            expected: None,
        }
    }
}

fn default_transactions_path() -> PathBuf { PathBuf::from("data/transactions.json") }
fn default_attachments_path() -> PathBuf { PathBuf::from("data/attachments.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RECON_)
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RECON__MATCHING__AMOUNT_PRECISION -> matching.amount_precision
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("RECON")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("matching.suffix_list")
        .with_list_parse_key("matching.own_company_names")
        .try_parsing(true)
}
