//! Configuration management for the scanner.

use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the scanner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Language detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Decision engine settings
    #[serde(default)]
    pub decision: DecisionConfig,

    /// Model artifact settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Notifier settings
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// Language detection configuration.
///
/// The two legacy detectors disagreed on the content window and on the
/// fallback for unclassifiable input, so both are explicit options here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Restrict content-signature checks to the first N characters
    /// (None = whole file).
    pub content_window: Option<usize>,

    /// Return `unknown` for unclassifiable input instead of
    /// `default_language`.
    #[serde(default = "default_true")]
    pub default_to_unknown: bool,

    /// Fallback language when `default_to_unknown` is false.
    #[serde(default = "default_language")]
    pub default_language: Language,
}

/// Which decision policy is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionMode {
    /// Classifier-primary with heuristic override (requires model artifacts).
    #[default]
    Classifier,
    /// Pattern-primary, runs without model artifacts.
    Patterns,
}

/// Decision engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionConfig {
    #[serde(default)]
    pub mode: DecisionMode,
}

/// Model artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding model.bin, vectorizer.bin and feature_schema.bin.
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
}

/// Telegram notifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Bot token (falls back to TELEGRAM_BOT_TOKEN)
    pub token: Option<String>,

    /// Chat ID (falls back to TELEGRAM_CHAT_ID)
    pub chat_id: Option<String>,

    /// API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_language() -> Language {
    Language::Python
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("ml")
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            content_window: None,
            default_to_unknown: true,
            default_language: default_language(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            token: std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            chat_id: std::env::var("TELEGRAM_CHAT_ID").ok(),
            api_url: default_telegram_api_url(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Create a configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for creating configurations programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn mode(mut self, mode: DecisionMode) -> Self {
        self.config.decision.mode = mode;
        self
    }

    pub fn model_dir(mut self, dir: PathBuf) -> Self {
        self.config.model.dir = dir;
        self
    }

    pub fn content_window(mut self, window: Option<usize>) -> Self {
        self.config.detection.content_window = window;
        self
    }

    pub fn default_to_unknown(mut self, enable: bool) -> Self {
        self.config.detection.default_to_unknown = enable;
        self
    }

    pub fn default_language(mut self, language: Language) -> Self {
        self.config.detection.default_language = language;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
