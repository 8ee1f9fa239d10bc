//! Application configuration module for tsubuyaki
//!
//! Provides TOML-based configuration with environment variable override support.
//! Priority: CLI args > Environment variables > Config file > Defaults

use crate::extract::DEFAULT_URL_TIMEOUT;
use crate::pipeline::PipelineOptions;
use crate::tokenizer::{DictionarySource, KeywordSpec};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::path_resolver;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Keywords to re-merge and filter posts by
    #[serde(default)]
    keywords: Vec<String>,

    /// Reject input without kana or kanji
    #[serde(default = "default_japanese_only")]
    japanese_only: bool,

    /// `ipadic` for the embedded dictionary, or a compiled dictionary directory
    #[serde(default = "default_dictionary")]
    dictionary: String,

    /// Budget for the URL pass, in seconds
    #[serde(default = "default_url_timeout_secs")]
    url_timeout_secs: u64,

    /// Emoji pattern file; the bundled pattern when unset
    #[serde(default)]
    emoji_pattern_path: Option<String>,

    /// Emit lemmas for structured posts
    #[serde(default)]
    output_lemma: bool,
}

fn default_japanese_only() -> bool {
    true
}

fn default_dictionary() -> String {
    "ipadic".to_string()
}

fn default_url_timeout_secs() -> u64 {
    DEFAULT_URL_TIMEOUT.as_secs()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            japanese_only: default_japanese_only(),
            dictionary: default_dictionary(),
            url_timeout_secs: default_url_timeout_secs(),
            emoji_pattern_path: None,
            output_lemma: false,
        }
    }
}

/// Parse a boolean environment value
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Create config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(keywords) = std::env::var("TSUBUYAKI_KEYWORDS") {
            config.keywords = keywords
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(value) = std::env::var("TSUBUYAKI_JAPANESE_ONLY") {
            if let Some(flag) = parse_flag(&value) {
                config.japanese_only = flag;
            }
        }

        if let Ok(dictionary) = std::env::var("TSUBUYAKI_DICTIONARY") {
            config.dictionary = dictionary;
        }

        if let Ok(secs) = std::env::var("TSUBUYAKI_URL_TIMEOUT_SECS") {
            if let Ok(n) = secs.parse() {
                config.url_timeout_secs = n;
            }
        }

        if let Ok(path) = std::env::var("TSUBUYAKI_EMOJI_PATTERN_PATH") {
            config.emoji_pattern_path = Some(path);
        }

        if let Ok(value) = std::env::var("TSUBUYAKI_OUTPUT_LEMMA") {
            if let Some(flag) = parse_flag(&value) {
                config.output_lemma = flag;
            }
        }

        config
    }

    /// Merge with another config (other takes priority for non-default values)
    pub fn merge_with(&self, other: &Self) -> Self {
        Self {
            keywords: if !other.keywords.is_empty() {
                other.keywords.clone()
            } else {
                self.keywords.clone()
            },
            japanese_only: if other.japanese_only != default_japanese_only() {
                other.japanese_only
            } else {
                self.japanese_only
            },
            dictionary: if other.dictionary != default_dictionary() {
                other.dictionary.clone()
            } else {
                self.dictionary.clone()
            },
            url_timeout_secs: if other.url_timeout_secs != default_url_timeout_secs() {
                other.url_timeout_secs
            } else {
                self.url_timeout_secs
            },
            emoji_pattern_path: other
                .emoji_pattern_path
                .clone()
                .or_else(|| self.emoji_pattern_path.clone()),
            output_lemma: other.output_lemma || self.output_lemma,
        }
    }

    /// Override keywords
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Override japanese_only
    pub fn with_japanese_only(mut self, japanese_only: bool) -> Self {
        self.japanese_only = japanese_only;
        self
    }

    /// Override dictionary
    pub fn with_dictionary(mut self, dictionary: &str) -> Self {
        self.dictionary = dictionary.to_string();
        self
    }

    /// Override url_timeout_secs
    pub fn with_url_timeout_secs(mut self, secs: u64) -> Self {
        self.url_timeout_secs = secs;
        self
    }

    /// Override output_lemma
    pub fn with_output_lemma(mut self, output_lemma: bool) -> Self {
        self.output_lemma = output_lemma;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.url_timeout_secs == 0 {
            return Err(anyhow!("url_timeout_secs must be greater than 0"));
        }

        if self.dictionary.trim().is_empty() {
            return Err(anyhow!("dictionary must not be empty"));
        }

        if let Some(keyword) = self.keywords.iter().find(|k| k.trim().is_empty()) {
            return Err(anyhow!("Invalid keyword '{}': keywords must not be blank", keyword));
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }

    /// Pipeline switches derived from this config
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            keywords: KeywordSpec::new(self.keywords.iter().cloned()),
            japanese_only: self.japanese_only,
            url_timeout: Duration::from_secs(self.url_timeout_secs),
            output_lemma: self.output_lemma,
        }
    }

    /// Dictionary selection with `~` and relative paths resolved
    pub fn dictionary_source(&self) -> Result<DictionarySource> {
        Ok(match DictionarySource::parse(&self.dictionary) {
            DictionarySource::Path(path) => {
                DictionarySource::Path(path_resolver::resolve_path(&path.to_string_lossy())?)
            }
            embedded => embedded,
        })
    }

    /// Emoji pattern file with `~` and relative paths resolved
    pub fn emoji_pattern_file(&self) -> Result<Option<PathBuf>> {
        self.emoji_pattern_path
            .as_deref()
            .map(path_resolver::resolve_path)
            .transpose()
    }

    // Getters
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn japanese_only(&self) -> bool {
        self.japanese_only
    }

    pub fn dictionary(&self) -> &str {
        &self.dictionary
    }

    pub fn url_timeout_secs(&self) -> u64 {
        self.url_timeout_secs
    }

    pub fn emoji_pattern_path(&self) -> Option<&str> {
        self.emoji_pattern_path.as_deref()
    }

    pub fn output_lemma(&self) -> bool {
        self.output_lemma
    }
}
