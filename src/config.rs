//! Engine configuration and layered loading.
//!
//! Values come from built-in defaults, an optional TOML file, and environment
//! variables prefixed `NOVA_`, in increasing order of precedence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides, e.g. `NOVA_MODEL_DIR`.
pub const ENV_PREFIX: &str = "NOVA_";

/// Fields that may be overridden from the environment. Other `NOVA_*`
/// variables belong to the host and are ignored.
const ENV_KEYS: &[&str] = &[
    "model_dir",
    "model_files",
    "tokenizer_file",
    "max_sequence_length",
    "pad_token",
    "input_names",
    "output_name",
    "checksums",
    "intra_threads",
];

/// Errors raised by invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_sequence_length must be greater than 0")]
    ZeroSequenceLength,
    #[error("model_files must name at least one candidate")]
    NoModelFiles,
    #[error("engine requires at least {expected} input names but found {actual}")]
    InsufficientInputNames { expected: usize, actual: usize },
    #[error("output_name cannot be empty")]
    MissingOutputName,
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Settings for locating and running the NOVA classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Directory holding the tokenizer and model artefacts.
    pub model_dir: PathBuf,
    /// Model file names in preference order; the first one present is used.
    pub model_files: Vec<String>,
    /// Tokenizer definition consumed by `tokenizers`.
    pub tokenizer_file: String,
    /// Inputs are padded and truncated to exactly this many tokens.
    pub max_sequence_length: usize,
    /// Token used for padding; must exist in the vocabulary.
    pub pad_token: String,
    /// Graph input names for token ids and attention mask, in that order.
    pub input_names: Vec<String>,
    /// Graph output holding the class logits.
    pub output_name: String,
    /// Expected SHA-256 digests keyed by artefact file name.
    pub checksums: BTreeMap<String, String>,
    /// Intra-op thread count for the runtime; `0` keeps its default.
    pub intra_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/food_bert_onnx"),
            model_files: vec!["model_quantized.onnx".into(), "model.onnx".into()],
            tokenizer_file: "tokenizer.json".into(),
            max_sequence_length: 128,
            pad_token: "[PAD]".into(),
            input_names: vec!["input_ids".into(), "attention_mask".into()],
            output_name: "logits".into(),
            checksums: BTreeMap::new(),
            intra_threads: 0,
        }
    }
}

impl EngineConfig {
    /// Point the configuration at another artefact directory.
    #[must_use]
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    /// Ensure the configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid field.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_sequence_length == 0 {
            return Err(ConfigError::ZeroSequenceLength);
        }
        if self.model_files.is_empty() {
            return Err(ConfigError::NoModelFiles);
        }
        if self.input_names.len() < 2 {
            return Err(ConfigError::InsufficientInputNames {
                expected: 2,
                actual: self.input_names.len(),
            });
        }
        if self.output_name.trim().is_empty() {
            return Err(ConfigError::MissingOutputName);
        }
        Ok(self)
    }

    /// Full path of the tokenizer artefact.
    #[must_use]
    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join(&self.tokenizer_file)
    }

    /// Expected digest for an artefact, if one was recorded.
    #[must_use]
    pub fn checksum_for(&self, file_name: &str) -> Option<&str> {
        self.checksums.get(file_name).map(String::as_str)
    }

    /// Load configuration solely from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if any variable cannot be parsed.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::extract(Self::defaults().merge(Self::env()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be read or parsed.
    pub fn load_from_config(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(Self::defaults().merge(Toml::file(path)))
    }

    /// Load configuration from a TOML file with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if either source contains invalid values.
    pub fn load_from_env_and_config(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(
            Self::defaults()
                .merge(Toml::file(path))
                .merge(Self::env()),
        )
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).only(ENV_KEYS)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }
}
