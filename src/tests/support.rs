//! Deterministic stand-ins for the tokenizer and model artefacts.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokenizers::Tokenizer;

use crate::config::EngineConfig;
use crate::engine::TokenizedInput;
use crate::providers::LogitsModel;

/// Word-level vocabulary covering the ingredient words used across tests.
pub const TOKENIZER_JSON: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [],
  "normalizer": null,
  "pre_tokenizer": { "type": "Whitespace" },
  "post_processor": null,
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": {
      "[PAD]": 0,
      "[UNK]": 1,
      "[CLS]": 2,
      "milk": 3,
      "sugar": 4,
      "cocoa": 5,
      "butter": 6,
      "soy": 7,
      "lecithin": 8,
      "vanilla": 9,
      ",": 10,
      "wheat": 11,
      "flour": 12,
      "salt": 13
    },
    "unk_token": "[UNK]"
  }
}"#;

#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
#[must_use]
pub fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() < tol
}

/// Parse [`TOKENIZER_JSON`] into a tokenizer.
///
/// # Panics
///
/// Panics if the fixture JSON is rejected by `tokenizers`.
#[must_use]
pub fn fixture_tokenizer() -> Tokenizer {
    Tokenizer::from_str(TOKENIZER_JSON).unwrap_or_else(|e| panic!("fixture tokenizer: {e}"))
}

/// Error raised by [`FixedLogits`].
#[derive(Debug, Error)]
pub enum FixedLogitsError {
    #[error("failed to read logits file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("logits file {path} is not a JSON array of numbers: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("model configured to fail")]
    Scripted,
}

/// Model double returning the same logits for every input.
///
/// When loaded from disk the "model file" is a JSON array of logits, which
/// lets tests exercise artefact resolution without a real network.
#[derive(Debug)]
pub struct FixedLogits {
    logits: Option<Vec<f32>>,
    calls: Arc<AtomicUsize>,
}

impl FixedLogits {
    #[must_use]
    pub fn new(logits: Vec<f32>) -> Self {
        Self {
            logits: Some(logits),
            calls: Arc::default(),
        }
    }

    /// A model whose every execution fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            logits: None,
            calls: Arc::default(),
        }
    }

    /// Shared count of executions, readable after the model is moved
    /// into an engine.
    #[must_use]
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl LogitsModel for FixedLogits {
    type Error = FixedLogitsError;

    fn load(path: &Path, _config: &EngineConfig) -> Result<Self, Self::Error> {
        let raw = fs::read_to_string(path).map_err(|source| FixedLogitsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let logits = serde_json::from_str(&raw).map_err(|source| FixedLogitsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            logits: Some(logits),
            calls: Arc::default(),
        })
    }

    fn logits(&self, _input: &TokenizedInput) -> Result<Vec<f32>, Self::Error> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.logits.clone().ok_or(FixedLogitsError::Scripted)
    }
}
