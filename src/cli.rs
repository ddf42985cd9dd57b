//! CLI argument types and the line-oriented driver for the `novac` binary.
//! Arguments load from CLI args, environment (prefix `NOVAC_`), and optional
//! config files.

use figment::{
    Figment,
    providers::{Format, Toml},
};
use ortho_config::OrthoError;
use serde::Deserialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::api::PredictFn;
use crate::config::{ConfigError, EngineConfig};
use crate::errors::PredictError;
use crate::pipeline::IngredientClassifier;
use crate::providers::LogitsModel;

/// Command-line arguments for the `novac` binary.
///
/// Ingredient lists are read from standard input, one per line.
///
/// # Examples
///
/// ```
/// use ingredient_nova::cli::NovacArgs;
/// use ortho_config::OrthoConfig;
///
/// let args = NovacArgs::load_from_iter(["novac", "--pretty=true"])
///     .expect("load args from CLI iterator");
/// assert!(args.pretty);
/// ```
#[derive(Debug, Deserialize, ortho_config::OrthoConfig)]
#[ortho_config(prefix = "NOVAC")]
pub struct NovacArgs {
    /// Emit indented JSON instead of one object per line.
    #[ortho_config(default = false)]
    #[serde(default)]
    pub pretty: bool,

    /// Directory holding the tokenizer and model artefacts.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Optional TOML file with engine settings.
    #[serde(default)]
    pub engine_config: Option<PathBuf>,

    /// Optional path to a configuration file.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl NovacArgs {
    /// Load configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an [`OrthoError`] if the file cannot be read or parsed.
    pub fn load_from_config(path: &str) -> Result<Self, OrthoError> {
        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(Into::into)
    }

    /// Resolve the engine configuration these arguments describe.
    ///
    /// Starts from `engine_config` (with `NOVA_` environment overrides) when
    /// given, otherwise from the environment alone; `model_dir` wins over
    /// both.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the engine settings cannot be loaded.
    pub fn engine(&self) -> Result<EngineConfig, ConfigError> {
        let config = match &self.engine_config {
            Some(path) => EngineConfig::load_from_env_and_config(path)?,
            None => EngineConfig::load_from_env()?,
        };
        Ok(match &self.model_dir {
            Some(dir) => config.with_model_dir(dir),
            None => config,
        })
    }
}

/// Failures while streaming ingredient lists through a classifier.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read or write a line: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Predict {
        line: usize,
        #[source]
        source: PredictError,
    },
    #[error("failed to serialise response: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// Classify each non-blank input line, writing one JSON response per line.
///
/// Stops at the first failing line; responses already written stay written.
/// Returns the number of responses produced.
///
/// # Errors
///
/// Returns a [`RunError`] for I/O, prediction, or serialisation failures.
pub fn run<M: LogitsModel>(
    classifier: &IngredientClassifier<M>,
    input: impl BufRead,
    mut output: impl Write,
    pretty: bool,
) -> Result<usize, RunError> {
    let mut written = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = classifier
            .predict(&line)
            .map_err(|source| RunError::Predict {
                line: index + 1,
                source,
            })?;
        if pretty {
            serde_json::to_writer_pretty(&mut output, &response)?;
        } else {
            serde_json::to_writer(&mut output, &response)?;
        }
        writeln!(output)?;
        written += 1;
    }
    output.flush()?;
    Ok(written)
}
