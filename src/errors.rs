//! Error taxonomy for engine start-up, inference, and input validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::artefact::ArtefactError;
use crate::config::ConfigError;

/// Boxed error produced by a model backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Lifecycle state of an [`InferenceEngine`](crate::engine::InferenceEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Ready,
    Failed,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Failed => "failed",
        })
    }
}

/// Fatal errors raised while loading the tokenizer and model.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Artefact(#[from] ArtefactError),
    #[error("no model file found in {dir}; tried {candidates:?}")]
    ModelNotFound {
        dir: PathBuf,
        candidates: Vec<String>,
    },
    #[error("failed to load tokenizer from {path}: {source}")]
    LoadTokenizer {
        path: PathBuf,
        #[source]
        source: tokenizers::Error,
    },
    #[error("pad token \"{token}\" is not in the tokenizer vocabulary")]
    UnknownPadToken { token: String },
    #[error("failed to configure tokenizer truncation: {0}")]
    ConfigureTruncation(#[source] tokenizers::Error),
    #[error("failed to load model from {path}: {source}")]
    LoadModel {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("engine is already initialised")]
    AlreadyInitialized,
    #[error("engine failed to initialise earlier: {reason}")]
    PreviouslyFailed { reason: String },
}

/// Errors raised while tokenising text or executing the model.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to encode text: {0}")]
    Encode(#[source] tokenizers::Error),
    #[error("tokenizer produced sequence of length {actual} but expected {expected}")]
    SequenceLength { expected: usize, actual: usize },
    #[error("model execution failed: {0}")]
    Model(#[source] BackendError),
    #[error("model produced {actual} logits but expected {expected}")]
    UnexpectedLogitCount { expected: usize, actual: usize },
    #[error("model produced non-finite logits")]
    NonFiniteLogits,
}

/// Ingredient text rejected before it reaches the pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("ingredients cannot be empty")]
    Empty,
    #[error("ingredients exceed {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Errors returned when asking for a prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model not ready (engine is {status})")]
    NotReady { status: EngineStatus },
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    InvalidInput(#[from] InputValidationError),
}

impl PredictError {
    /// True when the engine had not been loaded successfully.
    #[must_use]
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}
