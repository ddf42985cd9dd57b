//! Inference engine: tokenizer plus classification model, loaded once.
//!
//! An engine starts `Uninitialized`. [`InferenceEngine::load`] moves it to
//! `Ready` or, on any artefact problem, to the terminal `Failed` state; there
//! is no reload. A ready engine holds no per-request mutable state and can be
//! shared across threads behind a plain reference or `Arc`.

use std::fmt;

use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer, TruncationDirection,
    TruncationParams, TruncationStrategy,
};

use crate::artefact;
use crate::config::EngineConfig;
use crate::errors::{EngineStatus, InferenceError, InitializationError, PredictError};
use crate::nova::Classification;
use crate::providers::{LogitsModel, TextProcessor};
use crate::text::normalize;

/// Fixed-length numeric encoding of one ingredient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

impl TokenizedInput {
    /// Count of positions holding real tokens rather than padding.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}

struct Loaded<M> {
    tokenizer: Tokenizer,
    model: M,
}

enum EngineState<M> {
    Uninitialized,
    Ready(Box<Loaded<M>>),
    Failed(String),
}

/// Owns the tokenizer and model used to assign NOVA groups.
///
/// # Examples
///
/// ```no_run
/// use ingredient_nova::config::EngineConfig;
/// use ingredient_nova::engine::InferenceEngine;
/// use ingredient_nova::providers::onnx::OnnxNovaModel;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EngineConfig::default().with_model_dir("/models/food_bert_onnx");
/// let engine = InferenceEngine::<OnnxNovaModel>::from_config(config)?;
/// let result = engine.predict_nova("wheat flour, sugar, palm oil")?;
/// println!("{} ({:.2})", result.nova_group, result.confidence);
/// # Ok(())
/// # }
/// ```
pub struct InferenceEngine<M> {
    config: EngineConfig,
    state: EngineState<M>,
}

impl<M> fmt::Debug for InferenceEngine<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("config", &self.config)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl<M> InferenceEngine<M> {
    /// Create an engine that has not loaded any artefacts yet.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Uninitialized,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        match self.state {
            EngineState::Uninitialized => EngineStatus::Uninitialized,
            EngineState::Ready(_) => EngineStatus::Ready,
            EngineState::Failed(_) => EngineStatus::Failed,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status() == EngineStatus::Ready
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn loaded(&self) -> Result<&Loaded<M>, PredictError> {
        match &self.state {
            EngineState::Ready(loaded) => Ok(loaded.as_ref()),
            _ => Err(PredictError::NotReady {
                status: self.status(),
            }),
        }
    }

    /// Encode already-normalised text into fixed-length arrays.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::NotReady`] before a successful load and
    /// [`PredictError::Inference`] when encoding fails.
    pub fn tokenize(&self, normalized: &str) -> Result<TokenizedInput, PredictError> {
        let loaded = self.loaded()?;
        Ok(encode(
            &loaded.tokenizer,
            normalized,
            self.config.max_sequence_length,
        )?)
    }
}

impl<M: LogitsModel> InferenceEngine<M> {
    /// Build an engine and load its artefacts in one step.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] when any artefact is missing or
    /// malformed.
    pub fn from_config(config: EngineConfig) -> Result<Self, InitializationError> {
        let mut engine = Self::new(config);
        engine.load()?;
        Ok(engine)
    }

    /// Build a ready engine from an in-memory tokenizer and model.
    ///
    /// The tokenizer is reconfigured for the engine's padding and truncation.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] for invalid configuration or a pad
    /// token missing from the vocabulary.
    pub fn with_model(
        config: EngineConfig,
        tokenizer: Tokenizer,
        model: M,
    ) -> Result<Self, InitializationError> {
        let config = config.validate()?;
        let tokenizer = configure_tokenizer(tokenizer, &config)?;
        Ok(Self {
            config,
            state: EngineState::Ready(Box::new(Loaded { tokenizer, model })),
        })
    }

    /// Load the tokenizer and model from the configured directory.
    ///
    /// # Errors
    ///
    /// Returns the load failure, after which the engine stays `Failed`.
    /// Calling `load` on an engine that already left `Uninitialized` returns
    /// [`InitializationError::AlreadyInitialized`] or
    /// [`InitializationError::PreviouslyFailed`].
    pub fn load(&mut self) -> Result<(), InitializationError> {
        match &self.state {
            EngineState::Ready(_) => return Err(InitializationError::AlreadyInitialized),
            EngineState::Failed(reason) => {
                return Err(InitializationError::PreviouslyFailed {
                    reason: reason.clone(),
                });
            }
            EngineState::Uninitialized => {}
        }
        match load_artefacts::<M>(&self.config) {
            Ok(loaded) => {
                log::info!("NOVA engine ready ({})", self.config.model_dir.display());
                self.state = EngineState::Ready(Box::new(loaded));
                Ok(())
            }
            Err(err) => {
                log::error!("NOVA engine failed to initialise: {err}");
                self.state = EngineState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Assign a NOVA group to a raw ingredient list.
    ///
    /// The text is normalised, tokenised to the configured length, scored by
    /// the model, and post-processed into a [`Classification`]. Empty input
    /// is not rejected here; it encodes to pure padding and is still scored.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::NotReady`] before a successful load and
    /// [`PredictError::Inference`] for tokenisation or model failures.
    pub fn predict_nova(&self, ingredients: &str) -> Result<Classification, PredictError> {
        let loaded = self.loaded()?;
        let clean = normalize(ingredients);
        let encoded = encode(&loaded.tokenizer, &clean, self.config.max_sequence_length)?;
        let logits = loaded
            .model
            .logits(&encoded)
            .map_err(|source| InferenceError::Model(Box::new(source)))?;
        Ok(Classification::from_logits(&logits)?)
    }
}

impl<M: LogitsModel> TextProcessor for InferenceEngine<M> {
    type Output = Classification;
    type Error = PredictError;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        self.predict_nova(input)
    }
}

fn load_artefacts<M: LogitsModel>(
    config: &EngineConfig,
) -> Result<Loaded<M>, InitializationError> {
    let config = config.clone().validate()?;

    let tokenizer_path = config.tokenizer_path();
    artefact::verify(&tokenizer_path, config.checksum_for(&config.tokenizer_file))?;
    let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|source| {
        InitializationError::LoadTokenizer {
            path: tokenizer_path.clone(),
            source,
        }
    })?;
    let tokenizer = configure_tokenizer(tokenizer, &config)?;

    let (index, model_path) =
        artefact::resolve_first_existing(&config.model_dir, &config.model_files).ok_or_else(
            || InitializationError::ModelNotFound {
                dir: config.model_dir.clone(),
                candidates: config.model_files.clone(),
            },
        )?;
    let model_file = config.model_files.get(index).map_or("", String::as_str);
    if index == 0 {
        log::info!("Using model {}", model_path.display());
    } else {
        log::info!(
            "Using fallback model {} (preferred variant not available)",
            model_path.display()
        );
    }
    artefact::verify(&model_path, config.checksum_for(model_file))?;

    let model =
        M::load(&model_path, &config).map_err(|source| InitializationError::LoadModel {
            path: model_path.clone(),
            source: Box::new(source),
        })?;
    Ok(Loaded { tokenizer, model })
}

fn configure_tokenizer(
    mut tokenizer: Tokenizer,
    config: &EngineConfig,
) -> Result<Tokenizer, InitializationError> {
    let pad_id = tokenizer.token_to_id(&config.pad_token).ok_or_else(|| {
        InitializationError::UnknownPadToken {
            token: config.pad_token.clone(),
        }
    })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: config.max_sequence_length,
            strategy: TruncationStrategy::LongestFirst,
            stride: 0,
            direction: TruncationDirection::Right,
        }))
        .map_err(InitializationError::ConfigureTruncation)?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(config.max_sequence_length),
        direction: PaddingDirection::Right,
        pad_to_multiple_of: None,
        pad_id,
        pad_type_id: 0,
        pad_token: config.pad_token.clone(),
    }));

    log::debug!(
        "tokenizer padded and truncated to {} tokens (pad id {pad_id})",
        config.max_sequence_length
    );
    Ok(tokenizer)
}

fn encode(
    tokenizer: &Tokenizer,
    text: &str,
    expected: usize,
) -> Result<TokenizedInput, InferenceError> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(InferenceError::Encode)?;

    let ids = encoding.get_ids();
    let attention = encoding.get_attention_mask();
    for actual in [ids.len(), attention.len()] {
        if actual != expected {
            return Err(InferenceError::SequenceLength { expected, actual });
        }
    }

    Ok(TokenizedInput {
        input_ids: ids.iter().map(|id| i64::from(*id)).collect(),
        attention_mask: attention.iter().map(|m| i64::from(*m)).collect(),
    })
}
