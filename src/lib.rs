//! Core library entry point.
//! Re-exports the prediction pipeline and its building blocks.

pub mod allergens;
pub mod api;
pub mod artefact;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod nova;
pub mod pipeline;
pub mod providers;
pub mod text;

pub use allergens::{AllergenCategory, AllergenDetector, AllergenSet};
pub use api::{PredictFn, PredictionResponse};
#[cfg(feature = "cli")]
pub use cli::NovacArgs;
pub use config::EngineConfig;
pub use engine::{InferenceEngine, TokenizedInput};
pub use errors::{EngineStatus, InferenceError, InitializationError, PredictError};
pub use nova::{Classification, NovaGroup};
pub use pipeline::IngredientClassifier;
pub use providers::{LogitsModel, TextProcessor};

#[doc(hidden)]
pub mod tests;
