//! Provider interfaces shared by the pipeline stages.
//!
//! `TextProcessor` is the contract for stages that turn raw text into a
//! structured result. `LogitsModel` is the seam between the inference engine
//! and the numeric backend that scores tokenised input.

use std::path::Path;

use crate::config::EngineConfig;
use crate::engine::TokenizedInput;

#[cfg(feature = "onnx")]
pub mod onnx;

/// Processes text to produce a structured, thread-safe output.
pub trait TextProcessor {
    /// Structured result returned by the processor.
    ///
    /// Outputs must be `Send + Sync + 'static` so they can be safely shared
    /// across threads and stored in trait objects without borrowing.
    type Output: Send + Sync + 'static;
    /// Error type returned when processing fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Process the supplied text.
    ///
    /// # Errors
    ///
    /// Returns an error if processing fails.
    fn process(&self, input: &str) -> Result<Self::Output, Self::Error>;
}

/// Sequence-classification backend producing one row of class logits.
///
/// Implementations are loaded once and then shared read-only across threads.
/// Backends whose execution call needs exclusive access must serialise it
/// internally.
pub trait LogitsModel: Send + Sync + Sized {
    /// Error type returned by loading and execution.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the model artefact at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the artefact is missing or malformed.
    fn load(path: &Path, config: &EngineConfig) -> Result<Self, Self::Error>;

    /// Score a fixed-length encoding, returning the raw class logits.
    ///
    /// # Errors
    ///
    /// Returns an error if execution fails.
    fn logits(&self, input: &TokenizedInput) -> Result<Vec<f32>, Self::Error>;
}
