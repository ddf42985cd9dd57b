//! End-to-end prediction over raw ingredient text.
//!
//! Combines the inference engine and the allergen detector. The allergen scan
//! reads the raw text and never depends on the classifier, so a model problem
//! cannot change which allergens are reported for an input.

use crate::{
    allergens::AllergenDetector,
    api::{PredictFn, PredictionResponse, validate_ingredients},
    config::EngineConfig,
    engine::InferenceEngine,
    errors::{EngineStatus, InitializationError, PredictError},
    providers::LogitsModel,
};

/// `PredictFn` backed by a loaded [`InferenceEngine`].
///
/// # Examples
///
/// ```no_run
/// use ingredient_nova::{EngineConfig, IngredientClassifier, PredictFn};
/// use ingredient_nova::providers::onnx::OnnxNovaModel;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let classifier = IngredientClassifier::<OnnxNovaModel>::load(EngineConfig::default())?;
/// let response = classifier.predict("milk, sugar, cocoa butter, soy lecithin, vanilla")?;
/// assert_eq!(response.allergens.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IngredientClassifier<M> {
    engine: InferenceEngine<M>,
    detector: AllergenDetector,
}

impl<M: LogitsModel> IngredientClassifier<M> {
    /// Wrap an engine; the engine may still be uninitialised.
    #[must_use]
    pub fn new(engine: InferenceEngine<M>) -> Self {
        Self {
            engine,
            detector: AllergenDetector,
        }
    }

    /// Load the engine artefacts and build the classifier.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] when the artefacts cannot be loaded.
    pub fn load(config: EngineConfig) -> Result<Self, InitializationError> {
        InferenceEngine::from_config(config).map(Self::new)
    }

    #[must_use]
    pub fn engine(&self) -> &InferenceEngine<M> {
        &self.engine
    }

    /// Engine lifecycle state, suitable for a health probe.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.engine.status()
    }
}

impl<M: LogitsModel> PredictFn for IngredientClassifier<M> {
    type Error = PredictError;

    fn predict(&self, ingredients: &str) -> Result<PredictionResponse, Self::Error> {
        let ingredients = validate_ingredients(ingredients)?;
        let allergens = self.detector.detect(ingredients);
        let classification = self.engine.predict_nova(ingredients)?;
        log::debug!(
            "classified as {} ({}, {:.3}) with {} allergen categories",
            classification.nova_group,
            classification.nova_group.description(),
            classification.confidence,
            allergens.len()
        );
        Ok(PredictionResponse::new(&classification, &allergens))
    }
}
