use serde::{Deserialize, Serialize};

use crate::allergens::{AllergenCategory, AllergenSet};
use crate::errors::InputValidationError;
use crate::nova::{Classification, NovaGroup};

/// Nutrition grade reported until a real score is computed.
pub const NUTRI_SCORE_PLACEHOLDER: &str = "Unknown";

/// Reason attached to every model-based classification.
pub const PROCESSING_REASON: &str = "Automated BERT Classification";

/// Longest ingredient list accepted, in characters.
pub const MAX_INGREDIENT_CHARS: usize = 5000;

/// Result returned to callers for one ingredient list.
///
/// # Examples
///
/// ```
/// use ingredient_nova::allergens::{AllergenCategory, AllergenSet};
/// use ingredient_nova::api::PredictionResponse;
/// use ingredient_nova::nova::Classification;
///
/// let classification = Classification::from_logits(&[0.0, 0.0, 0.0, 4.0]).unwrap();
/// let allergens = AllergenSet::from([AllergenCategory::Soy]);
/// let response = PredictionResponse::new(&classification, &allergens);
/// assert_eq!(response.nova_group.get(), 4);
/// assert_eq!(response.nutri_score, "Unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub nova_group: NovaGroup,
    pub confidence: f32,
    pub nutri_score: String,
    pub allergens: Vec<AllergenCategory>,
    pub processing_reasons: Vec<String>,
}

impl PredictionResponse {
    /// Merge a classification and an allergen scan into one response.
    #[must_use]
    pub fn new(classification: &Classification, allergens: &AllergenSet) -> Self {
        Self {
            nova_group: classification.nova_group,
            confidence: classification.confidence,
            nutri_score: NUTRI_SCORE_PLACEHOLDER.to_owned(),
            allergens: allergens.iter().copied().collect(),
            processing_reasons: vec![PROCESSING_REASON.to_owned()],
        }
    }
}

/// Trait for turning an ingredient list into a prediction.
pub trait PredictFn {
    /// Error type returned when prediction fails.
    type Error: std::error::Error + Send + Sync;

    /// Classify an ingredient list and flag its allergens.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is rejected or inference fails.
    fn predict(&self, ingredients: &str) -> Result<PredictionResponse, Self::Error>;
}

/// Boundary check applied before text reaches the pipeline.
///
/// Whitespace-only input counts as empty. This is deliberately stricter than
/// rejecting only the zero-length string: blank text normalises to nothing
/// and would only ever be scored as pure padding.
///
/// # Errors
///
/// Returns [`InputValidationError::Empty`] for blank input and
/// [`InputValidationError::TooLong`] beyond [`MAX_INGREDIENT_CHARS`].
///
/// # Examples
///
/// ```
/// use ingredient_nova::api::validate_ingredients;
///
/// assert!(validate_ingredients("milk, sugar").is_ok());
/// assert!(validate_ingredients("   ").is_err());
/// ```
pub fn validate_ingredients(ingredients: &str) -> Result<&str, InputValidationError> {
    if ingredients.trim().is_empty() {
        return Err(InputValidationError::Empty);
    }
    let actual = ingredients.chars().count();
    if actual > MAX_INGREDIENT_CHARS {
        return Err(InputValidationError::TooLong {
            max: MAX_INGREDIENT_CHARS,
            actual,
        });
    }
    Ok(ingredients)
}
