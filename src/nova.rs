//! NOVA groups and post-processing of classifier logits.
//!
//! The classifier emits one raw score per NOVA group. Scores are mapped onto
//! a probability distribution with a max-shifted softmax; the most probable
//! class index (first on ties) becomes the group and its probability the
//! confidence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InferenceError;

/// Number of classes produced by the NOVA classifier.
pub const NOVA_CLASS_COUNT: usize = 4;

/// Processing level on the 1–4 NOVA scale.
///
/// # Examples
///
/// ```
/// use ingredient_nova::nova::NovaGroup;
///
/// let group = NovaGroup::from_class_index(3).unwrap();
/// assert_eq!(group.get(), 4);
/// assert!(NovaGroup::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct NovaGroup(u8);

impl NovaGroup {
    /// Build a group from its 1-based NOVA number.
    #[must_use]
    pub const fn new(group: u8) -> Option<Self> {
        match group {
            1..=4 => Some(Self(group)),
            _ => None,
        }
    }

    /// Map a 0-based classifier output index onto its group.
    #[must_use]
    pub fn from_class_index(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(Self::new)
    }

    /// The 1-based NOVA number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Short description of the processing level.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self.0 {
            1 => "Unprocessed or minimally processed foods",
            2 => "Processed culinary ingredients",
            3 => "Processed foods",
            _ => "Ultra-processed food and drink products",
        }
    }
}

impl TryFrom<u8> for NovaGroup {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("NOVA group must be within 1..=4, got {value}"))
    }
}

impl From<NovaGroup> for u8 {
    fn from(group: NovaGroup) -> Self {
        group.0
    }
}

impl fmt::Display for NovaGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NOVA {}", self.0)
    }
}

/// Outcome of running the classifier over one ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub nova_group: NovaGroup,
    /// Probability of the chosen group, within `[0, 1]`.
    pub confidence: f32,
    /// Probability of each group, indexed by `group - 1`.
    pub probabilities: [f32; NOVA_CLASS_COUNT],
}

impl Classification {
    /// Post-process one row of raw classifier scores.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::UnexpectedLogitCount`] when the row does not
    /// hold exactly [`NOVA_CLASS_COUNT`] scores and
    /// [`InferenceError::NonFiniteLogits`] when any score is `NaN` or
    /// infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use ingredient_nova::nova::Classification;
    ///
    /// let result = Classification::from_logits(&[0.0, 0.0, 5.0, 0.0]).unwrap();
    /// assert_eq!(result.nova_group.get(), 3);
    /// assert!((result.confidence - 0.980_187).abs() < 1e-5);
    /// ```
    pub fn from_logits(logits: &[f32]) -> Result<Self, InferenceError> {
        let scores: [f32; NOVA_CLASS_COUNT] =
            logits
                .try_into()
                .map_err(|_| InferenceError::UnexpectedLogitCount {
                    expected: NOVA_CLASS_COUNT,
                    actual: logits.len(),
                })?;
        if !scores.iter().all(|score| score.is_finite()) {
            return Err(InferenceError::NonFiniteLogits);
        }
        let probabilities = softmax(scores);
        let (index, confidence) = argmax(&probabilities);
        let nova_group = NovaGroup::from_class_index(index).ok_or(
            InferenceError::UnexpectedLogitCount {
                expected: NOVA_CLASS_COUNT,
                actual: logits.len(),
            },
        )?;
        Ok(Self {
            nova_group,
            confidence,
            probabilities,
        })
    }
}

/// Numerically stable softmax: scores are shifted by their maximum before
/// exponentiation.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "softmax requires float operations")]
pub fn softmax<const N: usize>(logits: [f32; N]) -> [f32; N] {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.map(|value| (value - max).exp());
    let sum: f32 = exps.iter().sum();
    exps.map(|value| value / sum)
}

/// Index and value of the largest entry; the first index wins ties.
fn argmax(values: &[f32]) -> (usize, f32) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (index, value)| {
            if value > best.1 { (index, value) } else { best }
        })
}
