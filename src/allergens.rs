//! Keyword-based allergen detection.
//!
//! Each category owns a fixed keyword list. A category is flagged when any of
//! its keywords occurs as a plain substring of the lower-cased ingredient
//! text. There is no word-boundary check, so `"egg"` also fires inside
//! `"eggplant"` and `"butter"` inside `"cocoa butter"`.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::providers::TextProcessor;

/// Allergen categories recognised by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AllergenCategory {
    Gluten,
    Dairy,
    Soy,
    Nuts,
    Peanuts,
    Eggs,
    Fish,
    Shellfish,
}

impl AllergenCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Gluten,
        Self::Dairy,
        Self::Soy,
        Self::Nuts,
        Self::Peanuts,
        Self::Eggs,
        Self::Fish,
        Self::Shellfish,
    ];

    /// Label used in responses.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gluten => "Gluten",
            Self::Dairy => "Dairy",
            Self::Soy => "Soy",
            Self::Nuts => "Nuts",
            Self::Peanuts => "Peanuts",
            Self::Eggs => "Eggs",
            Self::Fish => "Fish",
            Self::Shellfish => "Shellfish",
        }
    }

    /// Lower-case keywords that flag this category.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Gluten => &["wheat", "barley", "rye", "malt", "flour", "semolina", "spelt"],
            Self::Dairy => &[
                "milk", "cream", "cheese", "whey", "casein", "lactose", "butter", "yogurt",
            ],
            Self::Soy => &["soy", "tofu", "edamame", "lecithin", "miso", "tempeh"],
            Self::Nuts => &[
                "almond",
                "walnut",
                "cashew",
                "pecan",
                "hazelnut",
                "pistachio",
                "macadamia",
            ],
            Self::Peanuts => &["peanut", "groundnut"],
            Self::Eggs => &["egg", "albumin", "mayonnaise"],
            Self::Fish => &["fish", "tuna", "salmon", "cod", "anchovy"],
            Self::Shellfish => &["shrimp", "crab", "lobster", "prawn", "clam", "mussel", "oyster"],
        }
    }

    fn matches(self, lower: &str) -> bool {
        self.keywords().iter().any(|keyword| lower.contains(keyword))
    }
}

impl fmt::Display for AllergenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distinct allergen categories found in one ingredient list.
pub type AllergenSet = BTreeSet<AllergenCategory>;

/// Substring scanner over the fixed category table.
///
/// # Examples
///
/// ```
/// use ingredient_nova::allergens::{AllergenCategory, AllergenDetector};
///
/// let found = AllergenDetector.detect("Almond milk, sugar");
/// assert!(found.contains(&AllergenCategory::Nuts));
/// assert!(found.contains(&AllergenCategory::Dairy));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AllergenDetector;

impl AllergenDetector {
    /// Scan raw ingredient text for allergen keywords.
    #[must_use]
    pub fn detect(&self, text: &str) -> AllergenSet {
        let lower = text.to_lowercase();
        AllergenCategory::ALL
            .into_iter()
            .filter(|category| category.matches(&lower))
            .collect()
    }
}

impl TextProcessor for AllergenDetector {
    type Output = AllergenSet;
    type Error = Infallible;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        Ok(self.detect(input))
    }
}
