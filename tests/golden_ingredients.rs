use ingredient_nova::text::normalize;
use ingredient_nova::{AllergenCategory, AllergenDetector};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

const INGREDIENTS_JSONL: &str = include_str!("golden/ingredients.jsonl");

#[derive(Deserialize)]
struct GoldenCase {
    id: u32,
    ingredients: String,
    normalized: String,
    allergens: Vec<AllergenCategory>,
}

#[test]
fn golden_ingredients() -> Result<(), Box<dyn Error>> {
    for line in INGREDIENTS_JSONL.lines() {
        let expected: GoldenCase = from_str(line)?;
        assert_eq!(
            normalize(&expected.ingredients),
            expected.normalized,
            "normalisation mismatch for id {}",
            expected.id,
        );
        let found: Vec<_> = AllergenDetector
            .detect(&expected.ingredients)
            .into_iter()
            .collect();
        assert_eq!(
            found, expected.allergens,
            "allergen mismatch for id {} (ingredients = `{}`)",
            expected.id, expected.ingredients,
        );
        assert_eq!(normalize(&expected.normalized), expected.normalized);
    }
    Ok(())
}
