//! End-to-end predictions through `IngredientClassifier`.

use std::sync::Arc;
use std::thread;

use ingredient_nova::tests::support::FixedLogits;
use ingredient_nova::{
    AllergenCategory, EngineConfig, IngredientClassifier, PredictError, PredictFn,
};
use rstest::{fixture, rstest};
mod support;
use support::{approx_eq, artefact_dir};

const CHOCOLATE: &str = "milk, sugar, cocoa butter, soy lecithin, vanilla";

struct Loaded {
    _dir: tempfile::TempDir,
    classifier: IngredientClassifier<FixedLogits>,
}

#[fixture]
fn loaded() -> Loaded {
    let dir = artefact_dir(&[("model_quantized.onnx", "[0.0, 0.0, 5.0, 0.0]")]);
    let config = EngineConfig::default().with_model_dir(dir.path());
    let classifier = IngredientClassifier::load(config)
        .unwrap_or_else(|e| panic!("classifier load failed: {e}"));
    Loaded {
        _dir: dir,
        classifier,
    }
}

#[rstest]
fn chocolate_flags_dairy_and_soy(loaded: Loaded) {
    let response = loaded
        .classifier
        .predict(CHOCOLATE)
        .unwrap_or_else(|e| panic!("prediction failed: {e}"));
    assert_eq!(
        response.allergens,
        vec![AllergenCategory::Dairy, AllergenCategory::Soy]
    );
    assert_eq!(response.nova_group.get(), 3);
    assert!(approx_eq(response.confidence, 0.980_187, 1e-5));
    assert_eq!(response.nutri_score, "Unknown");
}

#[rstest]
#[case("wheat flour, sugar, palm oil, salt, emulsifier E471")]
#[case("almond milk")]
#[case("WATER")]
fn responses_are_well_formed(loaded: Loaded, #[case] ingredients: &str) {
    let response = loaded
        .classifier
        .predict(ingredients)
        .unwrap_or_else(|e| panic!("prediction failed: {e}"));
    assert!((1..=4).contains(&response.nova_group.get()));
    assert!((0.0..=1.0).contains(&response.confidence));
}

#[rstest]
fn repeated_calls_are_deterministic(loaded: Loaded) {
    let first = loaded
        .classifier
        .predict(CHOCOLATE)
        .unwrap_or_else(|e| panic!("prediction failed: {e}"));
    for _ in 0..5 {
        let again = loaded
            .classifier
            .predict(CHOCOLATE)
            .unwrap_or_else(|e| panic!("prediction failed: {e}"));
        assert_eq!(again, first);
    }
}

#[rstest]
fn serves_concurrent_requests(loaded: Loaded) {
    let classifier = Arc::new(loaded.classifier);
    let expected = classifier
        .predict(CHOCOLATE)
        .unwrap_or_else(|e| panic!("prediction failed: {e}"));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || classifier.predict(CHOCOLATE))
        })
        .collect();
    for handle in handles {
        let response = handle
            .join()
            .unwrap_or_else(|_| panic!("worker panicked"))
            .unwrap_or_else(|e| panic!("prediction failed: {e}"));
        assert_eq!(response, expected);
    }
}

#[rstest]
fn oversized_input_is_rejected(loaded: Loaded) {
    let long = "sugar, ".repeat(1000);
    let err = loaded.classifier.predict(&long).unwrap_err();
    assert!(matches!(err, PredictError::InvalidInput(_)));
}

#[rstest]
fn model_failure_is_reported_not_defaulted() {
    let dir = artefact_dir(&[]);
    let engine = ingredient_nova::InferenceEngine::with_model(
        EngineConfig::default().with_model_dir(dir.path()),
        ingredient_nova::tests::support::fixture_tokenizer(),
        FixedLogits::failing(),
    )
    .unwrap_or_else(|e| panic!("engine setup failed: {e}"));
    let classifier = IngredientClassifier::new(engine);
    let err = classifier.predict(CHOCOLATE).unwrap_err();
    assert!(matches!(err, PredictError::Inference(_)));
    assert!(err.to_string().contains("model execution failed"));
}
