#![allow(dead_code, reason = "each test crate uses a subset of the helpers")]

use std::fs;
use std::path::Path;

use ingredient_nova::tests::support::TOKENIZER_JSON;
use tempfile::TempDir;

pub use ingredient_nova::tests::support::approx_eq;

/// Create an artefact directory holding the fixture tokenizer plus `files`.
///
/// Model files for the fixed-logit double contain a JSON array of logits.
pub fn artefact_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("create temp dir: {e}"));
    write(dir.path(), "tokenizer.json", TOKENIZER_JSON);
    for (name, contents) in files {
        write(dir.path(), name, contents);
    }
    dir
}

pub fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap_or_else(|e| panic!("write {name}: {e}"));
}
