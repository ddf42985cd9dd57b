//! Artefact discovery and checksum verification.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised while reading or verifying artefacts on disk.
#[derive(Debug, Error)]
pub enum ArtefactError {
    #[error("failed to read artefact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artefact at {path} expected SHA-256 {expected} but found {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// Pick the first candidate file that exists inside `dir`.
///
/// Candidates are listed in preference order, so a quantized model placed
/// ahead of the standard export wins whenever both are present.
#[must_use]
pub fn resolve_first_existing(dir: &Path, candidates: &[String]) -> Option<(usize, PathBuf)> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .enumerate()
        .find(|(_, path)| path.is_file())
}

/// Verifies the file checksum against `expected` when a digest is recorded.
///
/// # Errors
///
/// Returns `ChecksumMismatch` when the computed digest differs and propagates
/// I/O errors while reading the file.
pub fn verify(path: &Path, expected: Option<&str>) -> Result<(), ArtefactError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let expected = normalise_hex(expected);
    let actual = compute_sha256(path)?;
    if actual == expected {
        log::debug!("checksum verified for {}", path.display());
        Ok(())
    } else {
        Err(ArtefactError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        })
    }
}

/// Computes the SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns I/O errors from opening or reading the file.
pub fn compute_sha256(path: &Path) -> Result<String, ArtefactError> {
    let io_error = |source| ArtefactError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = reader.read(&mut buffer).map_err(io_error)?;
        if read == 0 {
            break;
        }
        let chunk = buffer.get(..read).ok_or_else(|| {
            io_error(std::io::Error::other(
                "read reported bytes beyond buffer length",
            ))
        })?;
        hasher.update(chunk);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn normalise_hex(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn normalise_hex_lowercases_and_trims() {
        assert_eq!(normalise_hex(" ABCDEF "), "abcdef");
    }

    #[test]
    fn prefers_earlier_candidates() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        fs::write(dir.path().join("model.onnx"), b"").unwrap_or_else(|e| panic!("write: {e}"));
        let candidates = vec!["model_quantized.onnx".to_owned(), "model.onnx".to_owned()];
        let (index, path) = resolve_first_existing(dir.path(), &candidates)
            .unwrap_or_else(|| panic!("expected fallback model"));
        assert_eq!(index, 1);
        assert!(path.ends_with("model.onnx"));

        fs::write(dir.path().join("model_quantized.onnx"), b"")
            .unwrap_or_else(|e| panic!("write: {e}"));
        let (index, _) = resolve_first_existing(dir.path(), &candidates)
            .unwrap_or_else(|| panic!("expected quantized model"));
        assert_eq!(index, 0);
    }

    #[test]
    fn verifies_recorded_digest() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("tokenizer.json");
        fs::write(&path, b"").unwrap_or_else(|e| panic!("write: {e}"));
        assert!(verify(&path, None).is_ok());
        let upper = EMPTY_SHA256.to_ascii_uppercase();
        assert!(verify(&path, Some(upper.as_str())).is_ok());
        assert!(matches!(
            verify(&path, Some("00")),
            Err(ArtefactError::ChecksumMismatch { .. })
        ));
    }
}
