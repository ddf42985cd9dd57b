use std::path::Path;
use std::sync::Mutex;

use ort::{session::Session, value::TensorRef};

use super::errors::OnnxModelError;
use crate::config::EngineConfig;
use crate::engine::TokenizedInput;
use crate::providers::LogitsModel;

/// Sequence classifier executed through ONNX Runtime.
///
/// `Session::run` needs exclusive access, so executions are serialised
/// through a mutex while tokenisation and post-processing stay outside it.
#[derive(Debug)]
pub struct OnnxNovaModel {
    session: Mutex<Session>,
    input_ids_name: String,
    attention_mask_name: String,
    output_name: String,
}

impl LogitsModel for OnnxNovaModel {
    type Error = OnnxModelError;

    fn load(path: &Path, config: &EngineConfig) -> Result<Self, Self::Error> {
        let (input_ids_name, attention_mask_name) =
            match (config.input_names.first(), config.input_names.get(1)) {
                (Some(ids), Some(attention)) => (ids.clone(), attention.clone()),
                _ => {
                    return Err(OnnxModelError::InsufficientInputNames {
                        expected: 2,
                        actual: config.input_names.len(),
                    });
                }
            };

        let mut builder = Session::builder().map_err(OnnxModelError::CreateSessionBuilder)?;
        if config.intra_threads > 0 {
            builder = builder
                .with_intra_threads(config.intra_threads)
                .map_err(OnnxModelError::ConfigureThreads)?;
        }
        let session = builder
            .commit_from_file(path)
            .map_err(OnnxModelError::CreateSession)?;

        log::debug!(
            "ONNX model inputs: {:?}",
            session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>()
        );
        log::debug!(
            "ONNX model outputs: {:?}",
            session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_ids_name,
            attention_mask_name,
            output_name: config.output_name.clone(),
        })
    }

    fn logits(&self, input: &TokenizedInput) -> Result<Vec<f32>, Self::Error> {
        let length = input.input_ids.len();
        let ids_tensor = TensorRef::from_array_view(([1usize, length], input.input_ids.as_slice()))
            .map_err(OnnxModelError::EncodeTensor)?;
        let attention_tensor =
            TensorRef::from_array_view(([1usize, length], input.attention_mask.as_slice()))
                .map_err(OnnxModelError::EncodeTensor)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| OnnxModelError::SessionPoisoned)?;

        let outputs = session
            .run(ort::inputs! {
                self.input_ids_name.as_str() => ids_tensor,
                self.attention_mask_name.as_str() => attention_tensor,
            })
            .map_err(OnnxModelError::Inference)?;

        let logits_value =
            outputs
                .get(self.output_name.as_str())
                .ok_or_else(|| OnnxModelError::OutputMissing {
                    name: self.output_name.clone(),
                })?;
        let (_, logits) = logits_value
            .try_extract_tensor::<f32>()
            .map_err(OnnxModelError::Inference)?;
        Ok(logits.to_vec())
    }
}
