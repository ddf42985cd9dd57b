//! ONNX Runtime backend for the NOVA sequence classifier.
mod errors;
mod session;

pub use errors::OnnxModelError;
pub use session::OnnxNovaModel;
