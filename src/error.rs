//! Error type for document construction and loading.

use thiserror::Error;

#[derive(Debug, Error)]
/// Failures raised while loading or building a document tree.
///
/// Interactive navigation never errors (impossible states degrade to
/// no-ops); only construction-time problems surface here.
pub enum DocumentError {
    /// Two structurally distinct nodes derived the same identifier. Ids are
    /// the lookup key for activation and history, so this is a defect in the
    /// source document (or in id derivation), never a recoverable state.
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
    /// The document file could not be read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    /// The document file was not valid JSON for the resolved model.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),
}
