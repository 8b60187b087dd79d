//! Checkpoint registry error types.

use thiserror::Error;

/// Errors surfaced while looking up or patching checkpoints.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Failed to load or parse checkpoint tensors.
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Network error while fetching a hosted checkpoint file.
    #[error("Download error: {0}")]
    Download(String),

    /// A post-load callback was applied to the wrong model family.
    #[error("Family mismatch: callback expects a {expected} model, got {got}")]
    FamilyMismatch {
        /// Family the callback operates on.
        expected: &'static str,
        /// Family of the model it was handed.
        got: &'static str,
    },

    /// A documented placeholder index fell outside the model's vocabulary.
    ///
    /// The marker and head indices are checkpoint-specific literals; a model
    /// whose vocabulary does not cover them violates the callback's
    /// precondition and the load is aborted.
    #[error("Embedding index {index} out of range for vocabulary of size {vocab_size}")]
    IndexOutOfRange {
        /// Offending row index.
        index: usize,
        /// Vocabulary size of the model being patched.
        vocab_size: usize,
    },

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, CheckpointError>;

impl From<reqwest::Error> for CheckpointError {
    fn from(err: reqwest::Error) -> Self {
        CheckpointError::Download(err.to_string())
    }
}
