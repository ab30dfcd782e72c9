use thiserror::Error;

/// Result type for intake operations.
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Errors that can occur while driving a case submission.
///
/// Validation failures (empty selection, missing document type) are recovered
/// locally by the caller; submission and transfer failures propagate up so the
/// caller can reset the submit affordance and retry.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Nothing has been accepted into the selection yet
    #[error("nothing to submit: the selection is empty")]
    EmptySelection,

    /// A descriptor has no assigned document type
    #[error("no document type assigned for \"{0}\"")]
    MissingDocumentType(String),

    /// The selection may no longer be reshaped
    #[error("selection is sealed: {0}")]
    Sealed(&'static str),

    /// No descriptor at the given position
    #[error("no file at index {0}")]
    IndexOutOfBounds(usize),

    /// Case creation failed; no per-file state changed
    #[error("case creation failed: {0}")]
    Submission(String),

    /// The staged backend returned a plan array that does not line up with
    /// the submitted documents
    #[error("upload plan mismatch: {expected} documents submitted, {got} plans returned")]
    PlanMismatch { expected: usize, got: usize },

    /// Upload or confirmation failed for one document, halting the batch
    #[error("transfer failed for \"{filename}\": {message}")]
    Transfer { filename: String, message: String },

    /// An upload plan carried a method reqwest does not recognize
    #[error("invalid HTTP method \"{0}\"")]
    InvalidMethod(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
