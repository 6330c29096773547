//! Domain-level error taxonomy for build triggering.

/// Errors produced by build request validation.
///
/// Each variant names exactly one violated constraint; validation reports
/// the first one it meets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Tag must start with https://")]
    InvalidTag,

    #[error("Repository must start with https://")]
    InvalidRepositoryUrl,

    #[error("Commit SHA must be a valid hexadecimal string (7 to 40 characters).")]
    InvalidCommitId,

    #[error("Project version must not be blank.")]
    BlankProjectVersion,

    #[error("The number of streams must be between {min} and {max}, got {actual}.")]
    StreamCount {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("At least one stream is required.")]
    MissingStreams,
}

/// A stream label with no entry in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown stream: '{label}'.")]
pub struct UnknownStreamError {
    pub label: String,
}

/// Errors produced while constructing a stream registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("stream registry must contain at least one definition")]
    Empty,

    #[error("stream label registered twice: {0}")]
    DuplicateLabel(String),

    #[error("failed to read stream definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse stream definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures reported by an issue tracker backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrackerError {
    #[error("issue tracker request failed: {0}")]
    Transport(String),

    #[error("issue tracker returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected issue tracker response: {0}")]
    Decode(String),
}

/// Failures reported by a build-trigger publisher.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("build trigger transport failed: {0}")]
    Transport(String),

    #[error("build system rejected trigger with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to encode build trigger event: {0}")]
    Encode(String),
}

/// Errors surfaced to the caller of a trigger.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("invalid build request: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnknownStream(#[from] UnknownStreamError),

    #[error("failed to publish build trigger: {0}")]
    Publish(#[from] PublishError),
}

impl TriggerError {
    /// Whether the failure was caused by the caller's request rather than
    /// by an outbound collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TriggerError::Validation(_) | TriggerError::UnknownStream(_)
        )
    }
}

/// Result type for trigger operations.
pub type Result<T> = std::result::Result<T, TriggerError>;
