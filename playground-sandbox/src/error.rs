use thiserror::Error;

pub type SandboxResult<T> = Result<T, SandboxError>;

#[derive(Error, Debug, Clone)]
pub enum SandboxError {
    #[error("Catalog deserialization error: {0}")]
    CatalogError(String),

    #[error("Unknown challenge '{id}'")]
    UnknownChallenge { id: String },

    #[error("Invalid challenge '{id}': {reason}")]
    InvalidChallenge { id: String, reason: String },

    #[error("Duplicate challenge id '{id}': challenge ids must be unique within the catalog")]
    DuplicateChallenge { id: String },

    #[error("Malformed relay message: {0}")]
    MalformedMessage(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_yaml::Error> for SandboxError {
    fn from(err: serde_yaml::Error) -> Self {
        SandboxError::CatalogError(err.to_string())
    }
}

impl From<std::io::Error> for SandboxError {
    fn from(err: std::io::Error) -> Self {
        SandboxError::Io(err.to_string())
    }
}
