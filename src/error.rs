use serde::Serialize;
use thiserror::Error;

/// Category of a failed invocation, as reported in the failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    DecodeError,
    EncodeError,
    InvalidInputError,
    StorageError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DecodeError => write!(f, "DecodeError"),
            ErrorKind::EncodeError => write!(f, "EncodeError"),
            ErrorKind::InvalidInputError => write!(f, "InvalidInputError"),
            ErrorKind::StorageError => write!(f, "StorageError"),
        }
    }
}

/// Terminal failure of a single invocation. None of these are retried.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The input bytes are empty, truncated or not a recognized raster encoding.
    #[error("could not decode image: {message}")]
    Decode { message: String },

    /// The overlay could not be serialized into a non-empty buffer.
    #[error("could not encode image: {message}")]
    Encode { message: String },

    /// Required input (location, parameters) is missing or malformed.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Fetching the source or storing the result failed.
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl ProcessingError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode { message: message.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    /// Flattens an `anyhow` chain from a storage collaborator into a message.
    pub fn storage(err: &anyhow::Error) -> Self {
        Self::Storage { message: format!("{:#}", err) }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::Decode { .. } => ErrorKind::DecodeError,
            ProcessingError::Encode { .. } => ErrorKind::EncodeError,
            ProcessingError::InvalidInput { .. } => ErrorKind::InvalidInputError,
            ProcessingError::Storage { .. } => ErrorKind::StorageError,
        }
    }
}
