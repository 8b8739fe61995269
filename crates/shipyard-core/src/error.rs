//! Error types for document loading and emission.

use std::path::PathBuf;

/// Document errors.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Input file missing or unreadable.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed input syntax.
    #[error("YAML parse error: {message}")]
    Parse { message: String },

    /// Value has no JSON representation.
    #[error("not representable as JSON: {message}")]
    Serialization { message: String },
}

impl DocumentError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } | Self::Parse { .. } | Self::Serialization { .. } => 3,
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_yaml::Error> for DocumentError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(err.to_string())
    }
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
