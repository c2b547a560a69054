use std::fmt;
use std::io;

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
    PersistenceUnavailable {
        key: String,
        source: io::Error,
    },
    MalformedHistoryData {
        key: String,
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidInput { field, reason }
    }

    /// True for failures of the backing store, which callers may log and ignore.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidInput { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::PersistenceUnavailable { key, source } => {
                write!(f, "storage slot `{key}` unavailable: {source}")
            }
            Self::MalformedHistoryData { key, source } => {
                write!(f, "storage slot `{key}` holds malformed history: {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInput { .. } => None,
            Self::PersistenceUnavailable { source, .. } => Some(source),
            Self::MalformedHistoryData { source, .. } => Some(source),
        }
    }
}
