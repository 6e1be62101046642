//! Error types for chatresume-core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or persisting the session state file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize session state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Decode { source, .. } | StoreError::Serialize(source) => {
                match source.classify() {
                    serde_json::error::Category::Io => "io",
                    serde_json::error::Category::Syntax => "syntax",
                    serde_json::error::Category::Data => "data",
                    serde_json::error::Category::Eof => "eof",
                }
            }
            StoreError::Stat { source, .. }
            | StoreError::Read { source, .. }
            | StoreError::CreateDir { source, .. }
            | StoreError::Write { source, .. }
            | StoreError::Rename { source, .. } => io_kind_name(source.kind()),
        }
    }
}

fn io_kind_name(kind: std::io::ErrorKind) -> &'static str {
    use std::io::ErrorKind;
    match kind {
        ErrorKind::NotFound => "not_found",
        ErrorKind::PermissionDenied => "permission_denied",
        ErrorKind::AlreadyExists => "already_exists",
        ErrorKind::InvalidData => "invalid_data",
        ErrorKind::InvalidInput => "invalid_input",
        ErrorKind::Interrupted => "interrupted",
        ErrorKind::UnexpectedEof => "unexpected_eof",
        _ => "io",
    }
}

/// Result type alias for chatresume-core
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_kind_follows_json_category() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = StoreError::Decode {
            path: PathBuf::from("state.json"),
            source,
        };
        assert_eq!(err.kind(), "syntax");

        let source = serde_json::from_str::<serde_json::Value>("{\"a\":").unwrap_err();
        let err = StoreError::Decode {
            path: PathBuf::from("state.json"),
            source,
        };
        assert_eq!(err.kind(), "eof");
    }

    #[test]
    fn io_kind_maps_error_kind() {
        let err = StoreError::Read {
            path: PathBuf::from("state.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.kind(), "permission_denied");
        assert!(err.to_string().contains("state.json"));
    }
}
