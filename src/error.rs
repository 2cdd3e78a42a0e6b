//! Error types for lsp-wire

use thiserror::Error;

use crate::models::progress::ProgressToken;

pub type WireResult<T> = std::result::Result<T, WireError>;

#[derive(Debug, Error)]
pub enum WireError {
    /// Input could not be turned into the requested type.
    ///
    /// `path` is a JSON pointer to the field the decoder was looking at when it
    /// failed (empty for the document root).
    #[error("Decode error at '{path}': {message}")]
    Decode {
        path: String,
        message: String,
        line: usize,
        column: usize,
    },

    /// Input is not well-formed JSON.
    #[error("Parse error at line {line} column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unknown method: {0}. Run 'lsp-wire methods' to list supported methods.")]
    UnknownMethod(String),

    #[error("{0}")]
    Progress(#[from] ProgressError),
}

impl WireError {
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// JSON pointer of the offending field, if this is a decode failure.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Decode { path, .. } => Some(path),
            _ => None,
        }
    }

    /// JSON-RPC error code a transport should answer with.
    pub fn error_code(&self) -> i32 {
        match self {
            Self::Syntax { .. } => error_codes::PARSE_ERROR,
            Self::Decode { .. } => error_codes::INVALID_PARAMS,
            Self::UnknownMethod(_) => error_codes::METHOD_NOT_FOUND,
            Self::Encode(_) | Self::Progress(_) => error_codes::INTERNAL_ERROR,
        }
    }
}

/// Violations of the work-done progress sequence for a single token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("Progress '{token}' reported before begin")]
    NotStarted { token: ProgressToken },

    #[error("Progress '{token}' already began")]
    AlreadyStarted { token: ProgressToken },

    #[error("Progress '{token}' already ended")]
    AlreadyEnded { token: ProgressToken },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_code() {
        let err = WireError::Decode {
            path: "/range/start/line".to_string(),
            message: "invalid type".to_string(),
            line: 1,
            column: 30,
        };
        assert!(err.is_decode());
        assert_eq!(err.path(), Some("/range/start/line"));
        assert_eq!(err.error_code(), error_codes::INVALID_PARAMS);
        assert!(err.to_string().contains("/range/start/line"));
    }

    #[test]
    fn test_syntax_error_code() {
        let err = WireError::Syntax {
            message: "EOF while parsing an object".to_string(),
            line: 1,
            column: 9,
        };
        assert!(!err.is_decode());
        assert_eq!(err.path(), None);
        assert_eq!(err.error_code(), error_codes::PARSE_ERROR);
    }

    #[test]
    fn test_unknown_method_code() {
        let err = WireError::UnknownMethod("textDocument/nope".to_string());
        assert!(!err.is_decode());
        assert_eq!(err.path(), None);
        assert_eq!(err.error_code(), error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_progress_error_message() {
        let err = WireError::from(ProgressError::NotStarted {
            token: ProgressToken::number(7),
        });
        assert_eq!(err.to_string(), "Progress '7' reported before begin");
        assert_eq!(err.error_code(), error_codes::INTERNAL_ERROR);
    }
}
