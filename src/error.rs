//! Error types for sigrip

use thiserror::Error;

/// Main error type for sigrip operations
#[derive(Debug, Error)]
pub enum SigripError {
    #[error("HTTP 401 Unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed operand: {0}")]
    Operand(#[from] std::num::ParseIntError),

    #[error("'{opcode}' offset {index} out of range for signature of length {len}")]
    Range {
        opcode: char,
        index: usize,
        len: usize,
    },

    #[error("Unknown opcode in token {0:?}")]
    UnknownOpcode(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SigripError {
    /// Check if error came from the network layer
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            SigripError::Unauthorized(_) | SigripError::Http { .. } | SigripError::Request(_)
        )
    }

    /// Check if error came from replaying procedure notation
    pub fn is_interpreter(&self) -> bool {
        matches!(
            self,
            SigripError::Operand(_) | SigripError::Range { .. } | SigripError::UnknownOpcode(_)
        )
    }
}
