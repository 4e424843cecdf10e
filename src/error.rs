//! Unified error types for the typed data core
//!
//! Module errors are converted into [`CoreError`] at the crate boundary
//! (FFI and CLI) so every caller sees the same `{code, message, details}`
//! shape.

use crate::eip712::Eip712Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boundary error type for all crate operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl CoreError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for CoreError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidSchema,
    UndefinedType,
    InvalidType,
    MalformedValue,
    UnsupportedVersion,

    // Parse errors
    ParseError,

    // Response rendering failed
    Internal,
}

/// Result type alias for crate operations
pub type CoreResult<T> = Result<T, CoreError>;

impl From<Eip712Error> for CoreError {
    fn from(e: Eip712Error) -> Self {
        let code = match &e {
            Eip712Error::InvalidSchema(_) => ErrorCode::InvalidSchema,
            Eip712Error::UndefinedType(_) => ErrorCode::UndefinedType,
            Eip712Error::VersionMismatch { .. } => ErrorCode::UnsupportedVersion,
            Eip712Error::InvalidType(_) => ErrorCode::InvalidType,
            Eip712Error::MalformedValue { .. } => ErrorCode::MalformedValue,
            Eip712Error::InvalidRequest(_) => ErrorCode::InvalidInput,
        };
        CoreError::new(code, e.to_string())
    }
}
