//! Unified error types for the warehouse reports.
//!
//! Error codes:
//! - LOAD_001-003: Bulk load errors
//! - EXPORT_001: Report export errors
//! - CONFIG_001: Configuration errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Bulk load error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorCode {
    /// LOAD_001: Source file is missing or unreadable
    MissingFile,
    /// LOAD_002: Malformed CSV (bad header, ragged rows, invalid UTF-8)
    MalformedCsv,
    /// LOAD_003: A field does not match its column type
    TypeMismatch,
}

impl LoadErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "LOAD_001",
            Self::MalformedCsv => "LOAD_002",
            Self::TypeMismatch => "LOAD_003",
        }
    }
}

/// Export error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorCode {
    /// EXPORT_001: Failed to write a report file
    WriteFailed,
}

impl ExportErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WriteFailed => "EXPORT_001",
        }
    }
}

/// Configuration error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// CONFIG_001: Configuration value out of range or unusable
    Invalid,
}

impl ConfigErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid => "CONFIG_001",
        }
    }
}

/// Unified error type for the warehouse reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Bulk load error for one table.
    #[error("[{code}] {table}: {message}")]
    Load {
        code: &'static str,
        table: &'static str,
        /// CSV line of the offending record, when known
        line: Option<u64>,
        message: String,
    },

    /// Export error with code.
    #[error("[{code}] {message}")]
    Export { code: &'static str, message: String },

    /// Configuration error with code.
    #[error("[{code}] {message}")]
    Config { code: &'static str, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a load error for a table.
    pub fn load(
        code: LoadErrorCode,
        table: &'static str,
        line: Option<u64>,
        msg: impl Into<String>,
    ) -> Self {
        let message = match line {
            Some(line) => format!("line {}: {}", line, msg.into()),
            None => msg.into(),
        };
        Self::Load {
            code: code.code(),
            table,
            line,
            message,
        }
    }

    /// Create an export error.
    pub fn export(code: ExportErrorCode, msg: impl Into<String>) -> Self {
        Self::Export {
            code: code.code(),
            message: msg.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(code: ConfigErrorCode, msg: impl Into<String>) -> Self {
        Self::Config {
            code: code.code(),
            message: msg.into(),
        }
    }

    pub fn invalid_integer(raw: impl Into<String>) -> Self {
        Self::InvalidInteger(raw.into())
    }

    pub fn invalid_date(raw: impl Into<String>) -> Self {
        Self::InvalidDate(raw.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Load { code, .. } => Some(*code),
            Self::Export { code, .. } => Some(*code),
            Self::Config { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get the table name for load errors.
    pub fn table(&self) -> Option<&'static str> {
        match self {
            Self::Load { table, .. } => Some(*table),
            _ => None,
        }
    }
}
