//! Error types for nsplit operations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for generation and synchronization.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse OpenAPI document: {0}")]
    Document(String),

    #[error("Failed to fetch OpenAPI document: {0}")]
    Fetch(String),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Symbols `{first}` and `{second}` both map to file `{}`", file.display())]
    NamingCollision {
        file: PathBuf,
        first: String,
        second: String,
    },

    #[error("Symbol `{0}` is produced more than once")]
    DuplicateSymbol(String),
}

impl Error {
    /// Process exit code used by the command-line front end.
    ///
    /// `2` is reserved for runs that completed with cleanup failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 3,
            Self::Document(_) | Self::Fetch(_) => 4,
            Self::Read { .. } | Self::Write { .. } | Self::CreateDir { .. } => 5,
            Self::NamingCollision { .. } | Self::DuplicateSymbol(_) => 6,
        }
    }
}

/// Result type alias for nsplit operations.
pub type Result<T> = std::result::Result<T, Error>;
