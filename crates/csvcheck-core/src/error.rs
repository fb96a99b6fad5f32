//! Error types for CSV parsing and file loading.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop a parse before any row is produced.
///
/// Per-row schema failures are not errors at this level; they are carried
/// in [`ValidatedRow::Invalid`](crate::ValidatedRow::Invalid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    // === Input Errors ===
    /// No input was supplied at all.
    #[error("No CSV input was provided. Please pass in the contents of a .csv file.")]
    NoInput,

    /// Input was supplied but contained no characters.
    #[error("The CSV input is empty. Please pass in a .csv file with a header row.")]
    EmptyInput,

    // === Header Errors ===
    /// A required column does not appear in the header row.
    #[error("The required column '{column}' is missing from the CSV header.")]
    MissingRequiredColumn { column: String },

    /// A required column appears more than once in the header row.
    #[error("The column '{column}' appears more than once in the CSV header.")]
    DuplicateColumn { column: String },
}

impl ParseError {
    /// Returns the stable identifier for programmatic handling.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoInput => "no_input",
            Self::EmptyInput => "empty_csv",
            Self::MissingRequiredColumn { .. } => "missing_required_col",
            Self::DuplicateColumn { .. } => "duplicate_column",
        }
    }

    /// Returns true for errors detected against the header row.
    #[must_use]
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredColumn { .. } | Self::DuplicateColumn { .. }
        )
    }
}

/// Message shown whenever file content cannot be turned into text.
pub const FILE_READ_MESSAGE: &str =
    "File was not found or was unreadable. Please make sure to pass in a UTF-8 encoded .csv file.";

/// Errors raised while loading CSV text from disk.
#[derive(Debug, Error)]
pub enum FileReadError {
    /// The file does not exist or could not be opened.
    #[error("unable to read file {path}: {reason}")]
    UnableToRead { path: PathBuf, reason: String },

    /// File is larger than the configured limit.
    #[error("file {path} is {size} bytes, exceeding the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Reading the bytes failed part way through.
    #[error("{} ({path}: {source})", FILE_READ_MESSAGE)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not UTF-8 text.
    #[error("{} ({path} is {encoding})", FILE_READ_MESSAGE)]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },
}

impl FileReadError {
    /// Returns the stable identifier for programmatic handling.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnableToRead { .. } | Self::FileTooLarge { .. } => "unable_to_read_file",
            Self::Read { .. } | Self::UnsupportedEncoding { .. } => "file_read",
        }
    }
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;
