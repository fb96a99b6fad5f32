//! Loading CSV text from disk.
//!
//! These are sync functions; call them through `spawn_blocking` (or the
//! equivalent) from async contexts.

use std::path::Path;

use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE};

use crate::error::FileReadError;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<(), FileReadError> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<(), FileReadError> {
    let metadata = std::fs::metadata(path).map_err(|e| FileReadError::UnableToRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if metadata.len() > max_size {
        return Err(FileReadError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Decodes raw bytes as UTF-8, dropping a leading byte order mark.
///
/// UTF-16 input (detected by its BOM) and malformed UTF-8 are rejected.
pub fn decode_csv_bytes(path: &Path, bytes: &[u8]) -> Result<String, FileReadError> {
    if let Some((encoding, _)) = encoding_rs::Encoding::for_bom(bytes) {
        if encoding == UTF_16LE {
            return Err(FileReadError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if encoding == UTF_16BE {
            return Err(FileReadError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    match UTF_8.decode_with_bom_removal(bytes) {
        (text, false) => Ok(text.into_owned()),
        (_, true) => Err(FileReadError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "not valid UTF-8",
        }),
    }
}

/// Reads a CSV file into a string, ready for [`parse`](crate::parse).
pub fn read_csv_text(path: &Path) -> Result<String, FileReadError> {
    read_csv_text_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Reads a CSV file into a string, rejecting files above `max_size` bytes.
pub fn read_csv_text_with_limit(path: &Path, max_size: u64) -> Result<String, FileReadError> {
    check_file_size_with_limit(path, max_size)?;

    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FileReadError::UnableToRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        } else {
            FileReadError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let text = decode_csv_bytes(path, &bytes)?;
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        "read CSV file"
    );
    Ok(text)
}
