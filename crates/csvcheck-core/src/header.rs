//! Header row normalization and required-column checks.

use std::collections::HashMap;

use crate::error::{ParseError, Result};

/// Normalized header names, used as keys when mapping data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeaders {
    /// Header names after trimming and lowercasing, in column order.
    pub columns: Vec<String>,
}

impl CsvHeaders {
    /// Normalizes every raw header field.
    pub fn from_raw<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            columns: fields
                .iter()
                .map(|field| normalize_header(field.as_ref()))
                .collect(),
        }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the index of the first column matching `name` after normalization.
    pub fn position(&self, name: &str) -> Option<usize> {
        let key = normalize_header(name);
        self.columns.iter().position(|column| *column == key)
    }
}

/// Normalizes a header value by trimming whitespace and lowercasing.
pub fn normalize_header(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Counts occurrences of each value in a single pass.
pub fn column_counts<S: AsRef<str>>(columns: &[S]) -> HashMap<&str, usize> {
    let mut counts = HashMap::with_capacity(columns.len());
    for column in columns {
        *counts.entry(column.as_ref()).or_insert(0) += 1;
    }
    counts
}

/// Checks that every required column appears exactly once in `header`.
///
/// Required columns are checked in the order given. For each one, a missing
/// column is reported before a duplicated one, and the first failure wins.
pub fn validate_columns<H, R>(header: &[H], required: &[R]) -> Result<CsvHeaders>
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    let headers = CsvHeaders::from_raw(header);
    let counts = column_counts(&headers.columns);

    for column in required {
        let column = column.as_ref();
        match counts.get(normalize_header(column).as_str()) {
            None => {
                tracing::debug!(column, "required column missing from header");
                return Err(ParseError::MissingRequiredColumn {
                    column: column.to_string(),
                });
            }
            Some(&count) if count > 1 => {
                tracing::debug!(column, count, "required column duplicated in header");
                return Err(ParseError::DuplicateColumn {
                    column: column.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    tracing::debug!(
        columns = headers.len(),
        required = required.len(),
        "header validated"
    );
    Ok(headers)
}
