//! Run results shared by the table and JSON renderers.

use std::path::PathBuf;

use serde::Serialize;

use csvcheck_core::{ParseError, ValidatedRow};

use crate::logging::redact_value;

/// One field failure, located by data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub field: String,
    pub message: String,
}

/// Counts and issues for a validated file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub rows: usize,
    pub valid: usize,
    pub invalid: usize,
    pub issues: Vec<RowIssue>,
}

impl ValidationSummary {
    pub fn has_errors(&self) -> bool {
        self.invalid > 0
    }
}

/// Collects counts and field issues from validated rows.
pub fn summarize<R>(rows: &[ValidatedRow<R>]) -> ValidationSummary {
    let mut summary = ValidationSummary {
        rows: rows.len(),
        ..ValidationSummary::default()
    };

    for (idx, row) in rows.iter().enumerate() {
        let ValidatedRow::Invalid { fields, errors } = row else {
            summary.valid += 1;
            continue;
        };
        summary.invalid += 1;
        for error in errors {
            let value = fields.get(&error.field).map_or("", String::as_str);
            tracing::trace!(
                row = idx + 1,
                field = %error.field,
                value = redact_value(value),
                "rejected field value"
            );
            summary.issues.push(RowIssue {
                row: idx + 1,
                field: error.field.clone(),
                message: error.message.clone(),
            });
        }
    }

    summary
}

/// Machine-readable form of a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl From<&ParseError> for ErrorBody {
    fn from(error: &ParseError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// JSON document written by `validate --format json`.
#[derive(Debug, Serialize)]
pub struct ValidateReport<'a, R: Serialize> {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ValidationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<&'a [ValidatedRow<R>]>,
}
