//! Per-row schema validation.

use serde::Serialize;

use crate::header::CsvHeaders;
use crate::schema::{ColumnSchema, FieldErrors, FieldMap};

/// Outcome of validating one data row.
///
/// A failing row keeps its named fields so callers can report or repair it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidatedRow<R> {
    Valid { record: R },
    Invalid { fields: FieldMap, errors: FieldErrors },
}

impl<R> ValidatedRow<R> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Returns the typed record when the row passed.
    pub fn record(&self) -> Option<&R> {
        match self {
            Self::Valid { record } => Some(record),
            Self::Invalid { .. } => None,
        }
    }

    /// Returns the field errors when the row failed.
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid { errors, .. } => Some(errors),
        }
    }
}

/// Pairs header names with row values by position.
///
/// Values beyond the header are dropped, header names with no value get no
/// entry, and a repeated header name keeps the later value.
pub fn map_fields(headers: &CsvHeaders, row: &[String]) -> FieldMap {
    headers
        .columns
        .iter()
        .zip(row)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Validates every data row, preserving order and count.
pub fn validate_rows<S, I>(
    headers: &CsvHeaders,
    rows: I,
    schema: &S,
) -> Vec<ValidatedRow<S::Record>>
where
    S: ColumnSchema + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[String]>,
{
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let fields = map_fields(headers, row.as_ref());
            match schema.validate(&fields) {
                Ok(record) => ValidatedRow::Valid { record },
                Err(errors) => {
                    tracing::debug!(
                        row = idx + 1,
                        errors = errors.len(),
                        "row failed schema validation"
                    );
                    ValidatedRow::Invalid { fields, errors }
                }
            }
        })
        .collect()
}
