//! Row schema capability.
//!
//! A [`ColumnSchema`] turns one row's named fields into a typed record or
//! reports why it could not. The tokenizer and orchestrator only depend on
//! this trait, so any validator can be plugged in: the declarative
//! [`SchemaSpec`], a closure wrapped in [`FnSchema`], or a hand-written type.

mod spec;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use spec::{ColumnSpec, FieldType, FieldValue, SchemaSpec, SchemaSpecError, TypedRecord};

/// Normalized header name to raw field value for a single row.
pub type FieldMap = BTreeMap<String, String>;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field the failure applies to.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field failures reported for one row, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Convenience for adding a failure by parts.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(FieldError::new(field, message));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Returns the failures reported for `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |error| error.field == field)
    }
}

impl From<Vec<FieldError>> for FieldErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Validates the named fields of a single row.
pub trait ColumnSchema {
    /// Typed output for a row that passes validation.
    type Record;

    /// Columns that must appear exactly once in the header.
    ///
    /// Used by [`ParseOptions::from_schema`](crate::ParseOptions::from_schema);
    /// the default declares none.
    fn required_columns(&self) -> Vec<String> {
        Vec::new()
    }

    /// Validates one row keyed by normalized header name.
    fn validate(&self, fields: &FieldMap) -> Result<Self::Record, FieldErrors>;
}

/// Adapts a closure into a [`ColumnSchema`].
#[derive(Clone)]
pub struct FnSchema<F> {
    required: Vec<String>,
    validate: F,
}

impl<F> FnSchema<F> {
    pub fn new(validate: F) -> Self {
        Self {
            required: Vec::new(),
            validate,
        }
    }

    /// Declare required columns for this schema.
    #[must_use]
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = columns.into_iter().map(Into::into).collect();
        self
    }
}

impl<F> fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSchema")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl<F, R> ColumnSchema for FnSchema<F>
where
    F: Fn(&FieldMap) -> Result<R, FieldErrors>,
{
    type Record = R;

    fn required_columns(&self) -> Vec<String> {
        self.required.clone()
    }

    fn validate(&self, fields: &FieldMap) -> Result<R, FieldErrors> {
        (self.validate)(fields)
    }
}
