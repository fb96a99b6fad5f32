//! Declarative column schema loaded from JSON.
//!
//! ```json
//! {
//!   "columns": [
//!     { "name": "title", "type": "string", "max": 200 },
//!     { "name": "year", "type": "number", "min": 1875, "max": 2023 },
//!     { "name": "released", "type": "date", "format": "%d/%m/%Y", "optional": true }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::{ColumnSchema, FieldErrors, FieldMap};
use crate::header::normalize_header;

/// Date format used when a date column does not declare one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// 2^53, the largest magnitude below which every integer is an exact `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// 2^63, the first `f64` outside the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Value type a column is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
    Date,
}

impl FieldType {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A coerced field value.
///
/// Whole numbers within the exact `f64` range serialize without a fraction,
/// so `1994.0` is written as `1994`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Number(#[serde(serialize_with = "serialize_number")] f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{value}"),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation)]
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Record produced by [`SchemaSpec`], keyed by declared column name.
pub type TypedRecord = BTreeMap<String, FieldValue>;

/// Rules for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as it appears in the header (matched case-insensitively).
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Optional columns may be absent from a row or left blank.
    #[serde(default)]
    pub optional: bool,

    /// Lower bound: value for numbers, character count for strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Upper bound: value for numbers, character count for strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Allowed values for string columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,

    /// chrono format string for date columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: false,
            min: None,
            max: None,
            one_of: None,
            format: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Coerces a raw value, returning `None` for an absent optional value.
    fn check(&self, raw: Option<&str>) -> Result<Option<FieldValue>, String> {
        let Some(raw) = raw else {
            return if self.optional {
                Ok(None)
            } else {
                Err("Required".to_string())
            };
        };

        if self.optional && self.field_type != FieldType::String && raw.trim().is_empty() {
            return Ok(None);
        }

        match self.field_type {
            FieldType::String => self.check_string(raw).map(Some),
            FieldType::Number => {
                let value = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| format!("Expected number, received '{raw}'"))?;
                self.check_range(value, "number")?;
                Ok(Some(FieldValue::Number(value)))
            }
            FieldType::Integer => {
                let value = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| format!("Expected integer, received '{raw}'"))?;
                self.check_integer_range(value)?;
                Ok(Some(FieldValue::Integer(value)))
            }
            FieldType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(FieldValue::Boolean(true))),
                "false" | "no" | "0" => Ok(Some(FieldValue::Boolean(false))),
                _ => Err(format!("Expected boolean, received '{raw}'")),
            },
            FieldType::Date => {
                let format = self.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
                NaiveDate::parse_from_str(raw.trim(), format)
                    .map(|date| Some(FieldValue::Date(date)))
                    .map_err(|_| format!("Expected date in format {format}, received '{raw}'"))
            }
        }
    }

    fn check_string(&self, raw: &str) -> Result<FieldValue, String> {
        let length = raw.chars().count() as f64;
        if let Some(min) = self.min
            && length < min
        {
            return Err(format!("Expected at least {min} characters"));
        }
        if let Some(max) = self.max
            && length > max
        {
            return Err(format!("Expected at most {max} characters"));
        }
        if let Some(allowed) = &self.one_of
            && !allowed.iter().any(|value| value == raw)
        {
            return Err(format!("Expected one of: {}", allowed.join(", ")));
        }
        Ok(FieldValue::String(raw.to_string()))
    }

    /// Inclusive bound check done in `i64`, so large values are compared exactly.
    fn check_integer_range(&self, value: i64) -> Result<(), String> {
        if let Some(min) = self.min
            && !integer_at_least(value, min)
        {
            return Err(format!("Expected integer greater than or equal to {min}"));
        }
        if let Some(max) = self.max
            && !integer_at_most(value, max)
        {
            return Err(format!("Expected integer less than or equal to {max}"));
        }
        Ok(())
    }

    fn check_range(&self, value: f64, kind: &str) -> Result<(), String> {
        if let Some(min) = self.min
            && value < min
        {
            return Err(format!("Expected {kind} greater than or equal to {min}"));
        }
        if let Some(max) = self.max
            && value > max
        {
            return Err(format!("Expected {kind} less than or equal to {max}"));
        }
        Ok(())
    }
}

/// `value >= min`, rounding a fractional bound up to the next integer.
#[allow(clippy::cast_possible_truncation)]
fn integer_at_least(value: i64, min: f64) -> bool {
    let min = min.ceil();
    if min >= I64_LIMIT {
        false
    } else if min < -I64_LIMIT {
        true
    } else {
        value >= min as i64
    }
}

/// `value <= max`, rounding a fractional bound down to the previous integer.
#[allow(clippy::cast_possible_truncation)]
fn integer_at_most(value: i64, max: f64) -> bool {
    let max = max.floor();
    if max >= I64_LIMIT {
        true
    } else if max < -I64_LIMIT {
        false
    } else {
        value <= max as i64
    }
}

/// Errors raised while loading a schema definition.
#[derive(Debug, Error)]
pub enum SchemaSpecError {
    /// Failed to read the schema file.
    #[error("failed to read schema {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema is not valid JSON or does not match the expected shape.
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A column definition is inconsistent.
    #[error("invalid schema column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },
}

/// Ordered set of column rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSpec {
    pub columns: Vec<ColumnSpec>,
}

impl SchemaSpec {
    /// Builds a schema, checking that its columns are consistent.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self, SchemaSpecError> {
        let spec = Self { columns };
        spec.check_columns()?;
        Ok(spec)
    }

    /// Parses a schema from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaSpecError> {
        let spec: Self = serde_json::from_str(json)?;
        spec.check_columns()?;
        Ok(spec)
    }

    /// Reads and parses a schema file.
    pub fn load(path: &Path) -> Result<Self, SchemaSpecError> {
        let json = std::fs::read_to_string(path).map_err(|source| SchemaSpecError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            columns = spec.columns.len(),
            "loaded schema"
        );
        Ok(spec)
    }

    /// Returns the column rule whose name matches `name` after normalization.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        let key = normalize_header(name);
        self.columns
            .iter()
            .find(|column| normalize_header(&column.name) == key)
    }

    fn check_columns(&self) -> Result<(), SchemaSpecError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            let invalid = |reason: &str| SchemaSpecError::InvalidColumn {
                column: column.name.clone(),
                reason: reason.to_string(),
            };
            let key = normalize_header(&column.name);
            if key.is_empty() {
                return Err(invalid("name must not be blank"));
            }
            if !seen.insert(key) {
                return Err(invalid("declared more than once"));
            }
            if let (Some(min), Some(max)) = (column.min, column.max)
                && min > max
            {
                return Err(invalid("min is greater than max"));
            }
        }
        Ok(())
    }
}

impl ColumnSchema for SchemaSpec {
    type Record = TypedRecord;

    fn required_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| !column.optional)
            .map(|column| column.name.clone())
            .collect()
    }

    fn validate(&self, fields: &FieldMap) -> Result<TypedRecord, FieldErrors> {
        let mut record = TypedRecord::new();
        let mut errors = FieldErrors::new();

        for column in &self.columns {
            let raw = fields.get(&normalize_header(&column.name));
            match column.check(raw.map(String::as_str)) {
                Ok(Some(value)) => {
                    record.insert(column.name.clone(), value);
                }
                Ok(None) => {}
                Err(message) => errors.add(column.name.as_str(), message),
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }
}
