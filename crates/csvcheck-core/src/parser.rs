//! Parse entry points.

use serde::Serialize;

use crate::error::{ParseError, Result};
use crate::header::validate_columns;
use crate::rows::{ValidatedRow, validate_rows};
use crate::schema::ColumnSchema;
use crate::tokenizer::{ParsedTable, Tokenizer, tokenize};

/// Options for [`parse_with`].
#[derive(Debug, Clone)]
pub struct ParseOptions<S> {
    /// Columns that must appear exactly once in the header.
    pub required_columns: Vec<String>,
    /// Schema applied to each data row.
    pub schema: S,
    /// When false, rows are returned unvalidated and the schema is unused.
    pub validate: bool,
}

impl<S: ColumnSchema> ParseOptions<S> {
    /// Options with no required columns and validation off.
    pub fn new(schema: S) -> Self {
        Self {
            required_columns: Vec::new(),
            schema,
            validate: false,
        }
    }

    /// Options that validate and require the columns the schema declares.
    pub fn from_schema(schema: S) -> Self {
        Self {
            required_columns: schema.required_columns(),
            schema,
            validate: true,
        }
    }

    #[must_use]
    pub fn with_required_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// Successful result of [`parse_with`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParseOutput<R> {
    /// Tokenized rows, header included.
    Rows(ParsedTable),
    /// One entry per data row, header excluded.
    Validated(Vec<ValidatedRow<R>>),
}

impl<R> ParseOutput<R> {
    /// Number of rows held.
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Validated(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows that failed schema validation.
    pub fn invalid_count(&self) -> usize {
        match self {
            Self::Rows(_) => 0,
            Self::Validated(rows) => rows.iter().filter(|row| !row.is_valid()).count(),
        }
    }
}

fn check_input(input: Option<&str>) -> Result<&str> {
    match input {
        None => Err(ParseError::NoInput),
        Some("") => Err(ParseError::EmptyInput),
        Some(text) => Ok(text),
    }
}

/// Tokenizes CSV text into rows without validation.
pub fn parse(input: Option<&str>) -> Result<ParsedTable> {
    let text = check_input(input)?;
    let rows = tokenize(text);
    tracing::debug!(rows = rows.len(), "tokenized CSV input");
    Ok(rows)
}

/// Tokenizes CSV text and, when requested, validates it against a schema.
///
/// With validation on, the first row is the header. Header problems are
/// returned before any data row is looked at; per-row schema failures are
/// reported in the output rather than as an error.
pub fn parse_with<S: ColumnSchema>(
    input: Option<&str>,
    options: &ParseOptions<S>,
) -> Result<ParseOutput<S::Record>> {
    if !options.validate {
        return parse(input).map(ParseOutput::Rows);
    }

    let text = check_input(input)?;
    let mut rows = Tokenizer::new(text);
    let header = rows.next().unwrap_or_default();
    let headers = validate_columns(&header, &options.required_columns)?;

    let validated = validate_rows(&headers, rows, &options.schema);
    let invalid = validated.iter().filter(|row| !row.is_valid()).count();
    tracing::info!(
        columns = headers.len(),
        rows = validated.len(),
        invalid,
        "validated CSV input"
    );
    Ok(ParseOutput::Validated(validated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldErrors, FieldMap, FnSchema};

    fn passthrough() -> FnSchema<impl Fn(&FieldMap) -> std::result::Result<FieldMap, FieldErrors>>
    {
        FnSchema::new(|fields: &FieldMap| Ok::<_, FieldErrors>(fields.clone()))
    }

    #[test]
    fn test_parse_rejects_missing_and_empty_input() {
        assert_eq!(parse(None), Err(ParseError::NoInput));
        assert_eq!(parse(Some("")), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_parse_whitespace_is_not_empty() {
        assert_eq!(parse(Some(" ")).unwrap(), vec![vec![" "]]);
    }

    #[test]
    fn test_parse_with_validation_off_returns_rows() {
        let options = ParseOptions::new(passthrough()).with_required_columns(["missing"]);
        let output = parse_with(Some("a,b\n1,2\n"), &options).unwrap();
        assert_eq!(
            output,
            ParseOutput::Rows(vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ])
        );
    }

    #[test]
    fn test_parse_with_header_only() {
        let options = ParseOptions::new(passthrough())
            .with_required_columns(["a"])
            .with_validation(true);
        let output = parse_with(Some("a,b"), &options).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_parse_with_header_error_stops_early() {
        let options = ParseOptions::new(passthrough())
            .with_required_columns(["id"])
            .with_validation(true);
        let err = parse_with(Some("name\nx\n"), &options).unwrap_err();
        assert_eq!(err.code(), "missing_required_col");
    }

    #[test]
    fn test_parse_with_no_input_when_validating() {
        let options = ParseOptions::new(passthrough()).with_validation(true);
        assert_eq!(parse_with(None, &options), Err(ParseError::NoInput));
        assert_eq!(parse_with(Some(""), &options), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_from_schema_seeds_required_columns() {
        let schema = passthrough().with_required_columns(["id", "name"]);
        let options = ParseOptions::from_schema(schema);
        assert!(options.validate);
        assert_eq!(options.required_columns, vec!["id", "name"]);
    }

    #[test]
    fn test_invalid_count() {
        let schema = FnSchema::new(|fields: &FieldMap| {
            if fields.get("n").is_some_and(|n| n == "ok") {
                Ok(())
            } else {
                Err(FieldErrors::from(crate::schema::FieldError::new(
                    "n", "not ok",
                )))
            }
        });
        let options = ParseOptions::new(schema).with_validation(true);
        let output = parse_with(Some("n\nok\nbad\nok\n"), &options).unwrap();
        assert_eq!(output.len(), 3);
        assert_eq!(output.invalid_count(), 1);
    }
}
