//! Subcommand runners.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;

use csvcheck_core::{
    ColumnSchema, FieldErrors, FieldMap, FieldValue, FnSchema, ParseError, ParseOptions,
    ParseOutput, SchemaSpec, TypedRecord, ValidatedRow, normalize_header, parse, parse_with,
    read_csv_text,
};

use crate::cli::{OutputFormatArg, RowsArgs, ValidateArgs};
use crate::report::{ErrorBody, ValidateReport, ValidationSummary, summarize};
use crate::summary::{print_parse_error, print_rows, print_validation};

/// Outcome of validating one file.
#[derive(Debug)]
pub enum Validation {
    /// The input or header was rejected before any row was checked.
    Rejected(ParseError),
    /// Every data row was checked.
    Checked {
        rows: Vec<ValidatedRow<TypedRecord>>,
        summary: ValidationSummary,
    },
}

impl Validation {
    /// True when the header was accepted and every row passed.
    pub fn passed(&self) -> bool {
        matches!(self, Self::Checked { summary, .. } if !summary.has_errors())
    }

    /// JSON document for this outcome.
    pub fn report(&self, file: &Path) -> ValidateReport<'_, TypedRecord> {
        match self {
            Self::Rejected(error) => ValidateReport {
                file: file.to_path_buf(),
                error: Some(ErrorBody::from(error)),
                summary: None,
                rows: None,
            },
            Self::Checked { rows, summary } => ValidateReport {
                file: file.to_path_buf(),
                error: None,
                summary: Some(summary.clone()),
                rows: Some(rows.as_slice()),
            },
        }
    }
}

/// Prints the tokenized rows. Returns whether the run succeeded.
pub fn run_rows(args: &RowsArgs) -> Result<bool> {
    let text = load_text(&args.file)?;
    let rows =
        parse(Some(text.as_str())).map_err(|error| anyhow!("[{}] {error}", error.code()))?;
    tracing::info!(file = %args.file.display(), rows = rows.len(), "tokenized file");

    match args.format {
        OutputFormatArg::Table => print_rows(&args.file, &rows),
        OutputFormatArg::Json => print_json(&rows)?,
    }
    Ok(true)
}

/// Checks the header and validates every row. Returns whether all rows passed.
pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    let text = load_text(&args.file)?;
    let validation = validate_text(args, &text)?;

    match (&validation, args.format) {
        (_, OutputFormatArg::Json) => print_json(&validation.report(&args.file))?,
        (Validation::Rejected(error), OutputFormatArg::Table) => {
            print_parse_error(&args.file, error);
        }
        (Validation::Checked { rows, summary }, OutputFormatArg::Table) => {
            print_validation(&args.file, rows, summary);
        }
    }
    Ok(validation.passed())
}

/// Validates `text` with the schema named by `args`, or with plain string
/// records when no schema is given.
pub fn validate_text(args: &ValidateArgs, text: &str) -> Result<Validation> {
    match &args.schema {
        Some(path) => {
            let schema = SchemaSpec::load(path)
                .with_context(|| format!("failed to load schema {}", path.display()))?;
            validate_with(args, text, schema)
        }
        None => {
            let schema =
                FnSchema::new(|fields: &FieldMap| Ok::<_, FieldErrors>(string_record(fields)));
            validate_with(args, text, schema)
        }
    }
}

/// Options requiring the schema's columns plus each extra column not
/// already present after normalization.
pub fn parse_options<S: ColumnSchema>(schema: S, require: &[String]) -> ParseOptions<S> {
    let mut options = ParseOptions::from_schema(schema);
    for column in require {
        let key = normalize_header(column);
        if !options
            .required_columns
            .iter()
            .any(|existing| normalize_header(existing) == key)
        {
            options.required_columns.push(column.clone());
        }
    }
    options
}

fn validate_with<S>(args: &ValidateArgs, text: &str, schema: S) -> Result<Validation>
where
    S: ColumnSchema<Record = TypedRecord>,
{
    let options = parse_options(schema, &args.require);

    let span = tracing::info_span!("validate", file = %args.file.display());
    let _guard = span.enter();

    let rows = match parse_with(Some(text), &options) {
        Ok(ParseOutput::Validated(rows)) => rows,
        Ok(ParseOutput::Rows(_)) => bail!("validation was not performed"),
        Err(error) => {
            tracing::debug!(code = error.code(), "parse failed");
            return Ok(Validation::Rejected(error));
        }
    };

    let summary = summarize(&rows);
    if summary.has_errors() {
        tracing::warn!(
            invalid = summary.invalid,
            rows = summary.rows,
            "rows failed validation"
        );
    }
    tracing::info!(rows = summary.rows, valid = summary.valid, "validation finished");
    Ok(Validation::Checked { rows, summary })
}

fn load_text(path: &Path) -> Result<String> {
    read_csv_text(path).map_err(|error| anyhow!("[{}] {error}", error.code()))
}

/// Record used when no schema is given: every mapped field as a string.
fn string_record(fields: &FieldMap) -> TypedRecord {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), FieldValue::String(value.clone())))
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
