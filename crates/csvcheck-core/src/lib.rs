//! CSV tokenizing and schema validation.
//!
//! This crate turns in-memory CSV text into rows of fields and, when asked,
//! checks those rows against a column schema.
//!
//! # Features
//!
//! - **Tokenizer**: quote-aware, handles `""` escapes and CR, LF, or CRLF line endings
//! - **Header Checks**: required columns must appear exactly once (case/whitespace-insensitive)
//! - **Row Validation**: each data row becomes a typed record or keeps its fields plus errors
//! - **Declarative Schemas**: JSON column rules for strings, numbers, integers, booleans, dates
//! - **File Loading**: UTF-8 file reading with BOM handling and a size limit
//! - Optional Polars DataFrame conversion (with `polars` feature)
//!
//! # Example
//!
//! ```
//! use csvcheck_core::{ColumnSpec, ParseOptions, ParseOutput, SchemaSpec, parse, parse_with};
//!
//! let csv = "title,year\nUp,2009\n";
//!
//! // Raw rows, header included
//! let rows = parse(Some(csv)).unwrap();
//! assert_eq!(rows.len(), 2);
//!
//! // Validated rows, header excluded
//! let schema = SchemaSpec::new(vec![
//!     ColumnSpec::string("title"),
//!     ColumnSpec::number("year").with_min(1875.0),
//! ])
//! .unwrap();
//! let output = parse_with(Some(csv), &ParseOptions::from_schema(schema)).unwrap();
//! assert!(matches!(output, ParseOutput::Validated(ref rows) if rows.len() == 1));
//! ```

mod error;
mod file;
mod header;
mod parser;
mod rows;
mod schema;
mod tokenizer;

#[cfg(feature = "polars")]
mod frame;

// === Error Types ===
pub use error::{FILE_READ_MESSAGE, FileReadError, ParseError, Result};

// === Tokenizing ===
pub use tokenizer::{ParsedRow, ParsedTable, Tokenizer, tokenize};

// === Validation ===
pub use header::{CsvHeaders, column_counts, normalize_header, validate_columns};
pub use rows::{ValidatedRow, map_fields, validate_rows};
pub use schema::{
    ColumnSchema, ColumnSpec, FieldError, FieldErrors, FieldMap, FieldType, FieldValue, FnSchema,
    SchemaSpec, SchemaSpecError, TypedRecord,
};

// === Entry Points ===
pub use parser::{ParseOptions, ParseOutput, parse, parse_with};

// === File Loading ===
pub use file::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, decode_csv_bytes,
    read_csv_text, read_csv_text_with_limit,
};

// === Polars Integration ===
#[cfg(feature = "polars")]
pub use frame::rows_to_dataframe;
