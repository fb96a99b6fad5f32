//! Polars DataFrame conversion.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

use crate::header::normalize_header;
use crate::tokenizer::ParsedRow;

/// Builds a string-typed DataFrame from tokenized rows.
///
/// The first row names the columns (normalized like any header); missing
/// trailing values become nulls and values beyond the header are dropped.
pub fn rows_to_dataframe(rows: &[ParsedRow]) -> PolarsResult<DataFrame> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(DataFrame::empty());
    };

    let columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<Option<String>> =
                data.iter().map(|row| row.get(idx).cloned()).collect();
            Series::new(normalize_header(name).into(), values).into_column()
        })
        .collect();

    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    #[test]
    fn test_rows_to_dataframe() {
        let df = rows_to_dataframe(&tokenize("Title,Year\nUp,2009\nHer\n")).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("year").unwrap().null_count(), 1);
    }

    #[test]
    fn test_rows_to_dataframe_empty() {
        let df = rows_to_dataframe(&[]).unwrap();
        assert_eq!(df.width(), 0);
    }
}
