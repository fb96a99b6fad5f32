//! End-to-end parsing scenarios.

use csvcheck_core::{
    ColumnSpec, FieldValue, FnSchema, ParseError, ParseOptions, ParseOutput, SchemaSpec,
    TypedRecord, ValidatedRow, parse, parse_with, read_csv_text,
};

const MOVIES: &str =
    "title,director,year\nPulp Fiction,Quentin Tarantino,1994\nUp,Pete Docter,2009\n";

fn movie_schema() -> SchemaSpec {
    SchemaSpec::new(vec![
        ColumnSpec::string("title"),
        ColumnSpec::string("director"),
        ColumnSpec::number("year").with_min(1875.0).with_max(2023.0),
    ])
    .unwrap()
}

fn record(title: &str, director: &str, year: f64) -> TypedRecord {
    let mut record = TypedRecord::new();
    record.insert("title".into(), FieldValue::String(title.into()));
    record.insert("director".into(), FieldValue::String(director.into()));
    record.insert("year".into(), FieldValue::Number(year));
    record
}

#[test]
fn raw_parse_without_configuration() {
    let rows = parse(Some(MOVIES)).unwrap();
    assert_eq!(
        rows,
        vec![
            vec!["title", "director", "year"],
            vec!["Pulp Fiction", "Quentin Tarantino", "1994"],
            vec!["Up", "Pete Docter", "2009"],
        ]
    );
}

#[test]
fn validated_parse_produces_typed_records() {
    let options = ParseOptions::from_schema(movie_schema());
    let output = parse_with(Some(MOVIES), &options).unwrap();

    assert_eq!(
        output,
        ParseOutput::Validated(vec![
            ValidatedRow::Valid {
                record: record("Pulp Fiction", "Quentin Tarantino", 1994.0)
            },
            ValidatedRow::Valid {
                record: record("Up", "Pete Docter", 2009.0)
            },
        ])
    );
}

#[test]
fn validated_output_serializes_to_json() {
    let options = ParseOptions::from_schema(movie_schema());
    let output = parse_with(Some("title,director,year\nUp,Pete Docter,2009\n"), &options).unwrap();
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        serde_json::json!([
            {
                "status": "valid",
                "record": {"director": "Pete Docter", "title": "Up", "year": 2009}
            }
        ])
    );
}

#[test]
fn empty_input_is_rejected() {
    let err = parse(Some("")).unwrap_err();
    assert_eq!(err, ParseError::EmptyInput);
    assert_eq!(err.code(), "empty_csv");
}

#[test]
fn absent_input_is_rejected() {
    let err = parse(None).unwrap_err();
    assert_eq!(err, ParseError::NoInput);
    assert_eq!(err.code(), "no_input");
}

#[test]
fn missing_required_column_is_reported() {
    let options = ParseOptions::new(movie_schema())
        .with_required_columns(["title", "director", "year"])
        .with_validation(true);
    let err = parse_with(Some("title,director\nUp,Pete Docter\n"), &options).unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingRequiredColumn {
            column: "year".to_string()
        }
    );
    assert_eq!(err.code(), "missing_required_col");
}

#[test]
fn duplicate_required_column_is_reported() {
    let options = ParseOptions::new(movie_schema())
        .with_required_columns(["title"])
        .with_validation(true);
    let err = parse_with(Some("title,title,year\nUp,Up,2009\n"), &options).unwrap_err();

    assert_eq!(
        err,
        ParseError::DuplicateColumn {
            column: "title".to_string()
        }
    );
    assert_eq!(err.code(), "duplicate_column");
}

#[test]
fn header_matching_ignores_case_and_whitespace() {
    let options = ParseOptions::from_schema(movie_schema());
    let output = parse_with(
        Some(" Title ,DIRECTOR,Year\r\nUp,Pete Docter,2009\r\n"),
        &options,
    )
    .unwrap();
    assert_eq!(output.len(), 1);
    assert_eq!(output.invalid_count(), 0);
}

#[test]
fn invalid_rows_are_kept_in_place() {
    let csv = "title,director,year\n\
               Pulp Fiction,Quentin Tarantino,1994\n\
               Future Film,Someone,2099\n\
               Up,Pete Docter,2009\n";
    let options = ParseOptions::from_schema(movie_schema());
    let ParseOutput::Validated(rows) = parse_with(Some(csv), &options).unwrap() else {
        panic!("expected validated output");
    };

    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_valid());
    assert!(rows[2].is_valid());
    match &rows[1] {
        ValidatedRow::Invalid { fields, errors } => {
            assert_eq!(fields["title"], "Future Film");
            assert_eq!(fields["year"], "2099");
            assert_eq!(
                errors.to_string(),
                "year: Expected number less than or equal to 2023"
            );
        }
        ValidatedRow::Valid { .. } => panic!("row 2 should fail"),
    }
}

#[test]
fn quoted_values_reach_the_schema_intact() {
    let schema = FnSchema::new(|fields: &csvcheck_core::FieldMap| {
        Ok::<_, csvcheck_core::FieldErrors>(fields.get("quote").cloned().unwrap_or_default())
    });
    let options = ParseOptions::new(schema).with_validation(true);
    let csv = "id,quote\n1,\"She said \"\"hi, there\"\"\nthen left\"\n";

    let ParseOutput::Validated(rows) = parse_with(Some(csv), &options).unwrap() else {
        panic!("expected validated output");
    };
    assert_eq!(
        rows[0].record().map(String::as_str),
        Some("She said \"hi, there\"\nthen left")
    );
}

#[test]
fn file_contents_parse_like_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.csv");
    std::fs::write(&path, format!("\u{feff}{MOVIES}")).unwrap();

    let text = read_csv_text(&path).unwrap();
    assert_eq!(parse(Some(text.as_str())).unwrap(), parse(Some(MOVIES)).unwrap());
}
