//! Property tests for the tokenizer and header checks.

use csvcheck_core::{
    FieldErrors, FieldMap, FnSchema, ParseOptions, ParseOutput, Tokenizer, parse_with, tokenize,
    validate_columns,
};
use proptest::prelude::*;

/// Field text with no quotes, commas, or line breaks.
fn plain_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{0,8}"
}

/// Field text that needs quoting.
fn tricky_field() -> impl Strategy<Value = String> {
    "[a-z,\"\r\n ]{0,8}"
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

proptest! {
    #[test]
    fn unquoted_rows_round_trip(
        rows in prop::collection::vec(prop::collection::vec(plain_field(), 1..5), 1..6),
        crlf in any::<bool>(),
    ) {
        let newline = if crlf { "\r\n" } else { "\n" };
        let text: String = rows
            .iter()
            .map(|row| format!("{}{newline}", row.join(",")))
            .collect();

        let rejoined: Vec<String> = tokenize(&text).iter().map(|row| row.join(",")).collect();
        let expected: Vec<String> = rows.iter().map(|row| row.join(",")).collect();
        prop_assert_eq!(rejoined, expected);
    }

    #[test]
    fn quoted_fields_decode_exactly(
        rows in prop::collection::vec(prop::collection::vec(tricky_field(), 1..4), 1..4),
    ) {
        let text: String = rows
            .iter()
            .map(|row| {
                let fields: Vec<String> = row.iter().map(|field| quote(field)).collect();
                format!("{}\n", fields.join(","))
            })
            .collect();

        prop_assert_eq!(tokenize(&text), rows);
    }

    #[test]
    fn lazy_and_eager_agree(text in "[a-c,\"\r\n]{0,24}") {
        let lazy: Vec<Vec<String>> = Tokenizer::new(&text).collect();
        prop_assert_eq!(lazy, tokenize(&text));
    }

    #[test]
    fn header_case_and_padding_do_not_matter(
        name in "[a-z]{1,8}",
        upper in any::<bool>(),
        left in " {0,2}",
        right in " {0,2}",
    ) {
        let cased = if upper { name.to_uppercase() } else { name.clone() };
        let header = vec![format!("{left}{cased}{right}")];
        prop_assert!(validate_columns(&header, &[name]).is_ok());
    }

    #[test]
    fn validated_rows_match_data_rows(
        rows in prop::collection::vec(prop::collection::vec("[a-z0-9]{0,3}", 0..4), 0..8),
    ) {
        let mut text = String::from("a,b,c\n");
        for row in &rows {
            text.push_str(&row.join(","));
            text.push('\n');
        }

        let schema = FnSchema::new(|fields: &FieldMap| {
            if fields.get("a").is_some_and(|value| !value.is_empty()) {
                Ok(())
            } else {
                let mut errors = FieldErrors::new();
                errors.add("a", "Required");
                Err(errors)
            }
        });
        let options = ParseOptions::new(schema).with_validation(true);
        let output = parse_with(Some(text.as_str()), &options).unwrap();

        let raw_data_rows = tokenize(&text).len() - 1;
        prop_assert!(matches!(output, ParseOutput::Validated(_)));
        prop_assert_eq!(output.len(), raw_data_rows);
        prop_assert_eq!(output.len(), rows.len());
    }
}
