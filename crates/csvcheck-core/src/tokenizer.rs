//! Quote-aware CSV tokenizer.
//!
//! [`Tokenizer`] walks the input one character at a time with a single
//! character of lookahead and yields one [`ParsedRow`] per record. Row
//! boundaries are `\r\n`, `\n`, or a bare `\r`, recognized only outside a
//! quoted field.
//!
//! An opening quote with no matching close keeps the tokenizer inside the
//! quoted field until end of input, so every later comma and newline ends
//! up in that one field. Malformed quoting is not repaired.

use std::iter::{FusedIterator, Peekable};
use std::str::Chars;

/// A single record: fields in the order they were scanned.
pub type ParsedRow = Vec<String>;

/// All records of an input, in order.
pub type ParsedTable = Vec<ParsedRow>;

/// Single-pass pull iterator over the rows of a CSV string.
///
/// The iterator is consumed as it is read and cannot be rewound; build a
/// new one from the original text to read the rows again.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = ParsedRow;

    fn next(&mut self) -> Option<ParsedRow> {
        let mut row = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut consumed = false;

        while let Some(c) = self.chars.next() {
            consumed = true;
            let lookahead = self.chars.peek().copied();

            match c {
                // Escaped quote ("") inside a quoted field
                '"' if in_quotes && lookahead == Some('"') => {
                    field.push('"');
                    self.chars.next();
                }
                '"' => {
                    in_quotes = !in_quotes;
                }
                ',' if !in_quotes => {
                    row.push(std::mem::take(&mut field));
                }
                '\r' if !in_quotes && lookahead == Some('\n') => {
                    self.chars.next();
                    row.push(field);
                    return Some(row);
                }
                '\n' | '\r' if !in_quotes => {
                    row.push(field);
                    return Some(row);
                }
                _ => field.push(c),
            }
        }

        // Last record without a trailing newline
        if consumed {
            row.push(field);
            Some(row)
        } else {
            None
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenizes `input` into a fully materialized table.
///
/// Produces exactly the rows [`Tokenizer`] would yield.
pub fn tokenize(input: &str) -> ParsedTable {
    Tokenizer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            tokenize("a,b,c\n1,2,3\n"),
            vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]
        );
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_no_trailing_newline() {
        assert_eq!(
            tokenize("title,year\nUp,2009"),
            vec![vec!["title", "year"], vec!["Up", "2009"]]
        );
    }

    #[test]
    fn test_tokenize_quoted_comma() {
        assert_eq!(tokenize("\"hello, world\",b,c"), vec![vec!["hello, world", "b", "c"]]);
    }

    #[test]
    fn test_tokenize_escaped_quotes() {
        assert_eq!(
            tokenize("\"he said \"\"hello\"\"\",b"),
            vec![vec!["he said \"hello\"", "b"]]
        );
    }

    #[test]
    fn test_tokenize_quoted_newlines() {
        assert_eq!(
            tokenize("\"line one\nline two\",x\r\n\"cr\rinside\",y"),
            vec![vec!["line one\nline two", "x"], vec!["cr\rinside", "y"]]
        );
    }

    #[test]
    fn test_tokenize_line_endings() {
        assert_eq!(
            tokenize("a\r\nb\rc\nd"),
            vec![vec!["a"], vec!["b"], vec!["c"], vec!["d"]]
        );
    }

    #[test]
    fn test_tokenize_crlf_is_single_boundary() {
        assert_eq!(tokenize("a\r\n\r\nb"), vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn test_tokenize_trailing_comma_and_blank_line() {
        assert_eq!(tokenize("a,\n\n"), vec![vec!["a", ""], vec![""]]);
    }

    #[test]
    fn test_tokenize_ragged_rows() {
        assert_eq!(
            tokenize("a,b,c\n1\n1,2,3,4\n"),
            vec![vec!["a", "b", "c"], vec!["1"], vec!["1", "2", "3", "4"]]
        );
    }

    #[test]
    fn test_tokenize_unmatched_quote_swallows_rest() {
        assert_eq!(tokenize("a,\"b,c\nd,e"), vec![vec!["a", "b,c\nd,e"]]);
    }

    #[test]
    fn test_tokenize_values_not_trimmed() {
        assert_eq!(tokenize("  a  , b "), vec![vec!["  a  ", " b "]]);
    }

    #[test]
    fn test_tokenize_quotes_mid_field() {
        // Quotes toggle state wherever they appear; they are never kept.
        assert_eq!(tokenize("ab\"c,d\"e,f"), vec![vec!["abc,de", "f"]]);
    }

    #[test]
    fn test_iterator_is_single_pass() {
        let mut tokenizer = Tokenizer::new("a\nb\n");
        assert_eq!(tokenizer.next(), Some(vec!["a".to_string()]));
        assert_eq!(tokenizer.next(), Some(vec!["b".to_string()]));
        assert_eq!(tokenizer.next(), None);
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn test_iterator_matches_eager() {
        let input = "x,\"y\"\"z\"\r\n1,2\n3";
        let lazy: ParsedTable = Tokenizer::new(input).collect();
        assert_eq!(lazy, tokenize(input));
    }
}
