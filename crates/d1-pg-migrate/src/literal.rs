//! PostgreSQL literal rendering rules.
//!
//! Pure value-to-text mapping: each function takes a source cell and returns
//! the literal exactly as it appears in the generated script, quotes included.

use crate::catalog::ColumnRule;
use crate::value::SqlValue;

/// The NULL keyword.
pub const NULL_LITERAL: &str = "NULL";

/// Quote a string literal, doubling embedded single quotes.
///
/// No other characters are escaped; standard-conforming PostgreSQL strings
/// need nothing else.
#[must_use]
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a boolean column value as TRUE or FALSE.
///
/// The mapping is total: falsy is NULL, 0, 0.0, the empty string, and the
/// case-insensitive words false/f/no/off/0; everything else is truthy.
#[must_use]
pub fn bool_literal(value: &SqlValue) -> &'static str {
    if is_truthy(value) {
        "TRUE"
    } else {
        "FALSE"
    }
}

fn is_truthy(value: &SqlValue) -> bool {
    match value {
        SqlValue::Null => false,
        SqlValue::Integer(i) => *i != 0,
        SqlValue::Real(f) => *f != 0.0,
        SqlValue::Text(t) => {
            !t.is_empty()
                && !matches!(
                    t.to_ascii_lowercase().as_str(),
                    "false" | "f" | "no" | "off" | "0"
                )
        }
        SqlValue::Blob(b) => !b.is_empty(),
    }
}

/// Render an array column value as a quoted curly-brace array literal.
///
/// NULL or empty input yields `'{}'`. A value that looks like a JSON list is
/// parsed and its elements re-joined; anything else is treated as a
/// comma-separated string. Elements are emitted unescaped: array-column
/// values must not contain commas, quotes, or braces within elements.
#[must_use]
pub fn array_literal(value: &SqlValue) -> String {
    let text = match value {
        SqlValue::Null => return "'{}'".to_string(),
        SqlValue::Text(t) => t.clone(),
        other => other.to_plain_string(),
    };
    if text.is_empty() {
        return "'{}'".to_string();
    }

    if text.starts_with('[') && text.ends_with(']') {
        if let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(&text) {
            let elements: Vec<String> = items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            return format!("'{{{}}}'", elements.join(","));
        }
        // Malformed JSON falls through to the comma-split path
    }

    let elements: Vec<&str> = text.split(',').collect();
    format!("'{{{}}}'", elements.join(","))
}

/// Render a nullable string column value: NULL stays NULL, everything else
/// is quoted regardless of its source type.
#[must_use]
pub fn forced_string_literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => NULL_LITERAL.to_string(),
        other => quote_string(&other.to_plain_string()),
    }
}

/// Default rendering for columns without a specific rule.
///
/// Integers and reals pass through as bare numeric literals, NULL stays
/// NULL, text (and blobs, lossily decoded) becomes a quoted string.
#[must_use]
pub fn generic_literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => NULL_LITERAL.to_string(),
        SqlValue::Integer(i) => i.to_string(),
        SqlValue::Real(f) => f.to_string(),
        SqlValue::Text(t) => quote_string(t),
        SqlValue::Blob(b) => quote_string(&String::from_utf8_lossy(b)),
    }
}

/// Render one cell through its bound rule.
#[must_use]
pub fn apply_rule(rule: ColumnRule, value: &SqlValue) -> String {
    match rule {
        ColumnRule::Array => array_literal(value),
        ColumnRule::Boolean => bool_literal(value).to_string(),
        ColumnRule::ForcedString => forced_string_literal(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_string_doubles_every_single_quote() {
        assert_eq!(quote_string("it's"), "'it''s'");
        assert_eq!(quote_string("a'b'c"), "'a''b''c'");
        assert_eq!(quote_string("''"), "''''''");
        assert_eq!(quote_string("plain"), "'plain'");
    }

    #[test]
    fn test_bool_literal_truthy_encodings() {
        assert_eq!(bool_literal(&SqlValue::Integer(1)), "TRUE");
        assert_eq!(bool_literal(&SqlValue::Integer(-3)), "TRUE");
        assert_eq!(bool_literal(&SqlValue::Real(2.5)), "TRUE");
        assert_eq!(bool_literal(&SqlValue::from("true")), "TRUE");
        assert_eq!(bool_literal(&SqlValue::from("yes")), "TRUE");
    }

    #[test]
    fn test_bool_literal_falsy_encodings() {
        assert_eq!(bool_literal(&SqlValue::Null), "FALSE");
        assert_eq!(bool_literal(&SqlValue::Integer(0)), "FALSE");
        assert_eq!(bool_literal(&SqlValue::Real(0.0)), "FALSE");
        assert_eq!(bool_literal(&SqlValue::from("")), "FALSE");
        assert_eq!(bool_literal(&SqlValue::from("false")), "FALSE");
        assert_eq!(bool_literal(&SqlValue::from("F")), "FALSE");
        assert_eq!(bool_literal(&SqlValue::from("no")), "FALSE");
        assert_eq!(bool_literal(&SqlValue::from("0")), "FALSE");
    }

    #[test]
    fn test_bool_literal_total_over_arbitrary_text() {
        // Unrecognized words are truthy, never a third output
        assert_eq!(bool_literal(&SqlValue::from("maybe")), "TRUE");
    }

    #[test]
    fn test_array_literal_json_list() {
        assert_eq!(
            array_literal(&SqlValue::from(r#"["a","b","c"]"#)),
            "'{a,b,c}'"
        );
        assert_eq!(array_literal(&SqlValue::from("[]")), "'{}'");
    }

    #[test]
    fn test_array_literal_null_and_empty() {
        assert_eq!(array_literal(&SqlValue::Null), "'{}'");
        assert_eq!(array_literal(&SqlValue::from("")), "'{}'");
    }

    #[test]
    fn test_array_literal_comma_separated() {
        assert_eq!(array_literal(&SqlValue::from("x,y")), "'{x,y}'");
        assert_eq!(array_literal(&SqlValue::from("solo")), "'{solo}'");
    }

    #[test]
    fn test_array_literal_malformed_json_falls_back_to_split() {
        assert_eq!(array_literal(&SqlValue::from("[a,b]")), "'{[a,b]}'");
    }

    #[test]
    fn test_array_literal_numeric_scalar() {
        assert_eq!(array_literal(&SqlValue::Integer(7)), "'{7}'");
    }

    #[test]
    fn test_forced_string_literal() {
        assert_eq!(forced_string_literal(&SqlValue::Null), "NULL");
        assert_eq!(
            forced_string_literal(&SqlValue::from("http://a/b.png")),
            "'http://a/b.png'"
        );
        // Non-text source values still render quoted
        assert_eq!(forced_string_literal(&SqlValue::Integer(0)), "'0'");
    }

    #[test]
    fn test_generic_literal() {
        assert_eq!(generic_literal(&SqlValue::Null), "NULL");
        assert_eq!(generic_literal(&SqlValue::Integer(42)), "42");
        assert_eq!(generic_literal(&SqlValue::Real(1.5)), "1.5");
        assert_eq!(generic_literal(&SqlValue::from("it's")), "'it''s'");
    }

    #[test]
    fn test_null_never_renders_as_empty_string() {
        assert_eq!(generic_literal(&SqlValue::Null), "NULL");
        assert_eq!(forced_string_literal(&SqlValue::Null), "NULL");
        assert_ne!(generic_literal(&SqlValue::Null), "''");
    }
}
