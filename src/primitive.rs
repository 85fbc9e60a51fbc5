//! Component C — rendering and parsing of the scalar types: null, bool,
//! int, float, string.

use crate::normalize::normalize_f64;
use crate::options::Delimiter;
use crate::quoting;
use crate::Value;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn leading_zero_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?0[0-9]+$").unwrap())
}

/// Why a primitive token failed to parse, distinguishing the two fatal
/// string conditions so callers can map each to its own
/// [`crate::error::DecodeErrorKind`] instead of a single catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveParseError {
    /// A quoted string's closing `"` was never found.
    UnterminatedString(String),
    /// A `\` inside a quoted string wasn't followed by one of the five
    /// recognized escapes.
    InvalidEscape(String),
}

impl fmt::Display for PrimitiveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveParseError::UnterminatedString(msg) => f.write_str(msg),
            PrimitiveParseError::InvalidEscape(msg) => f.write_str(msg),
        }
    }
}

/// Renders a primitive value as it appears on the wire. Panics if handed a
/// `List`/`Obj` — callers (the array/object encoders) only ever call this on
/// values already established as primitive.
#[must_use]
pub fn render_primitive(value: &Value, delimiter: &Delimiter) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => render_float(*f),
        Value::Str(s) => {
            if quoting::needs_quote_value(s, delimiter) {
                quoting::quote(s)
            } else {
                s.clone()
            }
        }
        Value::List(_) | Value::Obj(_) => {
            unreachable!("render_primitive called on a non-primitive value")
        }
    }
}

/// Renders a float in whichever of positional or exponent notation is
/// shorter, both built from Rust's round-trip-safe `f64` formatting (the
/// shortest digit sequence that reparses to the same bit pattern) — `{}`
/// never emits exponent form on its own, so for magnitudes far from 1 a
/// plain `format!("{f}")` round-trips correctly but wastes characters
/// (e.g. `1e300` would otherwise print as 300+ positional digits).
fn render_float(f: f64) -> String {
    let positional = format!("{f}");
    let exponent = exponent_form(f);
    if exponent.len() < positional.len() {
        exponent
    } else {
        positional
    }
}

/// Rust's `{:e}` output (`"1.5e300"`, `"1e-300"`) is already
/// TOON-acceptable as-is: `parse_primitive_token` recognizes any token
/// containing `e`/`E` as float syntax and hands it to `str::parse::<f64>`,
/// which understands this exact form.
fn exponent_form(f: f64) -> String {
    format!("{f:e}")
}

/// Parses a single bare (unsplit) token per §4.C's six rules, in order.
///
/// `token` must already be isolated from its surrounding delimiters —
/// callers (the structural decoder) are responsible for splitting on
/// delimiters while respecting quoted regions before calling this.
pub fn parse_primitive_token(token: &str) -> Result<Value, PrimitiveParseError> {
    match token {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    if let Some(rest) = token.strip_prefix('"') {
        return parse_quoted(rest);
    }

    if token == "0" || token == "-0" {
        return Ok(Value::Int(0));
    }

    if leading_zero_re().is_match(token) {
        return Ok(Value::Str(token.to_string()));
    }

    if token.contains('.') || token.contains('e') || token.contains('E') {
        if let Ok(f) = token.parse::<f64>() {
            return Ok(normalize_f64(f));
        }
    } else if let Ok(i) = token.parse::<i64>() {
        return Ok(Value::Int(i));
    }

    Ok(Value::Str(token.trim().to_string()))
}

fn parse_quoted(rest: &str) -> Result<Value, PrimitiveParseError> {
    let chars: Vec<char> = rest.chars().collect();
    let mut escaped = false;
    let mut close = None;
    for (idx, &c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                close = Some(idx);
                break;
            }
            _ => {}
        }
    }
    match close {
        Some(idx) if idx == chars.len() - 1 => {
            let inner: String = chars[..idx].iter().collect();
            quoting::unescape(&inner)
                .map(Value::Str)
                .map_err(PrimitiveParseError::InvalidEscape)
        }
        _ => Err(PrimitiveParseError::UnterminatedString(
            "unterminated string".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Value {
        parse_primitive_token(s).unwrap()
    }

    #[test]
    fn literals() {
        assert_eq!(parse("null"), Value::Null);
        assert_eq!(parse("true"), Value::Bool(true));
        assert_eq!(parse("false"), Value::Bool(false));
    }

    #[test]
    fn zero_and_negative_zero() {
        assert_eq!(parse("0"), Value::Int(0));
        assert_eq!(parse("-0"), Value::Int(0));
    }

    #[test]
    fn leading_zero_preserves_as_string() {
        assert_eq!(parse("007"), Value::Str("007".to_string()));
        assert_eq!(parse("-007"), Value::Str("-007".to_string()));
    }

    #[test]
    fn plain_integer() {
        assert_eq!(parse("42"), Value::Int(42));
        assert_eq!(parse("-42"), Value::Int(-42));
    }

    #[test]
    fn float_with_fraction() {
        assert_eq!(parse("3.5"), Value::Float(3.5));
    }

    #[test]
    fn integer_valued_float_normalizes_to_int() {
        assert_eq!(parse("3.0"), Value::Int(3));
        assert_eq!(parse("3e2"), Value::Int(300));
    }

    #[test]
    fn bareword_becomes_string() {
        assert_eq!(parse("hello"), Value::Str("hello".to_string()));
    }

    #[test]
    fn quoted_string() {
        assert_eq!(parse("\"hi\""), Value::Str("hi".to_string()));
        assert_eq!(parse("\"line\\nbreak\""), Value::Str("line\nbreak".to_string()));
    }

    #[test]
    fn unterminated_string_is_error() {
        assert_eq!(
            parse_primitive_token("\"hi"),
            Err(PrimitiveParseError::UnterminatedString(
                "unterminated string".to_string()
            ))
        );
    }

    #[test]
    fn invalid_escape_is_a_distinct_error_from_unterminated_string() {
        match parse_primitive_token("\"bad\\x\"") {
            Err(PrimitiveParseError::InvalidEscape(_)) => {}
            other => panic!("expected InvalidEscape, got {other:?}"),
        }
    }

    #[test]
    fn large_magnitude_floats_render_in_exponent_form() {
        assert_eq!(render_primitive(&Value::Float(1e300), &Delimiter::Comma), "1e300");
        assert_eq!(render_primitive(&Value::Float(1.5e-300), &Delimiter::Comma), "1.5e-300");
    }

    #[test]
    fn ordinary_floats_stay_in_positional_form() {
        assert_eq!(render_primitive(&Value::Float(3.5), &Delimiter::Comma), "3.5");
        assert_eq!(render_primitive(&Value::Float(-2.5), &Delimiter::Comma), "-2.5");
    }

    #[test]
    fn render_roundtrips_simple_values() {
        assert_eq!(render_primitive(&Value::Null, &Delimiter::Comma), "null");
        assert_eq!(render_primitive(&Value::Int(42), &Delimiter::Comma), "42");
        assert_eq!(
            render_primitive(&Value::Str("hi".into()), &Delimiter::Comma),
            "hi"
        );
        assert_eq!(
            render_primitive(&Value::Str("".into()), &Delimiter::Comma),
            "\"\""
        );
    }
}
