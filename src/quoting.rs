//! Component B — string guardrails: deciding when a value or key needs
//! quoting, and the five controlled escape sequences.

use crate::options::Delimiter;
use regex::Regex;
use std::sync::OnceLock;

fn ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").unwrap())
}

/// True iff `s` matches the bare-key identifier grammar `[A-Za-z_][A-Za-z0-9_.]*`.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    ident_re().is_match(s)
}

/// §4.B: a key must be quoted unless it is a bare identifier.
#[must_use]
pub fn needs_quote_key(k: &str) -> bool {
    !is_identifier(k)
}

const STRUCTURAL_CHARS: [char; 11] =
    [':', ',', '\t', '|', '{', '}', '[', ']', '"', '\n', '\r'];

/// §4.B: a string value must be quoted if any of the listed conditions hold.
#[must_use]
pub fn needs_quote_value(s: &str, delimiter: &Delimiter) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.starts_with(' ') || s.ends_with(' ') {
        return true;
    }
    if s == "true" || s == "false" || s == "null" {
        return true;
    }
    if s.parse::<f64>().is_ok() {
        return true;
    }
    if s.chars().any(|c| STRUCTURAL_CHARS.contains(&c)) {
        return true;
    }
    if s.chars().any(|c| (c as u32) <= 0x1F || c == '\u{7F}') {
        return true;
    }
    if s.starts_with('-') {
        return true;
    }
    if s.contains(delimiter.as_str()) {
        return true;
    }
    false
}

/// Encodes the five controlled escapes, backslash first so later
/// substitutions don't double-escape the backslashes they introduce.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps a value in quotes, escaping its contents.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    out.push_str(&escape(s));
    out.push('"');
    out
}

/// Decodes the five controlled escapes. A bare backslash left over after
/// substitution (i.e. `\` followed by any character other than the five
/// recognized ones) is a fatal "invalid escape sequence".
pub fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                return Err(format!("invalid escape sequence: \\{other}"));
            }
            None => {
                return Err("invalid escape sequence: trailing backslash".to_string());
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_needs_quoting() {
        assert!(needs_quote_value("", &Delimiter::Comma));
    }

    #[test]
    fn leading_trailing_space_needs_quoting() {
        assert!(needs_quote_value(" x", &Delimiter::Comma));
        assert!(needs_quote_value("x ", &Delimiter::Comma));
    }

    #[test]
    fn literal_keywords_need_quoting() {
        assert!(needs_quote_value("true", &Delimiter::Comma));
        assert!(needs_quote_value("false", &Delimiter::Comma));
        assert!(needs_quote_value("null", &Delimiter::Comma));
    }

    #[test]
    fn numeric_strings_need_quoting() {
        assert!(needs_quote_value("123", &Delimiter::Comma));
        assert!(needs_quote_value("3.5", &Delimiter::Comma));
        assert!(needs_quote_value("3e2", &Delimiter::Comma));
    }

    #[test]
    fn leading_hyphen_needs_quoting_even_if_not_numeric() {
        assert!(needs_quote_value("-item", &Delimiter::Comma));
    }

    #[test]
    fn structural_chars_need_quoting() {
        assert!(needs_quote_value("a,b", &Delimiter::Comma));
        assert!(needs_quote_value("a:b", &Delimiter::Comma));
        assert!(needs_quote_value("a|b", &Delimiter::Comma));
    }

    #[test]
    fn plain_word_does_not_need_quoting() {
        assert!(!needs_quote_value("hello", &Delimiter::Comma));
    }

    #[test]
    fn delimiter_specific_quoting() {
        assert!(!needs_quote_value("a,b", &Delimiter::Tab));
        assert!(needs_quote_value("a\tb", &Delimiter::Tab));
    }

    #[test]
    fn identifiers_do_not_need_key_quoting() {
        assert!(!needs_quote_key("name"));
        assert!(!needs_quote_key("user_id"));
        assert!(!needs_quote_key("a.b.c"));
    }

    #[test]
    fn non_identifier_keys_need_quoting() {
        assert!(needs_quote_key("1abc"));
        assert!(needs_quote_key("has space"));
        assert!(needs_quote_key(""));
    }

    #[test]
    fn escape_unescape_roundtrip() {
        let s = "line1\nline2\ttabbed\\backslash\"quote\rcr";
        let escaped = escape(s);
        let back = unescape(&escaped).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn unescape_rejects_unknown_escape() {
        assert!(unescape("\\x").is_err());
    }

    #[test]
    fn unescape_rejects_trailing_backslash() {
        assert!(unescape("abc\\").is_err());
    }
}
