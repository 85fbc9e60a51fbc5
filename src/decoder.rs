//! Component F — the structural decoder: turns TOON text back into a
//! [`crate::Value`] tree.
//!
//! The decoder works line-by-line rather than char-by-char. [`preprocess`]
//! turns raw text into [`Line`] records (indent width already measured,
//! strict-mode indentation checks already applied), then a small recursive
//! descent over those records rebuilds the tree: [`parse_declaration`]
//! classifies a line's shape (array header, keyed entry, or neither), and
//! [`parse_object_entries`]/[`parse_array_body`] consume however many
//! following lines that shape implies.

use crate::error::{DecodeError, DecodeErrorKind, DecodeResult};
use crate::options::{DecodeOptions, ExpandPaths};
use crate::quoting;
use crate::{primitive, ToonMap, Value};

struct Line {
    indent: usize,
    content: String,
    number: usize,
    is_blank: bool,
}

/// Splits `text` into [`Line`] records, measuring indentation and applying
/// the strict-mode indentation checks (§4.F: tabs in the indent region, and
/// non-zero indents that aren't a multiple of `indent_size`, are both
/// fatal). Trailing blank lines are dropped.
fn preprocess(text: &str, opts: &DecodeOptions) -> DecodeResult<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in text.split('\n').enumerate() {
        let number = idx + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let is_blank = raw.trim().is_empty();

        let mut leading_ws_len = 0;
        let mut has_tab = false;
        for c in raw.chars() {
            if c == ' ' {
                leading_ws_len += 1;
            } else if c == '\t' {
                has_tab = true;
                leading_ws_len += 1;
            } else {
                break;
            }
        }
        if opts.strict && has_tab {
            return Err(DecodeError::with_snippet(
                DecodeErrorKind::IndentationViolation,
                number,
                "tab characters are not allowed in indentation",
                raw,
            ));
        }
        let indent = if has_tab {
            raw.chars().take_while(|&c| c == ' ').count()
        } else {
            leading_ws_len
        };
        if opts.strict && indent % opts.indent_size != 0 {
            return Err(DecodeError::with_snippet(
                DecodeErrorKind::IndentationViolation,
                number,
                format!("indent {indent} is not a multiple of {}", opts.indent_size),
                raw,
            ));
        }
        let content = raw.get(leading_ws_len..).unwrap_or("").to_string();
        lines.push(Line {
            indent,
            content,
            number,
            is_blank,
        });
    }
    while lines.last().is_some_and(|l| l.is_blank) {
        lines.pop();
    }
    Ok(lines)
}

/// A line's declared shape, per §4.F's line-classification grammar.
enum Decl {
    Array {
        key: Option<String>,
        quoted_key: bool,
        marker: String,
        n: usize,
        delim: char,
        fields: Option<Vec<String>>,
        rest: ArrayRest,
    },
    KeyColon {
        key: String,
        quoted_key: bool,
        inline_value: Option<String>,
    },
}

#[derive(Clone)]
enum ArrayRest {
    Inline(String),
    Block,
}

impl Decl {
    fn key(&self) -> Option<&str> {
        match self {
            Decl::Array { key, .. } => key.as_deref(),
            Decl::KeyColon { key, .. } => Some(key),
        }
    }
}

/// Scans a key off the front of `s`: a quoted string, or a bare
/// `[A-Za-z_][A-Za-z0-9_.]*` identifier. Returns the decoded key, whether it
/// was quoted, and how many bytes of `s` it consumed.
fn scan_key(s: &str) -> Option<(String, bool, usize)> {
    if let Some(rest) = s.strip_prefix('"') {
        let mut escaped = false;
        for (boundary, c) in rest.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '"' => {
                    let inner = &rest[..boundary];
                    let unescaped = quoting::unescape(inner).ok()?;
                    let consumed = 1 + boundary + c.len_utf8();
                    return Some((unescaped, true, consumed));
                }
                _ => {}
            }
        }
        None
    } else {
        let mut chars = s.char_indices();
        let (_, first) = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let mut end = first.len_utf8();
        for (idx, c) in s.char_indices().skip(1) {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                end = idx + c.len_utf8();
            } else {
                break;
            }
        }
        Some((s[..end].to_string(), false, end))
    }
}

fn parse_key_token(tok: &str) -> Option<String> {
    let tok = tok.trim();
    let (key, _, consumed) = scan_key(tok)?;
    if consumed == tok.len() {
        Some(key)
    } else {
        None
    }
}

/// Parses the `[<marker><n><delim>]{fields}:` or `[<marker><n><delim>]:`
/// tail that follows the opening `[` of an array declaration.
fn parse_array_tail(s: &str) -> Option<(String, usize, char, Option<Vec<String>>, ArrayRest)> {
    let close = s.find(']')?;
    let bracket_inner = &s[..close];
    let after_bracket = &s[close + 1..];

    let (body, delim) = match bracket_inner.chars().last() {
        Some('\t') => (&bracket_inner[..bracket_inner.len() - 1], '\t'),
        Some('|') => (&bracket_inner[..bracket_inner.len() - 1], '|'),
        _ => (bracket_inner, ','),
    };
    let digit_start = body.find(|c: char| c.is_ascii_digit())?;
    let marker = &body[..digit_start];
    let digits = &body[digit_start..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = digits.parse().ok()?;

    let (fields, after_fields) = if let Some(rest2) = after_bracket.strip_prefix('{') {
        let close2 = rest2.find('}')?;
        let fields_str = &rest2[..close2];
        let tokens = split_respecting_quotes(fields_str, delim).ok()?;
        let mut fields = Vec::with_capacity(tokens.len());
        for t in tokens {
            fields.push(parse_key_token(&t)?);
        }
        (Some(fields), &rest2[close2 + 1..])
    } else {
        (None, after_bracket)
    };

    let after_colon = after_fields.strip_prefix(':')?;
    let rest = if after_colon.is_empty() {
        ArrayRest::Block
    } else {
        let v = after_colon.strip_prefix(' ').unwrap_or(after_colon);
        ArrayRest::Inline(v.to_string())
    };
    Some((marker.to_string(), n, delim, fields, rest))
}

/// Classifies `content` (a line with its indent already stripped) as an
/// array header or a `key:`/`key: value` entry. Returns `None` when it
/// matches neither shape — the caller decides whether that means "bare
/// primitive" (root, list items) or "malformed" (ordinary object entries).
fn parse_declaration(content: &str) -> Option<Decl> {
    if let Some(rest) = content.strip_prefix('[') {
        let (marker, n, delim, fields, body) = parse_array_tail(rest)?;
        return Some(Decl::Array {
            key: None,
            quoted_key: false,
            marker,
            n,
            delim,
            fields,
            rest: body,
        });
    }

    let (key, quoted_key, consumed) = scan_key(content)?;
    let after_key = &content[consumed..];

    if let Some(rest) = after_key.strip_prefix('[') {
        let (marker, n, delim, fields, body) = parse_array_tail(rest)?;
        return Some(Decl::Array {
            key: Some(key),
            quoted_key,
            marker,
            n,
            delim,
            fields,
            rest: body,
        });
    }

    if let Some(rest) = after_key.strip_prefix(':') {
        let trimmed = rest.strip_prefix(' ').unwrap_or(rest);
        let inline_value = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        return Some(Decl::KeyColon {
            key,
            quoted_key,
            inline_value,
        });
    }

    None
}

/// Splits `s` on `delim`, leaving quoted regions (and their escapes) intact
/// so the caller can hand each token to [`primitive::parse_primitive_token`]
/// or [`quoting::unescape`] unchanged.
fn split_respecting_quotes(s: &str, delim: char) -> DecodeResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for c in s.chars() {
        if in_quotes {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        if c == '"' {
            in_quotes = true;
            current.push(c);
            continue;
        }
        if c == delim {
            tokens.push(std::mem::take(&mut current));
            continue;
        }
        current.push(c);
    }
    if in_quotes {
        return Err(DecodeError::new(
            DecodeErrorKind::UnterminatedString,
            0,
            "unterminated quoted string",
        ));
    }
    tokens.push(current);
    Ok(tokens)
}

/// The comma→tab safety fallback (§4.F): an inline value string declared
/// with the comma delimiter, but containing tabs and no commas, is almost
/// certainly tab-separated data that lost its header marker in transit.
fn resolve_inline_delim(text: &str, declared: char) -> char {
    if declared == ',' && text.contains('\t') && !text.contains(',') {
        '\t'
    } else {
        declared
    }
}

fn parse_token(token: &str, line: usize) -> DecodeResult<Value> {
    primitive::parse_primitive_token(token).map_err(|e| match e {
        primitive::PrimitiveParseError::UnterminatedString(msg) => {
            DecodeError::with_snippet(DecodeErrorKind::UnterminatedString, line, msg, token)
        }
        primitive::PrimitiveParseError::InvalidEscape(msg) => {
            DecodeError::with_snippet(DecodeErrorKind::InvalidEscape, line, msg, token)
        }
    })
}

/// Decodes TOON source text into a [`Value`] tree.
pub fn decode(text: &str, opts: &DecodeOptions) -> DecodeResult<Value> {
    opts.validate()?;
    let lines = preprocess(text, opts)?;
    let first_idx = lines.iter().position(|l| !l.is_blank);
    let Some(first_idx) = first_idx else {
        return Ok(Value::Obj(ToonMap::new()));
    };
    let first = &lines[first_idx];

    let value = if first.content.starts_with('[') {
        let decl = parse_declaration(&first.content).ok_or_else(|| {
            DecodeError::with_snippet(
                DecodeErrorKind::MalformedHeader,
                first.number,
                "malformed array header",
                &first.content,
            )
        })?;
        let (value, end) = build_value_from_decl(&decl, &lines, first_idx + 1, first.indent, opts)?;
        if lines[end..].iter().any(|l| !l.is_blank) {
            return Err(DecodeError::new(
                DecodeErrorKind::ParseFailure,
                lines.get(end).map_or(first.number, |l| l.number),
                "trailing content after root array",
            ));
        }
        value
    } else if parse_declaration(&first.content).is_some() {
        let (map, end) = parse_object_entries(&lines, first_idx, first.indent, opts)?;
        if end < lines.len() {
            let extra = &lines[end];
            if !extra.is_blank {
                return Err(DecodeError::with_snippet(
                    DecodeErrorKind::IndentationViolation,
                    extra.number,
                    "unexpected content after root object",
                    &extra.content,
                ));
            }
        }
        Value::Obj(map)
    } else {
        if lines[first_idx + 1..].iter().any(|l| !l.is_blank) {
            return Err(DecodeError::new(
                DecodeErrorKind::ParseFailure,
                first.number,
                "trailing content after root primitive",
            ));
        }
        parse_token(first.content.trim(), first.number)?
    };
    Ok(value)
}

/// Builds the value a [`Decl`] describes, consuming any following lines its
/// shape implies (array rows/items, or a nested object's entries).
/// `following` is the index of the line immediately after the declaration
/// line; `base_indent` is the declaration line's own indent.
fn build_value_from_decl(
    decl: &Decl,
    lines: &[Line],
    following: usize,
    base_indent: usize,
    opts: &DecodeOptions,
) -> DecodeResult<(Value, usize)> {
    match decl {
        Decl::Array {
            marker,
            n,
            delim,
            fields,
            rest,
            ..
        } => {
            if !marker.is_empty() && !opts.accept_legacy_length_marker {
                return Err(DecodeError::new(
                    DecodeErrorKind::MalformedHeader,
                    0,
                    "length marker present but accept_legacy_length_marker is off",
                ));
            }
            parse_array_body(base_indent, *n, *delim, fields.clone(), rest.clone(), lines, following, opts)
        }
        Decl::KeyColon {
            inline_value: Some(v),
            ..
        } => {
            let line_number = lines.get(following.wrapping_sub(1)).map_or(0, |l| l.number);
            Ok((parse_token(v.trim(), line_number)?, following))
        }
        Decl::KeyColon {
            inline_value: None, ..
        } => {
            if next_indent_gt(lines, following, base_indent) {
                let (map, end) = parse_object_entries(lines, following, child_indent(lines, following), opts)?;
                Ok((Value::Obj(map), end))
            } else {
                Ok((Value::Obj(ToonMap::new()), following))
            }
        }
    }
}

fn next_indent_gt(lines: &[Line], mut pos: usize, base_indent: usize) -> bool {
    while pos < lines.len() && lines[pos].is_blank {
        pos += 1;
    }
    pos < lines.len() && lines[pos].indent > base_indent
}

fn child_indent(lines: &[Line], mut pos: usize) -> usize {
    while pos < lines.len() && lines[pos].is_blank {
        pos += 1;
    }
    lines.get(pos).map_or(0, |l| l.indent)
}

/// Consumes a run of sibling entries at exactly `entry_indent`, in document
/// order, dispatching each through [`parse_declaration`] and
/// [`build_value_from_decl`]. Applies path expansion once the whole run is
/// collected, if `opts.expand_paths` asks for it.
fn parse_object_entries(
    lines: &[Line],
    mut pos: usize,
    entry_indent: usize,
    opts: &DecodeOptions,
) -> DecodeResult<(ToonMap, usize)> {
    let mut entries: Vec<(String, bool, Value)> = Vec::new();
    loop {
        while pos < lines.len() && lines[pos].is_blank {
            pos += 1;
        }
        if pos >= lines.len() {
            break;
        }
        let line = &lines[pos];
        if line.indent < entry_indent {
            break;
        }
        if line.indent > entry_indent {
            return Err(DecodeError::with_snippet(
                DecodeErrorKind::IndentationViolation,
                line.number,
                "unexpected indentation",
                &line.content,
            ));
        }
        let decl = parse_declaration(&line.content).ok_or_else(|| {
            DecodeError::with_snippet(
                DecodeErrorKind::MalformedHeader,
                line.number,
                "expected a key",
                &line.content,
            )
        })?;
        let key = decl.key().map(str::to_string).ok_or_else(|| {
            DecodeError::with_snippet(
                DecodeErrorKind::MalformedHeader,
                line.number,
                "object entries require a key",
                &line.content,
            )
        })?;
        let quoted_key = matches!(
            &decl,
            Decl::Array { quoted_key: true, .. } | Decl::KeyColon { quoted_key: true, .. }
        );
        let (value, new_pos) = build_value_from_decl(&decl, lines, pos + 1, entry_indent, opts)?;
        entries.push((key, quoted_key, value));
        pos = new_pos;
    }

    let map = if opts.expand_paths == ExpandPaths::Safe {
        expand_paths(entries, opts.strict)?
    } else {
        let mut map = ToonMap::new();
        for (k, _, v) in entries {
            map.insert(k, v);
        }
        map
    };
    Ok((map, pos))
}

fn parse_array_body(
    base_indent: usize,
    n: usize,
    delim: char,
    fields: Option<Vec<String>>,
    rest: ArrayRest,
    lines: &[Line],
    mut pos: usize,
    opts: &DecodeOptions,
) -> DecodeResult<(Value, usize)> {
    if let Some(fields) = fields {
        if !matches!(rest, ArrayRest::Block) {
            return Err(DecodeError::new(
                DecodeErrorKind::MalformedHeader,
                0,
                "tabular array header cannot carry an inline value",
            ));
        }
        return parse_tabular_rows(base_indent, n, delim, &fields, lines, pos, opts);
    }

    if n == 0 {
        return Ok((Value::List(Vec::new()), pos));
    }

    match rest {
        ArrayRest::Inline(text) => {
            let resolved = resolve_inline_delim(&text, delim);
            let tokens = split_respecting_quotes(&text, resolved)?;
            if tokens.len() != n {
                return Err(DecodeError::with_snippet(
                    DecodeErrorKind::ArrayLengthMismatch,
                    0,
                    format!("declared length {n} but found {} values", tokens.len()),
                    &text,
                ));
            }
            let values = tokens
                .iter()
                .map(|t| parse_token(t.trim(), 0))
                .collect::<DecodeResult<Vec<_>>>()?;
            Ok((Value::List(values), pos))
        }
        ArrayRest::Block => {
            while pos < lines.len() && lines[pos].is_blank {
                pos += 1;
            }
            let item_indent = lines.get(pos).map_or(base_indent + 1, |l| l.indent);
            if item_indent <= base_indent {
                return Err(DecodeError::new(
                    DecodeErrorKind::ArrayLengthMismatch,
                    0,
                    format!("declared length {n} but found no items"),
                ));
            }
            let mut items = Vec::new();
            loop {
                while pos < lines.len() && lines[pos].is_blank {
                    if opts.strict && items.len() < n {
                        return Err(DecodeError::new(
                            DecodeErrorKind::BlankLineInArray,
                            lines[pos].number,
                            "blank line inside array body",
                        ));
                    }
                    pos += 1;
                }
                let Some(line) = lines.get(pos) else { break };
                if line.indent <= base_indent {
                    break;
                }
                if line.indent != item_indent {
                    return Err(DecodeError::with_snippet(
                        DecodeErrorKind::IndentationViolation,
                        line.number,
                        "array item at unexpected indent",
                        &line.content,
                    ));
                }
                let rest = line
                    .content
                    .strip_prefix('-')
                    .ok_or_else(|| {
                        DecodeError::with_snippet(
                            DecodeErrorKind::MalformedHeader,
                            line.number,
                            "expected a list item marker '-'",
                            &line.content,
                        )
                    })?;
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                let (value, new_pos) = parse_list_item(rest, lines, pos + 1, item_indent, line.number, opts)?;
                items.push(value);
                pos = new_pos;
            }
            if items.len() != n {
                return Err(DecodeError::new(
                    DecodeErrorKind::ArrayLengthMismatch,
                    0,
                    format!("declared length {n} but found {} items", items.len()),
                ));
            }
            Ok((Value::List(items), pos))
        }
    }
}

fn parse_tabular_rows(
    base_indent: usize,
    n: usize,
    delim: char,
    fields: &[String],
    lines: &[Line],
    mut pos: usize,
    opts: &DecodeOptions,
) -> DecodeResult<(Value, usize)> {
    let mut rows = Vec::new();
    let mut row_indent = None;
    loop {
        while pos < lines.len() && lines[pos].is_blank {
            if opts.strict && rows.len() < n {
                return Err(DecodeError::new(
                    DecodeErrorKind::BlankLineInArray,
                    lines[pos].number,
                    "blank line inside array body",
                ));
            }
            pos += 1;
        }
        let Some(line) = lines.get(pos) else { break };
        if line.indent <= base_indent {
            break;
        }
        let expected = *row_indent.get_or_insert(line.indent);
        if line.indent != expected {
            return Err(DecodeError::with_snippet(
                DecodeErrorKind::IndentationViolation,
                line.number,
                "tabular row at unexpected indent",
                &line.content,
            ));
        }
        let tokens = split_respecting_quotes(&line.content, delim)?;
        if tokens.len() != fields.len() {
            return Err(DecodeError::with_snippet(
                DecodeErrorKind::RowWidthMismatch,
                line.number,
                format!("expected {} fields but found {}", fields.len(), tokens.len()),
                &line.content,
            ));
        }
        let mut map = ToonMap::new();
        for (field, tok) in fields.iter().zip(tokens.iter()) {
            map.insert(field.clone(), parse_token(tok.trim(), line.number)?);
        }
        rows.push(Value::Obj(map));
        pos += 1;
    }
    if rows.len() != n {
        return Err(DecodeError::new(
            DecodeErrorKind::ArrayLengthMismatch,
            0,
            format!("declared length {n} but found {} rows", rows.len()),
        ));
    }
    Ok((Value::List(rows), pos))
}

/// Parses one list item's body (the text after its `-` marker has already
/// been stripped). Per §4.F this is either empty (`Obj({})`), a nested
/// array declaration, an object's first field (with further fields
/// continuing at `item_indent + 1`), or a bare primitive token.
fn parse_list_item(
    rest: &str,
    lines: &[Line],
    following: usize,
    item_indent: usize,
    line_number: usize,
    opts: &DecodeOptions,
) -> DecodeResult<(Value, usize)> {
    if rest.trim().is_empty() {
        return Ok((Value::Obj(ToonMap::new()), following));
    }

    match parse_declaration(rest) {
        Some(Decl::Array {
            key: None,
            marker,
            n,
            delim,
            fields,
            rest: arr_rest,
            ..
        }) => {
            if !marker.is_empty() && !opts.accept_legacy_length_marker {
                return Err(DecodeError::new(
                    DecodeErrorKind::MalformedHeader,
                    line_number,
                    "length marker present but accept_legacy_length_marker is off",
                ));
            }
            parse_array_body(item_indent, n, delim, fields, arr_rest, lines, following, opts)
        }
        Some(decl @ (Decl::Array { key: Some(_), .. } | Decl::KeyColon { .. })) => {
            let key = decl.key().expect("matched arm guarantees a key").to_string();
            let quoted_key = matches!(
                &decl,
                Decl::Array { quoted_key: true, .. } | Decl::KeyColon { quoted_key: true, .. }
            );
            let (first_value, new_pos) = build_value_from_decl(&decl, lines, following, item_indent, opts)?;
            let mut entries = vec![(key, quoted_key, first_value)];
            let (rest_map, end) = parse_object_entries(lines, new_pos, item_indent + 1, opts)?;
            for (k, v) in rest_map {
                entries.push((k, false, v));
            }
            let map = if opts.expand_paths == ExpandPaths::Safe {
                expand_paths(entries, opts.strict)?
            } else {
                let mut m = ToonMap::new();
                for (k, _, v) in entries {
                    m.insert(k, v);
                }
                m
            };
            Ok((Value::Obj(map), end))
        }
        None => Ok((parse_token(rest.trim(), line_number)?, following)),
    }
}

/// Expands unquoted, multi-segment, identifier-shaped dotted keys into
/// nested objects (§4.F path expansion). Conflicts are fatal when `strict`;
/// otherwise the later write wins, deep-merging when both sides are
/// objects. Document order of surviving top-level keys is preserved.
fn expand_paths(entries: Vec<(String, bool, Value)>, strict: bool) -> DecodeResult<ToonMap> {
    let mut root = ToonMap::new();
    for (key, quoted, value) in entries {
        let segments: Vec<&str> = key.split('.').collect();
        let eligible = !quoted
            && segments.len() >= 2
            && segments.iter().all(|s| !s.is_empty() && quoting::is_identifier(s));
        if eligible {
            insert_path(&mut root, &segments, value, strict)?;
        } else {
            merge_leaf(&mut root, &key, value, strict)?;
        }
    }
    Ok(root)
}

fn insert_path(root: &mut ToonMap, segments: &[&str], value: Value, strict: bool) -> DecodeResult<()> {
    if segments.len() == 1 {
        return merge_leaf(root, segments[0], value, strict);
    }
    let head = segments[0];
    let inner = root.inner_mut();
    let existing = inner.get(head).cloned();
    let mut submap = match existing {
        None => ToonMap::new(),
        Some(Value::Obj(m)) => m,
        Some(_) if !strict => ToonMap::new(),
        Some(_) => {
            return Err(DecodeError::new(
                DecodeErrorKind::PathConflict,
                0,
                format!("path expansion conflict at '{head}'"),
            ))
        }
    };
    insert_path(&mut submap, &segments[1..], value, strict)?;
    match inner.get_mut(head) {
        Some(v) => *v = Value::Obj(submap),
        None => {
            inner.insert(head.to_string(), Value::Obj(submap));
        }
    }
    Ok(())
}

fn merge_leaf(root: &mut ToonMap, key: &str, value: Value, strict: bool) -> DecodeResult<()> {
    if root.contains_key(key) {
        if strict {
            return Err(DecodeError::new(
                DecodeErrorKind::PathConflict,
                0,
                format!("duplicate key '{key}'"),
            ));
        }
        let old = root.get(key).cloned().expect("contains_key just returned true");
        let merged = deep_merge(old, value);
        *root.inner_mut().get_mut(key).expect("contains_key just returned true") = merged;
    } else {
        root.insert(key.to_string(), value);
    }
    Ok(())
}

fn deep_merge(old: Value, new: Value) -> Value {
    match (old, new) {
        (Value::Obj(mut a), Value::Obj(b)) => {
            for (k, v) in b {
                let merged = match a.shift_remove(&k) {
                    Some(existing) => deep_merge(existing, v),
                    None => v,
                };
                a.insert(k, merged);
            }
            Value::Obj(a)
        }
        (_, new) => new,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> Value {
        decode(text, &DecodeOptions::new()).unwrap()
    }

    #[test]
    fn decodes_root_primitive() {
        assert_eq!(d("42"), Value::Int(42));
        assert_eq!(d("hello"), Value::Str("hello".to_string()));
    }

    #[test]
    fn decodes_flat_object() {
        let v = d("name: Alice\nage: 30");
        let obj = v.as_obj().unwrap();
        assert_eq!(obj.get("name").unwrap().as_str(), Some("Alice"));
        assert_eq!(obj.get("age").unwrap().as_i64(), Some(30));
    }

    #[test]
    fn decodes_nested_object() {
        let v = d("user:\n  name: Bob\n  age: 40");
        let user = v.as_obj().unwrap().get("user").unwrap().as_obj().unwrap();
        assert_eq!(user.get("name").unwrap().as_str(), Some("Bob"));
    }

    #[test]
    fn decodes_empty_object_entry() {
        let v = d("config:");
        let cfg = v.as_obj().unwrap().get("config").unwrap();
        assert!(cfg.as_obj().unwrap().is_empty());
    }

    #[test]
    fn decodes_root_inline_array() {
        let v = d("[2]: elixir,toon");
        let items = v.as_list().unwrap();
        assert_eq!(items[0].as_str(), Some("elixir"));
        assert_eq!(items[1].as_str(), Some("toon"));
    }

    #[test]
    fn decodes_empty_array() {
        assert_eq!(d("[0]:"), Value::List(Vec::new()));
    }

    #[test]
    fn decodes_tabular_array() {
        let v = d("users[2]{id,name}:\n  1,A\n  2,B");
        let users = v.as_obj().unwrap().get("users").unwrap().as_list().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].as_obj().unwrap().get("id").unwrap().as_i64(), Some(1));
        assert_eq!(users[1].as_obj().unwrap().get("name").unwrap().as_str(), Some("B"));
    }

    #[test]
    fn tabular_row_width_mismatch_is_an_error() {
        let err = decode("users[1]{id,name}:\n  1,A,extra", &DecodeOptions::new()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::RowWidthMismatch);
    }

    #[test]
    fn decodes_list_array_of_primitives() {
        let v = d("tags[2]:\n  - a\n  - b");
        let tags = v.as_obj().unwrap().get("tags").unwrap().as_list().unwrap();
        assert_eq!(tags[0].as_str(), Some("a"));
    }

    #[test]
    fn decodes_list_array_of_objects() {
        let v = d("items[1]:\n  - id: 1\n    name: widget");
        let items = v.as_obj().unwrap().get("items").unwrap().as_list().unwrap();
        let first = items[0].as_obj().unwrap();
        assert_eq!(first.get("id").unwrap().as_i64(), Some(1));
        assert_eq!(first.get("name").unwrap().as_str(), Some("widget"));
    }

    #[test]
    fn array_length_mismatch_is_an_error() {
        let err = decode("[3]: a,b", &DecodeOptions::new()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::ArrayLengthMismatch);
    }

    #[test]
    fn strict_rejects_tab_indentation() {
        let err = decode("a:\n\tb: 1", &DecodeOptions::new()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::IndentationViolation);
    }

    #[test]
    fn quoted_key_is_not_path_expanded() {
        let opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
        let v = decode("\"a.b\": 1", &opts).unwrap();
        let obj = v.as_obj().unwrap();
        assert_eq!(obj.get("a.b").unwrap().as_i64(), Some(1));
        assert!(obj.get("a").is_none());
    }

    #[test]
    fn unquoted_dotted_key_expands_when_enabled() {
        let opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
        let v = decode("a.b.c: 1", &opts).unwrap();
        let obj = v.as_obj().unwrap();
        let a = obj.get("a").unwrap().as_obj().unwrap();
        let b = a.get("b").unwrap().as_obj().unwrap();
        assert_eq!(b.get("c").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn dotted_key_left_alone_when_expansion_off() {
        let v = d("a.b: 1");
        let obj = v.as_obj().unwrap();
        assert_eq!(obj.get("a.b").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn strict_path_conflict_is_fatal() {
        let opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
        let err = decode("a.b: 1\na: 2", &opts).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::PathConflict);
    }

    #[test]
    fn non_strict_path_conflict_last_write_wins() {
        let opts = DecodeOptions::new()
            .with_expand_paths(ExpandPaths::Safe)
            .with_strict(false);
        let v = decode("a.b: 1\na: 2", &opts).unwrap();
        assert_eq!(v.as_obj().unwrap().get("a").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn inline_comma_declared_falls_back_to_tab_when_content_demands_it() {
        let v = d("[2]: a\tb");
        let items = v.as_list().unwrap();
        assert_eq!(items[0].as_str(), Some("a"));
        assert_eq!(items[1].as_str(), Some("b"));
    }

    #[test]
    fn unterminated_quote_in_object_entry_matches_array_row_error_kind() {
        let scalar_err = decode("name: \"bar", &DecodeOptions::new()).unwrap_err();
        assert_eq!(scalar_err.kind, DecodeErrorKind::UnterminatedString);

        let array_err = decode("[2]: \"bar,b", &DecodeOptions::new()).unwrap_err();
        assert_eq!(array_err.kind, DecodeErrorKind::UnterminatedString);
    }

    #[test]
    fn invalid_escape_in_object_entry_is_reachable() {
        let err = decode("name: \"bad\\x\"", &DecodeOptions::new()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidEscape);
    }
}
