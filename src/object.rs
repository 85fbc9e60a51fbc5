//! Component E — object encoding: key ordering, entry emission, key
//! folding, and the line-oriented writer both this module and [`crate::array`]
//! push through.

use crate::array;
use crate::error::EncodeResult;
use crate::options::{EncodeOptions, KeyFolding, KeyOrder};
use crate::quoting;
use crate::{ToonMap, Value};
use std::borrow::Cow;
use std::collections::HashSet;

/// Line-oriented output accumulator (Design Notes: "iodata accumulator →
/// builder"). Lines are collected and joined with `\n` once, at the end,
/// rather than concatenated on the hot path.
pub(crate) struct Writer {
    indent: usize,
    lines: Vec<String>,
}

impl Writer {
    pub(crate) fn new(indent: usize) -> Self {
        Writer {
            indent,
            lines: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, depth: usize, text: impl Into<String>) {
        let pad = " ".repeat(self.indent * depth);
        self.lines.push(format!("{pad}{}", text.into()));
    }

    pub(crate) fn into_string(self) -> String {
        self.lines.join("\n")
    }
}

/// Encodes a key, quoting it when it doesn't satisfy the bare-identifier
/// grammar (§4.B).
#[must_use]
pub(crate) fn encode_key(key: &str) -> String {
    if quoting::needs_quote_key(key) {
        quoting::quote(key)
    } else {
        key.to_string()
    }
}

/// Key order for an object's own entries (§4.E "Key ordering per entry path").
pub(crate) fn object_key_order(
    map: &ToonMap,
    path: &[String],
    opts: &EncodeOptions,
) -> Vec<String> {
    if let Some(KeyOrder::ByPath(by_path)) = &opts.key_order {
        if let Some(order) = by_path.get(path) {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut result: Vec<String> = order
                .iter()
                .filter(|k| map.contains_key(k))
                .cloned()
                .collect();
            for k in &result {
                seen.insert(k.as_str());
            }
            let mut rest: Vec<String> = map
                .keys()
                .filter(|k| !seen.contains(k.as_str()))
                .cloned()
                .collect();
            rest.sort();
            result.extend(rest);
            return result;
        }
    }
    if path.is_empty() {
        if let Some(KeyOrder::Flat(list)) = &opts.key_order {
            let list_set: HashSet<&str> = list.iter().map(String::as_str).collect();
            let map_set: HashSet<&str> = map.keys().map(String::as_str).collect();
            if list_set == map_set {
                return list.clone();
            }
        }
    }
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Field order for a tabular array's header/rows (§4.D): `key_order` is
/// used only when it covers every field exactly; otherwise lexicographic.
pub(crate) fn resolve_field_order(
    fields: &HashSet<String>,
    path: &[String],
    opts: &EncodeOptions,
) -> Vec<String> {
    if let Some(order) = &opts.key_order {
        let candidate: Option<&Vec<String>> = match order {
            KeyOrder::Flat(list) if path.is_empty() => Some(list),
            KeyOrder::ByPath(map) => map.get(path),
            _ => None,
        };
        if let Some(list) = candidate {
            let list_set: HashSet<&str> = list.iter().map(String::as_str).collect();
            let field_set: HashSet<&str> = fields.iter().map(String::as_str).collect();
            if list_set == field_set {
                return list.clone();
            }
        }
    }
    let mut sorted: Vec<String> = fields.iter().cloned().collect();
    sorted.sort();
    sorted
}

/// Returns the entries of `map` in the document order they should be
/// emitted in (folding already resolved), as `(key, value)` pairs.
pub(crate) fn ordered_entries<'a>(
    map: &'a ToonMap,
    path: &[String],
    opts: &EncodeOptions,
) -> Vec<(String, Cow<'a, Value>)> {
    let literal_dotted: HashSet<&str> = map
        .keys()
        .filter(|k| k.contains('.'))
        .map(String::as_str)
        .collect();

    let order = object_key_order(map, path, opts);
    order
        .into_iter()
        .map(|k| {
            let v = map.get(&k).expect("key_order returned a key not in map");
            fold_entry(&k, v, opts, &literal_dotted)
        })
        .collect()
}

/// Attempts to collapse `(key, value)` into a dotted chain per §4.E's
/// key-folding rule. Returns the original pair unchanged when folding is
/// off, not applicable, or suppressed by the collision guard.
fn fold_entry<'a>(
    key: &str,
    value: &'a Value,
    opts: &EncodeOptions,
    literal_dotted: &HashSet<&str>,
) -> (String, Cow<'a, Value>) {
    if opts.key_folding != KeyFolding::Safe {
        return (key.to_string(), Cow::Borrowed(value));
    }

    let mut segments = vec![key.to_string()];
    let mut current = value;
    loop {
        let Value::Obj(inner_map) = current else {
            break;
        };
        if inner_map.len() != 1 {
            break;
        }
        let (inner_key, inner_value) = inner_map.iter().next().unwrap();
        if !quoting::is_identifier(inner_key) {
            break;
        }
        if !opts.flatten_depth.allows(segments.len() + 1) {
            break;
        }
        segments.push(inner_key.clone());
        current = inner_value;
    }

    if segments.len() == 1 {
        return (key.to_string(), Cow::Borrowed(value));
    }

    let folded_key = segments.join(".");
    if literal_dotted.contains(folded_key.as_str()) {
        return (key.to_string(), Cow::Borrowed(value));
    }
    (folded_key, Cow::Borrowed(current))
}

/// Emits an object's entries at `depth`, recursing into nested objects and
/// delegating arrays to [`crate::array`].
pub(crate) fn encode_object(
    map: &ToonMap,
    path: &[String],
    depth: usize,
    opts: &EncodeOptions,
    writer: &mut Writer,
) -> EncodeResult<()> {
    for (key, value) in ordered_entries(map, path, opts) {
        encode_entry(&key, value.as_ref(), path, depth, opts, writer, "")?;
    }
    Ok(())
}

/// Emits one `(key, value)` entry. `prefix` is written immediately before
/// the entry's own first line — `""` for ordinary object entries, `"- "`
/// when this entry is the first field of a list-item object (§4.D).
pub(crate) fn encode_entry(
    key: &str,
    value: &Value,
    path: &[String],
    depth: usize,
    opts: &EncodeOptions,
    writer: &mut Writer,
    prefix: &str,
) -> EncodeResult<()> {
    let encoded_key = encode_key(key);
    match value {
        Value::List(items) => {
            array::encode_array(
                Some(&encoded_key),
                items,
                path_push(path, key),
                depth,
                opts,
                writer,
                prefix,
            )?;
        }
        Value::Obj(inner) if inner.is_empty() => {
            writer.push(depth, format!("{prefix}{encoded_key}:"));
        }
        Value::Obj(inner) => {
            writer.push(depth, format!("{prefix}{encoded_key}:"));
            encode_object(inner, &path_push(path, key), depth + 1, opts, writer)?;
        }
        primitive => {
            let rendered = crate::primitive::render_primitive(primitive, &opts.delimiter);
            writer.push(depth, format!("{prefix}{encoded_key}: {rendered}"));
        }
    }
    Ok(())
}

pub(crate) fn path_push(path: &[String], segment: &str) -> Vec<String> {
    let mut p = path.to_vec();
    p.push(segment.to_string());
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn key_folding_collapses_single_key_chain() {
        let opts = EncodeOptions::new().with_key_folding(KeyFolding::Safe);
        let v = value!({ "a": { "b": { "c": 1 } } });
        let map = v.as_obj().unwrap();
        let entries = ordered_entries(map, &[], &opts);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "a.b.c");
    }

    #[test]
    fn key_folding_off_by_default() {
        let opts = EncodeOptions::new();
        let v = value!({ "a": { "b": 1 } });
        let map = v.as_obj().unwrap();
        let entries = ordered_entries(map, &[], &opts);
        assert_eq!(entries[0].0, "a");
    }

    #[test]
    fn collision_guard_suppresses_folding() {
        let opts = EncodeOptions::new().with_key_folding(KeyFolding::Safe);
        let mut map = ToonMap::new();
        map.insert("a".into(), {
            let mut inner = ToonMap::new();
            inner.insert("b".into(), Value::Int(1));
            Value::Obj(inner)
        });
        map.insert("a.b".into(), Value::Int(2));
        let entries = ordered_entries(&map, &[], &opts);
        // "a.b" already exists as a literal key, so folding "a"->{"b":1} into
        // "a.b" would collide; folding is suppressed for that chain.
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"a"));
    }

    #[test]
    fn keys_sort_lexicographically_by_default() {
        let mut map = ToonMap::new();
        map.insert("z".into(), Value::Int(1));
        map.insert("a".into(), Value::Int(2));
        let order = object_key_order(&map, &[], &EncodeOptions::new());
        assert_eq!(order, vec!["a", "z"]);
    }
}
