//! Component D — array format selection and rendering: empty, inline,
//! tabular, and list forms.

use crate::error::EncodeResult;
use crate::object::{self, Writer};
use crate::options::EncodeOptions;
use crate::primitive;
use crate::Value;
use std::collections::HashSet;

enum Format {
    Empty,
    Inline,
    Tabular(Vec<String>),
    List,
}

fn select_format(items: &[Value], path: &[String], opts: &EncodeOptions) -> Format {
    if items.is_empty() {
        return Format::Empty;
    }
    if items.iter().all(Value::is_primitive) {
        return Format::Inline;
    }
    if let Some(fields) = tabular_fields(items, path, opts) {
        return Format::Tabular(fields);
    }
    Format::List
}

/// All elements must be objects sharing exactly the same key set (order
/// insensitive) with every value in every row primitive.
fn tabular_fields(items: &[Value], path: &[String], opts: &EncodeOptions) -> Option<Vec<String>> {
    let mut field_set: Option<HashSet<String>> = None;
    for item in items {
        let obj = item.as_obj()?;
        if !obj.values().all(Value::is_primitive) {
            return None;
        }
        let keys: HashSet<String> = obj.keys().cloned().collect();
        match &field_set {
            None => field_set = Some(keys),
            Some(existing) if existing == &keys => {}
            Some(_) => return None,
        }
    }
    let field_set = field_set?;
    if field_set.is_empty() {
        return None;
    }
    Some(object::resolve_field_order(&field_set, path, opts))
}

fn header_base(key: Option<&str>, n: usize, opts: &EncodeOptions) -> String {
    let marker = opts
        .length_marker
        .map(|c| c.to_string())
        .unwrap_or_default();
    let delim_marker = opts.delimiter.header_marker();
    let key_part = key.unwrap_or("");
    format!("{key_part}[{marker}{n}{delim_marker}]")
}

/// Renders `items` (the value of `key`, or the document root when `key` is
/// `None`) into `writer` at `depth`. `prefix` is written immediately before
/// the header line only — `"- "` when this array is itself a list item or
/// a list item's first field, `""` otherwise.
pub(crate) fn encode_array(
    key: Option<&str>,
    items: &[Value],
    path: Vec<String>,
    depth: usize,
    opts: &EncodeOptions,
    writer: &mut Writer,
    prefix: &str,
) -> EncodeResult<()> {
    let base = header_base(key, items.len(), opts);
    match select_format(items, &path, opts) {
        Format::Empty => {
            writer.push(depth, format!("{prefix}{base}:"));
        }
        Format::Inline => {
            let delim = opts.delimiter.as_str();
            let rendered: Vec<String> = items
                .iter()
                .map(|v| primitive::render_primitive(v, &opts.delimiter))
                .collect();
            writer.push(depth, format!("{prefix}{base}: {}", rendered.join(delim)));
        }
        Format::Tabular(fields) => {
            let delim = opts.delimiter.as_str();
            writer.push(
                depth,
                format!("{prefix}{base}{{{}}}:", fields.join(delim)),
            );
            for item in items {
                let obj = item.as_obj().expect("tabular format guarantees Obj rows");
                let row: Vec<String> = fields
                    .iter()
                    .map(|f| {
                        let v = obj.get(f).expect("tabular format guarantees shared fields");
                        primitive::render_primitive(v, &opts.delimiter)
                    })
                    .collect();
                writer.push(depth + 1, row.join(delim));
            }
        }
        Format::List => {
            writer.push(depth, format!("{prefix}{base}:"));
            for item in items {
                encode_list_item(item, &path, depth + 1, opts, writer)?;
            }
        }
    }
    Ok(())
}

fn encode_list_item(
    item: &Value,
    path: &[String],
    depth: usize,
    opts: &EncodeOptions,
    writer: &mut Writer,
) -> EncodeResult<()> {
    match item {
        Value::Obj(map) if map.is_empty() => {
            writer.push(depth, "-");
        }
        Value::Obj(map) => {
            let entries = object::ordered_entries(map, path, opts);
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i == 0 {
                    object::encode_entry(&key, value.as_ref(), path, depth, opts, writer, "- ")?;
                } else {
                    object::encode_entry(&key, value.as_ref(), path, depth + 1, opts, writer, "")?;
                }
            }
        }
        Value::List(items) => {
            encode_array(None, items, path.to_vec(), depth, opts, writer, "- ")?;
        }
        primitive_value => {
            let rendered = primitive::render_primitive(primitive_value, &opts.delimiter);
            writer.push(depth, format!("- {rendered}"));
        }
    }
    Ok(())
}
