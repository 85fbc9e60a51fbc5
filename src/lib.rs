//! # serde_toon
//!
//! A Serde-compatible codec for TOON (Token-Oriented Object Notation), a
//! compact, indentation-based text format optimized for token efficiency
//! when feeding structured data to large language models.
//!
//! ## Key Features
//!
//! - **Token-efficient**: no braces, brackets, or redundant quoting for the
//!   common case; homogeneous object arrays compress into tables.
//! - **Serde compatible**: works with any `#[derive(Serialize, Deserialize)]`
//!   type via [`to_string`]/[`from_str`], or with the dynamic [`Value`] tree
//!   directly.
//! - **Round-trip defined**: `decode(encode(v, o), o')` equals `v` when `o'`
//!   agrees with `o` (same delimiter, matching indent step, strict decoding,
//!   key folding off) — see [`spec`] for the full format.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_toon::{to_string, from_str};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let toon = to_string(&user).unwrap();
//! assert_eq!(toon, "active: true\nid: 123\nname: Alice");
//!
//! let user_back: User = from_str(&toon).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ## Tabular Arrays
//!
//! Arrays of homogeneous, all-primitive-valued objects automatically
//! serialize as a table with one shared header:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_toon::to_string;
//!
//! #[derive(Serialize)]
//! struct Product { id: u32, name: String }
//!
//! let products = vec![
//!     Product { id: 1, name: "Widget".to_string() },
//!     Product { id: 2, name: "Gadget".to_string() },
//! ];
//!
//! let toon = to_string(&products).unwrap();
//! assert_eq!(toon, "[2]{id,name}:\n  1,Widget\n  2,Gadget");
//! ```
//!
//! ## Dynamic Values with the `value!` Macro
//!
//! ```rust
//! use serde_toon::{value, Value};
//!
//! let data = value!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde", "llm"]
//! });
//!
//! if let Value::Obj(obj) = data {
//!     assert_eq!(obj.get("name").and_then(Value::as_str), Some("Alice"));
//! }
//! ```
//!
//! ## Custom Options
//!
//! ```rust
//! use serde_toon::{to_string_with_options, EncodeOptions, Delimiter};
//!
//! let rows = vec![(1, "a"), (2, "b")];
//! let opts = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
//! let toon = to_string_with_options(&rows, &opts).unwrap();
//! assert_eq!(toon, "[2|]:\n  - [2|]: 1|a\n  - [2|]: 2|b");
//! ```
//!
//! See [`spec`] for the complete wire format and [`demos/`](https://github.com)
//! for runnable walkthroughs (`cargo run --example <name>`).

pub mod array;
pub mod de;
pub mod decoder;
pub mod error;
pub mod macros;
pub mod map;
pub mod normalize;
pub mod object;
pub mod options;
pub mod primitive;
pub mod quoting;
pub mod ser;
pub mod spec;
pub mod telemetry;
pub mod value;

pub use de::Deserializer;
pub use error::{DecodeError, DecodeErrorKind, DecodeResult, EncodeError, EncodeResult};
pub use map::ToonMap;
pub use options::{
    Delimiter, DecodeOptions, EncodeOptions, ExpandPaths, FlattenDepth, KeyFolding, KeyOrder,
    KeysPolicy,
};
pub use ser::Serializer;
pub use telemetry::{TelemetryEvent, TelemetryHook, TelemetryPoint};
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::io;
use std::time::Instant;

/// Renders an already-built [`Value`] tree to TOON text (the encode half of
/// §6's public operations). Serde users normally reach this through
/// [`to_string`]/[`to_string_with_options`] instead.
///
/// # Errors
///
/// Returns [`EncodeError`] if `opts` fails validation or the tree contains a
/// value that has no rendering (none do today — this is here for future
/// adapter-driven failure modes per §4.A).
pub fn encode(value: &Value, opts: &EncodeOptions) -> EncodeResult<String> {
    encode_with_hook(value, opts, None)
}

fn encode_with_hook(
    value: &Value,
    opts: &EncodeOptions,
    hook: Option<&dyn TelemetryHook>,
) -> EncodeResult<String> {
    opts.validate()?;
    emit_telemetry(hook, TelemetryPoint::EncodeStart, None, None, "Value");

    let start = Instant::now();
    let normalized = normalize::normalize(value.clone());
    let result = encode_normalized(&normalized, opts);

    match &result {
        Ok(text) => emit_telemetry(
            hook,
            TelemetryPoint::EncodeStop,
            Some(start.elapsed()),
            Some(text.len()),
            "Value",
        ),
        Err(_) => emit_telemetry(
            hook,
            TelemetryPoint::EncodeException,
            Some(start.elapsed()),
            None,
            "Value",
        ),
    }
    result
}

fn encode_normalized(value: &Value, opts: &EncodeOptions) -> EncodeResult<String> {
    let mut writer = object::Writer::new(opts.indent);
    match value {
        Value::List(items) => {
            array::encode_array(None, items, Vec::new(), 0, opts, &mut writer, "")?;
        }
        Value::Obj(map) => {
            object::encode_object(map, &[], 0, opts, &mut writer)?;
        }
        primitive => {
            writer.push(0, primitive::render_primitive(primitive, &opts.delimiter));
        }
    }
    Ok(writer.into_string())
}

/// Parses TOON text into a [`Value`] tree (the decode half of §6's public
/// operations). Serde users normally reach this through
/// [`from_str`]/`from_reader`/`from_slice` instead.
///
/// # Errors
///
/// Returns [`DecodeError`] on any grammar violation — the decoder never
/// attempts partial recovery (§4.F).
pub fn decode(text: &str, opts: &DecodeOptions) -> DecodeResult<Value> {
    decode_with_hook(text, opts, None)
}

fn decode_with_hook(
    text: &str,
    opts: &DecodeOptions,
    hook: Option<&dyn TelemetryHook>,
) -> DecodeResult<Value> {
    opts.validate()?;
    emit_telemetry(hook, TelemetryPoint::DecodeStart, None, None, "Value");

    let start = Instant::now();
    let result = decoder::decode(text, opts);

    match &result {
        Ok(_) => emit_telemetry(
            hook,
            TelemetryPoint::DecodeStop,
            Some(start.elapsed()),
            Some(text.len()),
            "Value",
        ),
        Err(_) => emit_telemetry(
            hook,
            TelemetryPoint::DecodeException,
            Some(start.elapsed()),
            None,
            "Value",
        ),
    }
    result
}

fn emit_telemetry(
    hook: Option<&dyn TelemetryHook>,
    point: TelemetryPoint,
    duration: Option<std::time::Duration>,
    size: Option<usize>,
    data_type: &'static str,
) {
    if let Some(hook) = hook {
        hook.on_event(&TelemetryEvent {
            point,
            duration,
            size,
            data_type,
        });
    }
}

/// Serialize any `T: Serialize` to a TOON string using default options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> EncodeResult<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &EncodeOptions::new())
}

/// Serialize any `T: Serialize` to a TOON string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_toon::{to_string_with_options, EncodeOptions, Delimiter};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// let options = EncodeOptions::new()
///     .with_delimiter(Delimiter::Tab)
///     .with_length_marker('#');
/// let toon = to_string_with_options(&point, &options).unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &EncodeOptions) -> EncodeResult<String>
where
    T: ?Sized + Serialize,
{
    let tree = value.serialize(Serializer)?;
    encode(&tree, options)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// Useful for working with TOON data dynamically when the structure isn't
/// known at compile time.
///
/// # Examples
///
/// ```rust
/// use serde_toon::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// let value: Value = to_value(&point).unwrap();
/// assert!(value.is_obj());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> EncodeResult<Value>
where
    T: ?Sized + Serialize,
{
    let tree = value.serialize(Serializer)?;
    Ok(normalize::normalize(tree))
}

/// Serialize any `T: Serialize` to a writer in TOON format using default options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> EncodeResult<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &EncodeOptions::new())
}

/// Serialize any `T: Serialize` to a writer in TOON format with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(
    mut writer: W,
    value: &T,
    options: &EncodeOptions,
) -> EncodeResult<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| EncodeError::invalid_options(e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of TOON text, using
/// default decode options.
///
/// # Examples
///
/// ```rust
/// use serde_toon::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let toon = "x: 1\ny: 2";
/// let point: Point = from_str(toon).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid TOON, or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(s: &'a str) -> DecodeResult<T>
where
    T: Deserialize<'a>,
{
    from_str_with_options(s, &DecodeOptions::new())
}

/// Deserialize an instance of type `T` from a string of TOON text with
/// custom decode options.
///
/// # Errors
///
/// Returns an error if the input is not valid TOON, or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<'a, T>(s: &'a str, options: &DecodeOptions) -> DecodeResult<T>
where
    T: Deserialize<'a>,
{
    let value = decode(s, options)?;
    let de = Deserializer::from_value(value);
    T::deserialize(de)
}

/// Deserialize an instance of type `T` from a [`Value`] tree already decoded
/// or built by hand.
///
/// # Errors
///
/// Returns an error if the `Value` shape doesn't match type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> DecodeResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(Deserializer::from_value(value))
}

/// Deserialize an instance of type `T` from an I/O stream of TOON.
///
/// # Examples
///
/// ```rust
/// use serde_toon::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let toon_bytes = b"x: 1\ny: 2";
/// let cursor = Cursor::new(toon_bytes);
/// let point: Point = from_reader(cursor).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not
/// valid TOON, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> DecodeResult<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| DecodeError::new(DecodeErrorKind::ParseFailure, 0, e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of TOON text.
///
/// # Examples
///
/// ```rust
/// use serde_toon::from_slice;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let toon_bytes = b"x: 1\ny: 2";
/// let point: Point = from_slice(toon_bytes).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid TOON, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> DecodeResult<T>
where
    T: Deserialize<'a>,
{
    let s = std::str::from_utf8(v)
        .map_err(|e| DecodeError::new(DecodeErrorKind::ParseFailure, 0, e.to_string()))?;
    from_str(s)
}

/// Serialize with a [`TelemetryHook`] invoked at `encode.start`/`encode.stop`/
/// `encode.exception` (§5).
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_telemetry<T>(
    value: &T,
    options: &EncodeOptions,
    hook: &dyn TelemetryHook,
) -> EncodeResult<String>
where
    T: ?Sized + Serialize,
{
    let tree = value.serialize(Serializer)?;
    encode_with_hook(&tree, options, Some(hook))
}

/// Deserialize with a [`TelemetryHook`] invoked at `decode.start`/`decode.stop`/
/// `decode.exception` (§5).
///
/// # Errors
///
/// Returns an error if the input is not valid TOON, or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_telemetry<'a, T>(
    s: &'a str,
    options: &DecodeOptions,
    hook: &dyn TelemetryHook,
) -> DecodeResult<T>
where
    T: Deserialize<'a>,
{
    let value = decode_with_hook(s, options, Some(hook))?;
    T::deserialize(Deserializer::from_value(value))
}
