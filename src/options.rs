//! Configuration options for TOON encoding and decoding.
//!
//! Encode and decode each take their own options record, matching the data
//! model's two independent configuration surfaces:
//!
//! - [`EncodeOptions`]: indentation, delimiter, length marker, key ordering
//!   and folding.
//! - [`DecodeOptions`]: strictness, expected indent size, key-type policy,
//!   path expansion.
//! - [`Delimiter`]: the array/table delimiter shared by both directions.
//!
//! ## Examples
//!
//! ```rust
//! use serde_toon::{EncodeOptions, Delimiter, to_string_with_options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let data = Data { x: 1, y: 2 };
//!
//! let options = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
//! let toon = to_string_with_options(&data, &options).unwrap();
//!
//! let options = EncodeOptions::new().with_length_marker('#');
//! let toon = to_string_with_options(&vec![1, 2, 3], &options).unwrap();
//! assert_eq!(toon, "[#3]: 1,2,3");
//! ```

use crate::error::{EncodeError, EncodeResult};
use std::collections::HashMap;

/// Delimiter choice for TOON arrays and tables.
///
/// - **Comma**: default, most compact.
/// - **Tab**: best for TSV-like output.
/// - **Pipe**: readable for markdown-style tables.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the literal character this delimiter renders as.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// The marker placed inside `[N<marker>]` for this delimiter — empty
    /// for comma, since comma is the implicit default (§4.D header syntax).
    #[must_use]
    pub const fn header_marker(&self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }
}

/// Ordering applied to an object's keys at encode time.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyOrder {
    /// An explicit key order, applied at the document root only, and only
    /// when it covers every root key exactly.
    Flat(Vec<String>),
    /// A mapping from path (list of key segments from the document root) to
    /// the key order to use for the object found at that path.
    ByPath(HashMap<Vec<String>, Vec<String>>),
}

/// Key-folding mode: whether single-key object chains collapse into dotted
/// paths (`a.b.c: 1` instead of three nested objects).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyFolding {
    #[default]
    Off,
    Safe,
}

/// Upper bound on how many segments a folded key chain may collapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlattenDepth {
    Finite(usize),
    Infinity,
}

impl Default for FlattenDepth {
    fn default() -> Self {
        FlattenDepth::Infinity
    }
}

impl FlattenDepth {
    #[must_use]
    pub const fn allows(self, segments: usize) -> bool {
        match self {
            FlattenDepth::Finite(n) => segments <= n,
            FlattenDepth::Infinity => true,
        }
    }
}

/// Configuration for [`crate::encode`] and the serde `to_*` convenience functions.
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    pub indent: usize,
    pub delimiter: Delimiter,
    pub length_marker: Option<char>,
    pub key_order: Option<KeyOrder>,
    pub key_folding: KeyFolding,
    pub flatten_depth: FlattenDepth,
}

impl EncodeOptions {
    /// Default options: 2-space indent, comma delimiter, no length marker,
    /// lexicographic key order, folding off.
    #[must_use]
    pub fn new() -> Self {
        EncodeOptions {
            indent: 2,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_length_marker(mut self, marker: char) -> Self {
        self.length_marker = Some(marker);
        self
    }

    #[must_use]
    pub fn with_key_order(mut self, order: KeyOrder) -> Self {
        self.key_order = Some(order);
        self
    }

    #[must_use]
    pub fn with_key_folding(mut self, folding: KeyFolding) -> Self {
        self.key_folding = folding;
        self
    }

    #[must_use]
    pub fn with_flatten_depth(mut self, depth: FlattenDepth) -> Self {
        self.flatten_depth = depth;
        self
    }

    /// Validates the numeric/enum constraints the option-validator contract
    /// names (unknown fields are rejected by the type system itself, since
    /// this isn't a dynamically-typed options bag).
    pub fn validate(&self) -> EncodeResult<()> {
        if self.indent == 0 {
            return Err(EncodeError::invalid_options("indent must be positive"));
        }
        if let FlattenDepth::Finite(0) = self.flatten_depth {
            if self.key_folding == KeyFolding::Safe {
                return Err(EncodeError::invalid_options(
                    "flatten_depth of 0 disables folding; use KeyFolding::Off instead",
                ));
            }
        }
        Ok(())
    }
}

/// How unquoted object keys decode: only `Strings` carries functional
/// behavior in a statically-typed port; the others are an alias policy for
/// symbol-like key types in dynamically-typed hosts and are accepted for
/// interface parity but behave identically to `Strings` here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeysPolicy {
    #[default]
    Strings,
    Atoms,
    AtomsExisting,
}

/// Whether unquoted dotted keys expand into nested objects at decode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExpandPaths {
    #[default]
    Off,
    Safe,
}

/// Configuration for [`crate::decode`] and the serde `from_*` convenience functions.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    pub keys: KeysPolicy,
    pub strict: bool,
    pub indent_size: usize,
    pub expand_paths: ExpandPaths,
    /// Accept a legacy `[#N]`-style length marker in headers even though
    /// encoders default to emitting none. Off by default.
    pub accept_legacy_length_marker: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            keys: KeysPolicy::default(),
            strict: true,
            indent_size: 2,
            expand_paths: ExpandPaths::default(),
            accept_legacy_length_marker: false,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    #[must_use]
    pub fn with_expand_paths(mut self, expand_paths: ExpandPaths) -> Self {
        self.expand_paths = expand_paths;
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: KeysPolicy) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub fn accept_legacy_length_marker(mut self, accept: bool) -> Self {
        self.accept_legacy_length_marker = accept;
        self
    }

    pub fn validate(&self) -> crate::error::DecodeResult<()> {
        if self.indent_size == 0 {
            return Err(crate::error::DecodeError::new(
                crate::error::DecodeErrorKind::InvalidOptions,
                0,
                "indent_size must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_options_defaults() {
        let opts = EncodeOptions::new();
        assert_eq!(opts.indent, 2);
        assert_eq!(opts.delimiter, Delimiter::Comma);
        assert_eq!(opts.key_folding, KeyFolding::Off);
    }

    #[test]
    fn encode_options_rejects_zero_indent() {
        let opts = EncodeOptions::new().with_indent(0);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn decode_options_defaults() {
        let opts = DecodeOptions::new();
        assert!(opts.strict);
        assert_eq!(opts.indent_size, 2);
        assert_eq!(opts.expand_paths, ExpandPaths::Off);
        assert!(!opts.accept_legacy_length_marker);
    }

    #[test]
    fn flatten_depth_allows() {
        assert!(FlattenDepth::Infinity.allows(1000));
        assert!(FlattenDepth::Finite(2).allows(2));
        assert!(!FlattenDepth::Finite(2).allows(3));
    }
}
