//! TOON Format Specification
//!
//! This module documents the TOON (Token-Oriented Object Notation) format as
//! implemented by this crate.
//!
//! # Overview
//!
//! TOON is a compact, indentation-based text serialization format optimized
//! for token efficiency when feeding structured data to large language
//! models. The codec is round-trip compatible: for any normalized value `v`,
//! `decode(encode(v, o), o')` equals `v` when the decode options agree with
//! the encode options (same delimiter, matching indent step, strict mode,
//! key folding off).
//!
//! ## Design Philosophy
//!
//! - **Token efficiency**: no braces, brackets, or redundant quoting for the
//!   common case.
//! - **Readability**: structure is carried by indentation and a small set of
//!   header forms, not by escaping.
//! - **Structural typing**: arrays of uniform objects compress into a table
//!   with one shared header instead of repeating keys per row.
//!
//! # Core Syntax
//!
//! ## Objects
//!
//! Objects are newline-delimited `key: value` entries:
//!
//! ```text
//! name: Alice
//! age: 30
//! active: true
//! ```
//!
//! **Rules**:
//! - Keys must match the identifier pattern `^[A-Za-z_][A-Za-z0-9_.]*$` or be
//!   quoted. Keys starting with a digit, containing a hyphen, or containing
//!   whitespace must be quoted: `"2ndPlace"`, `"user-id"`.
//! - Nested objects are indented one step (default 2 spaces) past their key.
//! - Field order: keys appear in the order selected by `key_order` when
//!   configured for the current path; otherwise entries are sorted
//!   lexicographically. This is deterministic but is not always the original
//!   struct field order.
//!
//! ## Primitives
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Null | `null` | `value: null` |
//! | Boolean | `true` or `false` | `active: true` |
//! | Integer | Decimal digits, optional `-` | `count: 42` |
//! | Float | Decimal with `.`, `e`, or `E` | `price: 19.99` |
//! | String | Unquoted or `"quoted"` | `name: Alice` |
//!
//! Non-finite floats (`NaN`, `+Infinity`, `-Infinity`) have no literal input
//! syntax; they only ever appear as *encoder output*, where they normalize to
//! `null` (see "Type Conversions" below). `-0.0` normalizes to the integer
//! `0`. Types with no native TOON representation — dates, arbitrary-precision
//! integers, and similar — are not special primitives of the format; they
//! encode however their own `Serialize` implementation projects them, which
//! is ordinarily a plain string.
//!
//! ## Strings
//!
//! Strings are **unquoted by default** to minimize tokens. A string or key
//! must be quoted when any of the following holds:
//!
//! - it is empty, or begins/ends with whitespace;
//! - it matches a reserved word: `true`, `false`, `null`;
//! - it parses cleanly as a number (e.g. `"42"`, `"-3.14"`, `"1e-6"`);
//! - it contains a structural character: `:` `,` `\t` `|` `{` `}` `[` `]` `"`
//!   `\n` `\r`;
//! - it contains a control character (U+0000–U+001F or U+007F);
//! - it starts with `-` (would be confused with a list-item marker);
//! - it contains the active delimiter for the current context.
//!
//! Only the active delimiter forces quoting on that account; the other two
//! delimiter characters are otherwise unremarkable.
//!
//! **Examples**:
//! ```text
//! name: Alice          // unquoted (safe)
//! note: hello world    // unquoted (inner spaces are fine)
//! data: "hello,world"  // quoted (contains the active comma delimiter)
//! flag: "true"         // quoted (reserved word)
//! id: "42"             // quoted (parses as a number)
//! ```
//!
//! **Escape sequences** (quoted strings only — these five, no others):
//! ```text
//! \\  - backslash
//! \"  - quote
//! \n  - newline
//! \r  - carriage return
//! \t  - tab
//! ```
//! Any other backslash sequence in a quoted string is a decode error.
//!
//! # Type Conversions
//!
//! | Input | TOON output | Notes |
//! |-------|-------------|-------|
//! | Finite number | Decimal notation | No scientific notation on output; `-0.0` becomes `0` |
//! | `NaN`, `±Infinity` | `null` | Non-finite floats always normalize to `null` |
//! | Integer-valued float (e.g. `3.0`) | Bare integer | `3`, not `3.0` |
//! | A type with a registered normalization adapter | Whatever the adapter projects, then normalized again | May itself become a string, a nested object, or anything else |
//!
//! # Array Formats
//!
//! The encoder picks one of four forms per array, in this order:
//!
//! 1. Empty → the **empty** form.
//! 2. Every element primitive → the **inline** form.
//! 3. Every element an object, all sharing the same key set, every value in
//!    every row primitive → the **tabular** form.
//! 4. Otherwise → the **list** form.
//!
//! ## Header syntax
//!
//! Let `N` be the element count, `MARK` the configured length marker (empty
//! by default), and `D` the delimiter marker: empty for comma, `\t` for tab,
//! `|` for pipe.
//!
//! ```text
//! <key>[<MARK><N><D>]:                          // empty / list
//! <key>[<MARK><N><D>]: v1<delim>v2<delim>...     // inline
//! <key>[<MARK><N><D>]{f1<delim>f2<delim>...}:    // tabular header
//!   v1<delim>v2<delim>...                        // one row per item
//! ```
//!
//! Root arrays omit `<key>`. Tabular field order follows `key_order` when it
//! covers every field exactly; otherwise fields are sorted lexicographically.
//!
//! ## Inline arrays
//!
//! ```text
//! tags[2]: elixir,toon
//! [3]: 1,2,3
//! ```
//!
//! ## Tabular arrays
//!
//! TOON's signature compression: homogeneous, all-primitive-valued objects
//! share one header instead of repeating keys per row.
//!
//! ```text
//! users[2]{id,name}:
//!   1,Alice
//!   2,Bob
//! ```
//!
//! ## List arrays
//!
//! For heterogeneous or nested contents, each element is introduced by `- `:
//!
//! ```text
//! items[2]:
//!   - name: Alice
//!     tags[2]: admin,user
//!   - name: Bob
//!     tags[1]: user
//! ```
//!
//! A primitive element renders as `- <value>`; a completely empty object
//! renders as a bare `-`; the first field of an object element shares the
//! `- ` line, and every subsequent field of that same element is indented one
//! step further with no marker.
//!
//! # Delimiters
//!
//! | Delimiter | Character | Header marker |
//! |-----------|-----------|----------------|
//! | Comma (default) | `,` | none |
//! | Tab | `\t` | `\t` inside the brackets |
//! | Pipe | `\|` | `\|` inside the brackets |
//!
//! For an inline array, the delimiter active inside a given value span is
//! whatever the header declared; the decoder additionally falls back from a
//! declared comma to tab if the value text contains a tab and no comma, to
//! tolerate a common TSV-paste case.
//!
//! # Length Markers
//!
//! An optional literal placed just inside the header brackets, ahead of the
//! digits, e.g. `#` → `[#3]: 1,2,3`. Encoders emit no marker unless
//! configured with one. Decoders only accept a marker when
//! `accept_legacy_length_marker` is explicitly set — it exists purely for
//! reading documents produced by an older marker-emitting configuration.
//!
//! # Key Folding and Path Expansion
//!
//! With `key_folding: "safe"`, an entry `(k, v)` where `v` is a single-key
//! object whose inner key is itself identifier-safe may collapse into one
//! dotted entry, recursively, up to `flatten_depth` segments:
//!
//! ```text
//! a.b.c: 1
//! ```
//!
//! Folding stops when the inner value is no longer a single-key object, a
//! segment fails the identifier check, or the depth budget is exhausted.
//! Quoted keys never fold. If a literal key containing a dot already exists
//! at the same level a fold would produce, folding is suppressed for that
//! chain to avoid an ambiguous collision.
//!
//! `expand_paths: "safe"` is the decode-side inverse: an unquoted key with
//! two or more dot-separated identifier-safe segments expands into nested
//! objects. Quoted dotted keys are left alone. Conflicts are fatal under
//! `strict`; otherwise later values win, deep-merging into earlier objects.
//!
//! # Indentation
//!
//! - Default: 2 spaces per nesting level (`indent` to encode, `indent_size`
//!   to decode).
//! - In strict decode mode, tab characters inside the indentation region and
//!   indents that aren't a multiple of `indent_size` are both fatal.
//!
//! # Edge Cases
//!
//! Empty array inside an object:
//! ```text
//! empty_array[0]:
//! ```
//!
//! Empty object (key with nothing indented below it):
//! ```text
//! empty_object:
//! ```
//!
//! Root-level empty array:
//! ```text
//! [0]:
//! ```
//!
//! # Rust Enum Representation
//!
//! This is an implementation detail of the Rust binding, not part of the
//! wire format's grammar:
//!
//! - Unit variants serialize as a bare string: `status: Active`.
//! - Newtype, tuple, and struct variants serialize as a single-key object
//!   whose one key is the variant name and whose value is the payload
//!   (a scalar, a list, or a nested object respectively).
//!
//! # Limitations
//!
//! - Object keys must be strings; non-string map keys are stringified.
//! - Tabular arrays require an identical key set and all-primitive values
//!   across every element; anything else falls back to the list form.
//! - Field order is either the configured `key_order` or a lexicographic
//!   fallback — never "whatever order the struct declared its fields in".
//! - The format has no comment syntax.
