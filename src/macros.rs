//! A `value!` macro for building [`crate::Value`] trees without the
//! `ToonMap`/`Value::from` boilerplate, in the spirit of `serde_json::json!`.
//!
//! ## Examples
//!
//! ```rust
//! use serde_toon::value;
//!
//! let v = value!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["admin", "developer"],
//! });
//!
//! assert_eq!(v.as_obj().unwrap().get("name").unwrap().as_str(), Some("Alice"));
//! ```

/// Builds a [`crate::Value`] from a JSON-like literal.
///
/// Array and object elements are matched as single token trees, so a
/// compound expression (anything other than a literal, a bracketed array,
/// or a braced object) must be parenthesized, e.g. `value!((1 + 1))`.
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([$($elem:tt),* $(,)?]) => {
        $crate::Value::List(vec![$($crate::value!($elem)),*])
    };
    ({$($key:tt : $val:tt),* $(,)?}) => {{
        let mut map = $crate::ToonMap::new();
        $(map.insert($crate::value!(@key $key), $crate::value!($val));)*
        $crate::Value::Obj(map)
    }};
    (@key $key:literal) => {
        $key.to_string()
    };
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
