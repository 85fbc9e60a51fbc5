//! Component A's entry point for native Rust types: a serde [`Serializer`]
//! that builds a [`crate::Value`] tree rather than text directly.
//!
//! TOON's layout rules (tabular vs. list vs. inline arrays, key ordering,
//! folding) all need the *whole* shape of a value before they can pick a
//! rendering — they can't be decided one field at a time while streaming
//! text out. So, unlike a textual serializer, this one never touches
//! strings: it hands back a `Value`, and [`crate::encode`] renders that tree
//! once construction is complete.
//!
//! ## Usage
//!
//! Most callers use [`crate::to_string`] or [`crate::to_value`] instead of
//! this module directly.
//!
//! ```rust
//! use serde_toon::to_value;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert!(value.is_obj());
//! ```

use crate::error::{EncodeError, EncodeResult};
use crate::normalize::normalize_f64;
use crate::{ToonMap, Value};
use serde::ser::{self, Serialize};

/// Converts a `T: Serialize` into a [`Value`] tree.
#[derive(Clone, Copy, Debug)]
pub struct Serializer;

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> EncodeResult<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> EncodeResult<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> EncodeResult<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> EncodeResult<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> EncodeResult<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> EncodeResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .or_else(|_| Ok(Value::Str(v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> EncodeResult<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> EncodeResult<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> EncodeResult<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> EncodeResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .or_else(|_| Ok(Value::Str(v.to_string())))
    }

    fn serialize_u128(self, v: u128) -> EncodeResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .or_else(|_| Ok(Value::Str(v.to_string())))
    }

    fn serialize_f32(self, v: f32) -> EncodeResult<Value> {
        Ok(normalize_f64(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> EncodeResult<Value> {
        Ok(normalize_f64(v))
    }

    fn serialize_char(self, v: char) -> EncodeResult<Value> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> EncodeResult<Value> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> EncodeResult<Value> {
        Ok(Value::List(v.iter().map(|&b| Value::Int(i64::from(b))).collect()))
    }

    fn serialize_none(self) -> EncodeResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> EncodeResult<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> EncodeResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> EncodeResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> EncodeResult<Value> {
        Ok(Value::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> EncodeResult<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> EncodeResult<Value> {
        let mut map = ToonMap::new();
        map.insert(variant.to_string(), value.serialize(self)?);
        Ok(Value::Obj(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> EncodeResult<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> EncodeResult<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> EncodeResult<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> EncodeResult<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> EncodeResult<SerializeMap> {
        Ok(SerializeMap {
            map: ToonMap::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> EncodeResult<SerializeMap> {
        Ok(SerializeMap {
            map: ToonMap::with_capacity(len),
            next_key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> EncodeResult<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: ToonMap::with_capacity(len),
        })
    }

    fn is_human_readable(&self) -> bool {
        true
    }
}

/// Renders a serialized map key (which may be any scalar `Serialize` type,
/// not only `String`) down to the `String` a [`ToonMap`] key requires.
fn value_to_key(value: Value) -> EncodeResult<String> {
    match value {
        Value::Str(s) => Ok(s),
        Value::Int(i) => Ok(i.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(EncodeError::unsupported_value("map keys must be scalar", other)),
    }
}

#[doc(hidden)]
pub struct SerializeVec {
    vec: Vec<Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> EncodeResult<()> {
        self.vec.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> EncodeResult<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> EncodeResult<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> EncodeResult<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> EncodeResult<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> EncodeResult<Value> {
        ser::SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> EncodeResult<()> {
        self.vec.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> EncodeResult<Value> {
        let mut map = ToonMap::new();
        map.insert(self.variant.to_string(), Value::List(self.vec));
        Ok(Value::Obj(map))
    }
}

#[doc(hidden)]
pub struct SerializeMap {
    map: ToonMap,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> EncodeResult<()> {
        let key = value_to_key(key.serialize(Serializer)?)?;
        self.next_key = Some(key);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> EncodeResult<()> {
        let key = self
            .next_key
            .take()
            .expect("serialize_value called before serialize_key");
        self.map.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> EncodeResult<Value> {
        Ok(Value::Obj(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> EncodeResult<()> {
        self.map.insert(key.to_string(), value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> EncodeResult<Value> {
        Ok(Value::Obj(self.map))
    }
}

#[doc(hidden)]
pub struct SerializeStructVariant {
    variant: &'static str,
    map: ToonMap,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> EncodeResult<()> {
        self.map.insert(key.to_string(), value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> EncodeResult<Value> {
        let mut outer = ToonMap::new();
        outer.insert(self.variant.to_string(), Value::Obj(self.map));
        Ok(Value::Obj(outer))
    }
}
