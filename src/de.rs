//! A serde [`Deserializer`] over an already-decoded [`crate::Value`] tree.
//!
//! [`crate::decoder`] turns TOON text into a `Value`; this module is the
//! second half of the `from_str`/`from_value` path, turning that `Value`
//! into any `T: Deserialize`. The pattern mirrors `serde_json`'s `Value`
//! deserializer: consume the tree by value, delegate most primitive hints
//! straight to `deserialize_any`, and implement `option`/`enum` by hand
//! since those need to inspect the `Value` shape to decide what to do.

use crate::error::{DecodeError, DecodeErrorKind, DecodeResult};
use crate::{ToonMap, Value};
use serde::de::{self, IntoDeserializer, Visitor};

/// Deserializes a `T: Deserialize` from an owned [`Value`].
pub struct Deserializer {
    value: Value,
}

impl Deserializer {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Deserializer { value }
    }
}

fn type_error(expected: &str, found: &Value) -> DecodeError {
    DecodeError::new(
        DecodeErrorKind::ParseFailure,
        0,
        format!("expected {expected}, found {found:?}"),
    )
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> DecodeResult<V::Value> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Str(s) => visitor.visit_string(s),
            Value::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Value::Obj(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> DecodeResult<V::Value> {
        match self.value {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(Deserializer::from_value(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> DecodeResult<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> DecodeResult<V::Value> {
        match self.value {
            Value::Str(s) => visitor.visit_enum(EnumDeserializer {
                variant: s,
                value: None,
            }),
            Value::Obj(map) if map.len() == 1 => {
                let (variant, value) = map.into_iter().next().expect("len == 1");
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                })
            }
            other => Err(type_error("a unit variant or single-key object", &other)),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer { iter: vec.into_iter() }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = DecodeError;

    fn next_element_seed<T: de::DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> DecodeResult<Option<T::Value>> {
        match self.iter.next() {
            Some(v) => seed.deserialize(Deserializer::from_value(v)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        let (lower, upper) = self.iter.size_hint();
        upper.or(Some(lower))
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ToonMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = DecodeError;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> DecodeResult<Option<K::Value>> {
        match self.iter.next() {
            Some((k, v)) => {
                self.value = Some(v);
                seed.deserialize(k.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: de::DeserializeSeed<'de>>(&mut self, seed: V) -> DecodeResult<V::Value> {
        let value = self
            .value
            .take()
            .expect("next_value_seed called before next_key_seed");
        seed.deserialize(Deserializer::from_value(value))
    }

    fn size_hint(&self) -> Option<usize> {
        let (lower, upper) = self.iter.size_hint();
        upper.or(Some(lower))
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = DecodeError;
    type Variant = VariantDeserializer;

    fn variant_seed<V: de::DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> DecodeResult<(V::Value, VariantDeserializer)> {
        let variant = seed.deserialize(self.variant.into_deserializer())?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = DecodeError;

    fn unit_variant(self) -> DecodeResult<()> {
        match self.value {
            None => Ok(()),
            Some(other) => Err(type_error("a unit variant", &other)),
        }
    }

    fn newtype_variant_seed<T: de::DeserializeSeed<'de>>(self, seed: T) -> DecodeResult<T::Value> {
        match self.value {
            Some(v) => seed.deserialize(Deserializer::from_value(v)),
            None => Err(DecodeError::new(
                DecodeErrorKind::ParseFailure,
                0,
                "expected a newtype variant payload",
            )),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> DecodeResult<V::Value> {
        match self.value {
            Some(v @ Value::List(_)) => de::Deserializer::deserialize_seq(Deserializer::from_value(v), visitor),
            Some(other) => Err(type_error("a tuple variant payload", &other)),
            None => Err(DecodeError::new(
                DecodeErrorKind::ParseFailure,
                0,
                "expected a tuple variant payload",
            )),
        }
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> DecodeResult<V::Value> {
        match self.value {
            Some(v @ Value::Obj(_)) => de::Deserializer::deserialize_map(Deserializer::from_value(v), visitor),
            Some(other) => Err(type_error("a struct variant payload", &other)),
            None => Err(DecodeError::new(
                DecodeErrorKind::ParseFailure,
                0,
                "expected a struct variant payload",
            )),
        }
    }
}
