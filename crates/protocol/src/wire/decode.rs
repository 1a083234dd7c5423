//! [`WireValue`] → typed value conversion.

use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{
	self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, VariantAccess, Visitor,
};

use super::{ObjectRef, WireError, WireMap, WireValue};

type Result<T> = std::result::Result<T, WireError>;

/// Populates a typed value from its wire form.
///
/// Struct fields are looked up by their serde wire key; keys the type does
/// not declare are ignored. Numbers narrow to integer fields by truncation.
/// The null marker decodes to `None` / [`Nullable::Null`](super::Nullable::Null).
///
/// A destination whose shape does not match the value fails as a whole;
/// no partially populated value is returned.
pub fn from_wire<T: DeserializeOwned>(value: WireValue) -> Result<T> {
	T::deserialize(value)
}

impl<'de> IntoDeserializer<'de, WireError> for WireValue {
	type Deserializer = Self;

	fn into_deserializer(self) -> Self {
		self
	}
}

fn visit_array<'de, V: Visitor<'de>>(items: Vec<WireValue>, visitor: V) -> Result<V::Value> {
	let mut seq: SeqDeserializer<_, WireError> = SeqDeserializer::new(items.into_iter());
	let value = visitor.visit_seq(&mut seq)?;
	seq.end()?;
	Ok(value)
}

fn visit_map<'de, V: Visitor<'de>>(map: WireMap, visitor: V) -> Result<V::Value> {
	let mut access: MapDeserializer<'de, _, WireError> = MapDeserializer::new(map.into_iter());
	let value = visitor.visit_map(&mut access)?;
	access.end()?;
	Ok(value)
}

fn visit_object<'de, V: Visitor<'de>>(object: ObjectRef, visitor: V) -> Result<V::Value> {
	let entry = ("guid".to_owned(), WireValue::String(object.guid().to_owned()));
	let mut access: MapDeserializer<'de, _, WireError> =
		MapDeserializer::new(std::iter::once(entry));
	let value = visitor.visit_map(&mut access)?;
	access.end()?;
	Ok(value)
}

fn visit_number<'de, V: Visitor<'de>>(n: f64, visitor: V) -> Result<V::Value> {
	if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
		if n >= 0.0 {
			visitor.visit_u64(n as u64)
		} else {
			visitor.visit_i64(n as i64)
		}
	} else {
		visitor.visit_f64(n)
	}
}

macro_rules! deserialize_signed {
	($($method:ident),*) => {
		$(
			fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
				match self {
					WireValue::Number(n) => visitor.visit_i64(n as i64),
					other => Err(WireError::invalid_type("an integer", &other)),
				}
			}
		)*
	};
}

macro_rules! deserialize_unsigned {
	($($method:ident),*) => {
		$(
			fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
				match self {
					WireValue::Number(n) if n >= 0.0 => visitor.visit_u64(n as u64),
					other => Err(WireError::invalid_type("an unsigned integer", &other)),
				}
			}
		)*
	};
}

impl<'de> de::Deserializer<'de> for WireValue {
	type Error = WireError;

	fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		match self {
			WireValue::Bool(v) => visitor.visit_bool(v),
			WireValue::Number(n) => visit_number(n, visitor),
			WireValue::String(s) => visitor.visit_string(s),
			WireValue::Array(items) => visit_array(items, visitor),
			WireValue::Map(map) => visit_map(map, visitor),
			WireValue::Object(object) => visit_object(object, visitor),
		}
	}

	fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		match self {
			WireValue::Bool(v) => visitor.visit_bool(v),
			other => Err(WireError::invalid_type("a boolean", &other)),
		}
	}

	deserialize_signed!(
		deserialize_i8,
		deserialize_i16,
		deserialize_i32,
		deserialize_i64
	);

	deserialize_unsigned!(
		deserialize_u8,
		deserialize_u16,
		deserialize_u32,
		deserialize_u64
	);

	fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		self.deserialize_f64(visitor)
	}

	fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		match self {
			WireValue::Number(n) => visitor.visit_f64(n),
			other => Err(WireError::invalid_type("a number", &other)),
		}
	}

	fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		self.deserialize_string(visitor)
	}

	fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		self.deserialize_string(visitor)
	}

	fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		match self {
			WireValue::String(s) => visitor.visit_string(s),
			other => Err(WireError::invalid_type("a string", &other)),
		}
	}

	fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		self.deserialize_byte_buf(visitor)
	}

	fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		match self {
			WireValue::String(s) => visitor.visit_byte_buf(s.into_bytes()),
			WireValue::Array(items) => visit_array(items, visitor),
			other => Err(WireError::invalid_type("bytes", &other)),
		}
	}

	fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		if self.is_null() {
			visitor.visit_none()
		} else {
			visitor.visit_some(self)
		}
	}

	fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		if self.is_null() {
			visitor.visit_unit()
		} else {
			Err(WireError::invalid_type("null", &self))
		}
	}

	fn deserialize_unit_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value> {
		self.deserialize_unit(visitor)
	}

	fn deserialize_newtype_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value> {
		visitor.visit_newtype_struct(self)
	}

	fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		match self {
			WireValue::Array(items) => visit_array(items, visitor),
			other => Err(WireError::invalid_type("an array", &other)),
		}
	}

	fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
		self.deserialize_seq(visitor)
	}

	fn deserialize_tuple_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_len: usize,
		visitor: V,
	) -> Result<V::Value> {
		self.deserialize_seq(visitor)
	}

	fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		match self {
			WireValue::Map(map) => visit_map(map, visitor),
			WireValue::Object(object) => visit_object(object, visitor),
			other => Err(WireError::invalid_type("a map", &other)),
		}
	}

	fn deserialize_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_fields: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value> {
		match self {
			WireValue::Map(map) => visit_map(map, visitor),
			WireValue::Array(items) => visit_array(items, visitor),
			WireValue::Object(object) => visit_object(object, visitor),
			other => Err(WireError::invalid_type("a struct", &other)),
		}
	}

	fn deserialize_enum<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value> {
		let (variant, value) = match self {
			WireValue::String(variant) => (variant, None),
			WireValue::Map(map) if map.len() == 1 => match map.into_iter().next() {
				Some((variant, value)) => (variant, Some(value)),
				None => return Err(WireError::Message("empty enum map".into())),
			},
			other => return Err(WireError::invalid_type("an enum", &other)),
		};
		visitor.visit_enum(EnumDeserializer { variant, value })
	}

	fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		self.deserialize_string(visitor)
	}

	fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
		visitor.visit_unit()
	}
}

struct EnumDeserializer {
	variant: String,
	value: Option<WireValue>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
	type Error = WireError;
	type Variant = VariantDeserializer;

	fn variant_seed<S: DeserializeSeed<'de>>(self, seed: S) -> Result<(S::Value, Self::Variant)> {
		let variant: StringDeserializer<WireError> = self.variant.into_deserializer();
		let tag = seed.deserialize(variant)?;
		Ok((tag, VariantDeserializer { value: self.value }))
	}
}

struct VariantDeserializer {
	value: Option<WireValue>,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
	type Error = WireError;

	fn unit_variant(self) -> Result<()> {
		match self.value {
			None => Ok(()),
			Some(other) => Err(WireError::invalid_type("a unit variant", &other)),
		}
	}

	fn newtype_variant_seed<S: DeserializeSeed<'de>>(self, seed: S) -> Result<S::Value> {
		match self.value {
			Some(value) => seed.deserialize(value),
			None => Err(WireError::Message("newtype variant without a value".into())),
		}
	}

	fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
		match self.value {
			Some(WireValue::Array(items)) => visit_array(items, visitor),
			Some(other) => Err(WireError::invalid_type("a tuple variant", &other)),
			None => Err(WireError::Message("tuple variant without a value".into())),
		}
	}

	fn struct_variant<V: Visitor<'de>>(
		self,
		_fields: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value> {
		match self.value {
			Some(WireValue::Map(map)) => visit_map(map, visitor),
			Some(other) => Err(WireError::invalid_type("a struct variant", &other)),
			None => Err(WireError::Message("struct variant without a value".into())),
		}
	}
}
