//! Typed value → [`WireValue`] conversion.

use serde::ser::{self, Impossible, Serialize};

use super::object_ref::OBJECT_REF_TOKEN;
use super::{ObjectRef, WireError, WireMap, WireValue};

type Result<T> = std::result::Result<T, WireError>;

/// Converts any serializable value into its wire form.
///
/// Returns `Ok(None)` when the value itself is absent (`None`, `()`,
/// [`Nullable::Unset`](super::Nullable::Unset)). Absent struct fields, map
/// entries and sequence elements are dropped from their container.
///
/// # Example
///
/// ```ignore
/// let wire = to_wire(&GotoOptions::new().timeout(5000.0))?;
/// ```
pub fn to_wire<T: ?Sized + Serialize>(value: &T) -> Result<Option<WireValue>> {
	value.serialize(WireSerializer)
}

/// Serializer whose output is a [`WireValue`], or `None` for absent values.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireSerializer;

impl ser::Serializer for WireSerializer {
	type Ok = Option<WireValue>;
	type Error = WireError;

	type SerializeSeq = SerializeVec;
	type SerializeTuple = SerializeVec;
	type SerializeTupleStruct = SerializeVec;
	type SerializeTupleVariant = SerializeTupleVariant;
	type SerializeMap = SerializeMap;
	type SerializeStruct = SerializeStruct;
	type SerializeStructVariant = SerializeStructVariant;

	fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
		Ok(Some(WireValue::Bool(v)))
	}

	fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
		self.serialize_f64(v as f64)
	}

	fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
		Ok(Some(WireValue::Number(v)))
	}

	fn serialize_char(self, v: char) -> Result<Self::Ok> {
		Ok(Some(WireValue::String(v.to_string())))
	}

	fn serialize_str(self, v: &str) -> Result<Self::Ok> {
		Ok(Some(WireValue::String(v.to_owned())))
	}

	fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
		let items = v.iter().map(|b| WireValue::Number(*b as f64)).collect();
		Ok(Some(WireValue::Array(items)))
	}

	fn serialize_none(self) -> Result<Self::Ok> {
		Ok(None)
	}

	fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<Self::Ok> {
		Ok(None)
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
		Ok(None)
	}

	fn serialize_unit_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
	) -> Result<Self::Ok> {
		Ok(Some(WireValue::String(variant.to_owned())))
	}

	fn serialize_newtype_struct<T: ?Sized + Serialize>(
		self,
		_name: &'static str,
		value: &T,
	) -> Result<Self::Ok> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized + Serialize>(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		value: &T,
	) -> Result<Self::Ok> {
		Ok(Some(match to_wire(value)? {
			Some(inner) => {
				let mut map = WireMap::with_capacity(1);
				map.insert(variant.to_owned(), inner);
				WireValue::Map(map)
			}
			None => WireValue::String(variant.to_owned()),
		}))
	}

	fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
		Ok(SerializeVec {
			items: Vec::with_capacity(len.unwrap_or(0)),
		})
	}

	fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_struct(
		self,
		_name: &'static str,
		len: usize,
	) -> Result<Self::SerializeTupleStruct> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		len: usize,
	) -> Result<Self::SerializeTupleVariant> {
		Ok(SerializeTupleVariant {
			variant,
			items: Vec::with_capacity(len),
		})
	}

	fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
		Ok(SerializeMap {
			map: WireMap::with_capacity(len.unwrap_or(0)),
			next_key: None,
		})
	}

	fn serialize_struct(self, name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
		if name == OBJECT_REF_TOKEN {
			return Ok(SerializeStruct::ObjectRef(None));
		}
		Ok(SerializeStruct::Map(WireMap::with_capacity(len)))
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		len: usize,
	) -> Result<Self::SerializeStructVariant> {
		Ok(SerializeStructVariant {
			variant,
			map: WireMap::with_capacity(len),
		})
	}
}

pub struct SerializeVec {
	items: Vec<WireValue>,
}

impl SerializeVec {
	fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		if let Some(item) = to_wire(value)? {
			self.items.push(item);
		}
		Ok(())
	}
}

impl ser::SerializeSeq for SerializeVec {
	type Ok = Option<WireValue>;
	type Error = WireError;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.push(value)
	}

	fn end(self) -> Result<Self::Ok> {
		Ok(Some(WireValue::Array(self.items)))
	}
}

impl ser::SerializeTuple for SerializeVec {
	type Ok = Option<WireValue>;
	type Error = WireError;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.push(value)
	}

	fn end(self) -> Result<Self::Ok> {
		Ok(Some(WireValue::Array(self.items)))
	}
}

impl ser::SerializeTupleStruct for SerializeVec {
	type Ok = Option<WireValue>;
	type Error = WireError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.push(value)
	}

	fn end(self) -> Result<Self::Ok> {
		Ok(Some(WireValue::Array(self.items)))
	}
}

pub struct SerializeTupleVariant {
	variant: &'static str,
	items: Vec<WireValue>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
	type Ok = Option<WireValue>;
	type Error = WireError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		if let Some(item) = to_wire(value)? {
			self.items.push(item);
		}
		Ok(())
	}

	fn end(self) -> Result<Self::Ok> {
		let mut map = WireMap::with_capacity(1);
		map.insert(self.variant.to_owned(), WireValue::Array(self.items));
		Ok(Some(WireValue::Map(map)))
	}
}

pub struct SerializeMap {
	map: WireMap,
	next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
	type Ok = Option<WireValue>;
	type Error = WireError;

	fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
		self.next_key = Some(key.serialize(MapKeySerializer)?);
		Ok(())
	}

	fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		let key = self
			.next_key
			.take()
			.ok_or_else(|| WireError::Message("map value serialized before its key".into()))?;
		if let Some(value) = to_wire(value)? {
			self.map.insert(key, value);
		}
		Ok(())
	}

	fn end(self) -> Result<Self::Ok> {
		Ok(Some(WireValue::Map(self.map)))
	}
}

pub enum SerializeStruct {
	Map(WireMap),
	/// Collecting the `guid` field of an [`ObjectRef`].
	ObjectRef(Option<String>),
}

impl ser::SerializeStruct for SerializeStruct {
	type Ok = Option<WireValue>;
	type Error = WireError;

	fn serialize_field<T: ?Sized + Serialize>(
		&mut self,
		key: &'static str,
		value: &T,
	) -> Result<()> {
		match self {
			SerializeStruct::Map(map) => {
				if let Some(value) = to_wire(value)? {
					map.insert(key.to_owned(), value);
				}
			}
			SerializeStruct::ObjectRef(guid) => match to_wire(value)? {
				Some(WireValue::String(s)) if key == "guid" => *guid = Some(s),
				Some(other) if key == "guid" => {
					return Err(WireError::invalid_type("a guid string", &other));
				}
				_ => {}
			},
		}
		Ok(())
	}

	fn end(self) -> Result<Self::Ok> {
		match self {
			SerializeStruct::Map(map) => Ok(Some(WireValue::Map(map))),
			SerializeStruct::ObjectRef(Some(guid)) => {
				Ok(Some(WireValue::Object(ObjectRef::new(guid))))
			}
			SerializeStruct::ObjectRef(None) => {
				Err(WireError::Message("object reference without a guid".into()))
			}
		}
	}
}

pub struct SerializeStructVariant {
	variant: &'static str,
	map: WireMap,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
	type Ok = Option<WireValue>;
	type Error = WireError;

	fn serialize_field<T: ?Sized + Serialize>(
		&mut self,
		key: &'static str,
		value: &T,
	) -> Result<()> {
		if let Some(value) = to_wire(value)? {
			self.map.insert(key.to_owned(), value);
		}
		Ok(())
	}

	fn end(self) -> Result<Self::Ok> {
		let mut outer = WireMap::with_capacity(1);
		outer.insert(self.variant.to_owned(), WireValue::Map(self.map));
		Ok(Some(WireValue::Map(outer)))
	}
}

/// Serializes map keys, which must end up as strings on the wire.
struct MapKeySerializer;

impl MapKeySerializer {
	fn unsupported(kind: &'static str) -> WireError {
		WireError::UnsupportedKey(kind)
	}
}

impl ser::Serializer for MapKeySerializer {
	type Ok = String;
	type Error = WireError;

	type SerializeSeq = Impossible<String, WireError>;
	type SerializeTuple = Impossible<String, WireError>;
	type SerializeTupleStruct = Impossible<String, WireError>;
	type SerializeTupleVariant = Impossible<String, WireError>;
	type SerializeMap = Impossible<String, WireError>;
	type SerializeStruct = Impossible<String, WireError>;
	type SerializeStructVariant = Impossible<String, WireError>;

	fn serialize_bool(self, v: bool) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_i8(self, v: i8) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_i16(self, v: i16) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_i32(self, v: i32) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_i64(self, v: i64) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_u8(self, v: u8) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_u16(self, v: u16) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_u32(self, v: u32) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_u64(self, v: u64) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_f32(self, _v: f32) -> Result<String> {
		Err(Self::unsupported("float"))
	}

	fn serialize_f64(self, _v: f64) -> Result<String> {
		Err(Self::unsupported("float"))
	}

	fn serialize_char(self, v: char) -> Result<String> {
		Ok(v.to_string())
	}

	fn serialize_str(self, v: &str) -> Result<String> {
		Ok(v.to_owned())
	}

	fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
		Err(Self::unsupported("bytes"))
	}

	fn serialize_none(self) -> Result<String> {
		Err(Self::unsupported("none"))
	}

	fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<String> {
		Err(Self::unsupported("unit"))
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
		Err(Self::unsupported("unit struct"))
	}

	fn serialize_unit_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
	) -> Result<String> {
		Ok(variant.to_owned())
	}

	fn serialize_newtype_struct<T: ?Sized + Serialize>(
		self,
		_name: &'static str,
		value: &T,
	) -> Result<String> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized + Serialize>(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_value: &T,
	) -> Result<String> {
		Err(Self::unsupported("enum variant"))
	}

	fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
		Err(Self::unsupported("sequence"))
	}

	fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
		Err(Self::unsupported("tuple"))
	}

	fn serialize_tuple_struct(
		self,
		_name: &'static str,
		_len: usize,
	) -> Result<Self::SerializeTupleStruct> {
		Err(Self::unsupported("tuple struct"))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeTupleVariant> {
		Err(Self::unsupported("enum variant"))
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
		Err(Self::unsupported("map"))
	}

	fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
		Err(Self::unsupported("struct"))
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeStructVariant> {
		Err(Self::unsupported("enum variant"))
	}
}
