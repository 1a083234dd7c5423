//! Generic wire values and the serde bridge between them and typed structs.
//!
//! Every command argument crosses the wire as a [`WireValue`]. Typed option
//! structs are converted with [`to_wire`] and protocol payloads are decoded
//! back into typed structs with [`from_wire`]. Both directions are driven by
//! the serde derives on the typed side, so wire keys come from `rename` /
//! `rename_all` attributes and fall back to the Rust field name.
//!
//! # Presence rules
//!
//! - `None`, `()` and [`Nullable::Unset`] are *absent*: struct fields, map
//!   entries and sequence elements holding them are dropped.
//! - [`Nullable::Null`] is protocol `null` and is sent as the literal string
//!   `"null"`, which is never conflated with an absent key.
//! - [`ObjectRef`] values are already wire-ready and pass through untouched.

mod decode;
mod encode;
mod error;
mod nullable;
mod object_ref;

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

pub use decode::from_wire;
pub use error::WireError;
pub use nullable::{NULL_MARKER, Nullable};
pub use object_ref::ObjectRef;
pub use encode::{WireSerializer, to_wire};

/// Ordered string-keyed mapping of wire values.
pub type WireMap = IndexMap<String, WireValue>;

/// Untyped, wire-ready value.
///
/// There is no null variant: protocol `null` is the string [`NULL_MARKER`]
/// and "absent" is the absence of a key.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
	Bool(bool),
	Number(f64),
	String(String),
	Array(Vec<WireValue>),
	Map(WireMap),
	/// Handle to a remote-side object.
	Object(ObjectRef),
}

impl WireValue {
	/// Short name of this value's kind, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			WireValue::Bool(_) => "boolean",
			WireValue::Number(_) => "number",
			WireValue::String(s) if s == NULL_MARKER => "null",
			WireValue::String(_) => "string",
			WireValue::Array(_) => "array",
			WireValue::Map(_) => "map",
			WireValue::Object(_) => "object reference",
		}
	}

	/// Returns true if this is the protocol null marker.
	pub fn is_null(&self) -> bool {
		matches!(self, WireValue::String(s) if s == NULL_MARKER)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			WireValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			WireValue::Number(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			WireValue::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[WireValue]> {
		match self {
			WireValue::Array(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&WireMap> {
		match self {
			WireValue::Map(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&ObjectRef> {
		match self {
			WireValue::Object(v) => Some(v),
			_ => None,
		}
	}

	/// Consumes the value, returning the map if this is one.
	pub fn into_map(self) -> Option<WireMap> {
		match self {
			WireValue::Map(v) => Some(v),
			_ => None,
		}
	}

	/// Decodes a raw JSON protocol payload.
	///
	/// JSON `null` becomes the null marker and `{"guid": "..."}` becomes an
	/// [`ObjectRef`].
	pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
		WireValue::deserialize(value)
	}
}

impl From<bool> for WireValue {
	fn from(v: bool) -> Self {
		WireValue::Bool(v)
	}
}

impl From<f64> for WireValue {
	fn from(v: f64) -> Self {
		WireValue::Number(v)
	}
}

impl From<i64> for WireValue {
	fn from(v: i64) -> Self {
		WireValue::Number(v as f64)
	}
}

impl From<&str> for WireValue {
	fn from(v: &str) -> Self {
		WireValue::String(v.to_owned())
	}
}

impl From<String> for WireValue {
	fn from(v: String) -> Self {
		WireValue::String(v)
	}
}

impl From<Vec<WireValue>> for WireValue {
	fn from(v: Vec<WireValue>) -> Self {
		WireValue::Array(v)
	}
}

impl From<WireMap> for WireValue {
	fn from(v: WireMap) -> Self {
		WireValue::Map(v)
	}
}

impl From<ObjectRef> for WireValue {
	fn from(v: ObjectRef) -> Self {
		WireValue::Object(v)
	}
}

impl Serialize for WireValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			WireValue::Bool(v) => serializer.serialize_bool(*v),
			// Integral numbers go out as integers so JSON reads `1`, not `1.0`.
			WireValue::Number(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
				serializer.serialize_i64(*v as i64)
			}
			WireValue::Number(v) => serializer.serialize_f64(*v),
			WireValue::String(v) => serializer.serialize_str(v),
			WireValue::Array(v) => serializer.collect_seq(v),
			WireValue::Map(v) => serializer.collect_map(v),
			WireValue::Object(v) => v.serialize(serializer),
		}
	}
}

impl<'de> Deserialize<'de> for WireValue {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(WireValueVisitor)
	}
}

struct WireValueVisitor;

impl<'de> Visitor<'de> for WireValueVisitor {
	type Value = WireValue;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("any protocol value")
	}

	fn visit_bool<E: de::Error>(self, v: bool) -> Result<WireValue, E> {
		Ok(WireValue::Bool(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<WireValue, E> {
		Ok(WireValue::Number(v as f64))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<WireValue, E> {
		Ok(WireValue::Number(v as f64))
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<WireValue, E> {
		Ok(WireValue::Number(v))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<WireValue, E> {
		Ok(WireValue::String(v.to_owned()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<WireValue, E> {
		Ok(WireValue::String(v))
	}

	fn visit_none<E: de::Error>(self) -> Result<WireValue, E> {
		Ok(WireValue::String(NULL_MARKER.to_owned()))
	}

	fn visit_unit<E: de::Error>(self) -> Result<WireValue, E> {
		Ok(WireValue::String(NULL_MARKER.to_owned()))
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<WireValue, D::Error> {
		WireValue::deserialize(deserializer)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<WireValue, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element()? {
			items.push(item);
		}
		Ok(WireValue::Array(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<WireValue, A::Error> {
		let mut map = WireMap::with_capacity(access.size_hint().unwrap_or(0));
		while let Some((key, value)) = access.next_entry::<String, WireValue>()? {
			map.insert(key, value);
		}
		if map.len() == 1 {
			if let Some(WireValue::String(guid)) = map.get("guid") {
				return Ok(WireValue::Object(ObjectRef::new(guid.as_str())));
			}
		}
		Ok(WireValue::Map(map))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_from_json_maps_null_and_guid() {
		let value = WireValue::from_json(json!({
			"frame": {"guid": "frame@1"},
			"referer": null,
			"count": 3,
			"tags": ["a", "b"]
		}))
		.unwrap();

		let map = value.as_map().unwrap();
		assert_eq!(map["frame"], WireValue::Object(ObjectRef::new("frame@1")));
		assert!(map["referer"].is_null());
		assert_eq!(map["count"].as_f64(), Some(3.0));
		assert_eq!(map["tags"].as_array().unwrap().len(), 2);
	}

	#[test]
	fn test_serialize_to_json() {
		let mut map = WireMap::new();
		map.insert("timeout".into(), WireValue::Number(1500.0));
		map.insert("ratio".into(), WireValue::Number(0.5));
		map.insert("page".into(), WireValue::Object(ObjectRef::new("page@7")));

		let json = serde_json::to_value(WireValue::Map(map)).unwrap();
		assert_eq!(
			json,
			json!({"timeout": 1500, "ratio": 0.5, "page": {"guid": "page@7"}})
		);
	}

	#[test]
	fn test_guid_map_with_extra_keys_stays_a_map() {
		let value = WireValue::from_json(json!({"guid": "x", "name": "y"})).unwrap();
		assert!(value.as_map().is_some());
	}
}
