//! Opaque references to remote-side objects.

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Struct name the wire serializer recognizes to keep references opaque.
pub(crate) const OBJECT_REF_TOKEN: &str = "$pw_protocol::ObjectRef";

/// Handle to an object owned by the remote side, identified by its GUID.
///
/// References are wire-ready: [`to_wire`](super::to_wire) passes them through
/// as [`WireValue::Object`](super::WireValue::Object) instead of expanding
/// their fields. On JSON they appear as `{"guid": "<guid>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
	guid: Arc<str>,
}

impl ObjectRef {
	pub fn new(guid: impl Into<Arc<str>>) -> Self {
		Self { guid: guid.into() }
	}

	/// Returns the GUID of the referenced object.
	pub fn guid(&self) -> &str {
		&self.guid
	}
}

impl fmt::Display for ObjectRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.guid)
	}
}

impl Serialize for ObjectRef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct(OBJECT_REF_TOKEN, 1)?;
		state.serialize_field("guid", &*self.guid)?;
		state.end()
	}
}

impl<'de> Deserialize<'de> for ObjectRef {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_struct(OBJECT_REF_TOKEN, &["guid"], ObjectRefVisitor)
	}
}

struct ObjectRefVisitor;

impl<'de> Visitor<'de> for ObjectRefVisitor {
	type Value = ObjectRef;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("an object reference")
	}

	fn visit_str<E: de::Error>(self, guid: &str) -> Result<ObjectRef, E> {
		Ok(ObjectRef::new(guid))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ObjectRef, A::Error> {
		let mut guid: Option<String> = None;
		while let Some(key) = map.next_key::<String>()? {
			if key == "guid" {
				guid = Some(map.next_value()?);
			} else {
				map.next_value::<de::IgnoredAny>()?;
			}
		}
		guid.map(ObjectRef::new)
			.ok_or_else(|| de::Error::missing_field("guid"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_json_shape() {
		let json = serde_json::to_value(ObjectRef::new("element@42")).unwrap();
		assert_eq!(json, serde_json::json!({"guid": "element@42"}));

		let back: ObjectRef = serde_json::from_value(json).unwrap();
		assert_eq!(back.guid(), "element@42");
	}

	#[test]
	fn test_missing_guid_is_an_error() {
		let result: Result<ObjectRef, _> = serde_json::from_value(serde_json::json!({"id": 1}));
		assert!(result.is_err());
	}
}
