//! Tri-state optional fields distinguishing protocol `null` from "unset".

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

/// Literal the protocol uses for an explicit `null`.
pub const NULL_MARKER: &str = "null";

/// An option field that can be left unset, set to protocol `null`, or set.
///
/// `Unset` is dropped from the payload, `Null` is sent as `"null"`. Fields of
/// this type need `#[serde(default)]` so a missing key decodes to `Unset`:
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct EmulateMediaOptions {
///     #[serde(default, skip_serializing_if = "Nullable::is_unset")]
///     color_scheme: Nullable<ColorScheme>,
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
	Unset,
	Null,
	Value(T),
}

impl<T> Default for Nullable<T> {
	fn default() -> Self {
		Nullable::Unset
	}
}

impl<T> Nullable<T> {
	pub fn is_unset(&self) -> bool {
		matches!(self, Nullable::Unset)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Nullable::Null)
	}

	/// Returns the value if one is set.
	pub fn as_value(&self) -> Option<&T> {
		match self {
			Nullable::Value(v) => Some(v),
			_ => None,
		}
	}

	pub fn into_value(self) -> Option<T> {
		match self {
			Nullable::Value(v) => Some(v),
			_ => None,
		}
	}
}

impl<T> From<T> for Nullable<T> {
	fn from(value: T) -> Self {
		Nullable::Value(value)
	}
}

impl<T: Serialize> Serialize for Nullable<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Nullable::Unset => serializer.serialize_none(),
			Nullable::Null => serializer.serialize_str(NULL_MARKER),
			Nullable::Value(v) => v.serialize(serializer),
		}
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_option(NullableVisitor(PhantomData))
	}
}

struct NullableVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for NullableVisitor<T> {
	type Value = Nullable<T>;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("null or a value")
	}

	fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(Nullable::Null)
	}

	fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(Nullable::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
		T::deserialize(deserializer).map(Nullable::Value)
	}
}
