//! Copying same-named fields between option structs.
//!
//! Used when a public options struct is narrowed into (or widened from) the
//! struct a specific protocol command takes. Fields are matched by their
//! wire name.

use pw_protocol::{WireError, WireValue, from_wire, to_wire};
use pw_runtime::{Error, Result};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::{Deserializer, Serialize};

use crate::options::OptionBag;

/// Assigns every field of `dest` that `src` also declares from `src`.
///
/// An absent source field clears the destination field. A shared field whose
/// declared types differ, or whose value the destination field cannot hold,
/// fails with [`Error::MismatchedField`]. When
/// `omit_extra` is false, a source field the destination does not declare
/// fails with [`Error::ExtraField`]; destination-only fields are always left
/// alone. `dest` is only written once every check has passed.
pub fn assign_struct_fields<D, S>(dest: &mut D, src: &S, omit_extra: bool) -> Result<()>
where
	D: Serialize + DeserializeOwned,
	S: Serialize + DeserializeOwned,
{
	let dest_fields = struct_fields::<D>()
		.ok_or_else(|| Error::InvalidArgument("dest must be a struct".into()))?;
	let src_fields = struct_fields::<S>()
		.ok_or_else(|| Error::InvalidArgument("src must be a struct".into()))?;

	let original = field_values(&*dest, "dest")?;
	let src_values = field_values(src, "src")?;

	let shared: Vec<&str> = dest_fields
		.iter()
		.copied()
		.filter(|field| src_fields.contains(field))
		.collect();

	if let Some(field) = shared
		.iter()
		.find(|field| field_shape::<D>(**field) != field_shape::<S>(**field))
	{
		return Err(Error::MismatchedField {
			field: (*field).to_string(),
		});
	}

	let mut merged = original.clone();
	for field in &shared {
		copy_field(&mut merged, &src_values, field);
	}

	let assigned = match from_wire::<D>(WireValue::Map(merged)) {
		Ok(value) => value,
		Err(err) => return Err(find_mismatch::<D>(&original, &src_values, &shared, err)),
	};

	if !omit_extra {
		if let Some(extra) = src_fields.iter().find(|field| !dest_fields.contains(*field)) {
			return Err(Error::ExtraField {
				field: (*extra).to_string(),
			});
		}
	}

	*dest = assigned;
	Ok(())
}

fn copy_field(target: &mut OptionBag, src_values: &OptionBag, field: &str) {
	match src_values.get(field) {
		Some(value) => {
			target.insert(field.to_string(), value.clone());
		}
		None => {
			target.shift_remove(field);
		}
	}
}

/// Names the first shared field whose source value the destination rejects.
fn find_mismatch<D: DeserializeOwned>(
	original: &OptionBag,
	src_values: &OptionBag,
	shared: &[&str],
	err: WireError,
) -> Error {
	for field in shared {
		let mut candidate = original.clone();
		copy_field(&mut candidate, src_values, field);
		if from_wire::<D>(WireValue::Map(candidate)).is_err() {
			return Error::MismatchedField {
				field: (*field).to_string(),
			};
		}
	}
	Error::Wire(err)
}

fn field_values<T: Serialize + ?Sized>(value: &T, role: &str) -> Result<OptionBag> {
	match to_wire(value)? {
		Some(WireValue::Map(map)) => Ok(map),
		None => Ok(OptionBag::new()),
		Some(other) => Err(Error::InvalidArgument(format!(
			"{role} must be a struct, got {}",
			other.kind()
		))),
	}
}

/// Returns the wire field names a derived `Deserialize` struct declares.
///
/// Types that do not deserialize as a plain struct (maps, enums, flattened
/// structs) return `None`.
pub fn struct_fields<T: DeserializeOwned>() -> Option<&'static [&'static str]> {
	let mut fields = None;
	let mut shape = Vec::new();
	let _ = T::deserialize(StructInspector {
		field: None,
		fields: &mut fields,
		shape: &mut shape,
	});
	fields
}

/// What a type asks its deserializer for.
///
/// Options, sequences and newtypes are followed inward, so `Option<String>`
/// and `Option<bool>` differ. Strings and byte buffers ignore ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
	Any,
	Bool,
	I8,
	I16,
	I32,
	I64,
	U8,
	U16,
	U32,
	U64,
	F32,
	F64,
	Char,
	Str,
	Bytes,
	Optional,
	Unit,
	UnitStruct(&'static str),
	NewtypeStruct(&'static str),
	Seq,
	Tuple(usize),
	TupleStruct(&'static str, usize),
	Map,
	Struct(&'static str),
	Enum(&'static str),
	Identifier,
}

/// Returns the shape of `field` in struct `T`; empty if `T` has no such field.
fn field_shape<T: DeserializeOwned>(field: &'static str) -> Vec<Kind> {
	let mut fields = None;
	let mut shape = Vec::new();
	let _ = T::deserialize(StructInspector {
		field: Some(field),
		fields: &mut fields,
		shape: &mut shape,
	});
	shape
}

/// Deserializer that records the field list it is asked for, then either
/// bails or feeds the struct a single `field` key to record its type.
struct StructInspector<'a> {
	field: Option<&'static str>,
	fields: &'a mut Option<&'static [&'static str]>,
	shape: &'a mut Vec<Kind>,
}

impl<'de> Deserializer<'de> for StructInspector<'_> {
	type Error = WireError;

	fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> std::result::Result<V::Value, WireError> {
		Err(de::Error::custom("not a struct"))
	}

	fn deserialize_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		fields: &'static [&'static str],
		visitor: V,
	) -> std::result::Result<V::Value, WireError> {
		*self.fields = Some(fields);
		match self.field {
			Some(field) if fields.contains(&field) => visitor.visit_map(SingleField {
				field: Some(field),
				shape: self.shape,
			}),
			_ => Err(de::Error::custom("fields recorded")),
		}
	}

	serde::forward_to_deserialize_any! {
		bool i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 char str string bytes byte_buf
		option unit unit_struct newtype_struct seq tuple tuple_struct map enum
		identifier ignored_any
	}
}

/// Map holding one key whose value has its shape recorded.
struct SingleField<'a> {
	field: Option<&'static str>,
	shape: &'a mut Vec<Kind>,
}

impl<'de> MapAccess<'de> for SingleField<'_> {
	type Error = WireError;

	fn next_key_seed<K: DeserializeSeed<'de>>(
		&mut self,
		seed: K,
	) -> std::result::Result<Option<K::Value>, WireError> {
		match self.field.take() {
			Some(field) => seed
				.deserialize(BorrowedStrDeserializer::<WireError>::new(field))
				.map(Some),
			None => Ok(None),
		}
	}

	fn next_value_seed<V: DeserializeSeed<'de>>(
		&mut self,
		seed: V,
	) -> std::result::Result<V::Value, WireError> {
		seed.deserialize(ShapeRecorder {
			shape: &mut *self.shape,
		})
	}
}

/// Deserializer that records each request it gets and never produces a value.
struct ShapeRecorder<'a> {
	shape: &'a mut Vec<Kind>,
}

impl ShapeRecorder<'_> {
	fn record<T>(self, kind: Kind) -> std::result::Result<T, WireError> {
		self.shape.push(kind);
		Err(de::Error::custom("shape recorded"))
	}
}

macro_rules! record_kind {
	($($method:ident => $kind:expr),* $(,)?) => {
		$(
			fn $method<V: Visitor<'de>>(self, _visitor: V) -> std::result::Result<V::Value, WireError> {
				self.record($kind)
			}
		)*
	};
}

impl<'de> Deserializer<'de> for ShapeRecorder<'_> {
	type Error = WireError;

	record_kind! {
		deserialize_any => Kind::Any,
		deserialize_bool => Kind::Bool,
		deserialize_i8 => Kind::I8,
		deserialize_i16 => Kind::I16,
		deserialize_i32 => Kind::I32,
		deserialize_i64 => Kind::I64,
		deserialize_u8 => Kind::U8,
		deserialize_u16 => Kind::U16,
		deserialize_u32 => Kind::U32,
		deserialize_u64 => Kind::U64,
		deserialize_f32 => Kind::F32,
		deserialize_f64 => Kind::F64,
		deserialize_char => Kind::Char,
		deserialize_str => Kind::Str,
		deserialize_string => Kind::Str,
		deserialize_bytes => Kind::Bytes,
		deserialize_byte_buf => Kind::Bytes,
		deserialize_unit => Kind::Unit,
		deserialize_map => Kind::Map,
		deserialize_identifier => Kind::Identifier,
		deserialize_ignored_any => Kind::Any,
	}

	fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, WireError> {
		self.shape.push(Kind::Optional);
		visitor.visit_some(self)
	}

	fn deserialize_newtype_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		visitor: V,
	) -> std::result::Result<V::Value, WireError> {
		self.shape.push(Kind::NewtypeStruct(name));
		visitor.visit_newtype_struct(self)
	}

	fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, WireError> {
		self.shape.push(Kind::Seq);
		visitor.visit_seq(SingleElement { shape: self.shape })
	}

	fn deserialize_unit_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		_visitor: V,
	) -> std::result::Result<V::Value, WireError> {
		self.record(Kind::UnitStruct(name))
	}

	fn deserialize_tuple<V: Visitor<'de>>(
		self,
		len: usize,
		_visitor: V,
	) -> std::result::Result<V::Value, WireError> {
		self.record(Kind::Tuple(len))
	}

	fn deserialize_tuple_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		len: usize,
		_visitor: V,
	) -> std::result::Result<V::Value, WireError> {
		self.record(Kind::TupleStruct(name, len))
	}

	fn deserialize_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		_fields: &'static [&'static str],
		_visitor: V,
	) -> std::result::Result<V::Value, WireError> {
		self.record(Kind::Struct(name))
	}

	fn deserialize_enum<V: Visitor<'de>>(
		self,
		name: &'static str,
		_variants: &'static [&'static str],
		_visitor: V,
	) -> std::result::Result<V::Value, WireError> {
		self.record(Kind::Enum(name))
	}
}

/// Sequence whose first element has its shape recorded.
struct SingleElement<'a> {
	shape: &'a mut Vec<Kind>,
}

impl<'de> SeqAccess<'de> for SingleElement<'_> {
	type Error = WireError;

	fn next_element_seed<T: DeserializeSeed<'de>>(
		&mut self,
		seed: T,
	) -> std::result::Result<Option<T::Value>, WireError> {
		seed.deserialize(ShapeRecorder {
			shape: &mut *self.shape,
		})
		.map(Some)
	}
}

#[cfg(test)]
mod tests {
	use serde::{Deserialize, Serialize};

	use super::*;

	#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	struct LocatorClick {
		#[serde(skip_serializing_if = "Option::is_none")]
		timeout: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		force: Option<bool>,
		#[serde(skip_serializing_if = "Option::is_none")]
		strict: Option<bool>,
	}

	#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	struct PageClick {
		#[serde(skip_serializing_if = "Option::is_none")]
		timeout: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		force: Option<bool>,
	}

	#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
	struct BadClick {
		#[serde(skip_serializing_if = "Option::is_none")]
		force: Option<String>,
	}

	#[test]
	fn test_struct_fields() {
		assert_eq!(
			struct_fields::<LocatorClick>(),
			Some(&["timeout", "force", "strict"][..])
		);
		assert_eq!(struct_fields::<std::collections::HashMap<String, u8>>(), None);
	}

	#[test]
	fn test_assign_shared_fields() {
		let src = PageClick {
			timeout: Some(100.0),
			force: None,
		};
		let mut dest = LocatorClick {
			timeout: None,
			force: Some(true),
			strict: Some(true),
		};

		assign_struct_fields(&mut dest, &src, false).unwrap();
		assert_eq!(
			dest,
			LocatorClick {
				timeout: Some(100.0),
				force: None,
				strict: Some(true),
			}
		);
	}

	#[test]
	fn test_extra_source_field() {
		let src = LocatorClick {
			strict: Some(true),
			..Default::default()
		};
		let mut dest = PageClick::default();

		let err = assign_struct_fields(&mut dest, &src, false).unwrap_err();
		assert!(matches!(err, Error::ExtraField { ref field } if field == "strict"));

		assign_struct_fields(&mut dest, &src, true).unwrap();
	}

	#[test]
	fn test_mismatched_field_leaves_dest_untouched() {
		let src = BadClick {
			force: Some("yes".into()),
		};
		let mut dest = PageClick {
			timeout: Some(5.0),
			force: Some(false),
		};

		let err = assign_struct_fields(&mut dest, &src, true).unwrap_err();
		assert!(matches!(err, Error::MismatchedField { ref field } if field == "force"));
		assert_eq!(dest.force, Some(false));
		assert_eq!(dest.timeout, Some(5.0));
	}

	#[test]
	fn test_mismatched_type_rejected_when_source_absent() {
		let src = BadClick { force: None };
		let mut dest = PageClick {
			timeout: None,
			force: Some(true),
		};

		let err = assign_struct_fields(&mut dest, &src, false).unwrap_err();
		assert!(matches!(err, Error::MismatchedField { ref field } if field == "force"));
		assert_eq!(dest.force, Some(true));
	}

	#[derive(Debug, Default, Serialize, Deserialize)]
	struct Selection {
		labels: Vec<String>,
		elements: Option<Vec<pw_protocol::ObjectRef>>,
	}

	#[test]
	fn test_field_shapes() {
		assert_eq!(field_shape::<PageClick>("force"), vec![Kind::Optional, Kind::Bool]);
		assert_eq!(field_shape::<BadClick>("force"), vec![Kind::Optional, Kind::Str]);
		assert_eq!(field_shape::<Selection>("labels"), vec![Kind::Seq, Kind::Str]);
		assert_eq!(field_shape::<Selection>("elements")[..2], [Kind::Optional, Kind::Seq]);
		assert!(field_shape::<PageClick>("strict").is_empty());
	}

	#[test]
	fn test_non_struct_dest() {
		let mut dest = std::collections::HashMap::<String, u8>::new();
		let err = assign_struct_fields(&mut dest, &PageClick::default(), true).unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}
}
