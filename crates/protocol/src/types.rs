//! Core protocol types used across the wire.
//!
//! These types represent primitive values and enums used in the Playwright protocol.

use serde::{Deserialize, Serialize};

/// HAR content policy for recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarContentPolicy {
	/// Attach content as separate files
	#[default]
	Attach,
	/// Embed content inline
	Embed,
	/// Omit content from HAR
	Omit,
}

/// HAR recording mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarMode {
	/// Full recording mode
	#[default]
	Full,
	/// Minimal recording mode
	Minimal,
}

/// CSS media type for `emulateMedia`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Media {
	Screen,
	Print,
}

/// Preferred color scheme for `emulateMedia`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
	Light,
	Dark,
	NoPreference,
}

/// Select option variant.
///
/// Represents different ways to select an option in a `<select>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOption {
	/// Select by value, falling back to label
	ValueOrLabel {
		#[serde(rename = "valueOrLabel")]
		value_or_label: String,
	},
	/// Select by option value attribute
	Value { value: String },
	/// Select by option label (visible text)
	Label { label: String },
	/// Select by option index (0-based)
	Index { index: usize },
}

impl SelectOption {
	/// Create a selection matching either value or label.
	pub fn value_or_label(v: impl Into<String>) -> Self {
		SelectOption::ValueOrLabel {
			value_or_label: v.into(),
		}
	}

	/// Create a new value-based selection.
	pub fn value(v: impl Into<String>) -> Self {
		SelectOption::Value { value: v.into() }
	}

	/// Create a new label-based selection.
	pub fn label(l: impl Into<String>) -> Self {
		SelectOption::Label { label: l.into() }
	}

	/// Create a new index-based selection.
	pub fn index(i: usize) -> Self {
		SelectOption::Index { index: i }
	}
}

impl From<&str> for SelectOption {
	fn from(value: &str) -> Self {
		SelectOption::value_or_label(value)
	}
}

impl From<String> for SelectOption {
	fn from(value: String) -> Self {
		SelectOption::value_or_label(value)
	}
}

/// A single header (or other name/value pair) as the protocol lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
	pub name: String,
	pub value: String,
}

impl NameValue {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::wire::{WireValue, from_wire, to_wire};

	#[test]
	fn test_select_option_wire_shape() {
		let wire = to_wire(&SelectOption::value_or_label("blue")).unwrap().unwrap();
		assert_eq!(wire.as_map().unwrap()["valueOrLabel"].as_str(), Some("blue"));

		let wire = to_wire(&SelectOption::index(2)).unwrap().unwrap();
		assert_eq!(wire.as_map().unwrap()["index"], WireValue::Number(2.0));
	}

	#[test]
	fn test_select_option_from_wire() {
		let wire = to_wire(&SelectOption::index(4)).unwrap().unwrap();
		let back: SelectOption = from_wire(wire).unwrap();
		assert_eq!(back, SelectOption::index(4));
	}

	#[test]
	fn test_color_scheme_names() {
		assert_eq!(
			to_wire(&ColorScheme::NoPreference).unwrap(),
			Some(WireValue::String("no-preference".into()))
		);
	}
}
