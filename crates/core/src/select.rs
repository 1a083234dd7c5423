//! Conversion of `<select>` option choices into command options.

use pw_protocol::{ObjectRef, SelectOption};
use pw_runtime::Result;
use serde::Serialize;

use crate::options::OptionBag;

/// The options to select in a `<select>` element, grouped by how they match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectOptionValues {
	pub values_or_labels: Option<Vec<String>>,
	pub values: Option<Vec<String>>,
	pub indexes: Option<Vec<usize>>,
	pub labels: Option<Vec<String>>,
	/// `<option>` element handles to select directly.
	pub elements: Option<Vec<ObjectRef>>,
}

#[derive(Serialize)]
struct SelectParams {
	#[serde(skip_serializing_if = "Vec::is_empty")]
	options: Vec<SelectOption>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	elements: Vec<ObjectRef>,
}

/// Flattens `values` into the `options` and `elements` of a select command.
///
/// Options are listed by group: values-or-labels, values, indexes, labels.
/// An empty group contributes nothing, and a key with nothing in it is left
/// out entirely.
pub fn convert_select_option_set(values: SelectOptionValues) -> Result<OptionBag> {
	let mut options = Vec::new();
	options.extend(
		values
			.values_or_labels
			.into_iter()
			.flatten()
			.map(SelectOption::value_or_label),
	);
	options.extend(values.values.into_iter().flatten().map(SelectOption::value));
	options.extend(values.indexes.into_iter().flatten().map(SelectOption::index));
	options.extend(values.labels.into_iter().flatten().map(SelectOption::label));

	let params = SelectParams {
		options,
		elements: values.elements.unwrap_or_default(),
	};
	crate::options!(params)
}
