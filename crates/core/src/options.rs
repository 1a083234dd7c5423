//! Option bag composition for protocol commands.
//!
//! Every command-shaped call accepts its options in one of three shapes:
//!
//! | call                         | result                                   |
//! |------------------------------|------------------------------------------|
//! | `options!()`                 | empty bag                                |
//! | `options!(overrides)`        | `overrides` flattened                    |
//! | `options!(base, overrides)`  | `base` flattened, then `overrides` on top |
//!
//! `overrides` may be a struct, a map, `None`, or a slice/`Vec` of one of
//! those, in which case only its first element is used. An empty slice or
//! `None` leaves the base untouched.

use pw_protocol::{WireMap, WireValue, to_wire};
use pw_runtime::{Error, Result};
use serde::Serialize;

/// Flattened keyword arguments of one protocol command.
pub type OptionBag = WireMap;

/// Composes options for a call that received none.
pub fn compose_options() -> OptionBag {
	OptionBag::new()
}

/// Composes options for a call that received only overrides.
pub fn transform_options<O: Serialize + ?Sized>(options: &O) -> Result<OptionBag> {
	merge_into(OptionBag::new(), options)
}

/// Composes options from a base and overrides; override keys win.
///
/// Keys keep the position they first appeared at in `base`.
pub fn merge_options<B, O>(base: &B, options: &O) -> Result<OptionBag>
where
	B: Serialize + ?Sized,
	O: Serialize + ?Sized,
{
	let base = match to_wire(base)? {
		Some(value) => into_bag(value, "base options")?,
		None => OptionBag::new(),
	};
	merge_into(base, options)
}

fn merge_into<O: Serialize + ?Sized>(mut base: OptionBag, options: &O) -> Result<OptionBag> {
	let overrides = match to_wire(options)? {
		None => return Ok(base),
		// Optional-parameter convention: `&[opts]` means `opts`.
		Some(WireValue::Array(items)) => match items.into_iter().next() {
			Some(first) => first,
			None => return Ok(base),
		},
		Some(value) => value,
	};

	for (key, value) in into_bag(overrides, "options")? {
		base.insert(key, value);
	}
	Ok(base)
}

fn into_bag(value: WireValue, role: &str) -> Result<OptionBag> {
	match value {
		WireValue::Map(map) => Ok(map),
		other => Err(Error::InvalidArgument(format!(
			"{role} must be a struct or map, got {}",
			other.kind()
		))),
	}
}

/// Builds an [`OptionBag`] from zero, one or two option arguments.
///
/// Always evaluates to a [`Result`](pw_runtime::Result).
///
/// ```ignore
/// let params = options!()?;
/// let params = options!(click_options)?;
/// let params = options!(json!({"selector": sel}), [click_options])?;
/// ```
#[macro_export]
macro_rules! options {
	() => {
		$crate::Result::Ok($crate::options::compose_options())
	};
	($options:expr $(,)?) => {
		$crate::options::transform_options(&$options)
	};
	($base:expr, $options:expr $(,)?) => {
		$crate::options::merge_options(&$base, &$options)
	};
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use serde::Serialize;
	use serde_json::json;

	use super::*;

	#[derive(Debug, Clone, Default, Serialize)]
	#[serde(rename_all = "camelCase")]
	struct WaitOptions {
		#[serde(skip_serializing_if = "Option::is_none")]
		a: Option<i32>,
		#[serde(skip_serializing_if = "Option::is_none")]
		wait_until: Option<String>,
	}

	fn bag(value: serde_json::Value) -> OptionBag {
		WireValue::from_json(value).unwrap().into_map().unwrap()
	}

	#[test]
	fn test_no_options_is_empty() {
		assert!(crate::options!().unwrap().is_empty());
	}

	#[test]
	fn test_override_only() {
		let result = crate::options!(WaitOptions {
			a: Some(5),
			..Default::default()
		})
		.unwrap();
		assert_eq!(result, bag(json!({"a": 5})));
	}

	#[test]
	fn test_override_wins_over_base() {
		let mut base = HashMap::new();
		base.insert("a", 1);
		let result = merge_options(
			&base,
			&WaitOptions {
				a: Some(2),
				..Default::default()
			},
		)
		.unwrap();
		assert_eq!(result, bag(json!({"a": 2})));
	}

	#[test]
	fn test_base_keys_survive_absent_overrides() {
		let base = json!({"selector": "#go", "a": 1});
		let result = crate::options!(
			base,
			WaitOptions {
				a: None,
				wait_until: Some("load".into()),
			}
		)
		.unwrap();
		assert_eq!(
			result,
			bag(json!({"selector": "#go", "a": 1, "waitUntil": "load"}))
		);
	}

	#[test]
	fn test_empty_slice_leaves_base() {
		let base = json!({"selector": "#go"});
		let none: [WaitOptions; 0] = [];
		let result = crate::options!(base, none).unwrap();
		assert_eq!(result, bag(json!({"selector": "#go"})));
	}

	#[test]
	fn test_single_element_slice_is_unwrapped() {
		let base = json!({"selector": "#go"});
		let one = [WaitOptions {
			a: Some(9),
			..Default::default()
		}];
		let result = crate::options!(base, one).unwrap();
		assert_eq!(result, bag(json!({"selector": "#go", "a": 9})));
	}

	#[test]
	fn test_none_override_leaves_base() {
		let base = json!({"selector": "#go"});
		let result = crate::options!(base, Option::<WaitOptions>::None).unwrap();
		assert_eq!(result, bag(json!({"selector": "#go"})));
	}

	#[test]
	fn test_scalar_override_is_rejected() {
		let err = transform_options(&42).unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}
}
