//! Errors raised while converting between typed values and wire values.

use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur while transcoding wire values.
///
/// These indicate a mismatch between a Rust type and the protocol shape it
/// is being converted to or from, not a transport failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
	/// Free-form error raised by a `Serialize`/`Deserialize` impl.
	#[error("{0}")]
	Message(String),

	/// A map key that cannot be represented as a wire string.
	#[error("Unsupported map key: {0} (keys must be strings, numbers or booleans)")]
	UnsupportedKey(&'static str),

	/// The wire value does not have the kind the destination needs.
	#[error("Invalid type: expected {expected}, found {found}")]
	InvalidType {
		expected: &'static str,
		found: &'static str,
	},
}

impl WireError {
	pub(crate) fn invalid_type(expected: &'static str, found: &super::WireValue) -> Self {
		WireError::InvalidType {
			expected,
			found: found.kind(),
		}
	}
}

impl serde::ser::Error for WireError {
	fn custom<T: Display>(msg: T) -> Self {
		WireError::Message(msg.to_string())
	}
}

impl serde::de::Error for WireError {
	fn custom<T: Display>(msg: T) -> Self {
		WireError::Message(msg.to_string())
	}
}
