//! Error types for the Playwright runtime.

use pw_protocol::WireError;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Playwright runtime.
#[derive(Debug, Error)]
pub enum Error {
	/// Transport-level error (stdio communication).
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Protocol-level error (JSON-RPC).
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Remote Playwright server error with full context.
	#[error("{name}: {message}")]
	Remote {
		/// Error type name (e.g., "TimeoutError", "Error", "TargetClosedError")
		name: String,
		/// Human-readable error message
		message: String,
		/// JavaScript stack trace from the server (if available)
		stack: Option<String>,
	},

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A typed value could not be converted to or from its wire form.
	#[error("Wire error: {0}")]
	Wire(#[from] WireError),

	/// Timeout waiting for operation.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// Channel closed unexpectedly.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,

	/// Invalid argument provided to method.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// A field exists on both structs but with different types.
	#[error("Mismatched field type for field {field}")]
	MismatchedField { field: String },

	/// The source struct has a field the destination does not declare.
	#[error("Extra field {field} in src")]
	ExtraField { field: String },
}

impl Error {
	/// Returns the error name if this is a Remote error.
	pub fn error_name(&self) -> Option<&str> {
		match self {
			Error::Remote { name, .. } => Some(name),
			_ => None,
		}
	}

	/// Returns the stack trace if this is a Remote error with a stack.
	pub fn stack_trace(&self) -> Option<&str> {
		match self {
			Error::Remote { stack, .. } => stack.as_deref(),
			_ => None,
		}
	}

	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Timeout(_) => true,
			Error::Remote { name, .. } => name == "TimeoutError",
			_ => false,
		}
	}

	/// Returns true if the remote target is gone.
	pub fn is_target_closed(&self) -> bool {
		match self {
			Error::ChannelClosed => true,
			Error::Remote { name, .. } => name == "TargetClosedError",
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_remote_error_accessors() {
		let err = Error::Remote {
			name: "TimeoutError".into(),
			message: "waiting for route".into(),
			stack: Some("at route.fulfill".into()),
		};
		assert!(err.is_timeout());
		assert_eq!(err.error_name(), Some("TimeoutError"));
		assert_eq!(err.stack_trace(), Some("at route.fulfill"));
		assert_eq!(err.to_string(), "TimeoutError: waiting for route");
	}

	#[test]
	fn test_field_errors_name_the_field() {
		let err = Error::MismatchedField {
			field: "timeout".into(),
		};
		assert_eq!(err.to_string(), "Mismatched field type for field timeout");

		let err = Error::ExtraField {
			field: "strict".into(),
		};
		assert_eq!(err.to_string(), "Extra field strict in src");
	}

	#[test]
	fn test_wire_error_converts() {
		let err: Error = WireError::UnsupportedKey("float").into();
		assert!(matches!(err, Error::Wire(_)));
		assert!(!err.is_target_closed());
	}
}
