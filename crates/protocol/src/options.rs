//! Option structs for Playwright protocol commands.
//!
//! These types represent the configuration options passed to various
//! Playwright methods. They are designed for conversion with
//! [`to_wire`](crate::to_wire) and serialization to JSON-RPC.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::types::{ColorScheme, HarContentPolicy, HarMode, Media, NameValue};
use crate::wire::Nullable;

/// Default timeout in milliseconds for Playwright operations.
///
/// This matches Playwright's standard default across all language implementations.
pub const DEFAULT_TIMEOUT_MS: f64 = 30000.0;

/// HAR recording options as sent to the server.
///
/// The URL filter is either a glob (`url_glob`) or a regex split into
/// `url_regex_source` and `url_regex_flags`, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHarOptions {
	/// Path of the HAR file to write
	pub path: String,

	/// How response bodies are stored
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<HarContentPolicy>,

	/// Recording detail level
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mode: Option<HarMode>,

	/// Glob pattern restricting recorded URLs
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url_glob: Option<String>,

	/// Source of a JavaScript regex restricting recorded URLs
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url_regex_source: Option<String>,

	/// Flags of the JavaScript regex
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url_regex_flags: Option<String>,
}

/// Request overrides for `Route.continue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueOptions {
	/// Replacement URL
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,

	/// Replacement HTTP method
	#[serde(skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,

	/// Replacement headers
	#[serde(skip_serializing_if = "Option::is_none")]
	pub headers: Option<Vec<NameValue>>,

	/// Replacement body, base64-encoded
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post_data: Option<String>,
}

impl ContinueOptions {
	/// Creates a new builder.
	pub fn builder() -> ContinueOptionsBuilder {
		ContinueOptionsBuilder::default()
	}
}

/// Builder for ContinueOptions.
#[derive(Debug, Clone, Default)]
pub struct ContinueOptionsBuilder {
	inner: ContinueOptions,
}

impl ContinueOptionsBuilder {
	/// Sets the URL.
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.inner.url = Some(url.into());
		self
	}

	/// Sets the HTTP method.
	pub fn method(mut self, method: impl Into<String>) -> Self {
		self.inner.method = Some(method.into());
		self
	}

	/// Adds a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.inner
			.headers
			.get_or_insert_with(Vec::new)
			.push(NameValue::new(name, value));
		self
	}

	/// Sets the request body.
	pub fn post_data(mut self, data: &[u8]) -> Self {
		self.inner.post_data = Some(base64::engine::general_purpose::STANDARD.encode(data));
		self
	}

	/// Builds the options.
	pub fn build(self) -> ContinueOptions {
		self.inner
	}
}

/// Mock response for `Route.fulfill`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillOptions {
	/// HTTP status code
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,

	/// Response headers
	#[serde(skip_serializing_if = "Option::is_none")]
	pub headers: Option<Vec<NameValue>>,

	/// Response body
	#[serde(skip_serializing_if = "Option::is_none")]
	pub body: Option<String>,

	/// Whether `body` is base64-encoded
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_base64: Option<bool>,
}

impl FulfillOptions {
	/// Creates a new builder.
	pub fn builder() -> FulfillOptionsBuilder {
		FulfillOptionsBuilder::default()
	}
}

/// Builder for FulfillOptions.
#[derive(Debug, Clone, Default)]
pub struct FulfillOptionsBuilder {
	inner: FulfillOptions,
}

impl FulfillOptionsBuilder {
	/// Sets the status code.
	pub fn status(mut self, status: u16) -> Self {
		self.inner.status = Some(status);
		self
	}

	/// Adds a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.inner
			.headers
			.get_or_insert_with(Vec::new)
			.push(NameValue::new(name, value));
		self
	}

	/// Sets a text body.
	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.inner.body = Some(body.into());
		self.inner.is_base64 = Some(false);
		self
	}

	/// Sets a binary body.
	pub fn body_bytes(mut self, body: &[u8]) -> Self {
		self.inner.body = Some(base64::engine::general_purpose::STANDARD.encode(body));
		self.inner.is_base64 = Some(true);
		self
	}

	/// Builds the options.
	pub fn build(self) -> FulfillOptions {
		self.inner
	}
}

/// Options for `Page.emulateMedia`.
///
/// Each field is tri-state: leave it unset to keep the current emulation,
/// set it to [`Nullable::Null`] to reset it, or set a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmulateMediaOptions {
	/// Emulated CSS media type
	#[serde(default, skip_serializing_if = "Nullable::is_unset")]
	pub media: Nullable<Media>,

	/// Emulated `prefers-color-scheme`
	#[serde(default, skip_serializing_if = "Nullable::is_unset")]
	pub color_scheme: Nullable<ColorScheme>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::wire::{WireValue, from_wire, to_wire};

	#[test]
	fn test_continue_builder_encodes_body() {
		let options = ContinueOptions::builder()
			.method("POST")
			.header("x-test", "1")
			.post_data(b"hi")
			.build();

		let wire = to_wire(&options).unwrap().unwrap();
		let map = wire.as_map().unwrap();
		assert_eq!(map["method"].as_str(), Some("POST"));
		assert_eq!(map["postData"].as_str(), Some("aGk="));
		assert!(!map.contains_key("url"));

		let headers = map["headers"].as_array().unwrap();
		assert_eq!(headers[0].as_map().unwrap()["name"].as_str(), Some("x-test"));
	}

	#[test]
	fn test_fulfill_binary_body() {
		let options = FulfillOptions::builder().status(404).body_bytes(&[0, 1]).build();
		assert_eq!(options.body.as_deref(), Some("AAE="));
		assert_eq!(options.is_base64, Some(true));
	}

	#[test]
	fn test_emulate_media_null_vs_unset() {
		let options = EmulateMediaOptions {
			media: Nullable::Null,
			color_scheme: Nullable::Unset,
		};
		let wire = to_wire(&options).unwrap().unwrap();
		let map = wire.as_map().unwrap();
		assert_eq!(map["media"], WireValue::String("null".into()));
		assert!(!map.contains_key("colorScheme"));

		let back: EmulateMediaOptions = from_wire(wire).unwrap();
		assert_eq!(back, options);
	}

	#[test]
	fn test_record_har_defaults_only_path() {
		let options = RecordHarOptions {
			path: "out.har".into(),
			..Default::default()
		};
		let json = serde_json::to_value(&options).unwrap();
		assert_eq!(json, serde_json::json!({"path": "out.har"}));
	}
}
