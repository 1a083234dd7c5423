//! Channel - RPC communication proxy for protocol objects.
//!
//! The Channel provides a typed interface for sending JSON-RPC messages
//! to the Playwright server on behalf of a single remote object.

use std::sync::Arc;

use pw_protocol::ObjectRef;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::connection::ConnectionLike;
use crate::error::Result;

/// Channel provides RPC communication for one remote object.
///
/// Cloning is cheap; clones talk to the same object over the same connection.
#[derive(Clone)]
pub struct Channel {
	guid: Arc<str>,
	connection: Arc<dyn ConnectionLike>,
}

impl Channel {
	/// Creates a new Channel for the given object GUID.
	pub fn new(guid: impl Into<Arc<str>>, connection: Arc<dyn ConnectionLike>) -> Self {
		Self {
			guid: guid.into(),
			connection,
		}
	}

	/// Sends a method call to the Playwright server and awaits the response.
	pub async fn send<P: Serialize, R: DeserializeOwned>(
		&self,
		method: &str,
		params: P,
	) -> Result<R> {
		let params_value = serde_json::to_value(params)?;
		tracing::trace!(guid = %self.guid, method, "sending");
		let response = self
			.connection
			.send_message(&self.guid, method, params_value)
			.await?;
		serde_json::from_value(response).map_err(Into::into)
	}

	/// Sends a method call with no parameters.
	pub async fn send_no_params<R: DeserializeOwned>(&self, method: &str) -> Result<R> {
		self.send(method, Value::Null).await
	}

	/// Sends a method call that returns no result (void).
	pub async fn send_no_result<P: Serialize>(&self, method: &str, params: P) -> Result<()> {
		let _: Value = self.send(method, params).await?;
		Ok(())
	}

	/// Returns the GUID this channel represents.
	pub fn guid(&self) -> &str {
		&self.guid
	}

	/// Returns a wire reference to this channel's object.
	pub fn object_ref(&self) -> ObjectRef {
		ObjectRef::new(self.guid.clone())
	}
}

impl std::fmt::Debug for Channel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Channel").field("guid", &self.guid).finish()
	}
}

#[cfg(test)]
mod tests {
	use parking_lot::Mutex;
	use pw_protocol::{WireMap, WireValue};
	use serde_json::json;

	use super::*;
	use crate::connection::SendFuture;
	use crate::error::Error;

	#[derive(Default)]
	struct Recorder {
		sent: Mutex<Vec<(String, String, Value)>>,
		fail: bool,
	}

	impl ConnectionLike for Recorder {
		fn send_message(&self, guid: &str, method: &str, params: Value) -> SendFuture<'_> {
			self.sent
				.lock()
				.push((guid.to_string(), method.to_string(), params));
			let fail = self.fail;
			Box::pin(async move {
				if fail {
					Err(Error::TransportError("pipe closed".into()))
				} else {
					Ok(json!({"ok": true}))
				}
			})
		}
	}

	#[tokio::test]
	async fn test_send_serializes_wire_values() {
		let recorder = Arc::new(Recorder::default());
		let channel = Channel::new("page@1", recorder.clone());

		let mut params = WireMap::new();
		params.insert("frame".into(), WireValue::Object(ObjectRef::new("frame@2")));
		params.insert("timeout".into(), WireValue::Number(500.0));

		let result: Value = channel.send("goto", &params).await.unwrap();
		assert_eq!(result, json!({"ok": true}));

		let sent = recorder.sent.lock();
		assert_eq!(sent[0].0, "page@1");
		assert_eq!(sent[0].1, "goto");
		assert_eq!(sent[0].2, json!({"frame": {"guid": "frame@2"}, "timeout": 500}));
	}

	#[tokio::test]
	async fn test_transport_errors_propagate() {
		let recorder = Arc::new(Recorder {
			fail: true,
			..Default::default()
		});
		let channel = Channel::new("page@1", recorder);
		let err = channel
			.send_no_result("close", json!({}))
			.await
			.unwrap_err();
		assert!(matches!(err, Error::TransportError(_)));
	}

	#[test]
	fn test_object_ref_uses_guid() {
		let channel = Channel::new("element@9", Arc::new(Recorder::default()));
		assert_eq!(channel.object_ref().guid(), "element@9");
	}
}
