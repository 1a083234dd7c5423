// Shared helpers for routing integration tests
//
// A recording connection stands in for the Playwright server: every message
// is captured and answered with `null`, or with an error for methods listed
// in `failing`.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use pw::{Channel, ConnectionLike, Error, SendFuture};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
	pub guid: String,
	pub method: String,
	pub params: Value,
}

#[derive(Default)]
pub struct RecordingConnection {
	sent: Mutex<Vec<Sent>>,
	failing: Mutex<Vec<String>>,
}

impl RecordingConnection {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn channel(self: &Arc<Self>, guid: &str) -> Channel {
		Channel::new(guid, Arc::clone(self) as Arc<dyn ConnectionLike>)
	}

	/// Makes every later call to `method` fail.
	pub fn fail(&self, method: &str) {
		self.failing.lock().push(method.to_string());
	}

	pub fn sent(&self) -> Vec<Sent> {
		self.sent.lock().clone()
	}

	/// Messages sent with `method`, in order.
	pub fn calls(&self, method: &str) -> Vec<Sent> {
		self.sent
			.lock()
			.iter()
			.filter(|sent| sent.method == method)
			.cloned()
			.collect()
	}
}

impl ConnectionLike for RecordingConnection {
	fn send_message(&self, guid: &str, method: &str, params: Value) -> SendFuture<'_> {
		self.sent.lock().push(Sent {
			guid: guid.to_string(),
			method: method.to_string(),
			params,
		});
		let failed = self.failing.lock().iter().any(|m| m == method);
		let method = method.to_string();
		Box::pin(async move {
			if failed {
				return Err(Error::TransportError(format!("{method} failed")));
			}
			Ok(Value::Null)
		})
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::DEBUG.into()),
		)
		.with_test_writer()
		.try_init();
}
