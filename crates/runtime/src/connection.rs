//! The transport seam between channels and the Playwright server.
//!
//! A [`Channel`](crate::Channel) only needs one thing from its connection:
//! send a method call for an object GUID and get back the raw JSON result.
//! Request ID correlation, event dispatch and the object registry all live
//! behind this trait.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::Result;

/// Boxed future returned by [`ConnectionLike::send_message`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>>;

/// Trait defining the interface that a Channel needs from a Connection
///
/// Implementations must be safe to call from several tasks at once: route
/// handlers and the caller's own commands share one connection.
pub trait ConnectionLike: Send + Sync {
	/// Send a message to the Playwright server and await its response
	fn send_message(&self, guid: &str, method: &str, params: Value) -> SendFuture<'_>;
}
