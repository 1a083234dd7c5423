//! Intercepted network requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use pw_protocol::{ContinueOptions, FulfillOptions};
use pw_runtime::{Channel, Error, Result};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::options::OptionBag;

/// One intercepted request awaiting a decision.
///
/// A route is resolved exactly once, by [`abort`](Route::abort),
/// [`continue_`](Route::continue_) or [`fulfill`](Route::fulfill). A handler
/// may instead call [`fallback`](Route::fallback) to pass it on to the next
/// matching handler.
///
/// See <https://playwright.dev/docs/api/class-route>
#[derive(Clone)]
pub struct Route {
	inner: Arc<RouteInner>,
}

struct RouteInner {
	channel: Channel,
	url: String,
	handled: AtomicBool,
	handling: Mutex<Option<oneshot::Sender<bool>>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AbortParams<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	error_code: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContinueBase {
	is_fallback: bool,
}

impl Route {
	pub fn new(channel: Channel, url: impl Into<String>) -> Self {
		Self {
			inner: Arc::new(RouteInner {
				channel,
				url: url.into(),
				handled: AtomicBool::new(false),
				handling: Mutex::new(None),
			}),
		}
	}

	/// Returns the request URL.
	pub fn url(&self) -> &str {
		&self.inner.url
	}

	pub fn channel(&self) -> &Channel {
		&self.inner.channel
	}

	/// Returns `true` once the route has been resolved.
	pub fn is_handled(&self) -> bool {
		self.inner.handled.load(Ordering::SeqCst)
	}

	/// Begins a handler invocation and returns its completion signal.
	///
	/// Replaces the signal of any previous invocation.
	pub(crate) fn start_handling(&self) -> oneshot::Receiver<bool> {
		let (tx, rx) = oneshot::channel();
		*self.inner.handling.lock() = Some(tx);
		rx
	}

	fn report_handled(&self, done: bool) {
		if let Some(tx) = self.inner.handling.lock().take() {
			let _ = tx.send(done);
		}
	}

	fn check_not_handled(&self) -> Result<()> {
		if self.inner.handled.swap(true, Ordering::SeqCst) {
			return Err(Error::InvalidArgument(format!(
				"Route is already handled: {}",
				self.inner.url
			)));
		}
		Ok(())
	}

	/// Aborts the request, optionally with a network error code such as
	/// `"failed"` or `"blockedbyclient"`.
	pub async fn abort(&self, error_code: Option<&str>) -> Result<()> {
		self.check_not_handled()?;
		let params = crate::options!(AbortParams { error_code })?;
		self.resolve("abort", params).await
	}

	/// Sends the request on, with optional overrides.
	pub async fn continue_(&self, options: Option<ContinueOptions>) -> Result<()> {
		self.check_not_handled()?;
		let params = crate::options!(ContinueBase { is_fallback: false }, options)?;
		self.resolve("continue", params).await
	}

	/// Answers the request with a mock response.
	pub async fn fulfill(&self, options: FulfillOptions) -> Result<()> {
		self.check_not_handled()?;
		let params = crate::options!(options)?;
		self.resolve("fulfill", params).await
	}

	/// Passes the route on to the next matching handler.
	pub async fn fallback(&self) -> Result<()> {
		if self.is_handled() {
			return Err(Error::InvalidArgument(format!(
				"Route is already handled: {}",
				self.inner.url
			)));
		}
		self.report_handled(false);
		Ok(())
	}

	/// Continues a route no handler resolved.
	pub(crate) async fn continue_unhandled(&self) -> Result<()> {
		self.check_not_handled()?;
		let params = crate::options!(ContinueBase { is_fallback: true })?;
		self.resolve("continue", params).await
	}

	async fn resolve(&self, method: &str, params: OptionBag) -> Result<()> {
		let result = self.inner.channel.send_no_result(method, params).await;
		if let Err(err) = &result {
			tracing::error!(url = %self.inner.url, method, error = %err, "Route resolution failed");
		}
		self.report_handled(true);
		result
	}
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("url", &self.inner.url)
			.field("handled", &self.is_handled())
			.finish()
	}
}
