//! Route handler entries.
//!
//! A [`RouteHandlerEntry`] pairs a [`UrlMatcher`] with the callback registered
//! for it and tracks how many times it has been used.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use tokio::sync::oneshot;

use crate::Route;
use crate::matcher::UrlMatcher;

/// Unique identifier for route handlers.
pub type HandlerId = u64;

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a new globally-unique handler ID.
pub fn next_handler_id() -> HandlerId {
	NEXT_HANDLER_ID.fetch_add(1, Ordering::SeqCst)
}

/// Route handler callback.
///
/// Called synchronously during dispatch. A handler that needs to await
/// should spawn a task and resolve the [`Route`] from there; dispatch waits
/// for the resolution, not for the callback to return.
pub type RouteHandler = Arc<dyn Fn(Route) + Send + Sync>;

/// Wraps a closure as a [`RouteHandler`].
pub fn route_handler<F>(handler: F) -> RouteHandler
where
	F: Fn(Route) + Send + Sync + 'static,
{
	Arc::new(handler)
}

/// A registered route: matcher, callback and use limit.
///
/// Everything except the invocation counter is fixed at construction.
pub struct RouteHandlerEntry {
	id: HandlerId,
	matcher: UrlMatcher,
	handler: RouteHandler,
	times: u32,
	count: AtomicU32,
}

impl RouteHandlerEntry {
	/// Creates an entry; `times` of `None` or `Some(0)` means unlimited.
	pub fn new(matcher: UrlMatcher, handler: RouteHandler, times: Option<u32>) -> Self {
		Self {
			id: next_handler_id(),
			matcher,
			handler,
			times: times.unwrap_or(0),
			count: AtomicU32::new(0),
		}
	}

	/// Returns `true` if this entry's matcher accepts the URL.
	pub fn matches(&self, url: &str) -> bool {
		self.matcher.matches(url)
	}

	/// Invokes the handler for `route` and returns its completion signal.
	///
	/// The signal yields `true` once the route is resolved and `false` if the
	/// handler fell back. This does not wait for either.
	pub fn handle(&self, route: Route) -> oneshot::Receiver<bool> {
		self.record_use();
		self.invoke(route)
	}

	/// Counts one use without running the handler.
	pub(crate) fn record_use(&self) {
		self.count.fetch_add(1, Ordering::SeqCst);
	}

	/// Runs the handler for a use already counted by [`Self::record_use`].
	pub(crate) fn invoke(&self, route: Route) -> oneshot::Receiver<bool> {
		let handled = route.start_handling();
		(self.handler)(route);
		handled
	}

	/// Returns `true` if the next invocation uses up the entry's limit.
	pub fn will_exceed(&self) -> bool {
		if self.times == 0 {
			return false;
		}
		self.count.load(Ordering::SeqCst).saturating_add(1) >= self.times
	}

	/// Returns `true` if `handler` is the same callback this entry holds.
	pub fn is_handler(&self, handler: &RouteHandler) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.handler), Arc::as_ptr(handler))
	}

	pub fn id(&self) -> HandlerId {
		self.id
	}

	pub fn matcher(&self) -> &UrlMatcher {
		&self.matcher
	}

	pub fn times(&self) -> u32 {
		self.times
	}

	/// Number of times the handler has been invoked.
	pub fn count(&self) -> u32 {
		self.count.load(Ordering::SeqCst)
	}
}

impl std::fmt::Debug for RouteHandlerEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteHandlerEntry")
			.field("id", &self.id)
			.field("matcher", &self.matcher)
			.field("times", &self.times)
			.field("count", &self.count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use pw_runtime::{Channel, ConnectionLike, SendFuture};
	use serde_json::Value;

	use super::*;

	struct NoopConnection;

	impl ConnectionLike for NoopConnection {
		fn send_message(&self, _guid: &str, _method: &str, _params: Value) -> SendFuture<'_> {
			Box::pin(async { Ok(Value::Null) })
		}
	}

	fn route(url: &str) -> Route {
		Route::new(Channel::new("route@1", Arc::new(NoopConnection)), url)
	}

	#[test]
	fn test_handler_id_increments() {
		let id1 = next_handler_id();
		let id2 = next_handler_id();
		let id3 = next_handler_id();
		assert!(id2 > id1);
		assert!(id3 > id2);
	}

	#[test]
	fn test_will_exceed_counts_down() {
		let entry = RouteHandlerEntry::new(
			UrlMatcher::new("**/*", None),
			route_handler(|_| {}),
			Some(2),
		);
		assert!(!entry.will_exceed());

		let _ = entry.handle(route("https://x.test/a"));
		assert_eq!(entry.count(), 1);
		assert!(entry.will_exceed());
	}

	#[test]
	fn test_unlimited_never_exceeds() {
		let entry = RouteHandlerEntry::new(UrlMatcher::new("**/*", None), route_handler(|_| {}), None);
		for _ in 0..5 {
			let _ = entry.handle(route("https://x.test/a"));
		}
		assert!(!entry.will_exceed());
		assert_eq!(entry.times(), 0);
	}

	#[tokio::test]
	async fn test_handle_returns_completion_signal() {
		let entry = RouteHandlerEntry::new(
			UrlMatcher::new("**/*", None),
			route_handler(|route| {
				tokio::spawn(async move { route.fallback().await });
			}),
			None,
		);
		assert!(entry.matches("https://x.test/a"));

		let handled = entry.handle(route("https://x.test/a"));
		assert!(!handled.await.unwrap());
	}

	#[test]
	fn test_handler_identity() {
		let handler = route_handler(|_| {});
		let entry = RouteHandlerEntry::new(UrlMatcher::new("**/*", None), Arc::clone(&handler), None);
		assert!(entry.is_handler(&handler));
		assert!(!entry.is_handler(&route_handler(|_| {})));
	}
}
