//! Route registration, removal and dispatch.
//!
//! Entries are kept newest first. An intercepted request is offered to each
//! matching entry in turn until one resolves it; a handler that falls back
//! passes it on to the next one.

use std::sync::Arc;

use parking_lot::Mutex;
use pw_runtime::{Channel, Result};
use serde::Serialize;

use crate::Route;
use crate::handlers::{RouteHandler, RouteHandlerEntry};
use crate::matcher::{UrlMatcher, UrlPattern};

#[derive(Serialize)]
struct InterceptionParams {
	enabled: bool,
}

async fn set_network_interception(channel: &Channel, enabled: bool) -> Result<()> {
	tracing::debug!(guid = channel.guid(), enabled, "Setting network interception");
	channel
		.send_no_result(
			"setNetworkInterceptionEnabled",
			InterceptionParams { enabled },
		)
		.await
}

/// Drops every entry registered with `pattern` (and, if given, `handler`).
fn retain_unmatched(
	entries: Vec<Arc<RouteHandlerEntry>>,
	pattern: &UrlPattern,
	handler: Option<&RouteHandler>,
) -> Vec<Arc<RouteHandlerEntry>> {
	entries
		.into_iter()
		.filter(|entry| {
			let same_pattern = entry.matcher().pattern().is_same(pattern);
			let same_handler = handler.is_none_or(|handler| entry.is_handler(handler));
			!(same_pattern && same_handler)
		})
		.collect()
}

/// Removes the entries registered with `pattern` from `entries`.
///
/// With `handler`, only entries holding that same callback are removed.
/// When nothing remains, network interception is disabled on `channel`.
pub async fn unroute(
	channel: &Channel,
	entries: Vec<Arc<RouteHandlerEntry>>,
	pattern: &UrlPattern,
	handler: Option<&RouteHandler>,
) -> Result<Vec<Arc<RouteHandlerEntry>>> {
	let remaining = retain_unmatched(entries, pattern, handler);
	if remaining.is_empty() {
		set_network_interception(channel, false).await?;
	}
	Ok(remaining)
}

/// The route handlers registered on one page or browser context.
pub struct RouteTable {
	channel: Channel,
	base_url: Option<String>,
	entries: Mutex<Vec<Arc<RouteHandlerEntry>>>,
}

impl RouteTable {
	/// Creates an empty table for the object behind `channel`.
	///
	/// Relative glob patterns are resolved against `base_url`.
	pub fn new(channel: Channel, base_url: Option<String>) -> Self {
		Self {
			channel,
			base_url,
			entries: Mutex::new(Vec::new()),
		}
	}

	/// Registers a route handler for network interception.
	///
	/// The newest registration is consulted first. With `times`, the entry is
	/// removed after handling that many requests.
	///
	/// See <https://playwright.dev/docs/api/class-page#page-route>
	///
	/// # Example
	///
	/// ```ignore
	/// table.route("**/*.png", route_handler(|route| {
	///     tokio::spawn(async move { route.abort(None).await });
	/// }), None).await?;
	/// ```
	pub async fn route(
		&self,
		pattern: impl Into<UrlPattern>,
		handler: RouteHandler,
		times: Option<u32>,
	) -> Result<Arc<RouteHandlerEntry>> {
		let matcher = UrlMatcher::new(pattern, self.base_url.as_deref());
		let entry = Arc::new(RouteHandlerEntry::new(matcher, handler, times));
		tracing::debug!(id = entry.id(), matcher = ?entry.matcher(), ?times, "Registering route");

		let was_empty = {
			let mut entries = self.entries.lock();
			let was_empty = entries.is_empty();
			entries.insert(0, Arc::clone(&entry));
			was_empty
		};

		if was_empty {
			set_network_interception(&self.channel, true).await?;
		}
		Ok(entry)
	}

	/// Removes routes registered with `pattern`, optionally only those with
	/// `handler`.
	///
	/// Entries registered or removed while interception is being disabled are
	/// left as they are.
	pub async fn unroute(&self, pattern: &UrlPattern, handler: Option<&RouteHandler>) -> Result<()> {
		let snapshot = self.entries();
		let remaining = unroute(&self.channel, snapshot.clone(), pattern, handler).await?;
		tracing::debug!(?pattern, removed = snapshot.len() - remaining.len(), "Unrouted");

		self.entries.lock().retain(|entry| {
			let kept = remaining.iter().any(|other| Arc::ptr_eq(other, entry));
			let added = !snapshot.iter().any(|other| Arc::ptr_eq(other, entry));
			kept || added
		});
		Ok(())
	}

	/// Offers an intercepted request to the matching handlers.
	///
	/// Handlers run newest first until one resolves the route. An entry on
	/// its last permitted use is removed before its handler runs, and an
	/// entry another dispatch already removed is skipped. A route no handler
	/// resolves is continued unchanged. If a removal emptied the table,
	/// interception is disabled once the route is settled.
	pub async fn dispatch(&self, route: Route) -> Result<()> {
		let mut emptied = false;
		let settled = self.offer(&route, &mut emptied).await;

		if emptied && self.is_empty() {
			set_network_interception(&self.channel, false).await?;
		}
		settled
	}

	async fn offer(&self, route: &Route, emptied: &mut bool) -> Result<()> {
		let snapshot: Vec<Arc<RouteHandlerEntry>> = self.entries.lock().clone();

		for entry in snapshot {
			if !entry.matches(route.url()) {
				continue;
			}

			let Some(now_empty) = self.claim(&entry) else {
				tracing::debug!(id = entry.id(), url = route.url(), "Route entry gone, skipping");
				continue;
			};
			*emptied |= now_empty;

			tracing::debug!(id = entry.id(), url = route.url(), "Dispatching route");
			let handled = entry.invoke(route.clone());
			if handled.await.unwrap_or(false) {
				return Ok(());
			}
		}

		route.continue_unhandled().await
	}

	/// Reserves one use of `entry`, removing it if that use is its last.
	///
	/// Returns `None` when the entry is no longer registered, otherwise
	/// whether the removal left the table empty. Check, removal and count
	/// happen under one lock.
	fn claim(&self, entry: &Arc<RouteHandlerEntry>) -> Option<bool> {
		let mut entries = self.entries.lock();
		let position = entries
			.iter()
			.position(|current| Arc::ptr_eq(current, entry))?;

		let now_empty = if entry.will_exceed() {
			entries.remove(position);
			entries.is_empty()
		} else {
			false
		};
		entry.record_use();
		Some(now_empty)
	}

	/// Returns the registered entries, newest first.
	pub fn entries(&self) -> Vec<Arc<RouteHandlerEntry>> {
		self.entries.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}

impl std::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field("channel", &self.channel)
			.field("base_url", &self.base_url)
			.field("entries", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handlers::route_handler;

	fn entry(pattern: impl Into<UrlPattern>, handler: RouteHandler) -> Arc<RouteHandlerEntry> {
		Arc::new(RouteHandlerEntry::new(
			UrlMatcher::new(pattern, None),
			handler,
			None,
		))
	}

	#[test]
	fn test_retain_filters_by_pattern_and_handler() {
		let first = route_handler(|_| {});
		let second = route_handler(|_| {});
		let entries = vec![
			entry("**/a", Arc::clone(&first)),
			entry("**/a", Arc::clone(&second)),
			entry("**/b", Arc::clone(&first)),
		];

		let kept = retain_unmatched(entries.clone(), &"**/a".into(), Some(&first));
		assert_eq!(kept.len(), 2);
		assert!(kept[0].is_handler(&second));

		let kept = retain_unmatched(entries, &"**/a".into(), None);
		assert_eq!(kept.len(), 1);
		assert_eq!(kept[0].matcher().glob(), Some("*/b"));
	}

	#[test]
	fn test_retain_predicate_by_identity() {
		let pattern = UrlPattern::predicate(|_| true);
		let entries = vec![entry(pattern.clone(), route_handler(|_| {}))];

		let kept = retain_unmatched(entries.clone(), &UrlPattern::predicate(|_| true), None);
		assert_eq!(kept.len(), 1);

		let kept = retain_unmatched(entries, &pattern, None);
		assert!(kept.is_empty());
	}
}
