//! Timeout configuration scopes.
//!
//! A page's settings fall back to its browser context's, which fall back to
//! [`DEFAULT_TIMEOUT_MS`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pw_protocol::DEFAULT_TIMEOUT_MS;

#[derive(Debug, Default, Clone, Copy)]
struct Overrides {
	timeout: Option<f64>,
	navigation_timeout: Option<f64>,
}

/// One scope of timeout overrides, in milliseconds.
#[derive(Debug, Default)]
pub struct TimeoutSettings {
	parent: Option<Arc<TimeoutSettings>>,
	overrides: Mutex<Overrides>,
}

impl TimeoutSettings {
	/// Creates a scope with no overrides of its own.
	pub fn new(parent: Option<Arc<TimeoutSettings>>) -> Self {
		Self {
			parent,
			overrides: Mutex::default(),
		}
	}

	/// Sets the default timeout for this scope; `0` clears it.
	pub fn set_timeout(&self, timeout_ms: f64) {
		self.overrides.lock().timeout = non_zero(timeout_ms);
	}

	/// Returns the effective default timeout.
	pub fn timeout(&self) -> f64 {
		if let Some(timeout) = self.overrides.lock().timeout {
			return timeout;
		}
		match &self.parent {
			Some(parent) => parent.timeout(),
			None => DEFAULT_TIMEOUT_MS,
		}
	}

	/// Sets the navigation timeout for this scope; `0` clears it.
	pub fn set_navigation_timeout(&self, timeout_ms: f64) {
		self.overrides.lock().navigation_timeout = non_zero(timeout_ms);
	}

	/// Returns the effective navigation timeout.
	///
	/// Only navigation overrides along the chain apply; a plain default
	/// timeout does not.
	pub fn navigation_timeout(&self) -> f64 {
		if let Some(timeout) = self.overrides.lock().navigation_timeout {
			return timeout;
		}
		match &self.parent {
			Some(parent) => parent.navigation_timeout(),
			None => DEFAULT_TIMEOUT_MS,
		}
	}

	pub fn timeout_duration(&self) -> Duration {
		to_duration(self.timeout())
	}

	pub fn navigation_timeout_duration(&self) -> Duration {
		to_duration(self.navigation_timeout())
	}

	pub fn parent(&self) -> Option<&Arc<TimeoutSettings>> {
		self.parent.as_ref()
	}
}

fn non_zero(timeout_ms: f64) -> Option<f64> {
	(timeout_ms != 0.0).then_some(timeout_ms)
}

fn to_duration(timeout_ms: f64) -> Duration {
	Duration::try_from_secs_f64(timeout_ms / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let settings = TimeoutSettings::default();
		assert_eq!(settings.timeout(), DEFAULT_TIMEOUT_MS);
		assert_eq!(settings.navigation_timeout(), DEFAULT_TIMEOUT_MS);
		assert_eq!(settings.timeout_duration(), Duration::from_secs(30));
	}

	#[test]
	fn test_child_falls_back_to_parent() {
		let context = Arc::new(TimeoutSettings::new(None));
		context.set_timeout(5000.0);
		context.set_navigation_timeout(9000.0);

		let page = TimeoutSettings::new(Some(Arc::clone(&context)));
		assert_eq!(page.timeout(), 5000.0);
		assert_eq!(page.navigation_timeout(), 9000.0);

		page.set_timeout(100.0);
		assert_eq!(page.timeout(), 100.0);
		assert_eq!(context.timeout(), 5000.0);
	}

	#[test]
	fn test_zero_clears_override() {
		let settings = TimeoutSettings::new(None);
		settings.set_navigation_timeout(10.0);
		assert_eq!(settings.navigation_timeout(), 10.0);
		settings.set_navigation_timeout(0.0);
		assert_eq!(settings.navigation_timeout(), DEFAULT_TIMEOUT_MS);
	}

	#[test]
	fn test_navigation_ignores_plain_timeout() {
		let settings = TimeoutSettings::new(None);
		settings.set_timeout(1234.0);
		assert_eq!(settings.navigation_timeout(), DEFAULT_TIMEOUT_MS);
	}

	#[test]
	fn test_negative_duration_saturates() {
		let settings = TimeoutSettings::new(None);
		settings.set_timeout(-1.0);
		assert_eq!(settings.timeout_duration(), Duration::MAX);
	}
}
