//! URL matching for route registration.
//!
//! A route is registered with one of three pattern kinds. Globs are compiled
//! once at registration; regexes and predicates are shared as given.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Callable deciding whether a URL is of interest.
pub type UrlPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The pattern a route was registered with.
///
/// Cloning is cheap; clones of a regex or predicate pattern keep referring
/// to the same underlying value, which is what [`UrlPattern::is_same`]
/// compares.
#[derive(Clone)]
pub enum UrlPattern {
	/// Shell-style glob matched against the full URL.
	Glob(String),
	/// Regular expression matched anywhere in the URL.
	Regex(Arc<Regex>),
	/// Arbitrary predicate.
	Predicate(UrlPredicate),
}

impl UrlPattern {
	pub fn glob(pattern: impl Into<String>) -> Self {
		UrlPattern::Glob(pattern.into())
	}

	pub fn regex(regex: Regex) -> Self {
		UrlPattern::Regex(Arc::new(regex))
	}

	pub fn predicate<F>(predicate: F) -> Self
	where
		F: Fn(&str) -> bool + Send + Sync + 'static,
	{
		UrlPattern::Predicate(Arc::new(predicate))
	}

	/// Returns `true` if `other` was built from the same pattern.
	///
	/// Globs compare by value. Regexes and predicates compare by identity, so
	/// two independently compiled but identical regexes are different patterns.
	pub fn is_same(&self, other: &UrlPattern) -> bool {
		match (self, other) {
			(UrlPattern::Glob(a), UrlPattern::Glob(b)) => a == b,
			(UrlPattern::Regex(a), UrlPattern::Regex(b)) => Arc::ptr_eq(a, b),
			(UrlPattern::Predicate(a), UrlPattern::Predicate(b)) => {
				std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
			}
			_ => false,
		}
	}
}

impl From<&str> for UrlPattern {
	fn from(pattern: &str) -> Self {
		UrlPattern::Glob(pattern.to_string())
	}
}

impl From<String> for UrlPattern {
	fn from(pattern: String) -> Self {
		UrlPattern::Glob(pattern)
	}
}

impl From<Regex> for UrlPattern {
	fn from(regex: Regex) -> Self {
		UrlPattern::regex(regex)
	}
}

impl From<Arc<Regex>> for UrlPattern {
	fn from(regex: Arc<Regex>) -> Self {
		UrlPattern::Regex(regex)
	}
}

impl fmt::Debug for UrlPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UrlPattern::Glob(glob) => f.debug_tuple("Glob").field(glob).finish(),
			UrlPattern::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
			UrlPattern::Predicate(_) => f.write_str("Predicate(..)"),
		}
	}
}

#[derive(Clone)]
enum Compiled {
	Glob(glob::Pattern),
	Regex(Arc<Regex>),
	Predicate(UrlPredicate),
}

/// Compiled matcher for one registered [`UrlPattern`].
///
/// Immutable after construction.
#[derive(Clone)]
pub struct UrlMatcher {
	pattern: UrlPattern,
	compiled: Compiled,
}

impl UrlMatcher {
	/// Compiles `pattern`, resolving relative globs against `base_url`.
	///
	/// A glob that does not start with `*` is joined onto the base URL before
	/// it is compiled. The original pattern is kept for identity checks.
	pub fn new(pattern: impl Into<UrlPattern>, base_url: Option<&str>) -> Self {
		let pattern = pattern.into();
		let compiled = match &pattern {
			UrlPattern::Glob(glob) => {
				let resolved = match base_url {
					Some(base) if !glob.starts_with('*') => join_base_url(base, glob),
					_ => glob.clone(),
				};
				Compiled::Glob(compile_glob(&resolved))
			}
			UrlPattern::Regex(regex) => Compiled::Regex(Arc::clone(regex)),
			UrlPattern::Predicate(predicate) => Compiled::Predicate(Arc::clone(predicate)),
		};
		Self { pattern, compiled }
	}

	/// Returns `true` if the URL matches this pattern.
	pub fn matches(&self, url: &str) -> bool {
		match &self.compiled {
			Compiled::Glob(glob) => glob.matches(url),
			Compiled::Regex(regex) => regex.is_match(url),
			Compiled::Predicate(predicate) => predicate(url),
		}
	}

	/// Returns the pattern this matcher was registered with.
	pub fn pattern(&self) -> &UrlPattern {
		&self.pattern
	}

	/// Returns the compiled glob, after base URL resolution.
	pub fn glob(&self) -> Option<&str> {
		match &self.compiled {
			Compiled::Glob(glob) => Some(glob.as_str()),
			_ => None,
		}
	}
}

impl fmt::Debug for UrlMatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UrlMatcher")
			.field("pattern", &self.pattern)
			.field("glob", &self.glob())
			.finish()
	}
}

fn join_base_url(base: &str, pattern: &str) -> String {
	match url::Url::parse(base).and_then(|base| base.join(pattern)) {
		Ok(joined) => joined.to_string(),
		Err(_) => format!(
			"{}/{}",
			base.trim_end_matches('/'),
			pattern.trim_start_matches('/')
		),
	}
}

/// Compiles a URL glob, falling back to literal matching on invalid patterns.
///
/// URLs are not paths: `*` already crosses `/`, so runs of `*` are collapsed
/// into one before compiling.
fn compile_glob(pattern: &str) -> glob::Pattern {
	let mut collapsed = String::with_capacity(pattern.len());
	for c in pattern.chars() {
		if c == '*' && collapsed.ends_with('*') {
			continue;
		}
		collapsed.push(c);
	}

	glob::Pattern::new(&collapsed).unwrap_or_else(|err| {
		tracing::warn!(pattern, error = %err, "invalid URL glob, matching literally");
		glob::Pattern::new(&glob::Pattern::escape(pattern))
			.expect("escaped pattern is always valid")
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_glob_matches_any_depth() {
		let matcher = UrlMatcher::new("**/login", None);
		assert!(matcher.matches("https://x.test/app/login"));
		assert!(matcher.matches("https://x.test/login"));
		assert!(!matcher.matches("https://x.test/logout"));
	}

	#[test]
	fn test_glob_extension() {
		let matcher = UrlMatcher::new("**/*.png", None);
		assert!(matcher.matches("https://example.com/image.png"));
		assert!(matcher.matches("https://example.com/path/to/image.png"));
		assert!(!matcher.matches("https://example.com/image.jpg"));
	}

	#[test]
	fn test_glob_exact() {
		let matcher = UrlMatcher::new("https://example.com/api", None);
		assert!(matcher.matches("https://example.com/api"));
		assert!(!matcher.matches("https://example.com/api/v2"));
	}

	#[test]
	fn test_relative_glob_joins_base_url() {
		let matcher = UrlMatcher::new("login", Some("https://x.test/"));
		assert_eq!(matcher.glob(), Some("https://x.test/login"));
		assert!(matcher.matches("https://x.test/login"));
		assert!(matcher.pattern().is_same(&"login".into()));
	}

	#[test]
	fn test_wildcard_glob_ignores_base_url() {
		let matcher = UrlMatcher::new("**/api", Some("https://x.test/"));
		assert_eq!(matcher.glob(), Some("*/api"));
		assert!(matcher.matches("https://other.test/api"));
	}

	#[test]
	fn test_unparsable_base_url_is_path_joined() {
		let matcher = UrlMatcher::new("/login", Some("not a url/"));
		assert_eq!(matcher.glob(), Some("not a url/login"));
	}

	#[test]
	fn test_invalid_glob_matches_literally() {
		let matcher = UrlMatcher::new("https://x.test/[", None);
		assert!(matcher.matches("https://x.test/["));
		assert!(!matcher.matches("https://x.test/a"));
	}

	#[test]
	fn test_regex_matches_anywhere() {
		let matcher = UrlMatcher::new(Regex::new(r"/api/v\d").unwrap(), Some("https://x.test/"));
		assert!(matcher.matches("https://x.test/api/v2/users"));
		assert!(!matcher.matches("https://x.test/api/"));
		assert_eq!(matcher.glob(), None);
	}

	#[test]
	fn test_predicate() {
		let matcher = UrlMatcher::new(UrlPattern::predicate(|url| url.ends_with(".js")), None);
		assert!(matcher.matches("https://x.test/app.js"));
		assert!(!matcher.matches("https://x.test/app.css"));
	}

	#[test]
	fn test_pattern_identity() {
		let regex = Arc::new(Regex::new("a").unwrap());
		let same = UrlPattern::Regex(Arc::clone(&regex));
		let twin = UrlPattern::regex(Regex::new("a").unwrap());
		assert!(UrlPattern::Regex(regex).is_same(&same));
		assert!(!same.is_same(&twin));

		assert!(UrlPattern::glob("**/a").is_same(&"**/a".into()));
		assert!(!UrlPattern::glob("**/a").is_same(&twin));

		let predicate = UrlPattern::predicate(|_| true);
		assert!(predicate.is_same(&predicate.clone()));
		assert!(!predicate.is_same(&UrlPattern::predicate(|_| true)));
	}
}
