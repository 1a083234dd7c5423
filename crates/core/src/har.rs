//! HAR recording option preparation.

use std::sync::Arc;

use pw_protocol::{HarContentPolicy, HarMode, RecordHarOptions};
use regex::Regex;

/// Which request URLs a HAR recording keeps.
#[derive(Debug, Clone)]
pub enum UrlFilter {
	Glob(String),
	Regex(Arc<Regex>),
}

impl From<&str> for UrlFilter {
	fn from(glob: &str) -> Self {
		UrlFilter::Glob(glob.to_string())
	}
}

impl From<String> for UrlFilter {
	fn from(glob: String) -> Self {
		UrlFilter::Glob(glob)
	}
}

impl From<Regex> for UrlFilter {
	fn from(regex: Regex) -> Self {
		UrlFilter::Regex(Arc::new(regex))
	}
}

/// HAR recording options as accepted from callers.
#[derive(Debug, Clone, Default)]
pub struct RecordHarInputOptions {
	pub path: String,
	pub url: Option<UrlFilter>,
	pub mode: Option<HarMode>,
	pub content: Option<HarContentPolicy>,
	/// Shorthand for `content: Some(HarContentPolicy::Omit)`; ignored when
	/// `content` is set.
	pub omit_content: Option<bool>,
}

/// What a context remembers about an active HAR recording.
#[derive(Debug, Clone, PartialEq)]
pub struct HarRecordingMetadata {
	pub path: String,
	pub content: Option<HarContentPolicy>,
}

impl From<&RecordHarOptions> for HarRecordingMetadata {
	fn from(options: &RecordHarOptions) -> Self {
		Self {
			path: options.path.clone(),
			content: options.content,
		}
	}
}

/// Normalizes caller options into the form the server expects.
pub fn prepare_record_har_options(options: RecordHarInputOptions) -> RecordHarOptions {
	let mut out = RecordHarOptions {
		path: options.path,
		mode: options.mode,
		..Default::default()
	};

	match options.url {
		Some(UrlFilter::Glob(glob)) => out.url_glob = Some(glob),
		Some(UrlFilter::Regex(regex)) => {
			let (source, flags) = convert_regex(&regex);
			out.url_regex_source = Some(source);
			out.url_regex_flags = Some(flags);
		}
		None => {}
	}

	out.content = match options.content {
		Some(content) => Some(content),
		None if options.omit_content == Some(true) => Some(HarContentPolicy::Omit),
		None => None,
	};
	out
}

/// Splits a regex into a JavaScript source and flags.
///
/// A leading inline flag group such as `(?i)` or `(?ms)` becomes the JS flags
/// `i`, `m` and `s`; other inline flags have no JS equivalent and are dropped.
pub fn convert_regex(regex: &Regex) -> (String, String) {
	let pattern = regex.as_str();
	if let Some(rest) = pattern.strip_prefix("(?") {
		if let Some(end) = rest.find(')') {
			let group = &rest[..end];
			if !group.is_empty() && group.chars().all(|c| c.is_ascii_alphabetic()) {
				let flags = ['i', 'm', 's']
					.into_iter()
					.filter(|flag| group.contains(*flag))
					.collect();
				return (rest[end + 1..].to_string(), flags);
			}
		}
	}
	(pattern.to_string(), String::new())
}
