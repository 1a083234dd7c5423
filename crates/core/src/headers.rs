//! Conversion between header maps and the protocol's name/value lists.

use std::collections::HashMap;

use pw_protocol::NameValue;

/// Lists `headers` as `{name, value}` pairs, sorted by name.
pub fn serialize_headers(headers: &HashMap<String, String>) -> Vec<NameValue> {
	let mut serialized: Vec<NameValue> = headers
		.iter()
		.map(|(name, value)| NameValue::new(name.as_str(), value.as_str()))
		.collect();
	serialized.sort_by(|a, b| a.name.cmp(&b.name));
	serialized
}

/// Collects `{name, value}` pairs into a map; a repeated name keeps its last
/// value.
pub fn deserialize_headers(headers: &[NameValue]) -> HashMap<String, String> {
	headers
		.iter()
		.map(|header| (header.name.clone(), header.value.clone()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_serialize_sorted() {
		let headers = HashMap::from([
			("x-b".to_string(), "2".to_string()),
			("x-a".to_string(), "1".to_string()),
		]);
		assert_eq!(
			serialize_headers(&headers),
			vec![NameValue::new("x-a", "1"), NameValue::new("x-b", "2")]
		);
	}

	#[test]
	fn test_deserialize_last_wins() {
		let headers = deserialize_headers(&[
			NameValue::new("set-cookie", "a=1"),
			NameValue::new("content-type", "text/html"),
			NameValue::new("set-cookie", "b=2"),
		]);
		assert_eq!(headers.len(), 2);
		assert_eq!(headers["set-cookie"], "b=2");
	}
}
