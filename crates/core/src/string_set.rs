//! A small thread-safe string set.

use parking_lot::Mutex;

/// Insertion-ordered set of strings behind a mutex.
///
/// Used to track in-flight identifiers shared between event handlers.
#[derive(Debug, Default)]
pub struct SafeStringSet {
	values: Mutex<Vec<String>>,
}

impl SafeStringSet {
	/// Creates a set from `values`, dropping duplicates.
	pub fn new<I, S>(values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut unique: Vec<String> = Vec::new();
		for value in values {
			let value = value.into();
			if !unique.contains(&value) {
				unique.push(value);
			}
		}
		Self {
			values: Mutex::new(unique),
		}
	}

	/// Adds `value`; returns `false` if it was already present.
	pub fn add(&self, value: impl Into<String>) -> bool {
		let value = value.into();
		let mut values = self.values.lock();
		if values.contains(&value) {
			return false;
		}
		values.push(value);
		true
	}

	/// Removes `value`; returns `false` if it was not present.
	pub fn remove(&self, value: &str) -> bool {
		let mut values = self.values.lock();
		match values.iter().position(|v| v == value) {
			Some(index) => {
				values.remove(index);
				true
			}
			None => false,
		}
	}

	pub fn has(&self, value: &str) -> bool {
		self.values.lock().iter().any(|v| v == value)
	}

	pub fn len(&self) -> usize {
		self.values.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.lock().is_empty()
	}

	/// Returns the current members in insertion order.
	pub fn to_vec(&self) -> Vec<String> {
		self.values.lock().clone()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::thread;

	use super::*;

	#[test]
	fn test_new_drops_duplicates() {
		let set = SafeStringSet::new(["a", "b", "a"]);
		assert_eq!(set.to_vec(), vec!["a", "b"]);
	}

	#[test]
	fn test_add_remove() {
		let set = SafeStringSet::default();
		assert!(set.is_empty());
		assert!(set.add("page@1"));
		assert!(!set.add("page@1"));
		assert!(set.has("page@1"));
		assert_eq!(set.len(), 1);

		assert!(set.remove("page@1"));
		assert!(!set.remove("page@1"));
		assert!(!set.has("page@1"));
	}

	#[test]
	fn test_concurrent_add_keeps_one() {
		let set = Arc::new(SafeStringSet::default());
		let workers: Vec<_> = (0..8)
			.map(|_| {
				let set = Arc::clone(&set);
				thread::spawn(move || {
					for _ in 0..100 {
						set.add("request@7");
					}
				})
			})
			.collect();
		for worker in workers {
			worker.join().unwrap();
		}
		assert_eq!(set.to_vec(), vec!["request@7"]);
	}

	#[test]
	fn test_concurrent_add_remove_per_key() {
		let set = Arc::new(SafeStringSet::default());
		let workers: Vec<_> = (0..4)
			.map(|i| {
				let set = Arc::clone(&set);
				thread::spawn(move || {
					let key = format!("key{i}");
					for _ in 0..50 {
						set.add(key.clone());
						assert!(set.has(&key));
						set.remove(&key);
						assert!(!set.has(&key));
					}
					set.add(key);
				})
			})
			.collect();
		for worker in workers {
			worker.join().unwrap();
		}
		assert_eq!(set.len(), 4);
	}
}
