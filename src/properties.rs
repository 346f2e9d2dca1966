use std::collections::BTreeMap;
use std::collections::btree_map;

/// A generic, format-agnostic property container
///
/// Keys are canonical property names (`TITLE`, `TRACKNUMBER`, ...) and are
/// normalized to upper case on insertion. Each key maps to an ordered list
/// of values. Items that cannot be represented as key/value strings end up
/// in the [`unsupported`](PropertyMap::unsupported) side list instead.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PropertyMap {
	values: BTreeMap<String, Vec<String>>,
	unsupported: Vec<String>,
}

impl PropertyMap {
	/// Creates an empty map
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `values` to the entry under the upper-cased `key`,
	/// creating the entry if it does not exist
	pub fn insert(&mut self, key: &str, values: Vec<String>) {
		self.values
			.entry(key.to_uppercase())
			.or_default()
			.extend(values);
	}

	/// Removes an entry, returning its values if it existed
	pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
		self.values.remove(&key.to_uppercase())
	}

	/// Whether an entry exists under `key`
	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(&key.to_uppercase())
	}

	/// Returns the values stored under `key`
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.values.get(&key.to_uppercase()).map(Vec::as_slice)
	}

	/// Iterates over all entries in key order
	pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
		self.values.iter()
	}

	/// The number of entries
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether the map holds no entries and no unsupported keys
	pub fn is_empty(&self) -> bool {
		self.values.is_empty() && self.unsupported.is_empty()
	}

	/// Keys of items that could not be represented in this map
	pub fn unsupported(&self) -> &[String] {
		&self.unsupported
	}

	/// Records the key of an item that could not be represented
	pub fn add_unsupported(&mut self, key: String) {
		self.unsupported.push(key);
	}
}

impl<'a> IntoIterator for &'a PropertyMap {
	type Item = (&'a String, &'a Vec<String>);
	type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::PropertyMap;

	use pretty_assertions::assert_eq;

	#[test]
	fn keys_are_case_insensitive() {
		let mut map = PropertyMap::new();
		map.insert("Title", vec![String::from("Foo")]);

		assert!(map.contains("TITLE"));
		assert!(map.contains("title"));
		assert_eq!(map.get("tItLe"), Some(&[String::from("Foo")][..]));
	}

	#[test]
	fn insert_appends_to_existing_values() {
		let mut map = PropertyMap::new();
		map.insert("ARTIST", vec![String::from("Foo")]);
		map.insert("artist", vec![String::from("Bar")]);

		assert_eq!(map.len(), 1);
		assert_eq!(
			map.get("ARTIST"),
			Some(&[String::from("Foo"), String::from("Bar")][..])
		);
	}

	#[test]
	fn unsupported_keys_are_tracked_separately() {
		let mut map = PropertyMap::new();
		map.add_unsupported(String::from("Cover Art (Front)"));

		assert!(!map.is_empty());
		assert_eq!(map.len(), 0);
		assert_eq!(map.unsupported(), &[String::from("Cover Art (Front)")]);
	}
}
