use super::ape_tag::ApeTag;
use super::item::ApeItem;
use crate::constants::KEY_CONVERSIONS;
use crate::properties::PropertyMap;

use std::collections::HashSet;

use unicase::UniCase;

impl ApeTag {
	/// Translates the tag into a generic [`PropertyMap`]
	///
	/// Keys are upper-cased and mapped to their canonical property names
	/// (`TRACK` becomes `TRACKNUMBER`, ...). Binary and locator items have
	/// no string representation, so their keys are recorded in the map's
	/// [`unsupported`](PropertyMap::unsupported) list instead.
	pub fn properties(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();

		for item in &self.items {
			let key = item.key().to_uppercase();

			match item.values() {
				Some(values) if !key.is_empty() => {
					let mut name = key.as_str();

					// Some tags need to be handled specially
					for (canonical, on_disk) in &KEY_CONVERSIONS {
						if name == *on_disk {
							name = canonical;
						}
					}

					properties.insert(name, values.to_vec());
				},
				_ => properties.add_unsupported(String::from(item.key())),
			}
		}

		properties
	}

	/// Makes the tag's text content match `properties` exactly
	///
	/// Canonical names are translated back to their APE spellings, text
	/// items absent from the map are removed, and each entry is written
	/// unless the stored values already match. Binary and locator items
	/// are never touched.
	///
	/// Entries whose key is not a legal APE key are returned, with their
	/// values, so the caller can decide how to surface them.
	pub fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		let mut props = properties.clone();

		for (canonical, on_disk) in &KEY_CONVERSIONS {
			if let Some(values) = props.remove(canonical) {
				props.insert(on_disk, values);
			}
		}

		// First check if items need to be removed completely
		let incoming: HashSet<UniCase<&str>> = props
			.iter()
			.map(|(key, _)| UniCase::new(key.as_str()))
			.collect();

		self.items
			.retain(|item| item.values().is_none() || incoming.contains(&UniCase::new(item.key())));

		// Now sync in the "forward direction"
		let mut invalid = PropertyMap::new();

		for (key, values) in &props {
			if !ApeItem::is_valid_key(key) {
				invalid.insert(key, values.clone());
				continue;
			}

			if self.get_key(key).and_then(ApeItem::values) == Some(values.as_slice()) {
				continue;
			}

			if values.is_empty() {
				self.remove_key(key);
				continue;
			}

			if let Some((first, rest)) = values.split_first() {
				self.add_value(key, first, true);

				for value in rest {
					self.add_value(key, value, false);
				}
			}
		}

		invalid
	}

	/// Removes the items behind keys reported as unsupported by
	/// [`ApeTag::properties`]
	pub fn remove_unsupported_properties(&mut self, keys: &[String]) {
		for key in keys {
			self.remove_key(key);
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::properties::PropertyMap;
	use crate::tag::ape_tag::ApeTag;
	use crate::tag::item::{ApeItem, ItemValue};

	use pretty_assertions::assert_eq;

	fn property(key: &str, values: &[&str]) -> PropertyMap {
		let mut map = PropertyMap::new();
		map.insert(key, values.iter().map(|v| String::from(*v)).collect());
		map
	}

	#[test]
	fn alias_round_trip() {
		let mut tag = ApeTag::new();

		let invalid = tag.set_properties(&property("TRACKNUMBER", &["5"]));
		assert!(invalid.is_empty());

		// Stored under the APE spelling, reported under the canonical one
		assert_eq!(tag.get_key("TRACK").unwrap().values(), Some(&[String::from("5")][..]));
		assert!(tag.get_key("TRACKNUMBER").is_none());

		assert_eq!(tag.properties(), property("TRACKNUMBER", &["5"]));
	}

	#[test]
	fn binary_items_survive_the_removal_pass() {
		let mut tag = ApeTag::new();
		tag.set_binary_value("COVER", vec![1, 2, 3]);
		tag.set_title("Foo title");

		tag.set_properties(&property("ARTIST", &["Bar artist"]));

		// The text item was removed, the binary one was not
		assert!(tag.get_key("TITLE").is_none());
		assert_eq!(
			tag.get_key("COVER").unwrap().value(),
			&ItemValue::Binary(vec![1, 2, 3])
		);
		assert_eq!(tag.artist(), Some("Bar artist"));
	}

	#[test]
	fn unsupported_items_are_reported_and_removable() {
		let mut tag = ApeTag::new();
		tag.set_binary_value("Cover Art (Front)", vec![0xFF]);
		tag.set_title("Foo title");

		let properties = tag.properties();
		assert_eq!(
			properties.unsupported(),
			&[String::from("Cover Art (Front)")]
		);
		assert_eq!(properties.get("TITLE"), Some(&[String::from("Foo title")][..]));

		tag.remove_unsupported_properties(properties.unsupported());
		assert!(tag.get_key("Cover Art (Front)").is_none());
		assert_eq!(tag.title(), Some("Foo title"));
	}

	#[test]
	fn invalid_keys_are_returned_not_applied() {
		let mut tag = ApeTag::new();

		let mut incoming = property("TITLE", &["Foo title"]);
		incoming.insert("X", vec![String::from("too short")]);

		let invalid = tag.set_properties(&incoming);

		assert_eq!(tag.items().len(), 1);
		assert_eq!(tag.title(), Some("Foo title"));
		assert_eq!(invalid.get("X"), Some(&[String::from("too short")][..]));
	}

	#[test]
	fn multi_value_entries_apply_in_order() {
		let mut tag = ApeTag::new();
		tag.set_properties(&property("ARTIST", &["Foo", "Bar", "Baz"]));

		assert_eq!(
			tag.get_key("ARTIST").unwrap().values(),
			Some(
				&[
					String::from("Foo"),
					String::from("Bar"),
					String::from("Baz")
				][..]
			)
		);
		assert_eq!(tag.items().len(), 1);
	}

	#[test]
	fn matching_values_leave_the_item_untouched() {
		let mut tag = ApeTag::new();
		tag.insert(ApeItem::text("Title", "Foo title").unwrap());

		tag.set_properties(&property("TITLE", &["Foo title"]));

		// The original casing survives because nothing was rewritten
		assert_eq!(tag.get_key("TITLE").unwrap().key(), "Title");
	}

	#[test]
	fn empty_value_list_removes_the_item() {
		let mut tag = ApeTag::new();
		tag.set_title("Foo title");

		tag.set_properties(&property("TITLE", &[]));

		assert!(tag.is_empty());
	}

	#[test]
	fn locator_items_are_unsupported() {
		let mut tag = ApeTag::new();
		tag.insert(
			ApeItem::new(
				String::from("Buy URL"),
				ItemValue::Locator(b"https://example.com".to_vec()),
			)
			.unwrap(),
		);

		let properties = tag.properties();
		assert_eq!(properties.len(), 0);
		assert_eq!(properties.unsupported(), &[String::from("Buy URL")]);
	}
}
