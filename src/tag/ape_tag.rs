use super::item::{ApeItem, ItemValue};
use super::{read, write};
use crate::constants::APE_PREAMBLE;
use crate::error::Result;
use crate::footer::ApeFooter;

use std::io::{Read, Seek, SeekFrom};

use log::warn;

macro_rules! impl_accessor {
	($($name:ident, $set_name:ident => $key:literal;)+) => {
		impl ApeTag {
			$(
				#[doc = concat!("Returns the first value of the `", $key, "` item")]
				pub fn $name(&self) -> Option<&str> {
					self.first_value($key)
				}

				#[doc = concat!("Replaces the `", $key, "` item with a single value")]
				#[doc = ""]
				#[doc = "An empty value removes the item instead."]
				pub fn $set_name(&mut self, value: &str) {
					self.add_value($key, value, true);
				}
			)+
		}
	}
}

/// An `APE` tag
///
/// ## Item storage
///
/// Items are held in insertion order and looked up by key. While `APE` keys
/// are supposed to be case-sensitive, this rule is rarely followed, so all
/// lookups ignore case. At most one item exists per key.
///
/// ## Reading
///
/// [`ApeTag::read_from`] decodes a tag whose footer begins at a known
/// position. A footer describing an impossible tag size yields an empty
/// tag rather than an error, and corrupt item data keeps whatever decoded
/// cleanly before the corruption.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ApeTag {
	pub(crate) items: Vec<ApeItem>,
	pub(crate) footer: ApeFooter,
}

impl_accessor!(
	title, set_title => "TITLE";
	artist, set_artist => "ARTIST";
	album, set_album => "ALBUM";
	comment, set_comment => "COMMENT";
	genre, set_genre => "GENRE";
);

impl ApeTag {
	/// Creates an empty tag
	pub fn new() -> Self {
		Self::default()
	}

	/// The magic bytes marking an APE tag header or footer, usable to
	/// recognize this tag format at a stream position
	pub fn file_identifier() -> &'static [u8; 8] {
		APE_PREAMBLE
	}

	/// Reads a tag whose footer starts at `footer_location`
	///
	/// If the footer describes a tag size smaller than the footer itself
	/// or larger than the stream, there is no tag to read and an empty tag
	/// is returned.
	///
	/// # Errors
	///
	/// Only I/O errors from `reader`; corrupt tag data is not an error
	pub fn read_from<R>(reader: &mut R, footer_location: u64) -> Result<Self>
	where
		R: Read + Seek,
	{
		let mut tag = Self::new();

		let stream_length = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(footer_location))?;

		let mut block = Vec::with_capacity(ApeFooter::SIZE as usize);
		reader
			.by_ref()
			.take(u64::from(ApeFooter::SIZE))
			.read_to_end(&mut block)?;

		tag.footer.set_data(&block);

		let tag_size = u64::from(tag.footer.tag_size());

		if tag_size <= u64::from(ApeFooter::SIZE) || tag_size > stream_length {
			return Ok(tag);
		}

		// The body ends where the footer starts
		let Some(body_start) = (footer_location + u64::from(ApeFooter::SIZE)).checked_sub(tag_size)
		else {
			return Ok(tag);
		};

		reader.seek(SeekFrom::Start(body_start))?;

		let mut body = vec![0; (tag_size - u64::from(ApeFooter::SIZE)) as usize];
		reader.read_exact(&mut body)?;

		for item in read::parse_items(&body, tag.footer.item_count()) {
			tag.insert(item);
		}

		Ok(tag)
	}

	/// Get an [`ApeItem`] by key
	///
	/// NOTE: While `APE` items are supposed to be case-sensitive,
	/// this rule is rarely followed, so this will ignore case when searching.
	pub fn get_key(&self, key: &str) -> Option<&ApeItem> {
		self.items
			.iter()
			.find(|i| i.key().eq_ignore_ascii_case(key))
	}

	/// Insert an [`ApeItem`]
	///
	/// This will remove any item with the same key prior to insertion
	pub fn insert(&mut self, value: ApeItem) {
		self.remove_key(value.key());
		self.items.push(value);
	}

	/// Remove an [`ApeItem`] by key
	///
	/// NOTE: Like [`ApeTag::get_key`], this is not case-sensitive
	pub fn remove_key(&mut self, key: &str) {
		self.items
			.iter()
			.position(|i| i.key().eq_ignore_ascii_case(key))
			.map(|p| self.items.remove(p));
	}

	/// Adds a text value under `key`
	///
	/// With `replace` set, any existing item under `key` is removed first.
	/// Otherwise the value is appended to an existing text item's value
	/// list. An empty `value` adds nothing, so `replace` plus an empty
	/// value amounts to removal.
	///
	/// An invalid `key` makes this a no-op rather than an error, so a bad
	/// key can never corrupt the tag.
	pub fn add_value(&mut self, key: &str, value: &str, replace: bool) {
		if replace {
			self.remove_key(key);
		}

		if value.is_empty() {
			return;
		}

		// Text items may contain more than one value.
		// Binary or locator items may have only one value, hence always replaced.
		if let Some(existing) = self
			.items
			.iter_mut()
			.find(|i| i.key().eq_ignore_ascii_case(key))
		{
			if existing.values().is_some() {
				existing.append_value(String::from(value));
				return;
			}
		}

		match ApeItem::text(key, value) {
			Ok(item) => self.insert(item),
			Err(_) => warn!("Couldn't add a value due to an invalid key."),
		}
	}

	/// Replaces any item under `key` with a binary item
	///
	/// Empty `value` bytes only remove the existing item. An invalid `key`
	/// is a no-op, like [`ApeTag::add_value`].
	pub fn set_binary_value(&mut self, key: &str, value: Vec<u8>) {
		self.remove_key(key);

		if value.is_empty() {
			return;
		}

		match ApeItem::new(String::from(key), ItemValue::Binary(value)) {
			Ok(item) => self.items.push(item),
			Err(_) => warn!("Couldn't set binary data due to an invalid key."),
		}
	}

	/// Returns all of the tag's items
	pub fn items(&self) -> &[ApeItem] {
		&self.items
	}

	/// Whether the tag has no items
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// The footer read from or written for this tag
	pub fn footer(&self) -> &ApeFooter {
		&self.footer
	}

	/// The release year, `0` when absent or not a number
	pub fn year(&self) -> u32 {
		self.parse_number("YEAR")
	}

	/// Sets the release year; `0` removes the item
	pub fn set_year(&mut self, year: u32) {
		self.set_number("YEAR", year);
	}

	/// The track number, `0` when absent or not a number
	pub fn track(&self) -> u32 {
		self.parse_number("TRACK")
	}

	/// Sets the track number; `0` removes the item
	pub fn set_track(&mut self, track: u32) {
		self.set_number("TRACK", track);
	}

	/// Renders the complete tag: header, item records and footer
	///
	/// The footer's item count and tag size are updated to match the
	/// output. The items are not consumed; rendering the same state twice
	/// yields the same bytes.
	///
	/// # Errors
	///
	/// The encoded tag does not fit in the footer's u32 size field
	pub fn render(&mut self) -> Result<Vec<u8>> {
		write::render(&self.items, &mut self.footer)
	}

	fn first_value(&self, key: &str) -> Option<&str> {
		self.get_key(key)
			.and_then(ApeItem::values)
			.and_then(<[String]>::first)
			.map(String::as_str)
	}

	fn parse_number(&self, key: &str) -> u32 {
		self.first_value(key)
			.and_then(|value| value.parse().ok())
			.unwrap_or(0)
	}

	fn set_number(&mut self, key: &str, number: u32) {
		if number == 0 {
			self.remove_key(key);
		} else {
			self.add_value(key, &number.to_string(), true);
		}
	}
}
