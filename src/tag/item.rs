use crate::constants::INVALID_KEYS;
use crate::error::{ApeError, Result};

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// The value of an [`ApeItem`]
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ItemValue {
	/// A list of UTF-8 strings; on disk the values are joined with a NUL byte
	Text(Vec<String>),
	/// Opaque binary data
	Binary(Vec<u8>),
	/// A reference to external data, such as a URL
	Locator(Vec<u8>),
}

impl ItemValue {
	fn type_code(&self) -> u32 {
		match self {
			Self::Text(_) => 0,
			Self::Binary(_) => 1,
			Self::Locator(_) => 2,
		}
	}
}

/// Represents an APE tag item
///
/// The restrictions for `APE` lie in the key rather than the value,
/// so an item is constructed through [`ApeItem::new`], which rejects
/// illegal keys. Every constructed item is known to have a valid key.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ApeItem {
	pub(crate) read_only: bool,
	pub(crate) key: String,
	pub(crate) value: ItemValue,
}

impl ApeItem {
	/// Create an [`ApeItem`]
	///
	/// # Errors
	///
	/// * `key` has a bad length (must be 2 to 255, inclusive)
	/// * `key` contains invalid characters (must be in the range 0x20 to 0x7E, inclusive)
	/// * `key` is illegal ("ID3", "TAG", "OGGS", "MP+")
	pub fn new(key: String, value: ItemValue) -> Result<Self> {
		Self::validate_key(&key)?;

		Ok(Self {
			read_only: false,
			key,
			value,
		})
	}

	/// Create a [`ItemValue::Text`] item holding a single value
	///
	/// # Errors
	///
	/// Same as [`ApeItem::new`]
	pub fn text(key: &str, value: &str) -> Result<Self> {
		Self::new(
			String::from(key),
			ItemValue::Text(vec![String::from(value)]),
		)
	}

	/// Whether `key` is legal as an APE item key
	///
	/// The same rule applies to keys read from untrusted bytes and keys
	/// provided by a caller.
	pub fn is_valid_key(key: &str) -> bool {
		Self::validate_key(key).is_ok()
	}

	fn validate_key(key: &str) -> Result<()> {
		if !(2..=255).contains(&key.len()) {
			return Err(ApeError::Ape(
				"Tag item key has an invalid length (< 2 || > 255)",
			));
		}

		if key.bytes().any(|b| !(0x20..=0x7E).contains(&b)) {
			return Err(ApeError::Ape("Tag item key contains invalid characters"));
		}

		if INVALID_KEYS.contains(&&*key.to_uppercase()) {
			return Err(ApeError::Ape("Tag item contains an illegal key"));
		}

		Ok(())
	}

	/// Make the item read only
	pub fn set_read_only(&mut self) {
		self.read_only = true;
	}

	/// Whether the item is marked read only
	pub fn read_only(&self) -> bool {
		self.read_only
	}

	/// Returns the item key
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the item value
	pub fn value(&self) -> &ItemValue {
		&self.value
	}

	/// Returns the value list for a [`ItemValue::Text`] item
	pub fn values(&self) -> Option<&[String]> {
		match &self.value {
			ItemValue::Text(values) => Some(values),
			_ => None,
		}
	}

	pub(crate) fn append_value(&mut self, value: String) {
		if let ItemValue::Text(values) = &mut self.value {
			values.push(value);
		}
	}

	/// Decodes a single item record from the start of `data`
	///
	/// The record layout is a little-endian u32 value size, a little-endian
	/// u32 flags field, a NUL terminated key and exactly `value size` value
	/// bytes.
	///
	/// # Errors
	///
	/// * The record is shorter than the 11 byte minimum, has no key/value
	///   separator, or the value size points past the end of `data`
	/// * The key or a text value is not UTF-8, or the key is illegal
	/// * The flags hold an unknown item type
	pub fn parse(data: &[u8]) -> Result<Self> {
		if data.len() < 11 {
			return Err(ApeError::Ape("Item record is too short"));
		}

		let value_size = LittleEndian::read_u32(&data[..4]) as usize;
		let flags = LittleEndian::read_u32(&data[4..8]);

		let key_length = data[8..]
			.iter()
			.position(|&b| b == 0)
			.ok_or(ApeError::Ape("Item record has no key/value separator"))?;

		let key = String::from_utf8(data[8..8 + key_length].to_vec())
			.map_err(|_| ApeError::Ape("Tag item contains a non UTF-8 key"))?;

		let value_start = 8 + key_length + 1;
		let value_end = value_start
			.checked_add(value_size)
			.filter(|&end| end <= data.len())
			.ok_or(ApeError::Ape("Item value runs past the end of the record"))?;

		let value = &data[value_start..value_end];

		let read_only = (flags & 1) == 1;
		let item_type = (flags & 6) >> 1;

		let parsed_value = match item_type {
			0 => ItemValue::Text(split_text_value(value)?),
			1 => ItemValue::Binary(value.to_vec()),
			2 => ItemValue::Locator(value.to_vec()),
			_ => return Err(ApeError::Ape("Tag item contains an invalid item type")),
		};

		let mut item = Self::new(key, parsed_value)?;

		if read_only {
			item.set_read_only();
		}

		Ok(item)
	}

	/// Encodes the item into its on-disk record
	///
	/// # Errors
	///
	/// The value does not fit in the u32 size field
	pub fn render(&self) -> Result<Vec<u8>> {
		let value = match &self.value {
			ItemValue::Text(values) => values.join("\0").into_bytes(),
			ItemValue::Binary(value) | ItemValue::Locator(value) => value.clone(),
		};

		if value.len() as u64 > u64::from(u32::MAX) {
			return Err(ApeError::TooMuchData);
		}

		let mut flags = self.value.type_code() << 1;

		if self.read_only {
			flags |= 1;
		}

		let mut data = Vec::with_capacity(9 + self.key.len() + value.len());

		data.write_u32::<LittleEndian>(value.len() as u32)?;
		data.write_u32::<LittleEndian>(flags)?;
		data.write_all(self.key.as_bytes())?;
		data.write_u8(0)?;
		data.write_all(&value)?;

		Ok(data)
	}
}

fn split_text_value(value: &[u8]) -> Result<Vec<String>> {
	if value.is_empty() {
		return Ok(Vec::new());
	}

	value
		.split(|&b| b == 0)
		.map(|part| {
			String::from_utf8(part.to_vec()).map_err(|_| {
				ApeError::Ape("Expected a string value based on flags, found binary data")
			})
		})
		.collect()
}
