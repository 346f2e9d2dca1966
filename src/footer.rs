use crate::constants::APE_PREAMBLE;

use byteorder::{ByteOrder, LittleEndian};

/// The fixed-size structure that closes (and optionally opens) an APE tag
///
/// The footer is 32 bytes:
///
/// * Preamble, `APETAGEX` (8)
/// * Version (4)
/// * Tag size, items plus this footer (4)
/// * Item count (4)
/// * Flags (4)
/// * Reserved, zeroed (8)
///
/// An optional header precedes the items; it is identical to the footer
/// apart from the "this is the header" flag bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApeFooter {
	version: u32,
	tag_size: u32,
	item_count: u32,
	header_present: bool,
	footer_present: bool,
	read_only: bool,
}

impl Default for ApeFooter {
	fn default() -> Self {
		Self {
			version: 2000,
			tag_size: 0,
			item_count: 0,
			header_present: false,
			footer_present: true,
			read_only: false,
		}
	}
}

impl ApeFooter {
	/// The size of an APE header or footer in bytes
	pub const SIZE: u32 = 32;

	/// Creates a footer with no items and a zero tag size
	pub fn new() -> Self {
		Self::default()
	}

	/// Populates the footer from a raw 32 byte block
	///
	/// Anything shorter than [`ApeFooter::SIZE`] or not starting with the
	/// preamble leaves the footer untouched, so a bogus block reads back
	/// as an empty tag rather than garbage sizes.
	pub fn set_data(&mut self, data: &[u8]) {
		if data.len() < Self::SIZE as usize || &data[..8] != APE_PREAMBLE {
			return;
		}

		self.version = LittleEndian::read_u32(&data[8..12]);
		self.tag_size = LittleEndian::read_u32(&data[12..16]);
		self.item_count = LittleEndian::read_u32(&data[16..20]);

		let flags = LittleEndian::read_u32(&data[20..24]);

		self.read_only = flags & 1 == 1;
		self.footer_present = flags & (1 << 30) != 0;
		self.header_present = flags & (1 << 31) != 0;
	}

	/// The tag version, `2000` for APEv2 and `1000` for APEv1
	pub fn version(&self) -> u32 {
		self.version
	}

	/// The size of the tag in bytes, covering all items and the footer
	/// (but not the header)
	pub fn tag_size(&self) -> u32 {
		self.tag_size
	}

	/// Sets the tag size
	pub fn set_tag_size(&mut self, size: u32) {
		self.tag_size = size;
	}

	/// The number of items in the tag
	pub fn item_count(&self) -> u32 {
		self.item_count
	}

	/// Sets the item count
	pub fn set_item_count(&mut self, count: u32) {
		self.item_count = count;
	}

	/// Whether the tag is preceded by a header
	pub fn header_present(&self) -> bool {
		self.header_present
	}

	/// Sets whether the tag is preceded by a header
	pub fn set_header_present(&mut self, present: bool) {
		self.header_present = present;
	}

	/// Renders the 32 byte header
	pub fn render_header(&self) -> [u8; 32] {
		self.render(true)
	}

	/// Renders the 32 byte footer
	pub fn render_footer(&self) -> [u8; 32] {
		self.render(false)
	}

	fn render(&self, is_header: bool) -> [u8; 32] {
		let mut flags = 0_u32;

		if self.read_only {
			flags |= 1;
		}

		// Bit 29 set: this is the header
		// Bit 30 set: tag contains a footer
		// Bit 31 set: tag contains a header
		if is_header {
			flags |= 1 << 29;
		}

		if self.footer_present {
			flags |= 1 << 30;
		}

		if self.header_present {
			flags |= 1 << 31;
		}

		let mut data = [0_u8; 32];

		data[..8].copy_from_slice(APE_PREAMBLE);
		// Always written as version 2000
		// Even if we read a v1 tag, we end up adding a header anyway
		LittleEndian::write_u32(&mut data[8..12], 2000);
		LittleEndian::write_u32(&mut data[12..16], self.tag_size);
		LittleEndian::write_u32(&mut data[16..20], self.item_count);
		LittleEndian::write_u32(&mut data[20..24], flags);
		// The remaining 8 bytes are reserved and stay zeroed

		data
	}
}
