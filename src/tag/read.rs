use super::item::ApeItem;

use byteorder::{ByteOrder, LittleEndian};

use log::warn;

/// The smallest possible item record: size (4) + flags (4) + a one byte
/// key + NUL + an empty value. Shorter keys are invalid, but this is the
/// point past which no record can possibly start.
const MIN_ITEM_SIZE: usize = 11;

/// Outcome of decoding one record at the current offset
///
/// A missing separator or an out-of-range value length means the buffer's
/// self-describing offsets can no longer be trusted, so the whole walk
/// stops. An invalid key leaves the offset bookkeeping intact, so only
/// that record is dropped.
enum ParseStep {
	Item(ApeItem, usize),
	Skip(usize),
	Abort,
}

/// Walks the tag body, decoding up to `item_count` records
///
/// Returns the items decoded before the first unrecoverable corruption,
/// if any. Never fails; corrupt input shortens the result.
pub(crate) fn parse_items(body: &[u8], item_count: u32) -> Vec<ApeItem> {
	let mut items = Vec::new();

	if body.len() < MIN_ITEM_SIZE {
		return items;
	}

	let mut pos = 0;

	for _ in 0..item_count {
		if pos + MIN_ITEM_SIZE > body.len() {
			break;
		}

		match next_item(body, pos) {
			ParseStep::Item(item, next) => {
				items.push(item);
				pos = next;
			},
			ParseStep::Skip(next) => pos = next,
			ParseStep::Abort => break,
		}
	}

	items
}

fn next_item(body: &[u8], pos: usize) -> ParseStep {
	// The key starts 8 bytes into the record and runs to the first NUL
	let Some(key_length) = body[pos + 8..].iter().position(|&b| b == 0) else {
		warn!("Couldn't find a key/value separator. Stopped parsing.");
		return ParseStep::Abort;
	};

	let value_length = u64::from(LittleEndian::read_u32(&body[pos..pos + 4]));

	// Widened arithmetic; a hostile length must not wrap the bounds check
	let size = body.len() as u64;
	if value_length >= size || pos as u64 > size - value_length {
		warn!("Invalid item value length. Stopped parsing.");
		return ParseStep::Abort;
	}

	let next = pos + key_length + value_length as usize + 9;

	if !(2..=255).contains(&key_length)
		|| !matches!(std::str::from_utf8(&body[pos + 8..pos + 8 + key_length]), Ok(key) if ApeItem::is_valid_key(key))
	{
		warn!("Skipped an item due to an invalid key.");
		return ParseStep::Skip(next);
	}

	match ApeItem::parse(&body[pos..]) {
		Ok(item) => ParseStep::Item(item, next),
		Err(_) => {
			// The length fields were sound, so scanning can resume at the
			// next record even though this one didn't decode
			warn!("Skipped an undecodable item.");
			ParseStep::Skip(next)
		},
	}
}

#[cfg(test)]
mod tests {
	use super::parse_items;
	use crate::tag::item::{ApeItem, ItemValue};

	use pretty_assertions::assert_eq;

	fn record(key: &[u8], value: &[u8], flags: u32) -> Vec<u8> {
		let mut data = Vec::new();
		data.extend_from_slice(&(value.len() as u32).to_le_bytes());
		data.extend_from_slice(&flags.to_le_bytes());
		data.extend_from_slice(key);
		data.push(0);
		data.extend_from_slice(value);
		data
	}

	fn text_item(key: &str, value: &str) -> ApeItem {
		ApeItem::text(key, value).unwrap()
	}

	#[test]
	fn parses_every_valid_record() {
		let mut body = record(b"TITLE", b"Foo title", 0);
		body.extend(record(b"ARTIST", b"Bar artist", 0));

		let items = parse_items(&body, 2);

		assert_eq!(
			items,
			vec![
				text_item("TITLE", "Foo title"),
				text_item("ARTIST", "Bar artist")
			]
		);
	}

	#[test]
	fn stops_at_item_count() {
		let mut body = record(b"TITLE", b"Foo title", 0);
		body.extend(record(b"ARTIST", b"Bar artist", 0));

		assert_eq!(parse_items(&body, 1), vec![text_item("TITLE", "Foo title")]);
	}

	#[test]
	fn short_buffer_yields_nothing() {
		assert!(parse_items(&[0; 10], 5).is_empty());
		assert!(parse_items(&[], 5).is_empty());
	}

	#[test]
	fn bad_value_length_stops_the_parse() {
		let mut body = record(b"TITLE", b"Foo title", 0);
		let second = body.len();
		body.extend(record(b"ARTIST", b"Bar artist", 0));
		body.extend(record(b"ALBUM", b"Baz album", 0));
		// Point the second record's length field far past the buffer end
		body[second..second + 4].copy_from_slice(&u32::MAX.to_le_bytes());

		// The first item survives, everything after the corruption is lost
		assert_eq!(parse_items(&body, 3), vec![text_item("TITLE", "Foo title")]);
	}

	#[test]
	fn missing_separator_stops_the_parse() {
		let mut body = record(b"TITLE", b"Foo title", 0);
		body.extend_from_slice(&2_u32.to_le_bytes());
		body.extend_from_slice(&0_u32.to_le_bytes());
		body.extend_from_slice(b"NO SEPARATOR HERE");

		assert_eq!(parse_items(&body, 2), vec![text_item("TITLE", "Foo title")]);
	}

	#[test]
	fn invalid_key_skips_only_that_record() {
		let mut body = record(b"ID3", b"reserved", 0);
		body.extend(record(b"TITLE", b"Foo title", 0));

		assert_eq!(parse_items(&body, 2), vec![text_item("TITLE", "Foo title")]);
	}

	#[test]
	fn one_byte_key_skips_only_that_record() {
		let mut body = record(b"X", b"value", 0);
		body.extend(record(b"TITLE", b"Foo title", 0));

		assert_eq!(parse_items(&body, 2), vec![text_item("TITLE", "Foo title")]);
	}

	#[test]
	fn binary_records_are_decoded() {
		let body = record(b"Cover Art (Front)", &[1, 2, 3], 1 << 1);
		let items = parse_items(&body, 1);

		assert_eq!(items.len(), 1);
		assert_eq!(items[0].value(), &ItemValue::Binary(vec![1, 2, 3]));
	}
}
