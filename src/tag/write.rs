use super::item::ApeItem;
use crate::error::{ApeError, Result};
use crate::footer::ApeFooter;

/// Serializes every item once and wraps the records in a header and footer
///
/// The footer's item count, tag size and header flag are updated to match
/// what was written; the items themselves are left untouched.
pub(crate) fn render(items: &[ApeItem], footer: &mut ApeFooter) -> Result<Vec<u8>> {
	let mut records = Vec::new();
	let mut item_count = 0_u32;

	for item in items {
		records.extend(item.render()?);
		item_count += 1;
	}

	if records.len() as u64 + u64::from(ApeFooter::SIZE) > u64::from(u32::MAX) {
		return Err(ApeError::TooMuchData);
	}

	footer.set_item_count(item_count);
	footer.set_tag_size(records.len() as u32 + ApeFooter::SIZE);
	footer.set_header_present(true);

	let mut data = Vec::with_capacity(records.len() + 2 * ApeFooter::SIZE as usize);
	data.extend_from_slice(&footer.render_header());
	data.extend(records);
	data.extend_from_slice(&footer.render_footer());

	Ok(data)
}

#[cfg(test)]
mod tests {
	use super::render;
	use crate::constants::APE_PREAMBLE;
	use crate::footer::ApeFooter;
	use crate::tag::item::ApeItem;

	use pretty_assertions::assert_eq;

	#[test]
	fn render_updates_the_footer() {
		let items = vec![
			ApeItem::text("TITLE", "Foo title").unwrap(),
			ApeItem::text("ARTIST", "Bar artist").unwrap(),
		];

		let mut footer = ApeFooter::new();
		let data = render(&items, &mut footer).unwrap();

		assert_eq!(footer.item_count(), 2);
		assert!(footer.header_present());

		// header + records + footer
		let records_len = data.len() - 2 * ApeFooter::SIZE as usize;
		assert_eq!(footer.tag_size(), records_len as u32 + ApeFooter::SIZE);

		assert!(data.starts_with(APE_PREAMBLE));
		assert!(data[data.len() - 32..].starts_with(APE_PREAMBLE));
	}

	#[test]
	fn empty_tag_renders_header_and_footer_only() {
		let mut footer = ApeFooter::new();
		let data = render(&[], &mut footer).unwrap();

		assert_eq!(data.len(), 64);
		assert_eq!(footer.item_count(), 0);
		assert_eq!(footer.tag_size(), ApeFooter::SIZE);
	}

	#[test]
	fn render_is_idempotent() {
		let items = vec![ApeItem::text("GENRE", "Classical").unwrap()];

		let mut footer = ApeFooter::new();
		let first = render(&items, &mut footer).unwrap();
		let second = render(&items, &mut footer).unwrap();

		assert_eq!(first, second);
	}
}
