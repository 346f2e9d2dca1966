//! Read and write `APEv2` tags, the metadata format used by Monkey's Audio,
//! Musepack and WavPack files (and occasionally appended to MP3s).
//!
//! An APE tag is a sequence of key/value items between an optional header and
//! a fixed-size footer, both starting with the magic bytes `APETAGEX`. This
//! crate decodes that byte region into an [`ApeTag`], lets you mutate it
//! through typed accessors or a generic property interface, and renders it
//! back to bytes. Corrupt or truncated input never panics or errors; parsing
//! keeps whatever decoded cleanly and drops the rest.
//!
//! # Examples
//!
//! ## Building and rendering a tag
//! ```
//! use apetag::ApeTag;
//!
//! let mut tag = ApeTag::new();
//! tag.set_title("Foo title");
//! tag.set_artist("Bar artist");
//! tag.set_year(1984);
//!
//! assert_eq!(tag.title(), Some("Foo title"));
//!
//! let bytes = tag.render().unwrap();
//! assert!(bytes.starts_with(apetag::APE_PREAMBLE));
//! ```
//!
//! ## Reading a tag back
//! ```
//! use apetag::{ApeFooter, ApeTag};
//! use std::io::Cursor;
//!
//! let mut tag = ApeTag::new();
//! tag.set_album("Baz album");
//! let bytes = tag.render().unwrap();
//!
//! // The footer is the last 32 bytes of the tag region
//! let footer_location = bytes.len() as u64 - u64::from(ApeFooter::SIZE);
//! let parsed = ApeTag::read_from(&mut Cursor::new(bytes), footer_location).unwrap();
//!
//! assert_eq!(parsed.album(), Some("Baz album"));
//! ```
//!
//! ## The generic property interface
//! ```
//! use apetag::{ApeTag, PropertyMap};
//!
//! let mut properties = PropertyMap::new();
//! properties.insert("TRACKNUMBER", vec![String::from("5")]);
//!
//! let mut tag = ApeTag::new();
//! let invalid = tag.set_properties(&properties);
//!
//! assert!(invalid.is_empty());
//! // Stored under the on-disk key `TRACK`
//! assert_eq!(tag.track(), 5);
//! ```

#![deny(clippy::pedantic, clippy::all, missing_docs)]
#![allow(
	clippy::too_many_lines,
	clippy::cast_possible_truncation,
	clippy::module_name_repetitions,
	clippy::must_use_candidate,
	clippy::doc_markdown,
	clippy::match_wildcard_for_single_variants,
	clippy::semicolon_if_nothing_returned
)]

mod constants;
pub use crate::constants::APE_PREAMBLE;

mod error;
pub use crate::error::{ApeError, Result};

mod footer;
pub use crate::footer::ApeFooter;

mod properties;
pub use crate::properties::PropertyMap;

mod tag;
pub use crate::tag::{ApeItem, ApeTag, ItemValue};
