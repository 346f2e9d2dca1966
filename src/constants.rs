/// The magic bytes every APE tag header and footer begins with
pub const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";

/// Keys that can never be used for an item, as they collide
/// with other metadata formats or stream markers
pub(crate) const INVALID_KEYS: [&str; 4] = ["ID3", "TAG", "OGGS", "MP+"];

// Conversions of tag keys between the canonical property names
// and what's usual for APE tags
//                  canonical,       APE
pub(crate) const KEY_CONVERSIONS: [(&str, &str); 7] = [
	("TRACKNUMBER", "TRACK"),
	("DATE", "YEAR"),
	("ALBUMARTIST", "ALBUM ARTIST"),
	("DISCNUMBER", "DISC"),
	("REMIXER", "MIXARTIST"),
	("RELEASESTATUS", "MUSICBRAINZ_ALBUMSTATUS"),
	("RELEASETYPE", "MUSICBRAINZ_ALBUMTYPE"),
];
