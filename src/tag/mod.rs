pub(crate) mod ape_tag;
pub(crate) mod item;
mod properties;
pub(crate) mod read;
pub(crate) mod write;

pub use ape_tag::ApeTag;
pub use item::{ApeItem, ItemValue};
