//! Domain logic - pure version and tag rules independent of git operations

pub mod tag;
pub mod version;

pub use tag::Tag;
pub use version::{floor_version, is_newer, largest_for_major, parse_tag_version, parse_version};
