use std::cmp::Ordering;

use semver::Version;

use crate::domain::tag::Tag;
use crate::error::{Result, TagError};

/// Version used when no tag exists for a major line
pub fn floor_version() -> Version {
    Version::new(0, 0, 0)
}

/// Parse a semantic version, accepting a leading 'v' or 'V' (e.g., "v1.2.3")
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let clean = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    Version::parse(clean).map_err(|e| {
        TagError::version(format!("Invalid semantic version '{}': {}", input, e))
    })
}

/// Parse a tag name as a semantic version.
///
/// Stricter than [parse_version]: only a lowercase 'v' prefix is accepted and
/// the name is not trimmed, so `V1.5.0` or ` 1.5.0` are malformed tags.
pub fn parse_tag_version(name: &str) -> Result<Version> {
    let clean = name.strip_prefix('v').unwrap_or(name);

    Version::parse(clean).map_err(|e| {
        TagError::version(format!("Invalid semantic version tag '{}': {}", name, e))
    })
}

/// Returns true when `candidate` takes precedence over `current`.
///
/// Build metadata does not participate in the comparison, so `1.2.3+a` and
/// `1.2.3+b` are considered equal.
pub fn is_newer(candidate: &Version, current: &Version) -> bool {
    candidate.cmp_precedence(current) == Ordering::Greater
}

/// Find the largest version among `tag_names` whose major component is `major`.
///
/// Names with fewer than three dot-separated components are skipped. Names
/// that look like a full version but fail to parse abort the scan.
///
/// # Returns
/// * `Ok(Version)` - The largest matching version, or `0.0.0` if none match
/// * `Err` - If a full-version-looking name is not a valid semantic version
pub fn largest_for_major<I, S>(tag_names: I, major: u64) -> Result<Version>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut largest = floor_version();

    for name in tag_names {
        let tag = Tag::new(name.as_ref());
        if !tag.looks_like_full_version() {
            continue;
        }

        let version = parse_tag_version(&tag.name)?;
        if version.major == major && is_newer(&version, &largest) {
            largest = version;
        }
    }

    Ok(largest)
}
