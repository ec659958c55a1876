use semver::Version;

/// Represents a git tag by its display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Full release tag for a version (e.g., 1.2.3 -> "v1.2.3")
    pub fn release(version: &Version) -> Self {
        Tag::new(format!("v{}", version))
    }

    /// Floating major-version alias for a version (e.g., 1.2.3 -> "v1")
    pub fn major_alias(version: &Version) -> Self {
        Tag::new(format!("v{}", version.major))
    }

    /// Whether the name has at least three dot-separated components.
    ///
    /// Only such names are treated as candidate version tags; anything shorter
    /// ("v1", "v1.2", "nightly") is not a full version tag.
    pub fn looks_like_full_version(&self) -> bool {
        self.name.split('.').count() >= 3
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
