use thiserror::Error;

use crate::git::WorktreeStatus;

/// Unified error type for semver-tag operations
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Dirty git state: {} uncommitted change(s), refusing to tag", .0.len())]
    DirtyWorktree(WorktreeStatus),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in semver-tag
pub type Result<T> = std::result::Result<T, TagError>;

impl TagError {
    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        TagError::Repository(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TagError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TagError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        TagError::Tag(msg.into())
    }
}
