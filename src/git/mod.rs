//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of Git
//! operations the tagger needs, allowing for a real libgit2-backed
//! implementation and an in-memory mock for testing.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Tagging logic depends on the [Repository] trait rather than on a concrete
//! implementation.
//!
//! ```rust
//! # use semver_tag::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let head = repo.head_commit()?;
//! for name in repo.tag_names()? {
//!     println!("{} (HEAD is {})", name, head);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;
pub mod status;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use status::{StatusEntry, WorktreeStatus};

use crate::error::Result;
use git2::Oid;

/// Identity recorded on annotated tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAuthor {
    pub name: String,
    pub email: String,
}

impl TagAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        TagAuthor {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::TagError]
/// variants with context describing the failed operation.
pub trait Repository {
    /// Display names of every tag in the repository.
    ///
    /// For annotated tags this is the name stored in the tag object; for
    /// lightweight tags it is the short reference name (`refs/tags/v1.0.0`
    /// becomes `v1.0.0`). Order is unspecified.
    fn tag_names(&self) -> Result<Vec<String>>;

    /// Object ID of the commit HEAD points at
    fn head_commit(&self) -> Result<Oid>;

    /// Current working tree status, including untracked files
    fn worktree_status(&self) -> Result<WorktreeStatus>;

    /// Delete the tag reference `name`
    ///
    /// # Returns
    /// * `Ok(())` - The tag existed and was removed
    /// * `Err` - The tag does not exist or could not be removed
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Create an annotated tag `name` pointing at commit `target`.
    ///
    /// Fails if a tag with the same name already exists.
    ///
    /// # Returns
    /// * `Ok(Oid)` - Object ID of the new tag object
    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        author: &TagAuthor,
        message: &str,
    ) -> Result<Oid>;
}
