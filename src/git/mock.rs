use crate::error::{Result, TagError};
use crate::git::{Repository, TagAuthor, WorktreeStatus};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// A tag held by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTag {
    pub target: Oid,
    /// `None` for lightweight tags
    pub author: Option<TagAuthor>,
    pub message: Option<String>,
}

/// Mock repository for testing without actual git operations
///
/// Tags live in an ordered map so assertions can inspect the final state;
/// every mutating call is also counted.
pub struct MockRepository {
    head: Oid,
    tags: RefCell<BTreeMap<String, MockTag>>,
    status: WorktreeStatus,
    mutations: Cell<usize>,
}

impl MockRepository {
    /// Create a new mock repository with HEAD at `head` and a clean worktree
    pub fn new(head: Oid) -> Self {
        MockRepository {
            head,
            tags: RefCell::new(BTreeMap::new()),
            status: WorktreeStatus::default(),
            mutations: Cell::new(0),
        }
    }

    /// Add a lightweight tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.tags.get_mut().insert(
            name.into(),
            MockTag {
                target,
                author: None,
                message: None,
            },
        );
    }

    /// Replace the worktree status reported by [Repository::worktree_status]
    pub fn set_status(&mut self, status: WorktreeStatus) {
        self.status = status;
    }

    /// Look up a tag by name
    pub fn tag(&self, name: &str) -> Option<MockTag> {
        self.tags.borrow().get(name).cloned()
    }

    /// Number of delete or create calls that changed state
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    fn record_mutation(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

impl Repository for MockRepository {
    fn tag_names(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().keys().cloned().collect())
    }

    fn head_commit(&self) -> Result<Oid> {
        Ok(self.head)
    }

    fn worktree_status(&self) -> Result<WorktreeStatus> {
        Ok(self.status.clone())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        match self.tags.borrow_mut().remove(name) {
            Some(_) => {
                self.record_mutation();
                Ok(())
            }
            None => Err(TagError::tag(format!("Tag not found: {}", name))),
        }
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        author: &TagAuthor,
        message: &str,
    ) -> Result<Oid> {
        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(TagError::tag(format!("Tag already exists: {}", name)));
        }
        tags.insert(
            name.to_string(),
            MockTag {
                target,
                author: Some(author.clone()),
                message: Some(message.to_string()),
            },
        );
        self.record_mutation();

        Ok(target)
    }
}
