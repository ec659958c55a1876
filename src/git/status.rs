use std::fmt;

use git2::Status;

/// One changed path in the working tree, in `git status --short` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Two-character status code, index column then worktree column
    pub code: String,
    pub path: String,
}

impl StatusEntry {
    pub fn new(code: impl Into<String>, path: impl Into<String>) -> Self {
        StatusEntry {
            code: code.into(),
            path: path.into(),
        }
    }

    /// Build an entry from libgit2 status flags.
    ///
    /// Returns `None` for flags that do not make the tree dirty (current or
    /// ignored).
    pub fn from_git2(status: Status, path: impl Into<String>) -> Option<Self> {
        if status.is_empty() || status.is_ignored() {
            return None;
        }
        if status.is_conflicted() {
            return Some(StatusEntry::new("UU", path));
        }
        if status.is_wt_new() && !index_changed(status) {
            return Some(StatusEntry::new("??", path));
        }

        let index = if status.is_index_new() {
            'A'
        } else if status.is_index_modified() {
            'M'
        } else if status.is_index_deleted() {
            'D'
        } else if status.is_index_renamed() {
            'R'
        } else if status.is_index_typechange() {
            'T'
        } else {
            ' '
        };

        let worktree = if status.is_wt_modified() {
            'M'
        } else if status.is_wt_deleted() {
            'D'
        } else if status.is_wt_renamed() {
            'R'
        } else if status.is_wt_typechange() {
            'T'
        } else {
            ' '
        };

        Some(StatusEntry::new(format!("{}{}", index, worktree), path))
    }
}

fn index_changed(status: Status) -> bool {
    status.intersects(
        Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE,
    )
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.path)
    }
}

/// Snapshot of uncommitted changes. Empty means clean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    entries: Vec<StatusEntry>,
}

impl WorktreeStatus {
    pub fn new(entries: Vec<StatusEntry>) -> Self {
        WorktreeStatus { entries }
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }
}

impl fmt::Display for WorktreeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
