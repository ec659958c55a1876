use crate::error::{Result, TagError};
use crate::git::{StatusEntry, TagAuthor, WorktreeStatus};
use git2::{ErrorCode, ObjectType, Oid, Reference, Repository as Git2Repo, Signature, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository rooted exactly at `path`.
    ///
    /// Parent directories are not searched; `path` must contain the `.git`
    /// directory (or be a bare repository).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::open(path).map_err(|e| {
            TagError::repository(format!(
                "Cannot open git repository at '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn display_name(&self, reference: &Reference<'_>) -> Result<String> {
        let short = String::from_utf8_lossy(reference.shorthand_bytes()).into_owned();

        let oid = match reference.target() {
            Some(oid) => oid,
            None => return Ok(short),
        };

        match self.repo.find_object(oid, None) {
            Ok(object) => Ok(object
                .as_tag()
                .and_then(|tag| tag.name())
                .map(str::to_string)
                .unwrap_or(short)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(short),
            Err(e) => Err(TagError::tag(format!(
                "Cannot read tag object for '{}': {}",
                short, e
            ))),
        }
    }
}

impl super::Repository for Git2Repository {
    fn tag_names(&self) -> Result<Vec<String>> {
        let references = self
            .repo
            .references_glob("refs/tags/*")
            .map_err(|e| TagError::tag(format!("Cannot list tags: {}", e)))?;

        let mut names = Vec::new();
        for reference in references {
            let reference = reference?;
            names.push(self.display_name(&reference)?);
        }

        Ok(names)
    }

    fn head_commit(&self) -> Result<Oid> {
        let head = self
            .repo
            .head()
            .map_err(|e| TagError::repository(format!("Cannot find repo HEAD: {}", e)))?;
        let commit = head.peel_to_commit().map_err(|e| {
            TagError::repository(format!("HEAD does not point at a commit: {}", e))
        })?;

        Ok(commit.id())
    }

    fn worktree_status(&self) -> Result<WorktreeStatus> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .map_err(|e| TagError::repository(format!("Cannot read worktree status: {}", e)))?;

        let entries = statuses
            .iter()
            .filter_map(|entry| {
                let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
                StatusEntry::from_git2(entry.status(), path)
            })
            .collect();

        Ok(WorktreeStatus::new(entries))
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo
            .tag_delete(name)
            .map_err(|e| TagError::tag(format!("Cannot delete tag '{}': {}", name, e)))
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        author: &TagAuthor,
        message: &str,
    ) -> Result<Oid> {
        let object = self
            .repo
            .find_object(target, Some(ObjectType::Commit))
            .map_err(|e| TagError::tag(format!("Cannot find commit {}: {}", target, e)))?;

        let signature = Signature::now(&author.name, &author.email)
            .map_err(|e| TagError::tag(format!("Invalid tagger signature: {}", e)))?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| TagError::tag(format!("Cannot create tag '{}': {}", name, e)))
    }
}
