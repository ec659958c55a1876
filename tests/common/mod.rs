#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Temporary repository with one commit containing README.md and VERSION
pub fn setup_test_repo(version: &str) -> (TempDir, Repository, Oid) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    fs::write(temp_dir.path().join("README.md"), b"Initial content\n")
        .expect("Could not write README");
    fs::write(temp_dir.path().join("VERSION"), format!("{}\n", version))
        .expect("Could not write VERSION");

    let head = commit_all(&repo, "Initial commit");
    (temp_dir, repo, head)
}

/// Stage README.md and VERSION and commit on HEAD
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().expect("Could not get index");
    for file in ["README.md", "VERSION"] {
        index
            .add_path(Path::new(file))
            .expect("Could not add file to index");
    }
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let signature = repo.signature().expect("Could not get sig");

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("HEAD is not a commit")],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<_> = parents.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parent_refs,
    )
    .expect("Could not create commit")
}

/// Lightweight tag on `target`
pub fn lightweight_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).unwrap();
    repo.tag_lightweight(name, &object, false)
        .expect("Could not create tag");
}

/// Annotated tag on `target`
pub fn annotated_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).unwrap();
    let signature = Signature::now("Someone Else", "else@example.com").unwrap();
    repo.tag(name, &object, &signature, name, false)
        .expect("Could not create tag");
}

/// Commit a tag name points at, peeling annotated tags
pub fn tag_target(repo: &Repository, name: &str) -> Option<Oid> {
    let reference = repo.find_reference(&format!("refs/tags/{}", name)).ok()?;
    Some(reference.peel_to_commit().ok()?.id())
}

/// Names of all tags, sorted
pub fn tag_names(repo: &Repository) -> Vec<String> {
    let mut names: Vec<String> = repo
        .tag_names(None)
        .unwrap()
        .iter()
        .flatten()
        .map(str::to_string)
        .collect();
    names.sort();
    names
}
