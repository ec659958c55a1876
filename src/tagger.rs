//! Tagging decision and tag mutation.
//!
//! [Tagger::tag] walks `Start -> VersionParsed -> PreviousVersionFound` and
//! ends in one of three outcomes: no new version, dirty worktree failure, or
//! tags created. Every path that computed both versions returns them.

use std::path::Path;

use semver::Version;

use crate::config::TaggerConfig;
use crate::domain::{is_newer, largest_for_major, parse_version, Tag};
use crate::error::{Result, TagError};
use crate::git::{Git2Repository, Repository};
use crate::report::{Reporter, TagEvent};

/// Process exit code for a successful run (including dry run)
pub const EXIT_CODE_SUCCESS: i32 = 0;
/// Process exit code for any failure
pub const EXIT_CODE_FAILURE: i32 = 1;
/// Process exit code when the requested version is not newer than existing tags
pub const EXIT_CODE_NO_NEW_VERSION: i32 = 8;

/// How a tagging run ended
#[derive(Debug)]
pub enum TagOutcome {
    /// Tags were created, or would have been in a dry run
    Tagged { tags: Vec<String>, dry_run: bool },
    /// The requested version is not newer than the largest existing tag
    NoNewVersion,
    /// Tagging was refused or stopped by an error
    Failed(TagError),
}

/// Versions computed during a run, alongside its outcome
#[derive(Debug)]
pub struct TagReport {
    pub requested: Option<Version>,
    pub previous: Option<Version>,
    pub outcome: TagOutcome,
}

impl TagReport {
    fn failed(requested: Option<Version>, previous: Option<Version>, err: TagError) -> Self {
        TagReport {
            requested,
            previous,
            outcome: TagOutcome::Failed(err),
        }
    }

    /// `v<requested>,v<previous>` when both versions are known
    pub fn summary_line(&self) -> Option<String> {
        match (&self.requested, &self.previous) {
            (Some(requested), Some(previous)) => Some(format!("v{},v{}", requested, previous)),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            TagOutcome::Tagged { .. } => EXIT_CODE_SUCCESS,
            TagOutcome::NoNewVersion => EXIT_CODE_NO_NEW_VERSION,
            TagOutcome::Failed(_) => EXIT_CODE_FAILURE,
        }
    }
}

/// Creates release tags from a validated configuration
pub struct Tagger<'r> {
    config: TaggerConfig,
    reporter: &'r dyn Reporter,
}

impl<'r> Tagger<'r> {
    pub fn new(config: TaggerConfig, reporter: &'r dyn Reporter) -> Self {
        Tagger { config, reporter }
    }

    /// Open the repository rooted at `path` and run [Tagger::tag] against it
    pub fn tag_at<P: AsRef<Path>>(&self, path: P) -> TagReport {
        match Git2Repository::open(path) {
            Ok(repo) => self.tag(&repo),
            Err(e) => TagReport::failed(None, None, e),
        }
    }

    /// Decide whether a new tag is warranted and create it if so.
    pub fn tag<R: Repository>(&self, repo: &R) -> TagReport {
        let requested = match parse_version(&self.config.version) {
            Ok(version) => version,
            Err(e) => {
                self.reporter.report(&TagEvent::InvalidRequestedVersion {
                    requested: self.config.version.clone(),
                    reason: e.to_string(),
                });
                return TagReport::failed(None, None, e);
            }
        };

        let previous = match self.largest_tag_semver(repo, requested.major) {
            Ok(version) => version,
            Err(e) => return TagReport::failed(Some(requested), None, e),
        };
        self.reporter.report(&TagEvent::PreviousVersionFound {
            previous: previous.clone(),
        });

        if !is_newer(&requested, &previous) {
            self.reporter.report(&TagEvent::NothingToDo {
                requested: requested.clone(),
                previous: previous.clone(),
            });
            return TagReport {
                requested: Some(requested),
                previous: Some(previous),
                outcome: TagOutcome::NoNewVersion,
            };
        }

        let status = match repo.worktree_status() {
            Ok(status) => status,
            Err(e) => return TagReport::failed(Some(requested), Some(previous), e),
        };
        if !status.is_clean() {
            self.reporter.report(&TagEvent::DirtyWorktree {
                requested: requested.clone(),
                previous: previous.clone(),
                changes: status.len(),
            });
            return TagReport::failed(
                Some(requested),
                Some(previous),
                TagError::DirtyWorktree(status),
            );
        }

        let outcome = match self.create_tags(repo, &requested) {
            Ok(tags) => {
                if !self.config.dry_run {
                    self.reporter.report(&TagEvent::TaggingComplete {
                        requested: requested.clone(),
                    });
                }
                TagOutcome::Tagged {
                    tags,
                    dry_run: self.config.dry_run,
                }
            }
            Err(e) => TagOutcome::Failed(e),
        };

        TagReport {
            requested: Some(requested),
            previous: Some(previous),
            outcome,
        }
    }

    /// Largest existing tag version whose major component is `major`, or `0.0.0`
    pub fn largest_tag_semver<R: Repository>(&self, repo: &R, major: u64) -> Result<Version> {
        let names = repo.tag_names()?;
        largest_for_major(names, major)
    }

    fn create_tags<R: Repository>(&self, repo: &R, version: &Version) -> Result<Vec<String>> {
        let head = repo.head_commit()?;

        let mut tags = vec![Tag::release(version)];
        if self.config.create_major_alias {
            tags.push(Tag::major_alias(version));
        }
        let names: Vec<String> = tags.into_iter().map(|tag| tag.name).collect();

        if self.config.dry_run {
            for name in &names {
                self.reporter
                    .report(&TagEvent::WouldCreateTag { tag: name.clone() });
            }
            return Ok(names);
        }

        for name in &names {
            self.replace_tag(repo, name, head)?;
        }

        Ok(names)
    }

    fn replace_tag<R: Repository>(&self, repo: &R, name: &str, head: git2::Oid) -> Result<()> {
        if let Err(e) = repo.delete_tag(name) {
            self.reporter.report(&TagEvent::TagDeleteFailed {
                tag: name.to_string(),
                reason: e.to_string(),
            });
        }

        repo.create_annotated_tag(name, head, &self.config.author, name)?;
        self.reporter.report(&TagEvent::TagCreated {
            tag: name.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{MockRepository, StatusEntry, TagAuthor, WorktreeStatus};
    use crate::report::RecordingReporter;
    use git2::Oid;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    fn config(version: &str) -> TaggerConfig {
        TaggerConfig {
            version: version.to_string(),
            dry_run: false,
            author: TagAuthor::new("Release Bot", "release@example.com"),
            create_major_alias: false,
        }
    }

    fn repo_with_tags(tags: &[&str]) -> MockRepository {
        let mut repo = MockRepository::new(oid(9));
        for (i, tag) in tags.iter().enumerate() {
            repo.add_tag(*tag, oid(i as u8 + 1));
        }
        repo
    }

    fn dirty() -> WorktreeStatus {
        WorktreeStatus::new(vec![StatusEntry::new(" M", "README.md")])
    }

    #[test]
    fn test_tags_next_version_in_major_line() {
        let repo = repo_with_tags(&["v1.0.0", "v1.2.0", "v2.0.0"]);
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.3.0"), &reporter);

        let report = tagger.tag(&repo);

        assert_eq!(report.exit_code(), EXIT_CODE_SUCCESS);
        assert_eq!(report.summary_line().as_deref(), Some("v1.3.0,v1.2.0"));
        let tag = repo.tag("v1.3.0").expect("release tag should exist");
        assert_eq!(tag.target, oid(9));
        assert_eq!(tag.message.as_deref(), Some("v1.3.0"));
        assert_eq!(
            tag.author,
            Some(TagAuthor::new("Release Bot", "release@example.com"))
        );
        assert!(repo.tag("v1").is_none());
    }

    #[test]
    fn test_first_tag_in_major_line_compares_against_floor() {
        let repo = repo_with_tags(&["v2.0.0"]);
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.9.9"), &reporter);

        let report = tagger.tag(&repo);

        assert_eq!(report.previous, Some(Version::new(0, 0, 0)));
        assert!(matches!(report.outcome, TagOutcome::Tagged { .. }));
        assert!(repo.tag("v1.9.9").is_some());
    }

    #[test]
    fn test_equal_version_is_no_op() {
        let repo = repo_with_tags(&["v1.2.0"]);
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.2.0"), &reporter);

        let report = tagger.tag(&repo);

        assert!(matches!(report.outcome, TagOutcome::NoNewVersion));
        assert_eq!(report.exit_code(), EXIT_CODE_NO_NEW_VERSION);
        assert_eq!(report.summary_line().as_deref(), Some("v1.2.0,v1.2.0"));
        assert_eq!(repo.mutation_count(), 0);
    }

    #[test]
    fn test_older_version_is_no_op_even_when_dirty() {
        let mut repo = repo_with_tags(&["v1.2.0"]);
        repo.set_status(dirty());
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.1.5"), &reporter);

        let report = tagger.tag(&repo);

        assert!(matches!(report.outcome, TagOutcome::NoNewVersion));
        assert_eq!(repo.mutation_count(), 0);
    }

    #[test]
    fn test_build_metadata_does_not_make_version_newer() {
        let repo = repo_with_tags(&["v1.2.0+build.1"]);
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.2.0+build.2"), &reporter);

        assert!(matches!(tagger.tag(&repo).outcome, TagOutcome::NoNewVersion));
    }

    #[test]
    fn test_dirty_worktree_fails_without_mutation() {
        let mut repo = repo_with_tags(&["v1.0.0"]);
        repo.set_status(dirty());
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.1.0"), &reporter);

        let report = tagger.tag(&repo);

        match &report.outcome {
            TagOutcome::Failed(TagError::DirtyWorktree(status)) => assert_eq!(status.len(), 1),
            other => panic!("expected dirty worktree failure, got {:?}", other),
        }
        assert_eq!(report.exit_code(), EXIT_CODE_FAILURE);
        assert_eq!(report.summary_line().as_deref(), Some("v1.1.0,v1.0.0"));
        assert_eq!(repo.mutation_count(), 0);
    }

    #[test]
    fn test_major_alias_points_at_same_commit() {
        let repo = repo_with_tags(&["v2.0.0"]);
        let reporter = RecordingReporter::new();
        let mut cfg = config("2.1.0");
        cfg.create_major_alias = true;
        let tagger = Tagger::new(cfg, &reporter);

        let report = tagger.tag(&repo);

        match &report.outcome {
            TagOutcome::Tagged { tags, dry_run } => {
                assert_eq!(tags, &vec!["v2.1.0".to_string(), "v2".to_string()]);
                assert!(!dry_run);
            }
            other => panic!("expected tags, got {:?}", other),
        }
        let release = repo.tag("v2.1.0").unwrap();
        let alias = repo.tag("v2").unwrap();
        assert_eq!(release.target, alias.target);
        assert_eq!(alias.target, oid(9));
        assert_eq!(alias.message.as_deref(), Some("v2"));
    }

    #[test]
    fn test_existing_major_alias_is_replaced() {
        let mut repo = repo_with_tags(&["v3.0.0"]);
        repo.add_tag("v3", oid(1));
        let reporter = RecordingReporter::new();
        let mut cfg = config("3.0.1");
        cfg.create_major_alias = true;
        let tagger = Tagger::new(cfg, &reporter);

        let report = tagger.tag(&repo);

        assert_eq!(report.exit_code(), EXIT_CODE_SUCCESS);
        assert_eq!(repo.tag("v3").unwrap().target, oid(9));
        // The release tag did not exist, so its delete failed and was ignored
        let delete_failures: Vec<_> = reporter
            .events()
            .into_iter()
            .filter(|e| matches!(e, TagEvent::TagDeleteFailed { .. }))
            .collect();
        assert_eq!(
            delete_failures,
            vec![TagEvent::TagDeleteFailed {
                tag: "v3.0.1".to_string(),
                reason: "Tag error: Tag not found: v3.0.1".to_string(),
            }]
        );
    }

    #[test]
    fn test_dry_run_returns_same_versions_without_mutation() {
        let repo = repo_with_tags(&["v1.0.0", "v1.2.0"]);
        let reporter = RecordingReporter::new();
        let mut cfg = config("1.3.0");
        cfg.dry_run = true;
        cfg.create_major_alias = true;
        let tagger = Tagger::new(cfg, &reporter);

        let report = tagger.tag(&repo);

        assert_eq!(report.exit_code(), EXIT_CODE_SUCCESS);
        assert_eq!(report.summary_line().as_deref(), Some("v1.3.0,v1.2.0"));
        assert!(matches!(
            report.outcome,
            TagOutcome::Tagged { dry_run: true, .. }
        ));
        assert_eq!(repo.mutation_count(), 0);
        assert!(reporter.events().contains(&TagEvent::WouldCreateTag {
            tag: "v1".to_string()
        }));
    }

    #[test]
    fn test_dry_run_still_refuses_dirty_worktree() {
        let mut repo = repo_with_tags(&[]);
        repo.set_status(dirty());
        let reporter = RecordingReporter::new();
        let mut cfg = config("0.1.0");
        cfg.dry_run = true;
        let tagger = Tagger::new(cfg, &reporter);

        let report = tagger.tag(&repo);

        assert_eq!(report.exit_code(), EXIT_CODE_FAILURE);
        assert_eq!(repo.mutation_count(), 0);
    }

    #[test]
    fn test_invalid_requested_version_fails_without_versions() {
        let repo = repo_with_tags(&["v1.0.0"]);
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("one.two"), &reporter);

        let report = tagger.tag(&repo);

        assert!(matches!(
            report.outcome,
            TagOutcome::Failed(TagError::Version(_))
        ));
        assert!(report.summary_line().is_none());
        assert!(matches!(
            reporter.events()[0],
            TagEvent::InvalidRequestedVersion { .. }
        ));
    }

    #[test]
    fn test_malformed_long_tag_aborts_scan() {
        let repo = repo_with_tags(&["v1.0.0", "v1.2.3.4"]);
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.5.0"), &reporter);

        let report = tagger.tag(&repo);

        assert!(matches!(report.outcome, TagOutcome::Failed(_)));
        assert_eq!(report.requested, Some(Version::new(1, 5, 0)));
        assert!(report.previous.is_none());
        assert_eq!(repo.mutation_count(), 0);
    }

    #[test]
    fn test_largest_tag_semver_ignores_short_names() {
        let repo = repo_with_tags(&["v1", "v1.4", "nightly", "v1.3.2"]);
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.4.0"), &reporter);

        assert_eq!(
            tagger.largest_tag_semver(&repo, 1).unwrap(),
            Version::new(1, 3, 2)
        );
    }

    #[test]
    fn test_tag_at_reports_repository_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let reporter = RecordingReporter::new();
        let tagger = Tagger::new(config("1.0.0"), &reporter);

        let report = tagger.tag_at(dir.path());

        assert!(matches!(
            report.outcome,
            TagOutcome::Failed(TagError::Repository(_))
        ));
        assert!(report.summary_line().is_none());
    }
}
