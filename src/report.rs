//! Progress reporting for the tagger.
//!
//! The [Tagger](crate::tagger::Tagger) never logs directly. It emits
//! [TagEvent]s to a [Reporter] handed to it by the caller: the binary uses
//! [TracingReporter], tests use [RecordingReporter].

use std::cell::RefCell;
use std::fmt;

use semver::Version;
use tracing::{error, info};

/// Things that happen while deciding on and creating tags
#[derive(Debug, Clone, PartialEq)]
pub enum TagEvent {
    /// The configured version could not be parsed
    InvalidRequestedVersion { requested: String, reason: String },
    /// Largest existing tag in the requested major line
    PreviousVersionFound { previous: Version },
    /// Requested version is not newer than the existing tag
    NothingToDo {
        requested: Version,
        previous: Version,
    },
    /// Worktree has uncommitted changes
    DirtyWorktree {
        requested: Version,
        previous: Version,
        changes: usize,
    },
    /// Dry run stand-in for a tag mutation
    WouldCreateTag { tag: String },
    /// Removing an existing tag before recreating it failed
    TagDeleteFailed { tag: String, reason: String },
    TagCreated { tag: String },
    TaggingComplete { requested: Version },
}

impl fmt::Display for TagEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagEvent::InvalidRequestedVersion { requested, reason } => {
                write!(f, "Cannot parse requested version '{}': {}", requested, reason)
            }
            TagEvent::PreviousVersionFound { previous } => {
                write!(f, "Found largest semver tag v{}", previous)
            }
            TagEvent::NothingToDo {
                requested,
                previous,
            } => write!(
                f,
                "Version v{} is not greater than latest git tag v{}, nothing to do",
                requested, previous
            ),
            TagEvent::DirtyWorktree { changes, .. } => {
                write!(f, "Git is in a dirty state ({} change(s)), can't tag", changes)
            }
            TagEvent::WouldCreateTag { tag } => write!(f, "Would have created tag {}", tag),
            TagEvent::TagDeleteFailed { tag, reason } => write!(
                f,
                "Failed to delete tag {}, but probably not an issue: {}",
                tag, reason
            ),
            TagEvent::TagCreated { tag } => write!(f, "Tag {} successfully created", tag),
            TagEvent::TaggingComplete { requested } => write!(
                f,
                "Created new tag for v{}. Push to origin still required",
                requested
            ),
        }
    }
}

/// Receives tagging events
pub trait Reporter {
    fn report(&self, event: &TagEvent);
}

/// Forwards events to `tracing` with structured fields
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &TagEvent) {
        match event {
            TagEvent::InvalidRequestedVersion { requested, reason } => {
                error!(requested_version = %requested, %reason, "error when constructing semver from version config");
            }
            TagEvent::PreviousVersionFound { previous } => {
                info!(previous_version = %previous, "found largest semver tag");
            }
            TagEvent::NothingToDo {
                requested,
                previous,
            } => {
                info!(
                    requested_version = %requested,
                    previous_version = %previous,
                    "VERSION is not greater than latest git tag, nothing to do"
                );
            }
            TagEvent::DirtyWorktree {
                requested,
                previous,
                changes,
            } => {
                error!(
                    requested_version = %requested,
                    previous_version = %previous,
                    changes,
                    "git is in a dirty state, can't tag"
                );
            }
            TagEvent::WouldCreateTag { tag } => {
                info!(%tag, "would have created tag");
            }
            TagEvent::TagDeleteFailed { tag, reason } => {
                info!(%tag, error = %reason, "failed to delete tag, but probably not an issue");
            }
            TagEvent::TagCreated { tag } => {
                info!(%tag, "tag successfully created");
            }
            TagEvent::TaggingComplete { requested } => {
                info!(requested_version = %requested, "created new tag. Push to origin still required");
            }
        }
    }
}

/// Keeps every event in memory, in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<TagEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TagEvent> {
        self.events.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &TagEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
