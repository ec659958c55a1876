pub mod config;
pub mod discover;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod report;
pub mod tagger;
pub mod ui;

pub use error::{Result, TagError};
pub use tagger::{TagOutcome, TagReport, Tagger};
