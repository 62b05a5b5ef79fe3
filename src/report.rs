//! Run reports.
//!
//! A [`SortReport`] collects what one sort run did: which normalized names
//! landed in which category, which extensions were seen, and every per-file
//! failure with an explicit [`FailureKind`] tag. It serializes to JSON for
//! machine consumption.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Kind of a recoverable per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The file existed at scan time but was gone when dispatched.
    VanishedSource,
    /// The move itself failed (permissions, cross-device, ...).
    MoveFailed,
    /// The archive could not be read or its format is not supported.
    ArchiveUnreadable,
    /// The archive existed at scan time but was gone when extracted.
    ArchiveVanished,
    /// A category or extraction directory could not be created.
    DirectoryCreationFailed,
    /// A source archive could not be deleted after extraction.
    RemoveFailed,
    /// A file already at the target was overwritten by another file with
    /// the same normalized name.
    Replaced,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::VanishedSource => "source vanished",
            FailureKind::MoveFailed => "move failed",
            FailureKind::ArchiveUnreadable => "archive unreadable",
            FailureKind::ArchiveVanished => "archive vanished",
            FailureKind::DirectoryCreationFailed => "directory creation failed",
            FailureKind::RemoveFailed => "remove failed",
            FailureKind::Replaced => "replaced",
        };
        f.write_str(label)
    }
}

/// A single file the dispatcher could not handle as planned.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl FileFailure {
    pub fn new(path: impl Into<PathBuf>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Result of one sort run.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Normalized names keyed by category directory name.
    pub categories: BTreeMap<String, Vec<String>>,
    pub unknown_extensions: BTreeSet<String>,
    pub extensions: BTreeSet<String>,
    pub container_folders: Vec<PathBuf>,
    pub moved: usize,
    pub extracted: usize,
    pub failures: Vec<FileFailure>,
    pub removed_dirs: Vec<PathBuf>,
}

impl SortReport {
    pub fn new(root: PathBuf, dry_run: bool) -> Self {
        Self {
            root,
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            categories: BTreeMap::new(),
            unknown_extensions: BTreeSet::new(),
            extensions: BTreeSet::new(),
            container_folders: Vec::new(),
            moved: 0,
            extracted: 0,
            failures: Vec::new(),
            removed_dirs: Vec::new(),
        }
    }

    /// Marks the run as finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total number of files classified by the scan.
    pub fn total_files(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Failures of a given kind.
    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &FileFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    /// Returns true if every classified file was handled without failure.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
