//! Sort orchestration.
//!
//! A sort run happens in three strictly sequential phases:
//! 1. scan the tree (read-only) into a [`ScanResult`]
//! 2. dispatch the classified files into category directories
//! 3. prune the directories left empty
//!
//! Each run owns its scan result and report; nothing is shared between runs.

use crate::config::{CompiledFilters, ConfigError};
use crate::dispatcher::Dispatcher;
use crate::normalize::{archive_dir_name, normalize};
use crate::output::OutputFormatter;
use crate::pruner::prune;
use crate::registry::{Category, ExtensionRegistry};
use crate::report::SortReport;
use crate::scanner::{ScanResult, Scanner};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum SortError {
    /// The root is missing, not a directory, or cannot be listed.
    #[error("Invalid root directory {}: {source}", .path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for sort runs.
pub type SortResult<T> = Result<T, SortError>;

/// Knobs for a sort run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortOptions {
    /// Scan and report only; touch nothing.
    pub dry_run: bool,
    /// Suppress per-file diagnostics.
    pub quiet: bool,
    /// Show a progress bar while dispatching.
    pub progress: bool,
}

/// Runs scan, dispatch and prune over a root directory.
pub struct Sorter<'a> {
    registry: &'a ExtensionRegistry,
    filters: &'a CompiledFilters,
    options: SortOptions,
}

impl<'a> Sorter<'a> {
    pub fn new(
        registry: &'a ExtensionRegistry,
        filters: &'a CompiledFilters,
        options: SortOptions,
    ) -> Self {
        Self {
            registry,
            filters,
            options,
        }
    }

    /// Sorts `root` and returns what happened.
    ///
    /// # Errors
    ///
    /// Only an unusable root is fatal. Every per-file problem ends up in
    /// [`SortReport::failures`].
    pub fn run(&self, root: &Path) -> SortResult<SortReport> {
        let metadata = fs::metadata(root).map_err(|e| SortError::InvalidRoot {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_dir() {
            return Err(SortError::InvalidRoot {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a directory",
                ),
            });
        }

        let mut report = SortReport::new(root.to_path_buf(), self.options.dry_run);
        if !self.options.quiet {
            if self.options.dry_run {
                OutputFormatter::dry_run_notice(&format!("Analyzing {}", root.display()));
            } else {
                OutputFormatter::info(&format!("Sorting {}", root.display()));
            }
        }

        let scan = Scanner::new(self.registry, self.filters)
            .scan(root)
            .map_err(|e| SortError::InvalidRoot {
                path: root.to_path_buf(),
                source: e,
            })?;
        for (dir, reason) in &scan.unreadable {
            if !self.options.quiet {
                OutputFormatter::warning(&format!("Skipped {}: {}", dir.display(), reason));
            }
        }
        log::debug!(
            "scanned {} files in {} folders",
            scan.total_files(),
            scan.folders.len()
        );
        record_scan(&scan, &mut report);

        if self.options.dry_run {
            self.print_plan(&scan, root);
            report.finish();
            return Ok(report);
        }

        let mut dispatcher = Dispatcher::new().quiet(self.options.quiet);
        if self.options.progress {
            dispatcher = dispatcher.with_progress(scan.total_files() as u64);
        }
        let outcome = dispatcher.dispatch(&scan, root);
        report.moved = outcome.moved.len();
        report.extracted = outcome.extracted.len();
        report.failures = outcome.failures;

        // The root itself is never pruned, only what lies below it.
        for subdir in subdirectories(root) {
            let pruned = prune(&subdir);
            for dir in &pruned.removed {
                if !self.options.quiet {
                    OutputFormatter::plain(&format!("Removed empty folder: {}", dir.display()));
                }
            }
            report.removed_dirs.extend(pruned.removed);
        }

        report.finish();
        Ok(report)
    }

    fn print_plan(&self, scan: &ScanResult, root: &Path) {
        if self.options.quiet {
            return;
        }
        for category in Category::DISPATCH_ORDER {
            for file in scan.files(category) {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let target = if category.is_archive() {
                    root.join(category.dir_name())
                        .join(archive_dir_name(&name))
                } else {
                    root.join(category.dir_name()).join(normalize(&name))
                };
                OutputFormatter::plain(&format!(
                    " - {} → {}",
                    file.display(),
                    target.display()
                ));
            }
        }
    }
}

fn record_scan(scan: &ScanResult, report: &mut SortReport) {
    for category in Category::DISPATCH_ORDER {
        let names = scan
            .files(category)
            .iter()
            .map(|p| normalize(&p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()))
            .collect();
        report
            .categories
            .insert(category.dir_name().to_string(), names);
    }
    report.extensions = scan.extensions.clone();
    report.unknown_extensions = scan.unknown_extensions.clone();
    report.container_folders = scan.folders.clone();
}

fn subdirectories(root: &Path) -> Vec<PathBuf> {
    match fs::read_dir(root) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
        Err(e) => {
            log::warn!("cannot list {} for pruning: {}", root.display(), e);
            Vec::new()
        }
    }
}

/// Sorts the directory at `path` with the standard registry and no filters.
///
/// Everything is reported through diagnostics; nothing is returned and no
/// error escapes.
pub fn sort_folder(path: impl AsRef<Path>) {
    let path = path.as_ref();
    let filters = CompiledFilters::allow_all();
    let sorter = Sorter::new(
        ExtensionRegistry::standard(),
        &filters,
        SortOptions::default(),
    );
    match sorter.run(path) {
        Ok(report) => OutputFormatter::summary(&report),
        Err(e) => OutputFormatter::error(&e.to_string()),
    }
}
