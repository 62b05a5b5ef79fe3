/// File dispatch into category directories.
///
/// The dispatcher consumes a finished [`ScanResult`] and performs the actual
/// filesystem mutation: ordinary files are moved (under their normalized
/// name) into `root/<category>`, archives are unpacked into
/// `root/archives/<name>` and then deleted. Per-file problems are recorded as
/// [`FileFailure`]s and never stop the run.
use crate::archive::{self, ExtractError};
use crate::normalize::{archive_dir_name, normalize};
use crate::output::OutputFormatter;
use crate::registry::Category;
use crate::report::{FailureKind, FileFailure};
use crate::scanner::ScanResult;
use indicatif::ProgressBar;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a dispatch run did.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Files moved into a category directory, as (from, to).
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Archives unpacked, as (archive, extraction directory).
    pub extracted: Vec<(PathBuf, PathBuf)>,
    /// Files that could not be handled as planned.
    pub failures: Vec<FileFailure>,
}

/// Moves and unpacks classified files.
pub struct Dispatcher {
    progress: ProgressBar,
    quiet: bool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            progress: ProgressBar::hidden(),
            quiet: false,
        }
    }

    /// Shows a progress bar over the dispatched files.
    pub fn with_progress(mut self, total: u64) -> Self {
        self.progress = OutputFormatter::create_progress_bar(total);
        self
    }

    /// Suppresses per-file diagnostics.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Dispatches every file of `scan` under `root`.
    ///
    /// Categories are handled in [`Category::DISPATCH_ORDER`]. Each category
    /// directory is created up front, even if it ends up empty; the pruner
    /// removes the empty ones afterwards.
    pub fn dispatch(&self, scan: &ScanResult, root: &Path) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        for category in Category::DISPATCH_ORDER {
            let category_path = root.join(category.dir_name());
            if let Err(e) = fs::create_dir_all(&category_path) {
                self.report_failure(
                    &mut outcome,
                    FileFailure::new(
                        &category_path,
                        FailureKind::DirectoryCreationFailed,
                        e.to_string(),
                    ),
                );
                // Every file of this category would fail the same way
                for file in scan.files(category) {
                    self.progress.inc(1);
                    self.report_failure(
                        &mut outcome,
                        FileFailure::new(
                            file,
                            FailureKind::DirectoryCreationFailed,
                            format!("category directory {} unavailable", category_path.display()),
                        ),
                    );
                }
                continue;
            }

            for file in scan.files(category) {
                self.progress.inc(1);
                if category.is_archive() {
                    self.handle_archive(file, &category_path, &mut outcome);
                } else {
                    self.handle_file(file, &category_path, &mut outcome);
                }
            }
        }

        self.progress.finish_and_clear();
        outcome
    }

    fn handle_file(&self, file: &Path, category_path: &Path, outcome: &mut DispatchOutcome) {
        let name = file_name_of(file);
        let target = category_path.join(normalize(&name));

        if !self.quiet {
            self.progress.suspend(|| {
                OutputFormatter::plain(&format!(
                    "Moving {} to {}",
                    file.display(),
                    target.display()
                ))
            });
        }

        match move_file(file, &target) {
            Ok(replaced) => {
                if replaced {
                    self.report_replacement(
                        outcome,
                        FileFailure::new(
                            &target,
                            FailureKind::Replaced,
                            format!("overwritten by {}", file.display()),
                        ),
                    );
                }
                outcome.moved.push((file.to_path_buf(), target));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.report_failure(
                outcome,
                FileFailure::new(file, FailureKind::VanishedSource, "file not found"),
            ),
            Err(e) => self.report_failure(
                outcome,
                FileFailure::new(
                    file,
                    FailureKind::MoveFailed,
                    format!("cannot move to {}: {}", target.display(), e),
                ),
            ),
        }
    }

    fn handle_archive(&self, file: &Path, archives_path: &Path, outcome: &mut DispatchOutcome) {
        let name = file_name_of(file);
        let extract_dir = archives_path.join(archive_dir_name(&name));

        let created = !extract_dir.exists();
        if let Err(e) = fs::create_dir_all(&extract_dir) {
            self.report_failure(
                outcome,
                FileFailure::new(
                    &extract_dir,
                    FailureKind::DirectoryCreationFailed,
                    e.to_string(),
                ),
            );
            return;
        }

        match archive::extract(file, &extract_dir) {
            Ok(()) => {
                if !self.quiet {
                    self.progress.suspend(|| {
                        OutputFormatter::success(&format!(
                            "Extracted {} to {}",
                            file.display(),
                            extract_dir.display()
                        ))
                    });
                }
                outcome
                    .extracted
                    .push((file.to_path_buf(), extract_dir.clone()));
            }
            Err(e) => {
                if created && let Err(cleanup) = fs::remove_dir_all(&extract_dir) {
                    log::warn!(
                        "could not remove extraction directory {}: {}",
                        extract_dir.display(),
                        cleanup
                    );
                }
                let kind = if e.is_vanished() {
                    FailureKind::ArchiveVanished
                } else {
                    FailureKind::ArchiveUnreadable
                };
                self.report_failure(outcome, FileFailure::new(file, kind, describe(&e)));
            }
        }

        // Archives are consumed whether or not extraction worked.
        match fs::remove_file(file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => self.report_failure(
                outcome,
                FileFailure::new(file, FailureKind::RemoveFailed, e.to_string()),
            ),
        }
    }

    fn report_failure(&self, outcome: &mut DispatchOutcome, failure: FileFailure) {
        if !self.quiet {
            self.progress.suspend(|| {
                OutputFormatter::error(&format!(
                    "{}: {} ({})",
                    failure.path.display(),
                    failure.kind,
                    failure.message
                ))
            });
        }
        outcome.failures.push(failure);
    }

    fn report_replacement(&self, outcome: &mut DispatchOutcome, failure: FileFailure) {
        if !self.quiet {
            self.progress.suspend(|| {
                OutputFormatter::warning(&format!(
                    "{} was {}",
                    failure.path.display(),
                    failure.message
                ))
            });
        }
        outcome.failures.push(failure);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatches `scan` under `root` without progress output.
pub fn dispatch(scan: &ScanResult, root: &Path) -> DispatchOutcome {
    Dispatcher::new().dispatch(scan, root)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn describe(e: &ExtractError) -> String {
    match e {
        ExtractError::NotFound(_) => "archive not found".to_string(),
        other => other.to_string(),
    }
}

/// Moves `from` to `to`, replacing an existing different file at `to`.
///
/// Returns true if a file was replaced.
fn move_file(from: &Path, to: &Path) -> io::Result<bool> {
    if fs::symlink_metadata(from).is_err() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "source vanished"));
    }
    let replaced = from != to && fs::symlink_metadata(to).is_ok();
    fs::rename(from, to)?;
    if replaced {
        log::warn!("replaced existing {}", to.display());
    }
    Ok(replaced)
}
