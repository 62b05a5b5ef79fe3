/// Post-order removal of empty directories.
use std::fs;
use std::path::{Path, PathBuf};

/// What a prune pass did.
#[derive(Debug, Default)]
pub struct PruneOutcome {
    /// Directories that were removed, children before parents.
    pub removed: Vec<PathBuf>,
    /// Directories that stayed, with the reason removal failed.
    pub kept: Vec<(PathBuf, String)>,
}

/// Removes `path` and every directory below it that is empty once its own
/// subdirectories have been pruned.
///
/// Removal is attempted on every directory; a non-empty or protected
/// directory is simply kept. Symlinks are never followed.
pub fn prune(path: &Path) -> PruneOutcome {
    let mut outcome = PruneOutcome::default();
    prune_into(path, &mut outcome);
    outcome
}

fn prune_into(path: &Path, outcome: &mut PruneOutcome) {
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                prune_into(&entry.path(), outcome);
            }
        }
    }

    match fs::remove_dir(path) {
        Ok(()) => {
            log::debug!("removed empty directory {}", path.display());
            outcome.removed.push(path.to_path_buf());
        }
        Err(e) => {
            log::debug!("kept {}: {}", path.display(), e);
            outcome.kept.push((path.to_path_buf(), e.to_string()));
        }
    }
}
