/// Read-only directory scanning.
///
/// The scanner walks a tree depth-first and partitions the files it finds
/// into per-category lists. It never touches the filesystem beyond reading
/// directory listings, so it must run to completion before any dispatch.
use crate::config::CompiledFilters;
use crate::registry::{Category, ExtensionRegistry};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Classification of one scanned tree.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    images: Vec<PathBuf>,
    video: Vec<PathBuf>,
    audio: Vec<PathBuf>,
    documents: Vec<PathBuf>,
    archives: Vec<PathBuf>,
    other: Vec<PathBuf>,
    /// Extensions seen that the registry does not know.
    pub unknown_extensions: BTreeSet<String>,
    /// Extensions seen that the registry classified.
    pub extensions: BTreeSet<String>,
    /// Directories recursed into, in discovery order.
    pub folders: Vec<PathBuf>,
    /// Subdirectories that could not be listed.
    pub unreadable: Vec<(PathBuf, String)>,
}

impl ScanResult {
    /// Files routed to `category`. `Other` and `Unknown` share one list.
    pub fn files(&self, category: Category) -> &[PathBuf] {
        match category {
            Category::Images => &self.images,
            Category::Video => &self.video,
            Category::Audio => &self.audio,
            Category::Documents => &self.documents,
            Category::Archives => &self.archives,
            Category::Other | Category::Unknown => &self.other,
        }
    }

    fn files_mut(&mut self, category: Category) -> &mut Vec<PathBuf> {
        match category {
            Category::Images => &mut self.images,
            Category::Video => &mut self.video,
            Category::Audio => &mut self.audio,
            Category::Documents => &mut self.documents,
            Category::Archives => &mut self.archives,
            Category::Other | Category::Unknown => &mut self.other,
        }
    }

    /// Total number of classified files.
    pub fn total_files(&self) -> usize {
        Category::DISPATCH_ORDER
            .iter()
            .map(|c| self.files(*c).len())
            .sum()
    }
}

/// Extracts the uppercase extension of a file name, empty if there is none.
///
/// Follows [`Path::extension`]: the text after the last dot, where a leading
/// dot alone (`.bashrc`) does not start an extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// Walks a directory tree and classifies every file in it.
pub struct Scanner<'a> {
    registry: &'a ExtensionRegistry,
    filters: &'a CompiledFilters,
}

impl<'a> Scanner<'a> {
    pub fn new(registry: &'a ExtensionRegistry, filters: &'a CompiledFilters) -> Self {
        Self { registry, filters }
    }

    /// Scans `root` and returns the classification.
    ///
    /// # Errors
    ///
    /// Fails only if `root` itself cannot be listed. Unreadable
    /// subdirectories are recorded in [`ScanResult::unreadable`] and skipped.
    pub fn scan(&self, root: &Path) -> io::Result<ScanResult> {
        let mut result = ScanResult::default();
        let entries = fs::read_dir(root)?;
        self.scan_entries(root, entries, &mut result);
        Ok(result)
    }

    fn scan_dir(&self, root: &Path, dir: &Path, result: &mut ScanResult) {
        match fs::read_dir(dir) {
            Ok(entries) => self.scan_entries(root, entries, result),
            Err(e) => {
                log::warn!("cannot read directory {}: {}", dir.display(), e);
                result.unreadable.push((dir.to_path_buf(), e.to_string()));
            }
        }
    }

    fn scan_entries(&self, root: &Path, entries: fs::ReadDir, result: &mut ScanResult) {
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            // DirEntry::file_type does not follow symlinks, so linked
            // directories are classified as files and never recursed into.
            let is_dir = match entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(e) => {
                    log::warn!(
                        "cannot determine type of {}, treating it as a file: {}",
                        path.display(),
                        e
                    );
                    false
                }
            };

            if is_dir {
                let name = entry.file_name().to_string_lossy().to_string();
                if !self.registry.is_extension_token(&name) {
                    log::debug!("entering {}", path.display());
                    result.folders.push(path.clone());
                    self.scan_dir(root, &path, result);
                }
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path.as_path());
            if !self.filters.should_include(relative) {
                log::debug!("filtered out {}", path.display());
                continue;
            }

            self.classify_file(path, result);
        }
    }

    fn classify_file(&self, path: PathBuf, result: &mut ScanResult) {
        let extension = extension_of(&path);
        if extension.is_empty() {
            result.other.push(path);
            return;
        }

        match self.registry.classify(&extension) {
            Category::Unknown => {
                result.unknown_extensions.insert(extension);
                result.other.push(path);
            }
            category => {
                result.extensions.insert(extension);
                result.files_mut(category).push(path);
            }
        }
    }
}

/// Scans `root` with the standard registry and no filtering.
pub fn scan(root: &Path) -> io::Result<ScanResult> {
    let filters = CompiledFilters::allow_all();
    Scanner::new(ExtensionRegistry::standard(), &filters).scan(root)
}
