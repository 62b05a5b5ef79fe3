//! foldersort - sort a directory tree by file category
//!
//! This library scans a directory tree, classifies files by extension,
//! moves them under normalized (transliterated, sanitized) names into
//! per-category subdirectories, unpacks archives, and prunes the directories
//! left empty.

pub mod archive;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod normalize;
pub mod output;
pub mod pruner;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod sorter;

pub use config::{CompiledFilters, ConfigError, SortConfig};
pub use dispatcher::{DispatchOutcome, Dispatcher, dispatch};
pub use normalize::normalize;
pub use pruner::{PruneOutcome, prune};
pub use registry::{Category, ExtensionRegistry};
pub use report::{FailureKind, FileFailure, SortReport};
pub use scanner::{ScanResult, Scanner, scan};
pub use sorter::{SortError, SortOptions, SortResult, Sorter, sort_folder};
