use foldersort::config::SortConfig;
use foldersort::report::FailureKind;
use foldersort::{CompiledFilters, ExtensionRegistry, SortOptions, SortReport, Sorter, sort_folder};
/// Integration tests for foldersort
///
/// These tests run complete sort passes over temporary directory trees and
/// check the resulting layout.
///
/// Test categories:
/// 1. Basic sorting and naming
/// 2. Archives
/// 3. Pruning
/// 4. Conservation of files
/// 5. Configuration and dry runs
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers to build and inspect a tree.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and its parent directories) with the given content.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    fn create_text_file(&self, rel_path: &str, content: &str) {
        self.create_file(rel_path, content.as_bytes());
    }

    fn create_subdir(&self, rel_path: &str) {
        fs::create_dir_all(self.path().join(rel_path)).expect("Failed to create subdirectory");
    }

    /// Create a zip archive with the given (name, content) entries.
    fn create_zip(&self, rel_path: &str, entries: &[(&str, &str)]) {
        let file = File::create(self.path().join(rel_path)).expect("Failed to create zip");
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .expect("Failed to start zip entry");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        writer.finish().expect("Failed to finish zip");
    }

    /// Create a gzip-compressed tarball with the given entries.
    fn create_tar_gz(&self, rel_path: &str, entries: &[(&str, &str)]) {
        let file = File::create(self.path().join(rel_path)).expect("Failed to create tarball");
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .expect("Failed to append tar entry");
        }
        builder
            .into_inner()
            .expect("Failed to finish tar")
            .finish()
            .expect("Failed to finish gzip");
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    /// All files below the root, as sorted relative paths.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut relative: Vec<PathBuf> = files
            .into_iter()
            .map(|p| p.strip_prefix(self.path()).unwrap().to_path_buf())
            .collect();
        relative.sort();
        relative
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }

    /// Run a quiet sort with the standard registry.
    fn sort(&self) -> SortReport {
        self.sort_with(&SortConfig::default(), false)
    }

    fn sort_with(&self, config: &SortConfig, dry_run: bool) -> SortReport {
        let registry = config.registry().expect("Invalid registry");
        let filters = config.compile_filters().expect("Invalid filters");
        Sorter::new(
            &registry,
            &filters,
            SortOptions {
                dry_run,
                quiet: true,
                progress: false,
            },
        )
        .run(self.path())
        .expect("Sort failed")
    }
}

// ============================================================================
// Test Suite 1: Basic Sorting
// ============================================================================

#[test]
fn test_reference_scenario() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report.DOCX", "doc");
    fixture.create_text_file("мama.jpg", "img");
    fixture.create_zip("data.zip", &[("a.txt", "alpha")]);
    fixture.create_text_file("notes", "plain");

    let report = fixture.sort();

    fixture.assert_file_exists("documents/report.DOCX");
    fixture.assert_file_exists("images/mama.jpg");
    fixture.assert_file_exists("archives/data/a.txt");
    fixture.assert_not_exists("data.zip");
    fixture.assert_file_exists("other/notes.");
    assert_eq!(fixture.read("archives/data/a.txt"), "alpha");

    // Categories without files are pruned
    fixture.assert_not_exists("video");
    fixture.assert_not_exists("audio");

    assert_eq!(report.moved, 3);
    assert_eq!(report.extracted, 1);
    assert!(report.is_complete_success());
}

#[test]
fn test_every_default_extension_lands_in_its_category() {
    let fixture = TestFixture::new();
    let cases = [
        ("a.jpeg", "images"),
        ("b.PNG", "images"),
        ("c.Jpg", "images"),
        ("d.svg", "images"),
        ("e.avi", "video"),
        ("f.MP4", "video"),
        ("g.mov", "video"),
        ("h.mkv", "video"),
        ("i.mp3", "audio"),
        ("j.ogg", "audio"),
        ("k.WAV", "audio"),
        ("l.amr", "audio"),
        ("m.doc", "documents"),
        ("n.docx", "documents"),
        ("o.txt", "documents"),
        ("p.pdf", "documents"),
        ("q.xlsx", "documents"),
        ("r.pptx", "documents"),
    ];
    for (name, _) in cases {
        fixture.create_text_file(name, name);
    }

    fixture.sort();

    for (name, dir) in cases {
        fixture.assert_file_exists(&format!("{}/{}", dir, name));
        fixture.assert_not_exists(name);
    }
}

#[test]
fn test_unknown_extensions_go_to_other() {
    let fixture = TestFixture::new();
    fixture.create_text_file("main.rs", "fn main() {}");
    fixture.create_text_file("Makefile", "all:");

    let report = fixture.sort();

    fixture.assert_file_exists("other/main.rs");
    fixture.assert_file_exists("other/Makefile.");
    assert!(report.unknown_extensions.contains("RS"));
    assert_eq!(report.unknown_extensions.len(), 1);
}

#[test]
fn test_nested_files_are_flattened_into_categories() {
    let fixture = TestFixture::new();
    fixture.create_text_file("trip/day 1/пляж.png", "img");
    fixture.create_text_file("trip/plan.pdf", "doc");

    fixture.sort();

    fixture.assert_file_exists("images/pljazh.png");
    fixture.assert_file_exists("documents/plan.pdf");
    // The emptied container folders are gone
    fixture.assert_not_exists("trip");
}

#[test]
fn test_extension_named_directory_is_left_alone() {
    let fixture = TestFixture::new();
    fixture.create_text_file("PDF/manual.pdf", "doc");
    fixture.create_text_file("loose.pdf", "doc");

    fixture.sort();

    fixture.assert_file_exists("PDF/manual.pdf");
    fixture.assert_file_exists("documents/loose.pdf");
}

// ============================================================================
// Test Suite 2: Archives
// ============================================================================

#[test]
fn test_corrupt_archive_is_removed_with_diagnostic() {
    let fixture = TestFixture::new();
    fixture.create_text_file("broken.zip", "this is not a zip file");

    let report = fixture.sort();

    fixture.assert_not_exists("archives/broken");
    fixture.assert_not_exists("broken.zip");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FailureKind::ArchiveUnreadable);
    // archives/ ended up empty and was pruned
    fixture.assert_not_exists("archives");
}

#[test]
fn test_tar_gz_archive_is_unpacked() {
    let fixture = TestFixture::new();
    fixture.create_tar_gz(
        "backup.tar.gz",
        &[("db.sql", "select 1;"), ("conf/app.toml", "x = 1")],
    );

    let report = fixture.sort();

    assert_eq!(report.extracted, 1);
    assert_eq!(fixture.read("archives/backup/db.sql"), "select 1;");
    assert_eq!(fixture.read("archives/backup/conf/app.toml"), "x = 1");
    fixture.assert_not_exists("backup.tar.gz");
}

#[test]
fn test_archive_name_is_normalized() {
    let fixture = TestFixture::new();
    fixture.create_zip("Фото 2023.zip", &[("img.jpg", "img")]);

    fixture.sort();

    fixture.assert_file_exists("archives/Foto_2023/img.jpg");
}

// ============================================================================
// Test Suite 3: Pruning
// ============================================================================

#[test]
fn test_empty_subdirectory_is_removed() {
    let fixture = TestFixture::new();
    fixture.create_subdir("empty_sub");
    fixture.create_subdir("deeper/still/empty");

    let report = fixture.sort();

    fixture.assert_not_exists("empty_sub");
    fixture.assert_not_exists("deeper");
    assert!(fixture.path().is_dir(), "Root must survive");
    assert!(
        report
            .removed_dirs
            .contains(&fixture.path().join("empty_sub"))
    );
}

#[test]
fn test_empty_root_stays_and_gets_no_category_dirs() {
    let fixture = TestFixture::new();

    let report = fixture.sort();

    assert!(fixture.path().is_dir());
    assert_eq!(report.total_files(), 0);
    assert!(fixture.list_files_recursive().is_empty());
    for dir in ["images", "documents", "audio", "video", "archives", "other"] {
        fixture.assert_not_exists(dir);
    }
}

#[test]
fn test_only_used_categories_survive() {
    let fixture = TestFixture::new();
    fixture.create_text_file("song.mp3", "a");

    fixture.sort();

    fixture.assert_dir_exists("audio");
    for dir in ["images", "documents", "video", "archives", "other"] {
        fixture.assert_not_exists(dir);
    }
}

// ============================================================================
// Test Suite 4: Conservation
// ============================================================================

#[test]
fn test_every_file_is_accounted_for_exactly_once() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "1");
    fixture.create_text_file("b.jpg", "2");
    fixture.create_text_file("sub/c.mp3", "3");
    fixture.create_text_file("sub/deep/d.unknown", "4");
    fixture.create_text_file("sub/deep/e", "5");
    fixture.create_zip("f.zip", &[("inner.txt", "6")]);

    fixture.sort();

    let files = fixture.list_files_recursive();
    let expected: Vec<PathBuf> = [
        "archives/f/inner.txt",
        "audio/c.mp3",
        "documents/a.txt",
        "images/b.jpg",
        "other/d.unknown",
        "other/e.",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(files, expected);

    // Contents travel with the files
    assert_eq!(fixture.read("documents/a.txt"), "1");
    assert_eq!(fixture.read("other/e."), "5");
}

#[test]
fn test_same_normalized_name_is_reported_as_replaced() {
    let fixture = TestFixture::new();
    fixture.create_text_file("trip/day1/IMG.jpg", "first");
    fixture.create_text_file("trip/day2/IMG.jpg", "second");

    let report = fixture.sort();

    fixture.assert_file_exists("images/IMG.jpg");
    assert_eq!(report.moved, 2);
    assert!(!report.is_complete_success());
    assert_eq!(report.failures_of(FailureKind::Replaced).count(), 1);
}

#[test]
fn test_second_run_is_stable_for_plain_files() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Звіт.docx", "doc");
    fixture.create_text_file("pic.png", "img");

    fixture.sort();
    let first = fixture.list_files_recursive();
    fixture.sort();
    let second = fixture.list_files_recursive();

    assert_eq!(first, second);
    fixture.assert_file_exists("documents/Zvit.docx");
}

// ============================================================================
// Test Suite 5: Configuration and Dry Run
// ============================================================================

#[test]
fn test_custom_extension_sets() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo.webp", "img");
    fixture.create_text_file("photo.png", "img");

    let config = SortConfig::from_toml(
        r#"
        [extensions]
        images = ["WEBP"]
        "#,
    )
    .expect("Invalid config");
    let report = fixture.sort_with(&config, false);

    fixture.assert_file_exists("images/photo.webp");
    fixture.assert_file_exists("other/photo.png");
    assert!(report.unknown_extensions.contains("PNG"));
}

#[test]
fn test_excluded_files_stay_in_place() {
    let fixture = TestFixture::new();
    fixture.create_text_file("movie.mkv.part", "partial");
    fixture.create_text_file("movie.mkv", "video");

    let config = SortConfig::from_toml(
        r#"
        [filters.exclude]
        extensions = ["part"]
        "#,
    )
    .expect("Invalid config");
    fixture.sort_with(&config, false);

    fixture.assert_file_exists("movie.mkv.part");
    fixture.assert_file_exists("video/movie.mkv");
}

#[test]
fn test_include_pattern_rescues_excluded_file() {
    let fixture = TestFixture::new();
    fixture.create_text_file("keep.log", "keep");
    fixture.create_text_file("drop.log", "drop");
    fixture.create_text_file("nested/keep.log", "nested keep");

    let config = SortConfig::from_toml(
        r#"
        [filters.exclude]
        extensions = ["log"]

        [filters.include]
        patterns = ["keep.log"]
        "#,
    )
    .expect("Invalid config");
    fixture.sort_with(&config, false);

    fixture.assert_file_exists("other/keep.log");
    fixture.assert_not_exists("keep.log");
    fixture.assert_file_exists("drop.log");
}

#[test]
fn test_exclude_glob_matches_relative_path() {
    let fixture = TestFixture::new();
    fixture.create_text_file("cache/blob.txt", "cached");
    fixture.create_text_file("notes.txt", "notes");

    let config = SortConfig::from_toml(
        r#"
        [filters.exclude]
        patterns = ["cache/**"]
        "#,
    )
    .expect("Invalid config");
    fixture.sort_with(&config, false);

    fixture.assert_file_exists("cache/blob.txt");
    fixture.assert_file_exists("documents/notes.txt");
}

#[test]
fn test_config_file_on_disk() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("foldersort.toml");
    fs::write(
        &config_path,
        "[extensions]\ndocuments = [\"MD\"]\n",
    )
    .expect("Failed to write config");
    fixture.create_text_file("README.md", "# hi");

    let config = SortConfig::load(Some(config_path.as_path())).expect("Config should load");
    fixture.sort_with(&config, false);

    fixture.assert_file_exists("documents/README.md");
}

#[test]
fn test_dry_run_reports_without_moving() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.jpg", "img");
    fixture.create_zip("b.zip", &[("x.txt", "x")]);
    fixture.create_subdir("empty");

    let report = fixture.sort_with(&SortConfig::default(), true);

    assert!(report.dry_run);
    assert_eq!(report.categories["images"], vec!["a.jpg"]);
    assert_eq!(report.categories["archives"], vec!["b.zip"]);
    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("b.zip");
    fixture.assert_dir_exists("empty");
    fixture.assert_not_exists("images");
}

#[test]
fn test_sort_folder_entry_point() {
    let fixture = TestFixture::new();
    fixture.create_text_file("tune.ogg", "a");

    sort_folder(fixture.path());

    fixture.assert_file_exists("audio/tune.ogg");
}

#[test]
fn test_sorter_reuses_registry_across_roots() {
    let first = TestFixture::new();
    let second = TestFixture::new();
    first.create_text_file("a.pdf", "1");
    second.create_text_file("b.pdf", "2");

    let filters = CompiledFilters::allow_all();
    let sorter = Sorter::new(
        ExtensionRegistry::standard(),
        &filters,
        SortOptions {
            quiet: true,
            ..SortOptions::default()
        },
    );
    let report_a = sorter.run(first.path()).expect("Sort failed");
    let report_b = sorter.run(second.path()).expect("Sort failed");

    // Reports never leak files between runs
    assert_eq!(report_a.categories["documents"], vec!["a.pdf"]);
    assert_eq!(report_b.categories["documents"], vec!["b.pdf"]);
}
