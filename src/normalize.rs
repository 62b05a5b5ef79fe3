//! Filename normalization.
//!
//! Turns arbitrary file names into names made only of ASCII letters, digits,
//! underscores and dots. Ukrainian Cyrillic is transliterated to Latin, and
//! anything else outside the safe alphabet becomes `_`.

use std::collections::HashMap;
use std::sync::OnceLock;

const CYRILLIC: &str = "абвгдеєжзиіїйклмнопрстуфхцчшщьюя";
const LATIN: [&str; 32] = [
    "a", "b", "v", "g", "d", "e", "je", "zh", "z", "y", "i", "ji", "j", "k", "l", "m", "n", "o",
    "p", "r", "s", "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "ju", "ja",
];

/// Suffixes stripped from archive names before building the extraction directory.
const ARCHIVE_SUFFIXES: [&str; 3] = [".zip", ".tar", ".gz"];

fn transliteration_table() -> &'static HashMap<char, String> {
    static TABLE: OnceLock<HashMap<char, String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for (cyrillic, latin) in CYRILLIC.chars().zip(LATIN) {
            table.insert(cyrillic, latin.to_string());
            for upper in cyrillic.to_uppercase() {
                table.insert(upper, latin.to_uppercase());
            }
        }
        table
    })
}

/// Transliterates and sanitizes a single dot-free segment.
fn sanitize_segment(segment: &str) -> String {
    let table = transliteration_table();
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if let Some(latin) = table.get(&c) {
            out.push_str(latin);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}

/// Normalizes a file name.
///
/// The name is split at its first dot; the base and every suffix segment are
/// transliterated and sanitized, then joined back as `{base}.{suffix}`. A name
/// without a dot therefore gains a trailing dot.
///
/// # Examples
///
/// ```
/// use foldersort::normalize::normalize;
///
/// assert_eq!(normalize("Привіт світ.txt"), "Pryvit_svit.txt");
/// assert_eq!(normalize("archive.tar.gz"), "archive.tar.gz");
/// assert_eq!(normalize("notes"), "notes.");
/// ```
pub fn normalize(name: &str) -> String {
    let (base, suffix) = name.split_once('.').unwrap_or((name, ""));
    let suffix = suffix
        .split('.')
        .map(sanitize_segment)
        .collect::<Vec<_>>()
        .join(".");
    format!("{}.{}", sanitize_segment(base), suffix)
}

/// Builds the extraction directory name for an archive file name.
///
/// Trailing `.zip`, `.tar` and `.gz` suffixes are removed (in any case, as
/// many as are present) and the remainder is sanitized segment by segment.
/// Unlike [`normalize`], no trailing dot is added.
///
/// ```
/// use foldersort::normalize::archive_dir_name;
///
/// assert_eq!(archive_dir_name("data.zip"), "data");
/// assert_eq!(archive_dir_name("backup.tar.GZ"), "backup");
/// assert_eq!(archive_dir_name("фото 2023.zip"), "foto_2023");
/// ```
pub fn archive_dir_name(name: &str) -> String {
    let mut stem = name;
    'strip: loop {
        for suffix in ARCHIVE_SUFFIXES {
            if stem.len() > suffix.len()
                && let Some(head) = stem.get(..stem.len() - suffix.len())
                && stem[head.len()..].eq_ignore_ascii_case(suffix)
            {
                stem = head;
                continue 'strip;
            }
        }
        break;
    }
    let dir_name = stem
        .split('.')
        .map(sanitize_segment)
        .collect::<Vec<_>>()
        .join(".");
    // "", "." and ".." would not name a fresh directory below archives/
    if dir_name.chars().all(|c| c == '.') {
        return "_".to_string();
    }
    dir_name
}
