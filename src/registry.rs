/// Extension registry mapping file extensions to sort categories.
///
/// Extensions are stored as uppercase tokens without the leading dot. The
/// registry is built once from five extension sets and is read-only after
/// that; anything it does not know about classifies as [`Category::Unknown`].
///
/// # Examples
///
/// ```
/// use foldersort::registry::{Category, ExtensionRegistry};
///
/// let registry = ExtensionRegistry::standard();
/// assert_eq!(registry.classify("jpg"), Category::Images);
/// assert_eq!(registry.classify("DOCX"), Category::Documents);
/// assert_eq!(registry.classify("xyz"), Category::Unknown);
/// ```
use crate::config::{ConfigError, ExtensionSets};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Represents the bucket a file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Image files (JPEG, PNG, ...)
    Images,
    /// Video files (AVI, MP4, ...)
    Video,
    /// Audio files (MP3, OGG, ...)
    Audio,
    /// Document files (DOC, PDF, ...)
    Documents,
    /// Archives, unpacked at dispatch time
    Archives,
    /// Files without an extension
    Other,
    /// Files whose extension is not registered
    Unknown,
}

impl Category {
    /// Order in which the dispatcher processes categories.
    pub const DISPATCH_ORDER: [Category; 6] = [
        Category::Images,
        Category::Documents,
        Category::Audio,
        Category::Video,
        Category::Archives,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// `Other` and `Unknown` share the generic `other` bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::registry::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Unknown.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Documents => "documents",
            Category::Archives => "archives",
            Category::Other | Category::Unknown => "other",
        }
    }

    /// Returns true for categories whose files are unpacked rather than moved.
    pub fn is_archive(&self) -> bool {
        matches!(self, Category::Archives)
    }
}

/// Default image extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["JPEG", "PNG", "JPG", "SVG"];
/// Default video extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &["AVI", "MP4", "MOV", "MKV"];
/// Default audio extensions.
pub const AUDIO_EXTENSIONS: &[&str] = &["MP3", "OGG", "WAV", "AMR"];
/// Default document extensions.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["DOC", "DOCX", "TXT", "PDF", "XLSX", "PPTX"];
/// Default archive extensions.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["ZIP", "GZ", "TAR"];

/// Maps uppercase extension tokens to categories.
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    extension_map: HashMap<String, Category>,
}

impl ExtensionRegistry {
    /// Returns the process-wide registry built from the default extension sets.
    pub fn standard() -> &'static ExtensionRegistry {
        static STANDARD: OnceLock<ExtensionRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut registry = Self {
                extension_map: HashMap::new(),
            };
            for (category, extensions) in [
                (Category::Images, IMAGE_EXTENSIONS),
                (Category::Video, VIDEO_EXTENSIONS),
                (Category::Audio, AUDIO_EXTENSIONS),
                (Category::Documents, DOCUMENT_EXTENSIONS),
                (Category::Archives, ARCHIVE_EXTENSIONS),
            ] {
                for ext in extensions {
                    registry.extension_map.insert((*ext).to_string(), category);
                }
            }
            registry
        })
    }

    /// Builds a registry from configured extension sets.
    ///
    /// Tokens are uppercased and stripped of a leading dot. An extension
    /// listed under two categories is rejected.
    pub fn from_sets(sets: &ExtensionSets) -> Result<Self, ConfigError> {
        let mut extension_map: HashMap<String, Category> = HashMap::new();
        for (category, extensions) in [
            (Category::Images, &sets.images),
            (Category::Video, &sets.video),
            (Category::Audio, &sets.audio),
            (Category::Documents, &sets.documents),
            (Category::Archives, &sets.archives),
        ] {
            for ext in extensions {
                let token = ext.trim_start_matches('.').to_uppercase();
                if token.is_empty() {
                    continue;
                }
                match extension_map.get(&token) {
                    Some(existing) if *existing != category => {
                        return Err(ConfigError::DuplicateExtension {
                            extension: token,
                            first: existing.dir_name(),
                            second: category.dir_name(),
                        });
                    }
                    _ => {
                        extension_map.insert(token, category);
                    }
                }
            }
        }
        Ok(Self { extension_map })
    }

    /// Classifies an extension (without the dot), ignoring case.
    pub fn classify(&self, extension: &str) -> Category {
        self.extension_map
            .get(&extension.to_uppercase())
            .copied()
            .unwrap_or(Category::Unknown)
    }

    /// Returns true if `name` is exactly one of the registered tokens.
    ///
    /// The comparison is case-sensitive: tokens are uppercase, so a directory
    /// named `zip` is not a token while `ZIP` is.
    pub fn is_extension_token(&self, name: &str) -> bool {
        self.extension_map.contains_key(name)
    }

    /// Returns all registered tokens, sorted.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.extension_map.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::standard().clone()
    }
}
