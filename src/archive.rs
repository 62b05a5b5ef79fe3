//! Archive unpacking.
//!
//! The format is chosen from the file name: `.zip` goes through the `zip`
//! crate, `.tar` through `tar`, `.tar.gz`/`.tgz` through `tar` over a gzip
//! decoder, and a lone `.gz` is decompressed into a single file named after
//! the archive stem.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use thiserror::Error;

/// Archive formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    Gzip,
}

impl ArchiveFormat {
    /// Picks a format from a file name, ignoring case.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".tar") {
            Some(Self::Tar)
        } else if lower.ends_with(".gz") {
            Some(Self::Gzip)
        } else {
            None
        }
    }
}

/// Errors from unpacking a single archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The archive file is not there any more.
    #[error("archive not found: {0}")]
    NotFound(io::Error),
    /// The file name does not map to a supported format.
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),
    /// The zip container is corrupt or unreadable.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// Reading or writing failed, including corrupt tar/gzip streams.
    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for ExtractError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            ExtractError::NotFound(e)
        } else {
            ExtractError::Io(e)
        }
    }
}

impl ExtractError {
    /// Returns true if the archive had vanished before it could be read.
    pub fn is_vanished(&self) -> bool {
        matches!(self, ExtractError::NotFound(_))
    }
}

/// Unpacks `archive` into `destination`, which must already exist.
pub fn extract(archive: &Path, destination: &Path) -> Result<(), ExtractError> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let format = ArchiveFormat::from_file_name(&name)
        .ok_or_else(|| ExtractError::UnsupportedFormat(name.clone()))?;

    let file = File::open(archive)?;
    log::debug!("extracting {} as {:?}", archive.display(), format);

    match format {
        ArchiveFormat::Zip => {
            let mut zip = zip::ZipArchive::new(BufReader::new(file))?;
            zip.extract(destination)?;
        }
        ArchiveFormat::Tar => {
            tar::Archive::new(BufReader::new(file)).unpack(destination)?;
        }
        ArchiveFormat::TarGz => {
            tar::Archive::new(GzDecoder::new(BufReader::new(file))).unpack(destination)?;
        }
        ArchiveFormat::Gzip => {
            let stem = Path::new(&name)
                .file_stem()
                .map(|s| s.to_os_string())
                .unwrap_or_else(|| "content".into());
            let target = destination.join(stem);
            let mut decoder = GzDecoder::new(BufReader::new(file));
            let mut out = File::create(&target)?;
            if let Err(e) = io::copy(&mut decoder, &mut out) {
                drop(out);
                let _ = fs::remove_file(&target);
                return Err(ExtractError::Io(e));
            }
        }
    }

    Ok(())
}
