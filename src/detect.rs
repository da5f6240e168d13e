use crate::error::{GxfGenieError, Result};
use crate::gxf::Format;
use std::path::{Path, PathBuf};

/// Compression schemes recognized by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    /// Unix `compress` (`.Z`). Recognized so it can be refused by name.
    Compress,
}

impl Compression {
    /// Returns true when the file needs a decoder.
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// use gxfgenie::detect::Compression;
    ///
    /// assert!(Compression::Bzip2.is_compressed());
    /// assert!(!Compression::None.is_compressed());
    /// ```
    pub fn is_compressed(self) -> bool {
        !matches!(self, Compression::None)
    }
}

/// Dialect and compression of an annotation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKind {
    /// GTF or GFF3.
    pub format: Format,
    /// Compression wrapped around the text.
    pub compression: Compression,
}

/// Works out the dialect and compression of `path` from its suffixes.
///
/// The last suffix is checked for a compression scheme first; when one is
/// found the suffix before it must name the dialect (`.gtf.gz`,
/// `.gff3.bz2`). Matching ignores case.
///
/// # Arguments
///
/// * `path` - Annotation file path
///
/// # Returns
///
/// Returns the detected [`FileKind`].
///
/// # Errors
///
/// * [`GxfGenieError::UnsupportedExtension`] when no dialect suffix is found
/// * [`GxfGenieError::UnsupportedCompression`] for `.Z` files
///
/// # Example
///
/// ```rust, ignore
/// use gxfgenie::detect::{detect_file_kind, Compression};
/// use gxfgenie::Format;
/// use std::path::Path;
///
/// let kind = detect_file_kind(Path::new("gencode.v44.annotation.gff3.gz"))?;
/// assert_eq!(kind.format, Format::Gff3);
/// assert_eq!(kind.compression, Compression::Gzip);
/// ```
pub fn detect_file_kind(path: &Path) -> Result<FileKind> {
    let unsupported = || GxfGenieError::UnsupportedExtension(path.display().to_string());

    let ext = extension_lowercase(path).ok_or_else(unsupported)?;
    let (format_ext, compression) = match compression_from_extension(&ext) {
        Some(Compression::Compress) => {
            return Err(GxfGenieError::UnsupportedCompression(
                path.display().to_string(),
            ));
        }
        Some(compression) => (nested_extension(path).ok_or_else(unsupported)?, compression),
        None => (ext, Compression::None),
    };

    let format = format_from_extension(&format_ext).ok_or_else(unsupported)?;
    Ok(FileKind {
        format,
        compression,
    })
}

/// Works out only the compression of `path`, without requiring a dialect
/// suffix. Used for output files.
///
/// # Errors
///
/// Returns [`GxfGenieError::UnsupportedCompression`] for `.Z` files.
pub fn detect_compression(path: &Path) -> Result<Compression> {
    match extension_lowercase(path)
        .as_deref()
        .and_then(compression_from_extension)
    {
        Some(Compression::Compress) => Err(GxfGenieError::UnsupportedCompression(
            path.display().to_string(),
        )),
        Some(compression) => Ok(compression),
        None => Ok(Compression::None),
    }
}

/// Extracts the last extension of `path`, lowercased.
///
/// # Example
///
/// ```rust, ignore
/// let ext = extension_lowercase(Path::new("annot.GFF3"));
/// assert_eq!(ext, Some("gff3".to_string()));
/// ```
fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Maps a lowercased extension to a dialect.
///
/// # Arguments
///
/// * `ext` - Extension without the dot
///
/// # Returns
///
/// Returns `Some(Format)` for `gtf`, `gff3` and `gff`, otherwise `None`.
fn format_from_extension(ext: &str) -> Option<Format> {
    match ext {
        "gtf" => Some(Format::Gtf),
        "gff3" | "gff" => Some(Format::Gff3),
        _ => None,
    }
}

/// Maps a lowercased extension to a compression scheme.
///
/// # Arguments
///
/// * `ext` - Extension without the dot
///
/// # Returns
///
/// Returns `None` when `ext` is not a compression suffix.
///
/// # Example
///
/// ```rust, ignore
/// assert_eq!(compression_from_extension("bz2"), Some(Compression::Bzip2));
/// assert_eq!(compression_from_extension("gtf"), None);
/// ```
fn compression_from_extension(ext: &str) -> Option<Compression> {
    match ext {
        "gz" | "gzip" => Some(Compression::Gzip),
        "bz2" | "bzip2" => Some(Compression::Bzip2),
        "z" => Some(Compression::Compress),
        _ => None,
    }
}

/// Returns the suffix in front of the compression suffix
/// (`annot.gtf.gz` -> `gtf`).
fn nested_extension(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    extension_lowercase(&PathBuf::from(stem))
}
