//! MIME type to file extension lookup.

use std::collections::HashMap;
use thiserror::Error;

/// Errors from resolving a MIME type to a file extension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MimeError {
    #[error("malformed MIME type: '{0}'")]
    Malformed(String),

    #[error("no file extension known for MIME type '{0}'")]
    Unknown(String),
}

/// Maps a declared MIME type to the extension used for saved attachments.
///
/// Extensions include the leading dot (`.png`), matching how they are
/// appended to attachment identities.
pub trait ExtensionLookup {
    /// Returns the file extension for `mime`.
    fn extension_for(&self, mime: &str) -> Result<String, MimeError>;
}

/// Built-in MIME table with optional user overrides.
///
/// Parameters (`; charset=...`) are ignored and matching is case-insensitive.
/// Overrides take precedence over the built-in table.
///
/// # Examples
///
/// ```
/// use noteport::infra::{ExtensionLookup, MimeTable};
///
/// let table = MimeTable::new();
/// assert_eq!(table.extension_for("image/png").unwrap(), ".png");
/// assert_eq!(table.extension_for("Text/Plain; charset=utf-8").unwrap(), ".txt");
/// assert!(table.extension_for("application/x-made-up").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
    overrides: HashMap<String, String>,
}

impl MimeTable {
    /// Creates a table with only the built-in mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a mapping. A missing leading dot is added.
    ///
    /// # Errors
    ///
    /// Returns `MimeError::Malformed` if `mime` is not a `type/subtype` pair.
    pub fn with_override(mut self, mime: &str, extension: &str) -> Result<Self, MimeError> {
        let key = essence(mime)?;
        self.overrides.insert(key, normalize_extension(extension));
        Ok(self)
    }

    /// Adds several mappings; see [`MimeTable::with_override`].
    pub fn with_overrides<'a, I>(self, overrides: I) -> Result<Self, MimeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        overrides
            .into_iter()
            .try_fold(self, |table, (mime, ext)| table.with_override(mime, ext))
    }
}

impl ExtensionLookup for MimeTable {
    fn extension_for(&self, mime: &str) -> Result<String, MimeError> {
        let key = essence(mime)?;
        if let Some(ext) = self.overrides.get(&key) {
            return Ok(ext.clone());
        }
        builtin_extension(&key)
            .map(String::from)
            .ok_or(MimeError::Unknown(key))
    }
}

/// Strips parameters and lowercases, validating `type/subtype` shape.
fn essence(mime: &str) -> Result<String, MimeError> {
    let base = mime.split(';').next().unwrap_or_default().trim();
    if !is_valid_mime_type(base) {
        return Err(MimeError::Malformed(mime.to_string()));
    }
    Ok(base.to_ascii_lowercase())
}

/// Validate MIME type format per RFC 2045 (type/subtype).
fn is_valid_mime_type(mime: &str) -> bool {
    let Some((media_type, subtype)) = mime.split_once('/') else {
        return false;
    };
    if media_type.is_empty() || subtype.is_empty() {
        return false;
    }
    let is_token_char = |c: char| -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '!' | '#' | '$' | '&' | '-' | '^' | '_' | '.' | '+')
    };
    media_type.chars().all(is_token_char) && subtype.chars().all(is_token_char)
}

fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{}", trimmed)
    }
}

fn builtin_extension(essence: &str) -> Option<&'static str> {
    match essence {
        // Images
        "image/png" => Some(".png"),
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(".jpg"),
        "image/gif" => Some(".gif"),
        "image/bmp" | "image/x-ms-bmp" => Some(".bmp"),
        "image/webp" => Some(".webp"),
        "image/tiff" => Some(".tiff"),
        "image/svg+xml" => Some(".svg"),
        "image/heic" => Some(".heic"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some(".ico"),
        // Audio (ink and voice notes are common attachments)
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some(".wav"),
        "audio/mpeg" | "audio/mp3" => Some(".mp3"),
        "audio/amr" => Some(".amr"),
        "audio/mp4" | "audio/x-m4a" => Some(".m4a"),
        "audio/ogg" => Some(".oga"),
        "audio/aac" => Some(".aac"),
        // Video
        "video/mp4" => Some(".mp4"),
        "video/quicktime" => Some(".mov"),
        "video/webm" => Some(".webm"),
        "video/mpeg" => Some(".mpeg"),
        // Documents
        "application/pdf" => Some(".pdf"),
        "application/msword" => Some(".doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            Some(".docx")
        }
        "application/vnd.ms-excel" => Some(".xls"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(".xlsx"),
        "application/vnd.ms-powerpoint" => Some(".ppt"),
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
            Some(".pptx")
        }
        "application/rtf" => Some(".rtf"),
        // Archives and data
        "application/zip" => Some(".zip"),
        "application/gzip" | "application/x-gzip" => Some(".gz"),
        "application/x-tar" => Some(".tar"),
        "application/json" => Some(".json"),
        "application/xml" | "text/xml" => Some(".xml"),
        "application/octet-stream" => Some(".bin"),
        // Text
        "text/plain" => Some(".txt"),
        "text/html" => Some(".html"),
        "text/css" => Some(".css"),
        "text/csv" => Some(".csv"),
        "text/markdown" => Some(".md"),
        "text/calendar" => Some(".ics"),
        "text/vcard" | "text/x-vcard" => Some(".vcf"),
        _ => None,
    }
}
