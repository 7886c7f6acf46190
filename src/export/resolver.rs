//! Saving a note's attachments next to its HTML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::{Guid, Note};
use crate::infra::{ExtensionLookup, FsError, MimeError, write_atomic};

/// Errors from saving a note's attachments.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot name attachment '{attachment}'")]
    UnknownMimeType {
        attachment: Guid,
        #[source]
        source: MimeError,
    },

    #[error("attachment '{attachment}' was fetched without its payload")]
    MissingPayload { attachment: Guid },

    #[error("attachment '{attachment}' appears more than once in the note")]
    DuplicateAttachment { attachment: Guid },

    #[error("attachment '{attachment}' would overwrite the note's own {file_name}")]
    ReservedName { attachment: Guid, file_name: String },

    #[error("cannot save attachment '{attachment}'")]
    Write {
        attachment: Guid,
        #[source]
        source: FsError,
    },
}

/// Attachment identity to the relative path link-mode HTML uses for it.
///
/// Paths are relative to the note's export directory, where the HTML files
/// live, so every value has the form `./<identity><extension>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentReferenceMap {
    entries: BTreeMap<String, String>,
}

impl AttachmentReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the reference for an attachment identity.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Adds an entry, returning the previous reference if one existed.
    pub fn insert(&mut self, id: Guid, reference: impl Into<String>) -> Option<String> {
        self.entries.insert(id.to_string(), reference.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Writes attachment payloads into an export directory.
///
/// Every attachment is checked before anything is written: an unknown MIME
/// type, a missing payload, a repeated identity or a file name reserved for
/// the note's HTML fails the note with no attachment files created for it.
/// Writes go through [`write_atomic`], so a failed write never leaves a
/// partial file behind.
pub struct AttachmentResolver<'a, L: ExtensionLookup + ?Sized> {
    lookup: &'a L,
    reserved: Vec<String>,
}

struct PlannedWrite<'n> {
    attachment: &'n Guid,
    data: &'n [u8],
    file_name: String,
}

impl<'a, L: ExtensionLookup + ?Sized> AttachmentResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            reserved: Vec::new(),
        }
    }

    /// Marks file names in the export directory that attachments must not take.
    pub fn reserving<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
        self
    }

    /// Saves each attachment of `note` as `<dir>/<identity><extension>` and
    /// returns the reference map for link-mode rendering.
    ///
    /// A note without attachments yields an empty map and writes nothing.
    ///
    /// # Errors
    ///
    /// Any failure returns `Err`; a partial map is never returned. Files
    /// already written for this note before a write failure are left in place.
    pub fn resolve(&self, note: &Note, dir: &Path) -> Result<AttachmentReferenceMap, ResolveError> {
        let planned = self.plan(note)?;

        let mut references = AttachmentReferenceMap::new();
        for write in planned {
            let path: PathBuf = dir.join(&write.file_name);
            write_atomic(&path, write.data).map_err(|source| ResolveError::Write {
                attachment: write.attachment.clone(),
                source,
            })?;
            debug!(
                note = %note.guid(),
                attachment = %write.attachment,
                path = %path.display(),
                bytes = write.data.len(),
                "saved attachment"
            );
            references.insert(write.attachment.clone(), format!("./{}", write.file_name));
        }

        Ok(references)
    }

    fn plan<'n>(&self, note: &'n Note) -> Result<Vec<PlannedWrite<'n>>, ResolveError> {
        let mut planned: Vec<PlannedWrite<'n>> = Vec::with_capacity(note.attachments().len());

        for attachment in note.attachments() {
            let guid = attachment.guid();
            if planned.iter().any(|p| p.attachment == guid) {
                return Err(ResolveError::DuplicateAttachment {
                    attachment: guid.clone(),
                });
            }

            let extension = self.lookup.extension_for(attachment.mime()).map_err(|source| {
                ResolveError::UnknownMimeType {
                    attachment: guid.clone(),
                    source,
                }
            })?;
            let data = attachment.data().ok_or_else(|| ResolveError::MissingPayload {
                attachment: guid.clone(),
            })?;

            let file_name = format!("{}{}", guid, extension);
            if self.reserved.contains(&file_name) {
                return Err(ResolveError::ReservedName {
                    attachment: guid.clone(),
                    file_name,
                });
            }

            planned.push(PlannedWrite {
                attachment: guid,
                data,
                file_name,
            });
        }

        Ok(planned)
    }
}
