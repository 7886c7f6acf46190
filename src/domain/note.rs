//! Notes as delivered by the remote service.

use crate::domain::{Attachment, Guid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A note as returned by a listing call: identity and ordering metadata only.
///
/// Summaries are never rendered directly; the exporter hydrates each one with
/// a separate fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub guid: Guid,
    pub title: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A hydrated note with markup body and attachments.
///
/// Notes are owned by the remote service and never mutated locally. The title
/// is human-readable and not guaranteed to be safe as a file name.
///
/// # Examples
///
/// ```
/// use noteport::domain::{Attachment, Note};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let note = Note::builder("n1".parse().unwrap(), "Groceries", now, now)
///     .content("![receipt](attachment:abc123)")
///     .attachment(Attachment::new("abc123".parse().unwrap(), "image/png", vec![0x89]))
///     .build();
///
/// assert_eq!(note.title(), "Groceries");
/// assert_eq!(note.attachments().len(), 1);
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    guid: Guid,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

impl Note {
    /// Creates a note with no body and no attachments.
    pub fn new(
        guid: Guid,
        title: impl Into<String>,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            guid,
            title: title.into(),
            content: None,
            created,
            updated,
            attachments: Vec::new(),
        }
    }

    /// Creates a builder for constructing a Note with optional fields.
    pub fn builder(
        guid: Guid,
        title: impl Into<String>,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> NoteBuilder {
        NoteBuilder::new(guid, title, created, updated)
    }

    /// Returns the note's identity.
    pub fn guid(&self) -> &Guid {
        &self.guid
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the markup body, if it was fetched.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns when the note was created.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns when the note was last updated.
    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Returns the note's attachments in service order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Finds an attachment by identity.
    pub fn attachment(&self, guid: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.guid().as_str() == guid)
    }

    /// Returns the listing view of this note.
    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            guid: self.guid.clone(),
            title: self.title.clone(),
            created: self.created,
            updated: self.updated,
        }
    }

    /// Drops the markup body.
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }

    /// Drops every attachment payload, keeping attachment metadata.
    pub fn without_attachment_data(mut self) -> Self {
        self.attachments = self
            .attachments
            .into_iter()
            .map(Attachment::without_data)
            .collect();
        self
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.guid)
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("guid", &self.guid)
            .field("title", &self.title)
            .field("content_len", &self.content.as_ref().map(String::len))
            .field("created", &self.created)
            .field("updated", &self.updated)
            .field("attachments", &self.attachments)
            .finish()
    }
}

/// Builder for constructing a Note with optional fields.
pub struct NoteBuilder {
    note: Note,
}

impl NoteBuilder {
    fn new(
        guid: Guid,
        title: impl Into<String>,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            note: Note::new(guid, title, created, updated),
        }
    }

    /// Sets the markup body.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.note.content = Some(content.into());
        self
    }

    /// Appends an attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.note.attachments.push(attachment);
        self
    }

    /// Replaces all attachments.
    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.note.attachments = attachments;
        self
    }

    /// Builds the Note.
    pub fn build(self) -> Note {
        self.note
    }
}
