//! Builder for test notes with sensible defaults.

// Not every test binary uses every builder method.
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use noteport::domain::{Attachment, Guid, Note};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::common::base_time;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Builder for creating test notes with sensible defaults.
///
/// Automatically generates a guid and timestamps, with a fluent API
/// for setting optional fields.
#[derive(Debug, Clone)]
pub struct TestNote {
    guid: Guid,
    title: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    body: Option<String>,
    attachments: Vec<Attachment>,
}

impl TestNote {
    /// Creates a new test note with the given title.
    ///
    /// Generates a unique guid and sets both timestamps to a fixed time.
    pub fn new(title: impl Into<String>) -> Self {
        let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            guid: format!("note-{:04}", n).parse().expect("generated guid"),
            title: title.into(),
            created: base_time(),
            updated: base_time(),
            body: None,
            attachments: Vec::new(),
        }
    }

    /// Sets an explicit guid for the note.
    pub fn guid(mut self, guid: &str) -> Self {
        self.guid = guid.parse().expect("Invalid guid");
        self
    }

    /// Places the note `hours` after the base time.
    pub fn created_hours_after_base(mut self, hours: i64) -> Self {
        self.created = base_time() + Duration::hours(hours);
        self.updated = self.created;
        self
    }

    /// Sets the body content.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds an attachment with a payload.
    pub fn attachment(mut self, guid: &str, mime: &str, data: &[u8]) -> Self {
        self.attachments.push(Attachment::new(
            guid.parse().expect("Invalid attachment guid"),
            mime,
            data.to_vec(),
        ));
        self
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the guid.
    pub fn note_guid(&self) -> &Guid {
        &self.guid
    }

    /// Converts this TestNote to a domain Note.
    pub fn to_note(&self) -> Note {
        let builder = Note::builder(self.guid.clone(), &self.title, self.created, self.updated)
            .attachments(self.attachments.clone());
        match &self.body {
            Some(body) => builder.content(body.clone()).build(),
            None => builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_new_with_title() {
        let note = TestNote::new("My Test Note");
        assert_eq!(note.title(), "My Test Note");
    }

    #[test]
    fn test_note_generates_distinct_guids() {
        let a = TestNote::new("A");
        let b = TestNote::new("B");
        assert_ne!(a.note_guid(), b.note_guid());
    }

    #[test]
    fn test_note_builder_fluent() {
        let note = TestNote::new("Groceries")
            .guid("g1")
            .body("![list](attachment:abc123)")
            .attachment("abc123", "image/png", b"png")
            .to_note();

        assert_eq!(note.guid().as_str(), "g1");
        assert_eq!(note.content(), Some("![list](attachment:abc123)"));
        assert_eq!(note.attachments().len(), 1);
        assert_eq!(note.attachments()[0].mime(), "image/png");
    }

    #[test]
    fn test_note_created_offset() {
        let note = TestNote::new("Later").created_hours_after_base(3).to_note();
        assert_eq!(note.created(), base_time() + Duration::hours(3));
    }
}
