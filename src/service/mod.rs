//! Remote note service clients.
//!
//! The exporter only sees the [`NoteStore`] trait. Two implementations ship
//! with the crate: [`HttpNoteStore`] talks to the service's JSON API and
//! [`SnapshotStore`] serves an offline JSON mirror of it.

mod error;
mod http;
mod snapshot;

pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use http::{DEFAULT_TIMEOUT, HttpNoteStore, classify_failure};
pub use snapshot::{Snapshot, SnapshotStore};

use crate::domain::{Guid, Note, NoteSummary};

/// Sort key for note listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSortOrder {
    #[default]
    Created,
    Updated,
    Title,
}

impl NoteSortOrder {
    /// Returns the wire name used in listing queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteSortOrder::Created => "created",
            NoteSortOrder::Updated => "updated",
            NoteSortOrder::Title => "title",
        }
    }
}

/// Filter applied to a note listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteFilter {
    pub order: NoteSortOrder,
    pub ascending: bool,
}

impl Default for NoteFilter {
    fn default() -> Self {
        Self {
            order: NoteSortOrder::Created,
            ascending: true,
        }
    }
}

/// What to include when hydrating a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteFetch {
    pub with_content: bool,
    pub with_resources_data: bool,
    pub with_resources_recognition: bool,
    pub with_resources_alternate_data: bool,
}

impl NoteFetch {
    /// Content and attachment payloads, without recognition or alternate data.
    pub const EXPORT: NoteFetch = NoteFetch {
        with_content: true,
        with_resources_data: true,
        with_resources_recognition: false,
        with_resources_alternate_data: false,
    };
}

/// Read access to a remote note account.
///
/// Calls block until the service answers or fails. Retry and timeout policy
/// belong to the implementation.
pub trait NoteStore {
    /// Lists note summaries ordered per `filter`, skipping `offset` and
    /// returning at most `limit` entries.
    fn list_notes(
        &self,
        filter: &NoteFilter,
        offset: usize,
        limit: usize,
    ) -> ServiceResult<Vec<NoteSummary>>;

    /// Fetches one note, hydrated per `fetch`.
    fn get_note(&self, guid: &Guid, fetch: &NoteFetch) -> ServiceResult<Note>;
}
