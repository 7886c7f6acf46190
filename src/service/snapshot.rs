//! Offline note store backed by a JSON snapshot file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Guid, Note, NoteSummary};
use crate::service::{NoteFetch, NoteFilter, NoteSortOrder, NoteStore, ServiceError, ServiceResult};

/// On-disk shape of a snapshot: the same note documents the HTTP API returns.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// A note store serving a previously captured copy of an account.
///
/// Behaves like the remote service: listings honor sort order, offset and
/// limit, hydration honors the [`NoteFetch`] flags, and unknown identities
/// fail with `NotFound`. Recognition and alternate data are not captured in
/// snapshots, so those flags have no effect.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    notes: Vec<Note>,
}

impl SnapshotStore {
    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// An unreadable or malformed file is reported as a transport failure,
    /// the same class as an unreachable service.
    pub fn open(path: &Path) -> ServiceResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::transport(format!("cannot read snapshot {}: {}", path.display(), e))
        })?;
        let snapshot: Snapshot = serde_json::from_str(&contents).map_err(|e| {
            ServiceError::transport(format!("invalid snapshot {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), notes = snapshot.notes.len(), "loaded snapshot");
        Ok(Self::from_notes(snapshot.notes))
    }

    /// Creates a store over in-memory notes.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}

impl NoteStore for SnapshotStore {
    fn list_notes(
        &self,
        filter: &NoteFilter,
        offset: usize,
        limit: usize,
    ) -> ServiceResult<Vec<NoteSummary>> {
        let mut summaries: Vec<NoteSummary> = self.notes.iter().map(Note::summary).collect();

        // Stable sort keeps snapshot order for ties in either direction.
        summaries.sort_by(|a, b| {
            let ordering = match filter.order {
                NoteSortOrder::Created => a.created.cmp(&b.created),
                NoteSortOrder::Updated => a.updated.cmp(&b.updated),
                NoteSortOrder::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            };
            if filter.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        Ok(summaries.into_iter().skip(offset).take(limit).collect())
    }

    fn get_note(&self, guid: &Guid, fetch: &NoteFetch) -> ServiceResult<Note> {
        let note = self
            .notes
            .iter()
            .find(|n| n.guid() == guid)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                identifier: "Note.guid".to_string(),
                key: Some(guid.to_string()),
            })?;

        let note = if fetch.with_content {
            note
        } else {
            note.without_content()
        };
        let note = if fetch.with_resources_data {
            note
        } else {
            note.without_attachment_data()
        };
        Ok(note)
    }
}
