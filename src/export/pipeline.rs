//! The export run: one directory per note holding its attachments and both
//! HTML renderings.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Guid, Note, NoteSummary};
use crate::export::html::attachment_references;
use crate::export::render::{RenderError, render_inline, render_linked};
use crate::export::resolver::{AttachmentResolver, ResolveError};
use crate::export::template::DocumentTemplate;
use crate::infra::{ExtensionLookup, FsError, ensure_dir, safe_file_name, write_atomic};
use crate::service::{NoteFetch, NoteFilter, NoteStore, ServiceError};

/// Number of notes fetched for an export when no limit is configured.
pub const DEFAULT_BATCH_LIMIT: usize = 20;

/// What to do when a single note fails to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failure.
    #[default]
    FailFast,
    /// Record the failure and continue with the next note.
    ///
    /// Failures that concern the whole account (credentials, quota, service
    /// or network errors) still stop the run.
    Isolate,
}

/// Settings for an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory that receives one subdirectory per note.
    pub root: PathBuf,
    pub policy: FailurePolicy,
}

/// Errors that end an export run, or are recorded per note under
/// [`FailurePolicy::Isolate`].
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to list notes")]
    List(#[source] ServiceError),

    #[error("failed to fetch note '{title}' ({guid})")]
    Fetch {
        guid: Guid,
        title: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to save attachments of note '{title}' ({guid})")]
    Resolve {
        guid: Guid,
        title: String,
        #[source]
        source: ResolveError,
    },

    #[error("failed to render note '{title}' ({guid})")]
    Render {
        guid: Guid,
        title: String,
        #[source]
        source: RenderError,
    },

    #[error("failed to write note '{title}' ({guid})")]
    Write {
        guid: Guid,
        title: String,
        #[source]
        source: FsError,
    },
}

impl ExportError {
    /// Whether the failure would repeat for every remaining note.
    pub fn is_account_wide(&self) -> bool {
        match self {
            ExportError::List(source) | ExportError::Fetch { source, .. } => {
                source.is_account_wide()
            }
            ExportError::Resolve { .. } | ExportError::Render { .. } | ExportError::Write { .. } => {
                false
            }
        }
    }
}

/// Outcome of an export run, in processing order.
#[derive(Debug, Default, Serialize)]
pub struct ExportReport {
    pub exported: Vec<ExportedNote>,
    pub failed: Vec<FailedNote>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Files written for one note.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedNote {
    pub guid: Guid,
    pub title: String,
    pub directory: PathBuf,
    pub linked_html: PathBuf,
    pub inline_html: PathBuf,
    pub attachments: usize,
    /// Attachments saved to disk that the note's markup never points at.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreferenced: Vec<Guid>,
}

/// A note skipped under [`FailurePolicy::Isolate`].
#[derive(Debug, Clone, Serialize)]
pub struct FailedNote {
    pub guid: Guid,
    pub title: String,
    /// The error with its full cause chain.
    pub error: String,
}

/// Lists the batch of notes to export: oldest first, at most `limit`.
pub fn fetch_batch<S: NoteStore + ?Sized>(
    store: &S,
    limit: usize,
) -> Result<Vec<NoteSummary>, ExportError> {
    let batch = store
        .list_notes(&NoteFilter::default(), 0, limit)
        .map_err(ExportError::List)?;
    debug!(count = batch.len(), limit, "listed notes");
    Ok(batch)
}

/// Drives an export run against a note store.
///
/// Notes are processed one at a time in the order given. For each note the
/// export directory is created, the note is fetched with its content and
/// attachment payloads, attachments are saved, and the link-mode and
/// inline-mode HTML are written:
///
/// ```text
/// <root>/<title>/
///     <title>.html
///     <title>-inline.html
///     <attachment-guid><ext>
/// ```
///
/// Nothing is rolled back on failure; notes exported before it stay on disk.
pub struct Exporter<'a, S: NoteStore + ?Sized, L: ExtensionLookup + ?Sized> {
    store: &'a S,
    lookup: &'a L,
    template: &'a DocumentTemplate,
    options: ExportOptions,
}

impl<'a, S, L> Exporter<'a, S, L>
where
    S: NoteStore + ?Sized,
    L: ExtensionLookup + ?Sized,
{
    pub fn new(
        store: &'a S,
        lookup: &'a L,
        template: &'a DocumentTemplate,
        options: ExportOptions,
    ) -> Self {
        Self {
            store,
            lookup,
            template,
            options,
        }
    }

    /// Exports every note in `batch`.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::FailFast`] the first failure is returned.
    /// Under [`FailurePolicy::Isolate`] only account-wide failures are; the
    /// rest are recorded in the report.
    pub fn run(&self, batch: &[NoteSummary]) -> Result<ExportReport, ExportError> {
        let mut report = ExportReport::default();

        for summary in batch {
            match self.export_note(summary) {
                Ok(exported) => {
                    info!(
                        note = %exported.guid,
                        title = %exported.title,
                        attachments = exported.attachments,
                        "exported note"
                    );
                    report.exported.push(exported);
                }
                Err(e) if self.options.policy == FailurePolicy::Isolate && !e.is_account_wide() => {
                    let error = error_chain(&e);
                    warn!(note = %summary.guid, %error, "skipping note");
                    report.failed.push(FailedNote {
                        guid: summary.guid.clone(),
                        title: summary.title.clone(),
                        error,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Exports a single note.
    pub fn export_note(&self, summary: &NoteSummary) -> Result<ExportedNote, ExportError> {
        let guid = &summary.guid;
        let title = &summary.title;
        let write_err = |source| ExportError::Write {
            guid: guid.clone(),
            title: title.clone(),
            source,
        };

        let name = directory_name(summary);
        let directory = self.options.root.join(&name);
        ensure_dir(&directory).map_err(write_err)?;

        let note = self
            .store
            .get_note(guid, &NoteFetch::EXPORT)
            .map_err(|source| ExportError::Fetch {
                guid: guid.clone(),
                title: title.clone(),
                source,
            })?;

        let linked_file = format!("{}.html", name);
        let inline_file = format!("{}-inline.html", name);
        let references = AttachmentResolver::new(self.lookup)
            .reserving([linked_file.as_str(), inline_file.as_str()])
            .resolve(&note, &directory)
            .map_err(|source| ExportError::Resolve {
                guid: guid.clone(),
                title: title.clone(),
                source,
            })?;

        let render_err = |source| ExportError::Render {
            guid: guid.clone(),
            title: title.clone(),
            source,
        };
        let linked = render_linked(&note, &references, self.template).map_err(render_err)?;
        let inline = render_inline(&note, self.template).map_err(render_err)?;

        let linked_html = directory.join(&linked_file);
        let inline_html = directory.join(&inline_file);
        write_html(&linked_html, &linked).map_err(write_err)?;
        write_html(&inline_html, &inline).map_err(write_err)?;

        Ok(ExportedNote {
            guid: guid.clone(),
            title: title.clone(),
            directory,
            linked_html,
            inline_html,
            attachments: references.len(),
            unreferenced: unreferenced_attachments(&note),
        })
    }
}

/// Directory and HTML file stem for a note: its title made filesystem-safe,
/// or its identity when nothing of the title survives.
pub fn directory_name(summary: &NoteSummary) -> String {
    safe_file_name(&summary.title).unwrap_or_else(|| summary.guid.to_string())
}

/// Attachments of `note` with no `attachment:` reference in its markup, in
/// note order. They are still saved but neither HTML document shows them.
fn unreferenced_attachments(note: &Note) -> Vec<Guid> {
    let referenced = attachment_references(note.content().unwrap_or_default());
    let unreferenced: Vec<Guid> = note
        .attachments()
        .iter()
        .map(|a| a.guid())
        .filter(|guid| !referenced.iter().any(|id| id == guid.as_str()))
        .cloned()
        .collect();
    for guid in &unreferenced {
        info!(note = %note.guid(), attachment = %guid, "attachment not referenced by note");
    }
    unreferenced
}

/// Formats an error followed by each of its causes.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn write_html(path: &Path, html: &str) -> Result<(), FsError> {
    write_atomic(path, html.as_bytes())?;
    debug!(path = %path.display(), bytes = html.len(), "wrote html");
    Ok(())
}
