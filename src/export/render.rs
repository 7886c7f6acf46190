//! Link-mode and inline-mode rendering of a hydrated note.
//!
//! Both modes are pure functions of their inputs: the same note, map and
//! template always produce the same bytes.

use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::domain::Note;
use crate::export::html::markdown_to_html_with;
use crate::export::resolver::AttachmentReferenceMap;
use crate::export::template::{DocumentTemplate, RenderMode};

/// Errors from rendering a note to HTML.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("attachment '{id}' is referenced but has no resolved reference")]
    UnresolvedAttachment { id: String },

    #[error("attachment '{id}' has no payload to embed")]
    MissingPayload { id: String },

    #[error("template error")]
    Template(#[from] minijinja::Error),

    #[error("unknown theme '{0}': not a built-in theme or CSS file")]
    UnknownTheme(String),

    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders a note with attachment references replaced by the relative paths
/// in `references`.
///
/// # Errors
///
/// Returns `RenderError::UnresolvedAttachment` if the markup references an
/// attachment with no entry in `references`.
pub fn render_linked(
    note: &Note,
    references: &AttachmentReferenceMap,
    template: &DocumentTemplate,
) -> Result<String, RenderError> {
    let body = markdown_to_html_with(note.content().unwrap_or_default(), |id| {
        references
            .get(id)
            .map(String::from)
            .ok_or_else(|| RenderError::UnresolvedAttachment { id: id.to_string() })
    })?;
    template.render(note, &body, RenderMode::Linked)
}

/// Renders a note with every referenced attachment embedded as a data URI.
///
/// Payloads come from the note itself; nothing is read from disk.
///
/// # Errors
///
/// Returns `RenderError::UnresolvedAttachment` if the note does not carry a
/// referenced attachment, or `RenderError::MissingPayload` if it was fetched
/// without its data.
pub fn render_inline(note: &Note, template: &DocumentTemplate) -> Result<String, RenderError> {
    let content = note.content().unwrap_or_default();
    let body = markdown_to_html_with(content, |id| -> Result<String, RenderError> {
        let attachment = note
            .attachment(id)
            .ok_or_else(|| RenderError::UnresolvedAttachment { id: id.to_string() })?;
        let data = attachment
            .data()
            .ok_or_else(|| RenderError::MissingPayload { id: id.to_string() })?;
        Ok(data_uri(attachment.mime(), data))
    })?;
    template.render(note, &body, RenderMode::Inline)
}

/// Encodes a payload as an RFC 2397 `data:` URI.
pub fn data_uri(mime: &str, data: &[u8]) -> String {
    let mime: String = mime.chars().filter(|c| !c.is_whitespace()).collect();
    format!("data:{};base64,{}", mime, STANDARD.encode(data))
}
