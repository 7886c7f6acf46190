//! Exporting notes to portable HTML documents.
//!
//! Each note becomes a directory holding its attachments plus two HTML
//! renderings: a link-mode document that references the saved attachment
//! files, and an inline-mode document with attachments embedded as data URIs.

mod html;
pub mod pipeline;
mod render;
mod resolver;
pub mod template;
mod theme;

pub use html::{ATTACHMENT_SCHEME, attachment_references, markdown_to_html_with};
pub use pipeline::{
    DEFAULT_BATCH_LIMIT, ExportError, ExportOptions, ExportReport, ExportedNote, Exporter,
    FailedNote, FailurePolicy, directory_name, fetch_batch,
};
pub use render::{RenderError, data_uri, render_inline, render_linked};
pub use resolver::{AttachmentReferenceMap, AttachmentResolver, ResolveError};
pub use template::{DEFAULT_NOTE_TEMPLATE, DocumentTemplate, RenderMode, RenderOptions};
pub use theme::{THEME_DARK, THEME_DEFAULT, get_theme_css};
