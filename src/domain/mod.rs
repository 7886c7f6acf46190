//! Core types: Note, NoteSummary, Attachment, Guid

mod attachment;
mod guid;
mod note;

pub use attachment::Attachment;
pub use guid::{Guid, ParseGuidError};
pub use note::{Note, NoteBuilder, NoteSummary};
