//! Filesystem and MIME helpers for export output

mod file_name;
mod fs;
mod mime;

pub use file_name::safe_file_name;
pub use fs::{FsError, ensure_dir, write_atomic};
pub use mime::{ExtensionLookup, MimeError, MimeTable};
