//! File names derived from note titles.

const MAX_LENGTH: usize = 200;

/// Converts a note title into a name usable as a directory or file stem.
///
/// Unlike a slug, the title stays recognizable: case, spaces and non-ASCII
/// letters are kept. Only what a filesystem can't hold is replaced:
///
/// - Path separators (`/`, `\`) and `< > : " | ? *` become `_`
/// - Control characters become `_`
/// - Surrounding whitespace and trailing dots are trimmed
/// - The result is truncated to 200 bytes at a character boundary
///
/// Returns `None` when nothing usable remains (empty title, `.` or `..`).
///
/// # Examples
///
/// ```
/// use noteport::infra::safe_file_name;
///
/// assert_eq!(safe_file_name("Groceries").as_deref(), Some("Groceries"));
/// assert_eq!(safe_file_name("Q1/Q2 plan?").as_deref(), Some("Q1_Q2 plan_"));
/// assert_eq!(safe_file_name("  "), None);
/// ```
pub fn safe_file_name(title: &str) -> Option<String> {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let name = trim_unusable(truncate_at_char_boundary(trim_unusable(&replaced), MAX_LENGTH));
    if name.is_empty() {
        return None;
    }

    Some(name.to_string())
}

/// Strips surrounding whitespace and trailing dots until neither remains, so
/// runs like `".. ."` cannot collapse to `.` or `..`.
fn trim_unusable(s: &str) -> &str {
    let mut trimmed = s.trim();
    loop {
        let next = trimmed.trim_end_matches('.').trim_end();
        if next == trimmed {
            return trimmed;
        }
        trimmed = next;
    }
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
