//! Note markup to HTML conversion.
//!
//! Note bodies are Markdown. Attachments are referenced from image or link
//! destinations with the `attachment:` scheme, e.g. `![receipt](attachment:abc123)`.
//! Conversion rewrites those destinations through a caller-supplied resolver
//! and leaves every other URL untouched.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

/// URL scheme marking an attachment reference in note markup.
pub const ATTACHMENT_SCHEME: &str = "attachment:";

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Converts markup to HTML, replacing each `attachment:<id>` destination with
/// the URL returned by `resolve(id)`.
///
/// The first resolver error aborts the conversion.
///
/// # Example
///
/// ```
/// use noteport::export::markdown_to_html_with;
///
/// let html = markdown_to_html_with("# Hello\n\n![scan](attachment:s1)", |id| {
///     Ok::<_, String>(format!("./{}.png", id))
/// })
/// .unwrap();
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains(r#"src="./s1.png""#));
/// ```
pub fn markdown_to_html_with<F, E>(markdown: &str, mut resolve: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<String, E>,
{
    let mut events = Vec::new();
    for event in Parser::new_ext(markdown, parser_options()) {
        // Only start tags carry the destination that push_html emits.
        let event = match event {
            Event::Start(Tag::Image(kind, dest, title)) => {
                Event::Start(Tag::Image(kind, rewrite(dest, &mut resolve)?, title))
            }
            Event::Start(Tag::Link(kind, dest, title)) => {
                Event::Start(Tag::Link(kind, rewrite(dest, &mut resolve)?, title))
            }
            other => other,
        };
        events.push(event);
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    Ok(html_output)
}

/// Returns the attachment identities referenced by the markup, in order of
/// first appearance.
pub fn attachment_references(markdown: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for event in Parser::new_ext(markdown, parser_options()) {
        if let Event::Start(Tag::Image(_, dest, _) | Tag::Link(_, dest, _)) = event
            && let Some(id) = attachment_id(&dest)
            && !ids.iter().any(|seen| seen == id)
        {
            ids.push(id.to_string());
        }
    }
    ids
}

fn attachment_id(dest: &str) -> Option<&str> {
    dest.strip_prefix(ATTACHMENT_SCHEME).filter(|id| !id.is_empty())
}

fn rewrite<'a, F, E>(dest: CowStr<'a>, resolve: &mut F) -> Result<CowStr<'a>, E>
where
    F: FnMut(&str) -> Result<String, E>,
{
    if let Some(id) = attachment_id(&dest) {
        return Ok(CowStr::from(resolve(id)?));
    }
    Ok(dest)
}
