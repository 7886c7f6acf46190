//! HTML document template for exported notes.

use std::path::PathBuf;

use minijinja::{Environment, Value, context};

use crate::domain::Note;
use crate::export::RenderError;
use crate::export::theme::get_theme_css;

/// Default HTML template for an exported note.
///
/// `content` and `theme_css` are inserted verbatim; every other value is
/// HTML-escaped.
pub const DEFAULT_NOTE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="generator" content="noteport">
    <meta name="note-guid" content="{{ guid }}">
    <title>{{ title }}</title>
    <style>{{ theme_css }}</style>
</head>
<body>
    <article class="note note-{{ mode }}">
        <header>
            <h1>{{ title }}</h1>
            <div class="metadata">
                <time datetime="{{ created_iso }}">{{ created }}</time>
                {% if updated != created %}
                &middot; Updated <time datetime="{{ updated_iso }}">{{ updated }}</time>
                {% endif %}
            </div>
        </header>
        <main>{{ content }}</main>
    </article>
</body>
</html>
"##;

/// Which of the two output forms is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Attachments referenced by relative path.
    Linked,
    /// Attachments embedded as data URIs.
    Inline,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Linked => "linked",
            RenderMode::Inline => "inline",
        }
    }
}

/// Options for rendering notes to HTML.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Path to custom template file.
    pub template_path: Option<PathBuf>,
    /// Theme name or path to CSS file.
    pub theme: Option<String>,
}

/// A loaded document template with its theme CSS.
///
/// Loading reads the template and theme once so a whole export run renders
/// from the same inputs.
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    source: String,
    theme_css: String,
}

impl DocumentTemplate {
    /// Loads the template and theme named by `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template file or theme cannot be read, or the
    /// template does not compile.
    pub fn load(options: &RenderOptions) -> Result<Self, RenderError> {
        let source = match &options.template_path {
            Some(path) => std::fs::read_to_string(path).map_err(|source| RenderError::Read {
                path: path.clone(),
                source,
            })?,
            None => DEFAULT_NOTE_TEMPLATE.to_string(),
        };
        let theme_css = get_theme_css(options.theme.as_deref())?;

        let template = Self { source, theme_css };
        // Surface syntax errors before any note is fetched.
        template.environment()?;
        Ok(template)
    }

    fn environment(&self) -> Result<Environment<'_>, RenderError> {
        let mut env = Environment::new();
        // The .html name turns on auto-escaping.
        env.add_template("note.html", &self.source)?;
        Ok(env)
    }

    /// Wraps already-converted body HTML in a full document.
    pub fn render(
        &self,
        note: &Note,
        content_html: &str,
        mode: RenderMode,
    ) -> Result<String, RenderError> {
        let env = self.environment()?;
        let tmpl = env.get_template("note.html")?;

        let html = tmpl.render(context! {
            guid => note.guid().as_str(),
            title => note.title(),
            mode => mode.as_str(),
            content => Value::from_safe_string(content_html.to_string()),
            theme_css => Value::from_safe_string(self.theme_css.clone()),
            created => note.created().format("%Y-%m-%d").to_string(),
            created_iso => note.created().to_rfc3339(),
            updated => note.updated().format("%Y-%m-%d").to_string(),
            updated_iso => note.updated().to_rfc3339(),
        })?;

        Ok(html)
    }
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_NOTE_TEMPLATE.to_string(),
            theme_css: crate::export::THEME_DEFAULT.to_string(),
        }
    }
}
