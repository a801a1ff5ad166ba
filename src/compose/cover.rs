//! Cover letter rendering.
//!
//! An instance may ship a Markdown cover letter. It is rendered to HTML and
//! inline `<script>` blocks are removed before the result is attached to the
//! composed document.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use log::debug;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script[\s\S]*?>[\s\S]*?</script>").expect("script pattern is valid")
});

/// Render Markdown to HTML with GitHub-flavoured extensions.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Remove every `<script ...>...</script>` block from `html`.
pub fn strip_scripts(html: &str) -> String {
    SCRIPT_BLOCK.replace_all(html, "").into_owned()
}

/// Read and render the cover letter at `path`.
///
/// Returns `None` if the file does not exist, cannot be read, or is blank.
pub fn load_cover_html(path: &Path) -> Option<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!("No cover letter at {}: {}", path.display(), e);
            return None;
        }
    };
    if text.trim().is_empty() {
        return None;
    }
    Some(strip_scripts(&render_markdown(&text)))
}
