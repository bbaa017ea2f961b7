//! Plain-text rendering of entry content.
//!
//! Display messages carry HTML and stream text often carries ANSI colour
//! codes. The terminal cannot show either, so the panel renders a stripped,
//! single-line version. The stored entry content is left untouched.

use std::sync::OnceLock;

use regex::Regex;

/// Separator shown where the content had a line break.
pub const LINE_BREAK: &str = " ⏎ ";

fn block_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|tr|pre|h[1-6])\s*>").expect("block break pattern")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("tag pattern"))
}

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ansi pattern"))
}

/// Remove HTML tags and ANSI escapes and decode the common entities.
pub fn strip(content: &str) -> String {
    let text = ansi_re().replace_all(content, "");
    let text = block_break_re().replace_all(&text, "\n");
    let text = tag_re().replace_all(&text, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    // &amp; goes last so "&amp;lt;" decodes to "&lt;", not "<".
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Collapse `content` onto one row: blank lines dropped, remaining lines
/// joined with [`LINE_BREAK`].
pub fn single_line(content: &str) -> String {
    content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

/// What the panel shows for an entry's content.
pub fn display_text(content: &str, strip_markup: bool) -> String {
    if strip_markup {
        single_line(&strip(content))
    } else {
        single_line(content)
    }
}
