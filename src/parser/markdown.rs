// file: src/parser/markdown.rs
// description: markdown rendering of paragraph content with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use lazy_static::lazy_static;
use pulldown_cmark::{Options, Parser, html};
use regex::{Captures, Regex};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

lazy_static! {
    static ref HTML_TAG: Regex =
        Regex::new(r"</?[A-Za-z][^>]*>").expect("HTML_TAG regex is valid");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("WHITESPACE regex is valid");
    static ref SPACE_AFTER_MARK: Regex =
        Regex::new(r"<mark>\s+").expect("SPACE_AFTER_MARK regex is valid");
    static ref SPACE_BEFORE_MARK_CLOSE: Regex =
        Regex::new(r"\s+</mark>").expect("SPACE_BEFORE_MARK_CLOSE regex is valid");
}

pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES,
        }
    }

    /// Inline `<mark>` tags from the engine survive as raw HTML.
    pub fn render(&self, content: &str) -> String {
        let parser = Parser::new_ext(content, self.options);
        let mut output = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }

    /// Flattens rendered HTML to one line, keeping only highlight markers.
    pub fn to_single_line(&self, rendered: &str) -> String {
        let stripped = HTML_TAG.replace_all(rendered, |caps: &Captures| {
            let tag = &caps[0];
            if tag == MARK_OPEN || tag == MARK_CLOSE {
                tag.to_string()
            } else {
                String::new()
            }
        });

        let collapsed = WHITESPACE.replace_all(&stripped, " ");
        let opened = SPACE_AFTER_MARK.replace_all(&collapsed, MARK_OPEN);
        let closed = SPACE_BEFORE_MARK_CLOSE.replace_all(&opened, MARK_CLOSE);

        closed.trim().to_string()
    }

    /// Escapes plain text for HTML output while keeping highlight markers.
    pub fn escape_text(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                _ => escaped.push(c),
            }
        }

        escaped
            .replace("&lt;mark&gt;", MARK_OPEN)
            .replace("&lt;/mark&gt;", MARK_CLOSE)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
