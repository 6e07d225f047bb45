// file: src/results/highlight.rs
// description: highlighted field rendering for result views
// reference: https://manual.manticoresearch.com/Searching/Highlighting

use crate::models::{Paragraph, ParagraphField};
use crate::parser::MarkdownRenderer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    /// HTML-escaped text
    #[default]
    Text,
    Markdown,
}

/// First highlight fragment of `field`, or its raw value, rendered as HTML.
pub fn highlight_field_content(
    paragraph: &Paragraph,
    field: ParagraphField,
    kind: HighlightKind,
    single_line: bool,
) -> String {
    let renderer = MarkdownRenderer::new();
    let source = paragraph.highlighted(field);

    let rendered = match kind {
        HighlightKind::Markdown => renderer.render(source),
        HighlightKind::Text => renderer.escape_text(source),
    };

    if single_line {
        renderer.to_single_line(&rendered)
    } else {
        rendered
    }
}
