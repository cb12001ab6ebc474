//! Markdown to HTML conversion for markdown-kind fields.

use pulldown_cmark::{Event, Options, Parser, html};

/// Converts markdown source to HTML.
///
/// Single newlines inside a paragraph become `<br />` rather than being
/// folded into a space.
pub fn to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::empty()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut output = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut output, parser);
    output
}
