use pulldown_cmark::{Event, Options, Parser, html};
use std::io;

use crate::error::Error;

/// Rewrites applied to rendered HTML, in order. Notes collapses block
/// elements together, so headings, rules and paragraphs get explicit breaks.
const SPACING: &[(&str, &str)] = &[
    ("<h1>", "<br><br><h1>"),
    ("</h1>", "</h1><br>"),
    ("<h2>", "<br><br><h2>"),
    ("</h2>", "</h2><br>"),
    ("<h3>", "<br><h3>"),
    ("</h3>", "</h3><br>"),
    ("<hr />", "<br><hr /><br>"),
    ("<hr>", "<br><hr><br>"),
    ("</p>", "</p><br>"),
];

/// Leftover empty section wrapper that stood in for vertical spacing.
const EMPTY_SECTION: &str = "<div class=\"section\"></div>";

fn options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts
}

/// Write markdown as HTML into `writer`. Fenced code blocks are core
/// CommonMark; every soft line break is promoted to `<br />` so single
/// newlines survive.
pub fn write_html(markdown: &str, writer: impl io::Write) -> Result<(), Error> {
    let parser = Parser::new_ext(markdown, options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    html::write_html(writer, parser).map_err(Error::Render)
}

/// Render markdown to an HTML string.
pub fn render_html(markdown: &str) -> Result<String, Error> {
    let mut out = Vec::with_capacity(markdown.len() * 3 / 2);
    write_html(markdown, &mut out)?;
    String::from_utf8(out).map_err(|err| {
        Error::Render(io::Error::new(io::ErrorKind::InvalidData, err))
    })
}

/// Add the extra `<br>` spacing Notes needs around block elements.
pub fn add_spacing(html: &str) -> String {
    let spaced = SPACING
        .iter()
        .fold(html.to_string(), |acc, (from, to)| acc.replace(from, to));
    spaced.replace(EMPTY_SECTION, "<br><br>")
}

/// Markdown to Notes-ready HTML.
pub fn markdown_to_html(markdown: &str) -> Result<String, Error> {
    render_html(markdown).map(|html| add_spacing(&html))
}
