/*!
 * Markup normalization.
 *
 * Raw README and post text arrives as Markdown with embedded HTML. The
 * normalizer renders Markdown to HTML, then keeps only the text nodes, so that
 * link targets, image sources and other attributes never reach the segmenter.
 */

use log::warn;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use scraper::Html;
use std::panic::{self, AssertUnwindSafe};

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("tag pattern is valid")
});

/// Strip Markdown and HTML markup, returning plain prose.
///
/// Text nodes are trimmed, inner whitespace is collapsed to single spaces and
/// nodes are joined with one space. Never fails: if rendering panics the raw
/// text is tag-stripped instead.
pub fn normalize_markup(raw: &str) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| render_and_strip(raw))) {
        Ok(text) => text,
        Err(_) => {
            warn!("Markup rendering failed, falling back to tag stripping");
            strip_tags(raw)
        }
    }
}

fn render_and_strip(raw: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut rendered = String::with_capacity(raw.len() + raw.len() / 4);
    html::push_html(&mut rendered, Parser::new_ext(raw, options));

    let fragment = Html::parse_fragment(&rendered);
    let pieces: Vec<String> = fragment
        .root_element()
        .text()
        .map(collapse_whitespace)
        .filter(|piece| !piece.is_empty())
        .collect();
    pieces.join(" ")
}

/// Regex fallback used when the HTML pipeline cannot be trusted
pub fn strip_tags(raw: &str) -> String {
    collapse_whitespace(&TAG_PATTERN.replace_all(raw, " "))
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
