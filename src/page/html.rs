// src/page/html.rs
// =============================================================================
// Reads the structural signals out of a parsed HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (the same parser a browser uses)
//
// Pages are parsed with scripting turned off, the way a browser without
// JavaScript would see them. With scripting on, html5ever keeps the body of
// <noscript> as one raw text node, so a tag manager's fallback
// `<iframe src=...>` would be counted as visible words.
//
// Signals:
// - visible text: every text node outside <script>, <style> and <template>,
//   trimmed, joined with single spaces
// - forms: number of <form> elements in the parsed tree. The HTML parser drops
//   a <form> opened inside another open <form>, so nested forms count once.
// - submit controls: <button> and <input> elements with type="submit"
// =============================================================================

use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::{Html, Selector};

/// Elements whose text content never shows up on screen
const HIDDEN_CONTAINERS: &[&str] = &["script", "style", "template"];

/// Parses a full HTML document with scripting disabled
///
/// `<noscript>` content becomes regular elements instead of a raw text blob.
pub fn parse_page(markup: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    driver::parse_document(Html::new_document(), opts).one(markup)
}

/// Extracts the text a visitor would read
///
/// Example:
///   "<p>  Hello </p><p>world</p>" -> "Hello world"
pub fn visible_text(document: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_CONTAINERS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }

    pieces.join(" ")
}

/// Number of <form> elements
pub fn count_forms(document: &Html) -> usize {
    // Constant selector, always valid
    let selector = Selector::parse("form").expect("valid selector");
    document.select(&selector).count()
}

/// Number of submit controls: <button type="submit"> and <input type="submit">
///
/// The attribute must be exactly "submit". A <button> without a type
/// attribute is not counted even though browsers treat it as a submit button.
pub fn count_submit_controls(document: &Html) -> usize {
    let selector = Selector::parse("button, input").expect("valid selector");
    document
        .select(&selector)
        .filter(|el| el.value().attr("type") == Some("submit"))
        .count()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why walk descendants instead of using .text()?
//    - ElementRef::text() yields every text node, including the contents
//      of <script> and <style>
//    - Walking the tree ourselves lets us skip those containers
//
// 2. What is let-else?
//    - `let Some(text) = ... else { continue; };` binds `text` if the
//      pattern matches, otherwise runs the else block (which must exit)
//
// 3. Why compare attr("type") by hand?
//    - CSS attribute selectors on `type` are case-insensitive in HTML
//      documents, and we want an exact "submit" match
//
// 4. Why not Html::parse_document?
//    - It uses the default parser options, which have scripting enabled
//    - TendrilSink::one feeds the whole string to the parser and returns
//      the finished document
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        parse_page(html)
    }

    #[test]
    fn test_visible_text_trims_and_joins() {
        let doc = parse("<html><body><p>  Hello </p>\n<p>world</p></body></html>");
        assert_eq!(visible_text(&doc), "Hello world");
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let doc = parse(
            "<html><head><title>Title</title><style>p { color: red }</style>\
             <script>var x = 1;</script></head><body><p>Body</p></body></html>",
        );
        assert_eq!(visible_text(&doc), "Title Body");
    }

    #[test]
    fn test_visible_text_skips_comments() {
        let doc = parse("<body><!-- hidden --><span>shown</span></body>");
        assert_eq!(visible_text(&doc), "shown");
    }

    #[test]
    fn test_visible_text_of_empty_document() {
        assert_eq!(visible_text(&parse("")), "");
    }

    #[test]
    fn test_visible_text_ignores_noscript_tracking_iframe() {
        let doc = parse(concat!(
            "<html><body><noscript>",
            r#"<iframe src="https://www.googletagmanager.com/ns.html?id=GTM-X" "#,
            r#"height="0" width="0" style="display:none"></iframe>"#,
            "</noscript><p>Hi</p></body></html>",
        ));
        assert_eq!(visible_text(&doc), "Hi");
    }

    #[test]
    fn test_visible_text_keeps_noscript_words() {
        let doc = parse("<noscript><p>Please enable JavaScript</p></noscript>");
        assert_eq!(visible_text(&doc), "Please enable JavaScript");
    }

    #[test]
    fn test_noscript_children_are_elements() {
        let doc = parse(r#"<body><noscript><img src="a.gif"></noscript>"#);
        let selector = Selector::parse("noscript img").unwrap();
        assert_eq!(doc.select(&selector).count(), 1);
        assert_eq!(visible_text(&doc), "");
    }

    #[test]
    fn test_count_forms() {
        let doc = parse("<form></form><div><form><input></form></div>");
        assert_eq!(count_forms(&doc), 2);
    }

    #[test]
    fn test_nested_form_is_dropped_by_parser() {
        let doc = parse("<form><input><form><input></form></form>");
        assert_eq!(count_forms(&doc), 1);
    }

    #[test]
    fn test_count_submit_controls() {
        let doc = parse(
            r#"<form>
                <input type="submit" value="Go">
                <button type="submit">Send</button>
                <button type="button">Cancel</button>
                <button>Plain</button>
                <input type="text">
            </form>"#,
        );
        assert_eq!(count_submit_controls(&doc), 2);
    }

    #[test]
    fn test_submit_type_is_case_sensitive() {
        let doc = parse(r#"<input type="SUBMIT"><input type="submit">"#);
        assert_eq!(count_submit_controls(&doc), 1);
    }
}
