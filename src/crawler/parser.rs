//! HTML anchor extraction
//!
//! Links are taken from every `<a>` element, whatever its attributes. An
//! anchor without `href` yields an empty string, which resolves to the
//! page's own directory and is then dropped by the frontier's duplicate
//! check. Resolution itself lives in [`crate::url::resolve_link`].

use lazy_static::lazy_static;
use scraper::{Html, Selector};

lazy_static! {
    static ref ANCHOR_SELECTOR: Selector = Selector::parse("a").unwrap();
}

/// Returns the raw `href` of every anchor in document order
///
/// The HTML5 parser recovers from malformed markup, so this never fails;
/// a document it cannot make sense of simply yields fewer anchors.
///
/// # Example
///
/// ```
/// use mail_ripple::crawler::extract_hrefs;
///
/// let html = r#"<a href="/team">Team</a><a name="top"></a>"#;
/// assert_eq!(extract_hrefs(html), vec!["/team".to_string(), String::new()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .map(|element| element.value().attr("href").unwrap_or("").to_string())
        .collect()
}
