//! Email address extraction
//!
//! A single case-insensitive pattern is run over the whole response body,
//! markup included, so addresses in attributes, scripts and comments are
//! found as well as those in visible text.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    // local part, `@`, domain, then a final alphabetic label
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)[a-z0-9.\-+_]+@[a-z0-9.\-+_]+\.[a-z]+").unwrap();
}

/// Returns the distinct email-like tokens in `text`, with original casing
///
/// # Example
///
/// ```
/// use mail_ripple::crawler::extract_emails;
///
/// let found = extract_emails("contact: a.b+c@example.co.uk or x@y.io");
/// assert_eq!(found.len(), 2);
/// assert!(found.contains("a.b+c@example.co.uk"));
/// assert!(found.contains("x@y.io"));
/// ```
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
