/// Normalizes a seed URL before it enters the frontier
///
/// # Normalization Steps
///
/// 1. Prepend `http://` unless the string already starts with `http`
/// 2. Append a trailing `/` unless the string already ends with one
///
/// Nothing else is touched: host case, query strings and fragments are kept
/// as given, so two seeds differing only there stay distinct.
///
/// # Examples
///
/// ```
/// use mail_ripple::url::normalize_seed;
///
/// assert_eq!(normalize_seed("example.com"), "http://example.com/");
/// assert_eq!(normalize_seed("https://example.com/a"), "https://example.com/a/");
/// ```
pub fn normalize_seed(raw: &str) -> String {
    let mut url = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    if !url.ends_with('/') {
        url.push('/');
    }

    url
}
