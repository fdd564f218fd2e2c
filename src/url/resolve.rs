use crate::{UrlError, UrlResult};
use url::Url;

/// A fetched page URL split into the pieces needed to resolve its links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    /// The URL exactly as it was dequeued
    pub url: String,

    /// Lowercase hostname, the grouping key for emails and the domain cap
    ///
    /// Taken from the URL as written: IPv6 literals lose their brackets and
    /// internationalized names stay in Unicode rather than punycode.
    pub hostname: String,

    /// `scheme://netloc`, used for root-relative links
    pub base_url: String,

    /// The URL cut after its last `/`, used for relative links
    pub path_prefix: String,
}

impl PageUrl {
    /// Splits a frontier URL into hostname, base URL and path prefix
    ///
    /// The base URL and path prefix are sliced from the original string so
    /// that a resolved link keeps whatever spelling the page used.
    ///
    /// # Examples
    ///
    /// ```
    /// use mail_ripple::url::PageUrl;
    ///
    /// let page = PageUrl::parse("http://a.com/p/index.html").unwrap();
    /// assert_eq!(page.hostname, "a.com");
    /// assert_eq!(page.base_url, "http://a.com");
    /// assert_eq!(page.path_prefix, "http://a.com/p/");
    /// ```
    pub fn parse(raw: &str) -> UrlResult<Self> {
        let parsed = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
        let parsed_host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UrlError::MissingHost(raw.to_string()))?;

        let (base_url, path) = split_base(raw);
        let hostname = authority_host(base_url)
            .unwrap_or_else(|| parsed_host.trim_start_matches('[').trim_end_matches(']'))
            .to_lowercase();

        // Without a `/` in the path there is no directory to resolve against
        let path_prefix = if path.contains('/') {
            match raw.rfind('/') {
                Some(idx) => raw[..=idx].to_string(),
                None => raw.to_string(),
            }
        } else {
            raw.to_string()
        };

        Ok(Self {
            url: raw.to_string(),
            hostname,
            base_url: base_url.to_string(),
            path_prefix,
        })
    }
}

/// Splits `scheme://netloc/path?query#frag` into `scheme://netloc` and `/path`
fn split_base(raw: &str) -> (&str, &str) {
    let authority_start = match raw.find("://") {
        Some(idx) => idx + 3,
        None => return (raw, ""),
    };

    let rest = &raw[authority_start..];
    let authority_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .map(|idx| authority_start + idx)
        .unwrap_or(raw.len());

    let after = &raw[authority_end..];
    let path_end = after.find(|c: char| matches!(c, '?' | '#')).unwrap_or(after.len());

    (&raw[..authority_end], &after[..path_end])
}

/// Host part of `scheme://[userinfo@]host[:port]`, without IPv6 brackets
fn authority_host(base_url: &str) -> Option<&str> {
    let authority = &base_url[base_url.find("://")? + 3..];
    let host_port = authority.rsplit('@').next()?;
    let host = match host_port.strip_prefix('[') {
        Some(literal) => literal.split(']').next()?,
        None => host_port.split(':').next()?,
    };
    Some(host).filter(|h| !h.is_empty())
}

/// Resolves an anchor `href` against the page it was found on
///
/// | href starts with | result                 |
/// |------------------|------------------------|
/// | `/`              | `base_url + href`      |
/// | `http`           | `href` unchanged       |
/// | anything else    | `path_prefix + href`   |
///
/// An empty `href` therefore resolves to the page's own directory.
///
/// # Examples
///
/// ```
/// use mail_ripple::url::{resolve_link, PageUrl};
///
/// let page = PageUrl::parse("http://a.com/p/").unwrap();
/// assert_eq!(resolve_link("/x", &page), "http://a.com/x");
/// assert_eq!(resolve_link("x", &page), "http://a.com/p/x");
/// assert_eq!(resolve_link("http://b.com/y", &page), "http://b.com/y");
/// ```
pub fn resolve_link(href: &str, page: &PageUrl) -> String {
    if href.starts_with('/') {
        format!("{}{}", page.base_url, href)
    } else if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", page.path_prefix, href)
    }
}
