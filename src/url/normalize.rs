use crate::UrlError;
use url::Url;

/// Parses a seed URL into its normalized form
///
/// The seed must be an absolute `http` or `https` URL with a host. Its
/// fragment is stripped so that it deduplicates against links pointing back
/// at it.
///
/// # Examples
///
/// ```
/// use sumi_sweep::url::parse_seed;
///
/// let seed = parse_seed("https://Example.com#intro").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/");
/// ```
pub fn parse_seed(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_web_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves an href found on `page_url` into a normalized absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; empty hrefs are dropped
/// 2. Resolve relative references against the referring page
/// 3. Drop anything that is not `http`/`https` after resolution
///    (`mailto:`, `javascript:`, `tel:`, `data:` and friends)
/// 4. Remove the fragment
///
/// The result is what gets filtered, deduplicated and stored. Normalizing an
/// already-normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use sumi_sweep::url::normalize_link;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/intro").unwrap();
/// let link = normalize_link("../blog/post#comments", &page).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/blog/post");
///
/// assert!(normalize_link("mailto:someone@example.com", &page).is_none());
/// ```
pub fn normalize_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut resolved = page_url.join(href).ok()?;
    if !is_web_scheme(&resolved) {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

fn is_web_scheme(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}
