use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a raw anchor reference into a canonical, absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding ASCII whitespace, as browsers do for href values
/// 2. Resolve a root-relative reference (`/path`) against the scheme and host
///    (including port) of `base_url`
/// 3. Reject anything whose scheme is not `http` or `https`
/// 4. Reject anything the URL parser refuses
/// 5. Strip trailing slashes
/// 6. Lowercase the whole URL, path and query included
///
/// Lowercasing everything is more aggressive than URL case rules allow; two
/// URLs that differ only by case are treated as the same page.
///
/// # Arguments
///
/// * `raw_href` - The href as it appeared in the document
/// * `base_url` - URL of the page the href was found on
///
/// # Returns
///
/// * `Ok(String)` - Canonical URL
/// * `Err(UrlError)` - The reference cannot be turned into a crawlable URL
///
/// # Examples
///
/// ```
/// use spider_nest::url::normalize_url;
///
/// let url = normalize_url("/About/", "https://example.com/x").unwrap();
/// assert_eq!(url, "https://example.com/about");
/// ```
pub fn normalize_url(raw_href: &str, base_url: &str) -> UrlResult<String> {
    let raw_href = raw_href.trim_matches(|c: char| c.is_ascii_whitespace());
    let absolute = if raw_href.starts_with('/') {
        format!("{}{}", origin_of(base_url)?, raw_href)
    } else {
        raw_href.to_string()
    };

    let scheme_end = absolute
        .find("://")
        .ok_or_else(|| UrlError::InvalidScheme(absolute.clone()))?;
    let scheme = absolute[..scheme_end].to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(UrlError::InvalidScheme(scheme));
    }

    let parsed = Url::parse(&absolute).map_err(|e| UrlError::Parse(e.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(UrlError::MissingHost(absolute));
    }

    Ok(absolute.trim_end_matches('/').to_lowercase())
}

/// Returns `scheme://host[:port]` of a base URL
fn origin_of(base_url: &str) -> UrlResult<String> {
    let base = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
    let host = base
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(base_url.to_string()))?;

    Ok(match base.port() {
        Some(port) => format!("{}://{}:{}", base.scheme(), host, port),
        None => format!("{}://{}", base.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/x";

    #[test]
    fn test_resolve_root_relative() {
        let result = normalize_url("/about", BASE).unwrap();
        assert_eq!(result, "https://example.com/about");
    }

    #[test]
    fn test_resolve_keeps_base_port() {
        let result = normalize_url("/page1", "http://127.0.0.1:8080/index").unwrap();
        assert_eq!(result, "http://127.0.0.1:8080/page1");
    }

    #[test]
    fn test_absolute_url_untouched_apart_from_case() {
        let result = normalize_url("https://Other.COM/Page?Q=1", BASE).unwrap();
        assert_eq!(result, "https://other.com/page?q=1");
    }

    #[test]
    fn test_strip_trailing_slash() {
        let result = normalize_url("http://example.com/", BASE).unwrap();
        assert_eq!(result, "http://example.com");

        let result = normalize_url("http://example.com/docs/", BASE).unwrap();
        assert_eq!(result, "http://example.com/docs");
    }

    #[test]
    fn test_root_relative_slash_is_origin() {
        let result = normalize_url("/", BASE).unwrap();
        assert_eq!(result, "https://example.com");
    }

    #[test]
    fn test_reject_non_http_schemes() {
        assert!(matches!(
            normalize_url("mailto:someone@example.com", BASE),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            normalize_url("ftp://example.com/file", BASE),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(normalize_url("javascript:void(0)", BASE).is_err());
    }

    #[test]
    fn test_reject_path_relative_and_fragments() {
        assert!(normalize_url("other/page", BASE).is_err());
        assert!(normalize_url("#section", BASE).is_err());
        assert!(normalize_url("", BASE).is_err());
    }

    #[test]
    fn test_uppercase_scheme_accepted() {
        let result = normalize_url("HTTPS://EXAMPLE.COM/A", BASE).unwrap();
        assert_eq!(result, "https://example.com/a");
    }

    #[test]
    fn test_unparseable_url_fails_closed() {
        assert!(normalize_url("http://", BASE).is_err());
        assert!(normalize_url("http://exa mple.com/", BASE).is_err());
    }

    #[test]
    fn test_relative_with_unparseable_base() {
        let result = normalize_url("/about", "not a url");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "/About/",
            "https://Example.com/Docs//",
            "http://example.com",
            "/a/b?x=Y",
            "https://sub.example.co.uk/path/",
        ];

        for input in inputs {
            let once = normalize_url(input, BASE).unwrap();
            let twice = normalize_url(&once, BASE).unwrap();
            assert_eq!(once, twice, "normalization of {} is not idempotent", input);
        }
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(
            normalize_url("/about/ ", BASE).unwrap(),
            "https://example.com/about"
        );
        assert_eq!(
            normalize_url(" /about", BASE).unwrap(),
            "https://example.com/about"
        );
        assert_eq!(
            normalize_url("https://example.com/about\n", BASE).unwrap(),
            "https://example.com/about"
        );
        assert_eq!(
            normalize_url("\t/About\r\n", BASE).unwrap(),
            "https://example.com/about"
        );
    }

    #[test]
    fn test_blank_href_rejected() {
        assert!(normalize_url("   ", BASE).is_err());
    }
}
