use url::Url;

/// Extracts the registrable domain (last two DNS labels) from a URL
///
/// The host is split on `.` and the last two labels are joined back together,
/// lowercased. Multi-part public suffixes are not special-cased, so
/// `sub.example.co.uk` yields `co.uk`.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase `label.label` domain
/// * `None` - If the URL does not parse or its host has fewer than two labels
///
/// # Examples
///
/// ```
/// use spider_nest::url::extract_domain;
///
/// assert_eq!(extract_domain("https://blog.example.com/post"), Some("example.com".to_string()));
/// assert_eq!(extract_domain("http://localhost:8080/"), None);
/// ```
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return None;
    }

    Some(format!(
        "{}.{}",
        labels[labels.len() - 2],
        labels[labels.len() - 1]
    ))
}
