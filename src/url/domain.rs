use url::Url;

/// Extracts the hostname from a URL
///
/// The host is lowercased and the port is never included. If the URL has no
/// host (e.g. `mailto:` links), this returns `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitewalk::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Returns true if `url` belongs to the same site as `base`
///
/// Hostnames must match exactly: subdomains are a different site, ports and
/// schemes are ignored.
pub fn is_same_site(url: &Url, base: &Url) -> bool {
    match (extract_domain(url), extract_domain(base)) {
        (Some(host), Some(base_host)) => host == base_host,
        _ => false,
    }
}
