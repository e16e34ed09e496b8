use crate::UrlError;
use url::{ParseError, Url};

/// Canonicalizes a URL into the key used to deduplicate pages
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Take the hostname (no scheme, no port) and the path
/// 3. Drop empty and `.` path segments, resolve `..`
/// 4. Join hostname and path with a single `/`
/// 5. Lowercase the result
/// 6. Strip trailing slashes (the hostname itself is never shortened)
///
/// Query strings and fragments are discarded, so two URLs that differ only
/// in scheme, port, query or fragment share the same key.
///
/// Relative references have no hostname; their key is the cleaned,
/// lowercased path alone.
///
/// # Arguments
///
/// * `url_str` - The URL string to canonicalize
///
/// # Returns
///
/// * `Ok(String)` - The canonical key
/// * `Err(UrlError)` - The input is not a parseable URL
///
/// # Examples
///
/// ```
/// use sitewalk::url::canonicalize;
///
/// let key = canonicalize("https://Blog.Example.com:8443/Path/?q=1#top").unwrap();
/// assert_eq!(key, "blog.example.com/path");
/// ```
pub fn canonicalize(url_str: &str) -> Result<String, UrlError> {
    match Url::parse(url_str) {
        Ok(url) => Ok(build_key(url.host_str().unwrap_or(""), url.path())),
        Err(ParseError::RelativeUrlWithoutBase) => {
            Ok(build_key("", strip_query_and_fragment(url_str.trim())))
        }
        Err(e) => Err(UrlError::Parse(format!("{}: {}", url_str, e))),
    }
}

/// Joins a hostname and a cleaned path into a lowercase key
fn build_key(host: &str, path: &str) -> String {
    let path = clean_path(path);

    let key = if host.is_empty() {
        path
    } else if path.is_empty() {
        host.to_string()
    } else {
        format!("{}/{}", host, path.trim_start_matches('/'))
    };

    key.to_lowercase().trim_end_matches('/').to_string()
}

/// Removes empty and dot segments from a path, keeping a leading slash if present
fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    if path.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

fn strip_query_and_fragment(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    &reference[..end]
}
