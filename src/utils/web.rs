//! URL utilities.

use std::borrow::Cow;
use url::Url;

/// Percent-decode a string, keeping it unchanged when it isn't valid UTF-8.
pub fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| s.to_string())
}

/// Make sure a listing URL ends with a slash so relative hrefs resolve inside it.
pub fn ensure_directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Whether `dir` is `of` itself or one of its ancestors.
pub fn is_ancestor_or_self(dir: &Url, of: &Url) -> bool {
    dir.origin() == of.origin() && of.path().starts_with(dir.path()) && dir.path().ends_with('/')
}

/// Percent-decoded path of the directory containing `url`.
pub fn parent_directory(url: &Url) -> String {
    let path = url.path().trim_end_matches('/');
    match path.rfind('/') {
        Some(idx) => decode(&path[..=idx]),
        None => "/".to_string(),
    }
}

/// Percent-decoded last path segment (file or directory name).
pub fn last_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(decode)
        .unwrap_or_default()
}
