//! URL string helpers for paths pulled out of page markup

use url::Url;

/// Unescape JSON-style escaped forward slashes (`\/` -> `/`).
///
/// Player script paths are usually embedded in inline JSON, so the raw
/// substring between quotes carries escaped slashes.
pub fn unescape_slashes(path: &str) -> String {
    path.replace("\\/", "/")
}

/// Normalize a protocol-relative path (`//host/...`) by prefixing `http:`.
///
/// Other paths are returned unchanged.
pub fn ensure_scheme(path: &str) -> String {
    if path.starts_with("//") {
        format!("http:{}", path)
    } else {
        path.to_string()
    }
}

/// Check if a string parses as an absolute http(s) URL
pub fn is_http_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_slashes() {
        assert_eq!(
            unescape_slashes("\\/\\/s.ytimg.com\\/yts\\/jsbin\\/html5player-abc.js"),
            "//s.ytimg.com/yts/jsbin/html5player-abc.js"
        );

        // Already-plain paths pass through
        assert_eq!(unescape_slashes("/s/player/base.js"), "/s/player/base.js");
    }

    #[test]
    fn test_ensure_scheme() {
        assert_eq!(
            ensure_scheme("//s.ytimg.com/yts/jsbin/html5player-abc.js"),
            "http://s.ytimg.com/yts/jsbin/html5player-abc.js"
        );

        assert_eq!(
            ensure_scheme("https://example.com/player.js"),
            "https://example.com/player.js"
        );

        assert_eq!(ensure_scheme("/relative/path.js"), "/relative/path.js");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://www.youtube.com"));
        assert!(is_http_url("https://example.com/watch?v=xxx"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("//protocol-relative.com/x.js"));
        assert!(!is_http_url("not-a-url"));
        assert!(!is_http_url(""));
    }
}
