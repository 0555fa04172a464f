//! Request path to storage key resolution

use crate::config::ProxyConfig;

/// Map a request path to a storage key.
///
/// A single leading `/` is stripped. An empty name becomes the index name when
/// one is configured. The key prefix is then prepended.
pub fn resolve_key(request_path: &str, config: &ProxyConfig) -> String {
    let name = request_path.strip_prefix('/').unwrap_or(request_path);
    let name = if name.is_empty() && !config.index_name.is_empty() {
        config.index_name.as_str()
    } else {
        name
    };
    format!("{}{}", config.key_prefix, name)
}

/// Key of the fallback object, resolved the same way as a request path.
///
/// Returns `None` when no fallback is configured.
pub fn resolve_fallback_key(config: &ProxyConfig) -> Option<String> {
    config
        .fallback_enabled()
        .then(|| resolve_key(&config.fallback_name, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(prefix: &str, index: &str, fallback: &str) -> ProxyConfig {
        ProxyConfig {
            key_prefix: prefix.to_string(),
            index_name: index.to_string(),
            fallback_name: fallback.to_string(),
            suppress_not_found: false,
        }
    }

    #[rstest]
    #[case("/index.html", "", "index.html")]
    #[case("index.html", "", "index.html")]
    #[case("/a/b/c.txt", "", "a/b/c.txt")]
    #[case("//double", "", "/double")]
    #[case("/", "", "")]
    #[case("", "", "")]
    #[case("/index.html", "site/", "site/index.html")]
    #[case("/", "site/", "site/")]
    fn test_resolve_without_index(#[case] path: &str, #[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(resolve_key(path, &config(prefix, "", "")), expected);
    }

    #[rstest]
    #[case("", "index.html")]
    #[case("/", "index.html")]
    #[case("/about.html", "about.html")]
    fn test_resolve_with_index(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(resolve_key(path, &config("", "index.html", "")), expected);
        assert_eq!(
            resolve_key(path, &config("www/", "index.html", "")),
            format!("www/{expected}")
        );
    }

    #[test]
    fn test_fallback_uses_same_resolution() {
        let cfg = config("site/", "index.html", "/404.html");
        assert_eq!(resolve_fallback_key(&cfg).as_deref(), Some("site/404.html"));
    }

    #[test]
    fn test_fallback_disabled() {
        assert_eq!(resolve_fallback_key(&config("site/", "index.html", "")), None);
    }
}
