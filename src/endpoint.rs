//! URL construction from client configuration, path, and query parameters.

use url::Url;

use crate::{client::Config, Error};

/// Builds the absolute URL for a request.
///
/// Paths starting with `/` are resolved against the configured scheme, host,
/// and port. Anything else must already be a fully-qualified URL and passes
/// through with its own scheme, host, and port untouched. A configured base
/// path is prepended before either rule applies.
pub(crate) fn build_url(
    config: &Config,
    path: &str,
    query: &[(String, Option<String>)],
) -> Result<Url, Error> {
    let path = match &config.base_path {
        Some(base_path) => format!("{base_path}{path}"),
        None => path.to_owned(),
    };

    let mut url = if path.starts_with('/') {
        let scheme = if config.insecure { "http" } else { "https" };
        let base = Url::parse(&format!("{scheme}://{host}", host = config.host))?;
        let mut url = base.join(&path)?;
        // A leading "//" parses as a network-path reference carrying its own
        // authority; the configured host and port win for every
        // slash-prefixed path.
        url.set_host(Some(&config.host))?;
        url.set_port(config.port)
            .map_err(|_| Error::MalformedUrl(format!("cannot set port on {url}")))?;
        url
    } else {
        Url::parse(&path)?
    };

    let present: Vec<_> = query
        .iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key.as_str(), value)))
        .collect();
    if !present.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in present {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "api.github.com".to_string(),
            base_path: None,
            port: None,
            insecure: false,
            timeout: None,
        }
    }

    fn query(entries: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn relative_path_resolves_against_configuration() {
        let url = build_url(&config(), "/user", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/user");
    }

    #[test]
    fn insecure_flag_selects_http() {
        let mut config = config();
        config.insecure = true;
        let url = build_url(&config, "/user", &[]).unwrap();
        assert_eq!(url.as_str(), "http://api.github.com/user");
    }

    #[test]
    fn configured_port_is_applied() {
        let mut config = config();
        config.port = Some(8080);
        let url = build_url(&config, "/user", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com:8080/user");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn base_path_is_prepended() {
        let mut config = config();
        config.base_path = Some("/v3".to_string());
        let url = build_url(&config, "/user", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/v3/user");
    }

    #[test]
    fn protocol_relative_path_resolves_against_configured_host() {
        let url = build_url(&config(), "//evil.com/x", &[]).unwrap();
        assert_eq!(url.host_str(), Some("api.github.com"));
        assert_eq!(url.path(), "/x");
    }

    #[test]
    fn protocol_relative_path_does_not_keep_a_foreign_port() {
        let url = build_url(&config(), "//evil.com:9999/x", &[]).unwrap();
        assert_eq!(url.host_str(), Some("api.github.com"));
        assert_eq!(url.port(), None);
        assert_eq!(url.path(), "/x");
    }

    #[test]
    fn fully_qualified_url_passes_through_untouched() {
        let mut config = config();
        config.port = Some(8080);
        config.insecure = true;
        let url = build_url(&config, "http://localhost:9999/status", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/status");
    }

    #[test]
    fn none_valued_query_entries_are_dropped() {
        let url = build_url(
            &config(),
            "/search",
            &query(&[("q", Some("rust")), ("page", None), ("limit", Some("10"))]),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/search?q=rust&limit=10"
        );
    }

    #[test]
    fn all_none_query_leaves_url_without_query_string() {
        let url = build_url(&config(), "/user", &query(&[("page", None)])).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let url = build_url(&config(), "/search", &query(&[("q", Some("a b"))])).unwrap();
        assert_eq!(url.query(), Some("q=a+b"));
    }

    #[test]
    fn query_appends_to_query_already_in_path() {
        let url = build_url(&config(), "/search?sort=asc", &query(&[("q", Some("rust"))])).unwrap();
        assert_eq!(url.query(), Some("sort=asc&q=rust"));
    }

    #[test]
    fn unparseable_path_is_a_malformed_url_error() {
        let err = build_url(&config(), "user", &[]).unwrap_err();
        assert!(matches!(err, Error::MalformedUrl(_)));
    }
}
