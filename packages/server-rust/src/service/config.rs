/// Default root path segment under which events are served.
pub const DEFAULT_URL_NAME: &str = "team-events";

/// Configuration of the event endpoint itself.
///
/// Controls where events are mounted and the base URL advertised on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Root path segment, without slashes: events live at `/<url_name>/<event>`.
    pub url_name: String,
    /// Externally visible base URL, ending in `/`. When `None`, the index page
    /// derives one from the listening address.
    pub root_url: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url_name: DEFAULT_URL_NAME.to_string(),
            root_url: None,
        }
    }
}

impl EndpointConfig {
    /// Base URL for the index page, falling back to `http://<host>:<port>/`.
    #[must_use]
    pub fn root_url_or(&self, host: &str, port: u16) -> String {
        match &self.root_url {
            Some(url) if url.ends_with('/') => url.clone(),
            Some(url) => format!("{url}/"),
            None => format!("http://{host}:{port}/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mounts_under_team_events() {
        let config = EndpointConfig::default();
        assert_eq!(config.url_name, "team-events");
        assert!(config.root_url.is_none());
    }

    #[test]
    fn root_url_falls_back_to_listen_address() {
        let config = EndpointConfig::default();
        assert_eq!(config.root_url_or("localhost", 8080), "http://localhost:8080/");
    }

    #[test]
    fn configured_root_url_gets_trailing_slash() {
        let config = EndpointConfig {
            root_url: Some("https://ci.example.com/jenkins".to_string()),
            ..EndpointConfig::default()
        };
        assert_eq!(config.root_url_or("0.0.0.0", 80), "https://ci.example.com/jenkins/");

        let config = EndpointConfig {
            root_url: Some("https://ci.example.com/".to_string()),
            ..EndpointConfig::default()
        };
        assert_eq!(config.root_url_or("0.0.0.0", 80), "https://ci.example.com/");
    }
}
