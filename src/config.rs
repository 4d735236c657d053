use crate::auth::{ACCESS_TOKEN_HEADER, BASE_URL_HEADER, TOKEN_HEADER};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::env;

/// Process-level runtime configuration.
/// Values are sourced from environment variables with sensible defaults.
/// Tokens here are only defaults; every tools/call may override them.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub token: Option<String>,
    pub access_token: Option<String>,
    pub base_url: Option<String>,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
    pub enable_ping: bool,
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - GITLAB_TOKEN (personal/project access token)
    /// - GITLAB_ACCESS_TOKEN (or GITLAB_OAUTH_TOKEN) (OAuth bearer token)
    /// - GITLAB_BASE_URL (or GITLAB_API_URL) (default: https://gitlab.com/api/v4)
    /// - GITLAB_HTTP_TIMEOUT_SECS (default: no client-side timeout)
    /// - GITLAB_USER_AGENT (default: gitlab-mcp/<version>)
    /// - GITLAB_MCP_ENABLE_PING (default: off)
    pub fn from_env() -> Result<Self, String> {
        let token = non_empty_var("GITLAB_TOKEN");
        let access_token =
            non_empty_var("GITLAB_ACCESS_TOKEN").or_else(|| non_empty_var("GITLAB_OAUTH_TOKEN"));
        let base_url = non_empty_var("GITLAB_BASE_URL").or_else(|| non_empty_var("GITLAB_API_URL"));
        if let Some(u) = &base_url {
            url::Url::parse(u).map_err(|e| format!("Invalid GITLAB_BASE_URL {}: {}", u, e))?;
        }
        let timeout_secs = match non_empty_var("GITLAB_HTTP_TIMEOUT_SECS") {
            Some(s) => Some(
                s.parse::<u64>()
                    .map_err(|_| format!("Invalid GITLAB_HTTP_TIMEOUT_SECS: {}", s))?,
            ),
            None => None,
        };
        let user_agent = non_empty_var("GITLAB_USER_AGENT")
            .unwrap_or_else(|| format!("gitlab-mcp/{}", env!("CARGO_PKG_VERSION")));
        let enable_ping = non_empty_var("GITLAB_MCP_ENABLE_PING")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            token,
            access_token,
            base_url,
            user_agent,
            timeout_secs,
            enable_ping,
        })
    }

    /// Environment defaults expressed as inbound credential headers, so the
    /// stdio transport resolves credentials the same way per-call metadata
    /// does.
    pub fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (TOKEN_HEADER, &self.token),
            (ACCESS_TOKEN_HEADER, &self.access_token),
            (BASE_URL_HEADER, &self.base_url),
        ] {
            if let Some(v) = value {
                if let Ok(hv) = HeaderValue::from_str(v) {
                    headers.insert(HeaderName::from_static(name), hv);
                }
            }
        }
        headers
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credential, TenantCredentials};

    #[test]
    fn default_headers_feed_credential_resolution() {
        let cfg = Config {
            token: Some("glpat-x".into()),
            base_url: Some("https://gl.example/api/v4".into()),
            ..Config::default()
        };
        let creds = TenantCredentials::from_headers(&cfg.default_headers()).unwrap();
        assert_eq!(creds.credential(), &Credential::PrivateToken("glpat-x".into()));
        assert_eq!(creds.base_url(), "https://gl.example/api/v4");
    }

    #[test]
    fn empty_config_has_no_credentials() {
        let headers = Config::default().default_headers();
        assert!(headers.is_empty());
        assert!(TenantCredentials::from_headers(&headers).is_err());
    }
}
