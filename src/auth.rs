use crate::error::{GitLabError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

pub const DEFAULT_BASE_URL: &str = "https://gitlab.com/api/v4";

pub const TOKEN_HEADER: &str = "x-gitlab-token";
pub const ACCESS_TOKEN_HEADER: &str = "x-gitlab-access-token";
pub const BASE_URL_HEADER: &str = "x-gitlab-base-url";

const PRIVATE_TOKEN: &str = "private-token";

/// Exactly one way of authenticating against GitLab.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    PrivateToken(String),
    BearerToken(String),
}

impl std::fmt::Debug for Credential {
    // Never print token material.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrivateToken(_) => f.write_str("PrivateToken(***)"),
            Self::BearerToken(_) => f.write_str("BearerToken(***)"),
        }
    }
}

impl Credential {
    /// Outbound auth header for this credential.
    pub fn header(&self) -> Result<(HeaderName, HeaderValue)> {
        let (name, raw) = match self {
            Self::BearerToken(t) => (AUTHORIZATION, format!("Bearer {}", t.trim())),
            Self::PrivateToken(t) => (
                HeaderName::from_static(PRIVATE_TOKEN),
                t.trim().to_string(),
            ),
        };
        if self.token().trim().is_empty() {
            return Err(GitLabError::authentication(
                "No GitLab token available for this request",
            ));
        }
        let mut value = HeaderValue::from_str(&raw).map_err(|_| {
            GitLabError::authentication("GitLab token contains characters not allowed in a header")
        })?;
        value.set_sensitive(true);
        Ok((name, value))
    }

    fn token(&self) -> &str {
        match self {
            Self::PrivateToken(t) | Self::BearerToken(t) => t,
        }
    }
}

/// Per-call authentication context. Built fresh for every inbound call and
/// never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantCredentials {
    credential: Credential,
    base_url: String,
}

impl TenantCredentials {
    pub fn new(credential: Credential, base_url: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            credential,
            base_url,
        }
    }

    /// Resolve credentials from inbound request metadata. The OAuth access
    /// token wins over the private token when both are supplied.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let private = header_str(headers, TOKEN_HEADER);
        let bearer = header_str(headers, ACCESS_TOKEN_HEADER);
        let credential = match (bearer, private) {
            (Some(t), _) => Credential::BearerToken(t.to_string()),
            (None, Some(t)) => Credential::PrivateToken(t.to_string()),
            (None, None) => {
                return Err(GitLabError::authentication(
                    "Missing GitLab credentials: provide X-GitLab-Token or X-GitLab-Access-Token",
                ))
            }
        };
        Ok(Self::new(credential, header_str(headers, BASE_URL_HEADER)))
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, HeaderValue::from_str(v).unwrap());
        }
        h
    }

    #[test]
    fn missing_tokens_is_auth_error() {
        let err = TenantCredentials::from_headers(&headers(&[(
            "X-GitLab-Base-URL",
            "https://gl.example/api/v4",
        )]))
        .unwrap_err();
        assert!(matches!(err, GitLabError::Authentication { .. }));
    }

    #[test]
    fn blank_tokens_count_as_missing() {
        let err = TenantCredentials::from_headers(&headers(&[
            ("X-GitLab-Token", "  "),
            ("X-GitLab-Access-Token", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, GitLabError::Authentication { .. }));
    }

    #[test]
    fn bearer_takes_precedence() {
        let creds = TenantCredentials::from_headers(&headers(&[
            ("X-GitLab-Token", "glpat-1"),
            ("X-GitLab-Access-Token", "oauth-2"),
        ]))
        .unwrap();
        assert_eq!(creds.credential(), &Credential::BearerToken("oauth-2".into()));
        let (name, value) = creds.credential().header().unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer oauth-2");
    }

    #[test]
    fn private_token_header_scheme() {
        let creds =
            TenantCredentials::from_headers(&headers(&[("X-GitLab-Token", "glpat-1")])).unwrap();
        let (name, value) = creds.credential().header().unwrap();
        assert_eq!(name.as_str(), "private-token");
        assert_eq!(value.to_str().unwrap(), "glpat-1");
        assert_eq!(creds.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_override_trims_trailing_slash() {
        let creds = TenantCredentials::from_headers(&headers(&[
            ("X-GitLab-Token", "t"),
            ("X-GitLab-Base-URL", "https://gitlab.internal/api/v4/"),
        ]))
        .unwrap();
        assert_eq!(creds.base_url(), "https://gitlab.internal/api/v4");
    }

    #[test]
    fn empty_credential_rejected_at_header_time() {
        let err = Credential::PrivateToken(String::new()).header().unwrap_err();
        assert!(matches!(err, GitLabError::Authentication { .. }));
    }

    #[test]
    fn debug_redacts_tokens() {
        let dbg = format!("{:?}", Credential::BearerToken("secret".into()));
        assert!(!dbg.contains("secret"));
    }
}
