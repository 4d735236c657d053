use crate::auth::TenantCredentials;
use crate::config::Config;
use crate::error::{classify_status, GitLabError, Result};
use crate::pagination::Paginated;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub type Query = Vec<(String, String)>;

const MAX_REDIRECTS: usize = 10;

/// Shared outbound transport. Holds no credentials; those are attached per
/// request so one client can serve every tenant.
pub fn build_client(cfg: &Config) -> reqwest::Result<Client> {
    let mut default_headers = HeaderMap::new();
    if let Ok(ua) = HeaderValue::from_str(&cfg.user_agent) {
        default_headers.insert(USER_AGENT, ua);
    }
    let mut builder = Client::builder()
        .default_headers(default_headers)
        .redirect(same_origin_redirects())
        .use_rustls_tls();
    if let Some(secs) = cfg.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// Follow redirects only while they stay on the origin of the first request.
/// reqwest drops `Authorization` across hosts but not `PRIVATE-TOKEN`, so a
/// hop elsewhere (object storage for traces and raw files) is not followed
/// and the 3xx surfaces as an API error.
fn same_origin_redirects() -> Policy {
    Policy::custom(|attempt| {
        let leaves_origin = attempt
            .previous()
            .first()
            .is_some_and(|origin| !same_origin(origin, attempt.url()));
        if leaves_origin {
            attempt.stop()
        } else if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Percent-encode one path segment. Everything outside the unreserved set is
/// escaped, so `group/project` stays a single segment.
pub fn encode_path_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Serialize a camelCase filter struct into GitLab query parameters.
/// Pagination fields are skipped (see `PageParams::query_pairs`), as are
/// nulls. Arrays are sent comma-separated.
pub fn filter_query<T: Serialize>(filters: &T) -> Query {
    let Ok(Value::Object(map)) = serde_json::to_value(filters) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(map.len());
    for (key, value) in map {
        if key == "page" || key == "perPage" {
            continue;
        }
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Array(items) => items
                .iter()
                .filter_map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        };
        out.push((to_snake_case(&key), rendered));
    }
    out
}

fn authorized(
    http: &Client,
    creds: &TenantCredentials,
    method: Method,
    path: &str,
    query: &Query,
) -> Result<RequestBuilder> {
    let (name, value) = creds.credential().header()?;
    let url = format!("{}{}", creds.base_url(), path);
    let mut req = http.request(method, url).header(name, value);
    if !query.is_empty() {
        req = req.query(query);
    }
    Ok(req)
}

async fn send(req: RequestBuilder, method: &Method, path: &str) -> Result<Response> {
    debug!("GitLab {} {}", method, path);
    req.send().await.map_err(|e| {
        warn!("GitLab {} {} transport error: {}", method, path, e);
        GitLabError::Network {
            message: e.to_string(),
        }
    })
}

async fn check(res: Response, method: &Method, path: &str) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let headers = res.headers().clone();
    let body = res.text().await.unwrap_or_default();
    let err = classify_status(status, &headers, &body);
    warn!("GitLab {} {} failed with {}: {}", method, path, status, err);
    Err(err)
}

/// Single-resource executor. A 204, or a 2xx with an empty body, yields
/// `None` without attempting to decode anything.
pub async fn execute_json<T: DeserializeOwned>(
    http: &Client,
    creds: &TenantCredentials,
    method: Method,
    path: &str,
    query: &Query,
    body: Option<&Value>,
) -> Result<Option<T>> {
    let mut req = authorized(http, creds, method.clone(), path, query)?
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(b) = body {
        req = req.json(b);
    }
    let res = check(send(req, &method, path).await?, &method, path).await?;
    if res.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let bytes = res.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// List executor: GET, decode a JSON array and attach header pagination.
pub async fn execute_paginated<T: DeserializeOwned>(
    http: &Client,
    creds: &TenantCredentials,
    path: &str,
    query: &Query,
) -> Result<Paginated<T>> {
    let method = Method::GET;
    let req = authorized(http, creds, method.clone(), path, query)?
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let res = check(send(req, &method, path).await?, &method, path).await?;
    let headers = res.headers().clone();
    if res.status() == StatusCode::NO_CONTENT {
        return Ok(Paginated::from_headers(Vec::new(), &headers));
    }
    let bytes = res.bytes().await?;
    let items: Vec<T> = if bytes.is_empty() {
        Vec::new()
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok(Paginated::from_headers(items, &headers))
}

/// Raw text executor for endpoints that do not return JSON.
pub async fn execute_text(
    http: &Client,
    creds: &TenantCredentials,
    path: &str,
    query: &Query,
) -> Result<String> {
    let method = Method::GET;
    let req = authorized(http, creds, method.clone(), path, query)?;
    let res = check(send(req, &method, path).await?, &method, path).await?;
    Ok(res.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageParams;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filters {
        order_by: Option<String>,
        with_merge_status_recheck: Option<bool>,
        labels: Option<Vec<String>>,
        author_id: Option<u64>,
        search: Option<String>,
        #[serde(flatten)]
        page: PageParams,
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("orderBy"), "order_by");
        assert_eq!(to_snake_case("withMergeStatusRecheck"), "with_merge_status_recheck");
        assert_eq!(to_snake_case("state"), "state");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn filter_query_skips_pagination_and_nulls() {
        let f = Filters {
            order_by: Some("updated_at".into()),
            with_merge_status_recheck: Some(true),
            labels: Some(vec!["bug".into(), "ui".into()]),
            author_id: Some(7),
            search: None,
            page: PageParams::new(Some(2), Some(50)),
        };
        let mut q = filter_query(&f);
        q.sort();
        assert_eq!(
            q,
            vec![
                ("author_id".to_string(), "7".to_string()),
                ("labels".to_string(), "bug,ui".to_string()),
                ("order_by".to_string(), "updated_at".to_string()),
                ("with_merge_status_recheck".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn redirect_origin_comparison() {
        let api = Url::parse("https://gitlab.example/api/v4/projects/1/jobs/2/trace").unwrap();
        let same = Url::parse("https://gitlab.example:443/api/v4/other").unwrap();
        assert!(same_origin(&api, &same));
        for other in [
            "https://storage.example/blob",
            "http://gitlab.example/api/v4/x",
            "https://gitlab.example:8443/api/v4/x",
        ] {
            assert!(!same_origin(&api, &Url::parse(other).unwrap()), "{}", other);
        }
    }

    #[test]
    fn path_segments_keep_slashes_encoded() {
        assert_eq!(encode_path_segment("group/sub-project"), "group%2Fsub-project");
        assert_eq!(encode_path_segment("42"), "42");
        assert_eq!(encode_path_segment("Prod Env/Blue%"), "Prod%20Env%2FBlue%25");
        assert_eq!(encode_path_segment("abc-._~123"), "abc-._~123");
    }
}
