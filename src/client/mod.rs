//! Credential-scoped GitLab REST client.
//!
//! A `GitLabClient` is built per inbound call from that call's
//! [`TenantCredentials`]. It holds no mutable state; the only thing shared
//! between calls is the `reqwest::Client` transport passed to
//! [`GitLabClient::with_http`].

mod groups;
mod issues;
mod merge_requests;
mod pipelines;
mod projects;
mod repository;
mod settings;

use crate::auth::TenantCredentials;
use crate::error::Result;
use crate::http::{self, encode_path_segment, filter_query, Query};
use crate::pagination::{PageParams, Paginated};
use crate::types::ConnectionStatus;
use log::debug;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    creds: TenantCredentials,
}

impl GitLabClient {
    pub fn new(creds: TenantCredentials) -> Self {
        Self::with_http(Client::new(), creds)
    }

    pub fn with_http(http: Client, creds: TenantCredentials) -> Self {
        Self { http, creds }
    }

    pub fn base_url(&self) -> &str {
        self.creds.base_url()
    }

    /// Single-resource executor. `None` means GitLab answered without a
    /// body (204). See [`http::execute_json`].
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Option<T>> {
        http::execute_json(&self.http, &self.creds, method, path, query, body).await
    }

    pub async fn request_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<Paginated<T>> {
        http::execute_paginated(&self.http, &self.creds, path, query).await
    }

    pub async fn request_text(&self, path: &str, query: &Query) -> Result<String> {
        http::execute_text(&self.http, &self.creds, path, query).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.request_json(Method::GET, path, &Vec::new(), None).await
    }

    async fn send_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let body = serde_json::to_value(body)?;
        self.request_json(method, path, &Vec::new(), Some(&body))
            .await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.request_json(Method::POST, path, &Vec::new(), None).await
    }

    /// DELETE whose response body, if any, is not needed. GitLab answers
    /// most deletes with 204 but some editions echo the removed resource.
    async fn delete(&self, path: &str) -> Result<()> {
        let _: Option<Value> = self
            .request_json(Method::DELETE, path, &Vec::new(), None)
            .await?;
        Ok(())
    }

    /// List call with filters taken from a camelCase input struct.
    async fn list<T: DeserializeOwned, F: Serialize>(
        &self,
        path: &str,
        filters: &F,
        page: &PageParams,
    ) -> Result<Paginated<T>> {
        let mut query = filter_query(filters);
        query.extend(page.query_pairs());
        self.request_paginated(path, &query).await
    }

    /// Connectivity check. The one place where client errors are caught:
    /// any failure becomes `connected: false` with the error's message.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.get_current_user().await {
            Ok(Some(user)) => ConnectionStatus {
                connected: true,
                message: format!("Connected to GitLab as @{}", user.username),
                user: Some(user),
            },
            Ok(None) => ConnectionStatus {
                connected: true,
                message: "Connected to GitLab".to_string(),
                user: None,
            },
            Err(e) => {
                debug!("GitLab connection test failed: {}", e);
                ConnectionStatus {
                    connected: false,
                    message: e.to_string(),
                    user: None,
                }
            }
        }
    }
}

pub(crate) fn project_path(project_id: &str) -> String {
    format!("/projects/{}", encode_path_segment(project_id))
}

pub(crate) fn group_path(group_id: &str) -> String {
    format!("/groups/{}", encode_path_segment(group_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_paths_are_single_segments() {
        assert_eq!(project_path("group/sub-project"), "/projects/group%2Fsub-project");
        assert_eq!(project_path("123"), "/projects/123");
        assert_eq!(group_path("a/b/c"), "/groups/a%2Fb%2Fc");
    }
}
