use gitlab_mcp::auth::{Credential, TenantCredentials};
use gitlab_mcp::inputs::{
    CreateIssueInput, FileInput, ListIssuesInput, ListProjectMembersInput, MergeRequestInput,
    ProjectPageInput, VariableInput,
};
use gitlab_mcp::{GitLabClient, GitLabError};
use httpmock::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

fn client_for(server: &MockServer) -> GitLabClient {
    GitLabClient::new(TenantCredentials::new(
        Credential::PrivateToken("glpat-test".into()),
        Some(&server.url("/api/v4")),
    ))
}

fn input<T: DeserializeOwned>(v: Value) -> T {
    serde_json::from_value(v).unwrap()
}

fn user_json() -> Value {
    json!({"id": 7, "username": "dev", "name": "Dev User", "state": "active"})
}

#[tokio::test]
async fn private_token_header_and_pagination_headers() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v4/projects/42/variables")
                .header("private-token", "glpat-test")
                .query_param("per_page", "20")
                .query_param("page", "2");
            then.status(200)
                .header("content-type", "application/json")
                .header("X-Total", "42")
                .header("X-Total-Pages", "3")
                .header("X-Page", "2")
                .header("X-Next-Page", "3")
                .json_body(json!([{"key": "A", "value": "1"}, {"key": "B", "masked": true}]));
        })
        .await;

    let client = client_for(&server);
    let page = client
        .list_variables(&input::<ProjectPageInput>(
            json!({"projectId": 42, "page": 2, "perPage": 20}),
        ))
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(page.count, 2);
    assert_eq!(page.total, Some(42));
    assert_eq!(page.total_pages, Some(3));
    assert_eq!(page.page, Some(2));
    assert_eq!(page.next_page, Some(3));
    assert!(page.has_more);
    assert_eq!(page.items[0].key, "A");
}

#[tokio::test]
async fn last_page_has_no_more() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/issues");
            then.status(200)
                .header("X-Page", "3")
                .header("X-Total-Pages", "3")
                .header("X-Next-Page", "")
                .json_body(json!([]));
        })
        .await;

    let page = client_for(&server)
        .list_issues(&input::<ListIssuesInput>(json!({})))
        .await
        .unwrap();
    assert_eq!(page.count, 0);
    assert_eq!(page.next_page, None);
    assert!(!page.has_more);
}

#[tokio::test]
async fn bearer_token_uses_authorization_header() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v4/user")
                .header("authorization", "Bearer oauth-abc");
            then.status(200).json_body(user_json());
        })
        .await;

    let client = GitLabClient::new(TenantCredentials::new(
        Credential::BearerToken("oauth-abc".into()),
        Some(&server.url("/api/v4")),
    ));
    let user = client.get_current_user().await.unwrap().expect("user body");
    m.assert_async().await;
    assert_eq!(user.username, "dev");
}

#[tokio::test]
async fn namespaced_project_stays_one_segment() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("sub-project");
            then.status(200)
                .json_body(json!({"id": 9, "name": "sub-project", "path_with_namespace": "group/sub-project"}));
        })
        .await;

    let project = client_for(&server)
        .get_project("group/sub-project")
        .await
        .unwrap()
        .expect("project body");
    m.assert_async().await;
    assert_eq!(project.id, 9);
}

#[tokio::test]
async fn delete_with_no_content_succeeds() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/v4/projects/5/issues/3");
            then.status(204);
        })
        .await;

    let res = client_for(&server)
        .delete_issue(&input(json!({"projectId": 5, "issueIid": 3})))
        .await;
    m.assert_async().await;
    assert!(res.is_ok());
}

#[tokio::test]
async fn no_content_on_typed_resource_is_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/1");
            then.status(204);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v4/projects/1/jobs/5/retry");
            then.status(204);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v4/projects/1/merge_requests/2/merge");
            then.status(200);
        })
        .await;

    let client = client_for(&server);
    assert_eq!(client.get_project("1").await.unwrap(), None);
    let job = client
        .retry_job(&input(json!({"projectId": 1, "jobId": 5})))
        .await
        .unwrap();
    assert!(job.is_none());
    let merged = client
        .merge_merge_request(&input(json!({"projectId": 1, "mergeRequestIid": 2})))
        .await
        .unwrap();
    assert!(merged.is_none());
}

#[tokio::test]
async fn cross_host_redirect_does_not_leak_token() {
    let gitlab = MockServer::start_async().await;
    let storage = MockServer::start_async().await;
    let leaked = storage
        .mock_async(|when, then| {
            when.method(GET)
                .path("/blob")
                .header("private-token", "glpat-test");
            then.status(200).body("trace from storage");
        })
        .await;
    let fetched = storage
        .mock_async(|when, then| {
            when.method(GET).path("/blob");
            then.status(200).body("trace from storage");
        })
        .await;
    let location = storage.url("/blob");
    gitlab
        .mock_async(move |when, then| {
            when.method(GET).path("/api/v4/projects/4/jobs/77/trace");
            then.status(302).header("Location", location.as_str());
        })
        .await;

    let res = client_for(&gitlab)
        .get_job_log(&input(json!({"projectId": 4, "jobId": 77})))
        .await;
    assert_eq!(leaked.hits_async().await, 0);
    assert_eq!(fetched.hits_async().await, 0);
    let err = res.unwrap_err();
    assert_eq!(err.status(), Some(302));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn same_host_redirect_keeps_following() {
    let server = MockServer::start_async().await;
    let location = server.url("/api/v4/projects/new-home");
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/api/v4/projects/old-home");
            then.status(301).header("Location", location.as_str());
        })
        .await;
    let target = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v4/projects/new-home")
                .header("private-token", "glpat-test");
            then.status(200).json_body(json!({"id": 3, "name": "new-home"}));
        })
        .await;

    let project = client_for(&server).get_project("old-home").await.unwrap();
    target.assert_async().await;
    assert_eq!(project.map(|p| p.id), Some(3));
}

#[tokio::test]
async fn rate_limit_reads_retry_after_header() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/1");
            then.status(429).header("Retry-After", "30").body("slow down");
        })
        .await;

    let err = client_for(&server).get_project("1").await.unwrap_err();
    match &err {
        GitLabError::RateLimit {
            retry_after_seconds,
            ..
        } => assert_eq!(*retry_after_seconds, 30),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn rate_limit_defaults_when_header_missing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/1");
            then.status(429);
        })
        .await;

    let err = client_for(&server).get_project("1").await.unwrap_err();
    assert_eq!(err.retry_after_seconds(), Some(60));
}

#[tokio::test]
async fn unauthorized_and_forbidden_are_authentication_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/1");
            then.status(401).json_body(json!({"message": "401 Unauthorized"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/2");
            then.status(403).json_body(json!({"message": "403 Forbidden"}));
        })
        .await;

    let client = client_for(&server);
    for id in ["1", "2"] {
        let err = client.get_project(id).await.unwrap_err();
        assert!(matches!(err, GitLabError::Authentication { .. }), "{:?}", err);
        assert!(!err.is_retryable());
    }
}

#[tokio::test]
async fn api_errors_keep_status_and_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/404");
            then.status(404).json_body(json!({"message": "404 Project Not Found"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/500");
            then.status(500).body("boom");
        })
        .await;

    let client = client_for(&server);
    let not_found = client.get_project("404").await.unwrap_err();
    assert_eq!(not_found.status(), Some(404));
    assert_eq!(not_found.to_string(), "404 Project Not Found");
    assert!(!not_found.is_retryable());

    let upstream = client.get_project("500").await.unwrap_err();
    assert_eq!(upstream.status(), Some(500));
    assert!(upstream.is_retryable());
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let client = GitLabClient::new(TenantCredentials::new(
        Credential::PrivateToken("t".into()),
        Some("http://127.0.0.1:1/api/v4"),
    ));
    let err = client.get_project("1").await.unwrap_err();
    assert!(matches!(err, GitLabError::Network { .. }), "{:?}", err);
    assert!(err.is_retryable());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_connection_reports_user_or_failure() {
    let server = MockServer::start_async().await;
    let mut ok = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/user");
            then.status(200).json_body(user_json());
        })
        .await;

    let client = client_for(&server);
    let status = client.test_connection().await;
    assert!(status.connected);
    assert_eq!(status.user.map(|u| u.id), Some(7));
    ok.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/user");
            then.status(500);
        })
        .await;
    let status = client.test_connection().await;
    assert!(!status.connected);
    assert!(status.user.is_none());
    assert!(!status.message.is_empty());
}

#[tokio::test]
async fn raw_file_defaults_ref_to_head() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/raw")
                .path_contains("README")
                .query_param("ref", "HEAD");
            then.status(200)
                .header("content-type", "text/plain")
                .body("# Title\nplain text, not JSON");
        })
        .await;

    let text = client_for(&server)
        .get_file_raw(&input::<FileInput>(
            json!({"projectId": 3, "filePath": "docs/README.md"}),
        ))
        .await
        .unwrap();
    m.assert_async().await;
    assert!(text.starts_with("# Title"));
}

#[tokio::test]
async fn merge_request_diff_unwraps_changes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v4/projects/3/merge_requests/11/changes");
            then.status(200).json_body(json!({
                "iid": 11,
                "changes": [
                    {"old_path": "a.rs", "new_path": "a.rs", "diff": "@@ -1 +1 @@\n-a\n+b\n"},
                    {"old_path": "b.rs", "new_path": "c.rs", "diff": "", "renamed_file": true}
                ]
            }));
        })
        .await;

    let diffs = client_for(&server)
        .get_merge_request_diff(&input::<MergeRequestInput>(
            json!({"projectId": 3, "mergeRequestIid": 11}),
        ))
        .await
        .unwrap();
    assert_eq!(diffs.len(), 2);
    assert!(diffs[1].renamed_file);
    assert_eq!(diffs[1].new_path, "c.rs");
}

#[tokio::test]
async fn issue_filters_become_snake_case_query() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v4/projects/8/issues")
                .query_param("state", "opened")
                .query_param("labels", "bug,ui")
                .query_param("assignee_username", "dev")
                .query_param("per_page", "50");
            then.status(200).json_body(json!([
                {"id": 1, "iid": 1, "title": "Crash", "state": "opened", "labels": ["bug"]}
            ]));
        })
        .await;

    let page = client_for(&server)
        .list_issues(&input::<ListIssuesInput>(json!({
            "projectId": "8",
            "state": "opened",
            "labels": ["bug", "ui"],
            "assigneeUsername": "dev",
            "perPage": 50
        })))
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(page.items[0].title, "Crash");
}

#[tokio::test]
async fn create_issue_sends_labels_as_csv() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v4/projects/8/issues")
                .json_body(json!({"title": "Broken build", "labels": "ci,urgent"}));
            then.status(201)
                .json_body(json!({"id": 100, "iid": 12, "title": "Broken build", "state": "opened"}));
        })
        .await;

    let issue = client_for(&server)
        .create_issue(&input::<CreateIssueInput>(json!({
            "projectId": 8,
            "title": "Broken build",
            "labels": ["ci", "urgent"]
        })))
        .await
        .unwrap()
        .expect("issue body");
    m.assert_async().await;
    assert_eq!(issue.iid, 12);
}

#[tokio::test]
async fn inherited_members_use_all_endpoint() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/4/members/all");
            then.status(200).json_body(json!([
                {"id": 2, "username": "owner", "access_level": 50}
            ]));
        })
        .await;

    let page = client_for(&server)
        .list_project_members(&input::<ListProjectMembersInput>(
            json!({"projectId": 4, "includeInherited": true}),
        ))
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(page.items[0].access_level, 50);
}

#[tokio::test]
async fn scoped_variable_lookup_sends_filter() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v4/projects/4/variables/DEPLOY_KEY")
                .query_param("filter[environment_scope]", "production");
            then.status(200).json_body(json!({
                "key": "DEPLOY_KEY",
                "value": "secret",
                "environment_scope": "production"
            }));
        })
        .await;

    let var = client_for(&server)
        .get_variable(&input::<VariableInput>(json!({
            "projectId": 4,
            "key": "DEPLOY_KEY",
            "environmentScope": "production"
        })))
        .await
        .unwrap()
        .expect("variable body");
    m.assert_async().await;
    assert_eq!(var.environment_scope.as_deref(), Some("production"));
}

#[tokio::test]
async fn job_log_is_plain_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/projects/4/jobs/77/trace");
            then.status(200).body("$ cargo test\nok\n");
        })
        .await;

    let trace = client_for(&server)
        .get_job_log(&input(json!({"projectId": 4, "jobId": 77})))
        .await
        .unwrap();
    assert!(trace.contains("cargo test"));
}
