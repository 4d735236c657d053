use assert_cmd::Command;
use httpmock::{Method::GET, MockServer};
use predicates::prelude::*;
use std::io::Write;

const GITLAB_ENV: &[&str] = &[
    "GITLAB_TOKEN",
    "GITLAB_ACCESS_TOKEN",
    "GITLAB_OAUTH_TOKEN",
    "GITLAB_BASE_URL",
    "GITLAB_API_URL",
    "GITLAB_MCP_ENABLE_PING",
];

fn frame(msg: &str) -> Vec<u8> {
    let mut v = Vec::new();
    write!(v, "Content-Length: {}\r\n\r\n{}\n", msg.len(), msg).unwrap();
    v
}

fn command(envs: &[(&str, &str)]) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("gitlab-mcp")?;
    for k in GITLAB_ENV {
        cmd.env_remove(k);
    }
    for (k, v) in envs {
        cmd.env(k, v);
    }
    cmd.arg("--log-level").arg("warn");
    Ok(cmd)
}

fn run_with_env(reqs: &[serde_json::Value], envs: &[(&str, &str)]) -> anyhow::Result<Vec<serde_json::Value>> {
    let mut input = String::new();
    for r in reqs {
        input.push_str(&serde_json::to_string(r)?);
        input.push('\n');
    }
    let assert = command(envs)?.write_stdin(input).assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone())?;
    out.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(anyhow::Error::from))
        .collect()
}

fn call(id: u64, name: &str, arguments: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0", "id": id, "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

#[test]
fn initialize_then_list_tools() -> anyhow::Result<()> {
    let out = run_with_env(
        &[
            serde_json::json!({"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}),
            serde_json::json!({"jsonrpc":"2.0","method":"notifications/initialized"}),
            serde_json::json!({"jsonrpc":"2.0","id":2,"method":"tools/list"}),
        ],
        &[],
    )?;
    assert_eq!(out.len(), 2, "notifications must not be answered");
    assert_eq!(out[0]["id"], 1);
    assert_eq!(out[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(out[0]["result"]["serverInfo"]["name"], "gitlab-mcp");
    let tools = out[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    for expected in ["list_projects", "get_merge_request_diff", "get_job_log", "test_connection"] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
    assert!(!names.contains(&"ping"));
    Ok(())
}

#[test]
fn get_project_success_envelope() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/projects/42")
            .header("private-token", "glpat-env");
        then.status(200).json_body(serde_json::json!({
            "id": 42,
            "name": "widgets",
            "path_with_namespace": "acme/widgets",
            "default_branch": "main",
            "web_url": "https://gitlab.example/acme/widgets"
        }));
    });
    let base = server.url("/api/v4");
    let out = run_with_env(
        &[call(1, "get_project", serde_json::json!({"projectId": 42}))],
        &[("GITLAB_TOKEN", "glpat-env"), ("GITLAB_BASE_URL", &base)],
    )?;
    m.assert();
    let result = &out[0]["result"];
    assert!(result.get("isError").is_none());
    assert_eq!(result["structuredContent"]["path_with_namespace"], "acme/widgets");
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("acme/widgets"));
    Ok(())
}

#[test]
fn list_tool_applies_default_page_size() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/projects/7/pipelines")
            .query_param("per_page", "20");
        then.status(200)
            .header("X-Total", "1")
            .header("X-Page", "1")
            .header("X-Total-Pages", "1")
            .json_body(serde_json::json!([
                {"id": 900, "status": "success", "ref": "main", "sha": "abc123"}
            ]));
    });
    let base = server.url("/api/v4");
    let out = run_with_env(
        &[call(1, "list_pipelines", serde_json::json!({"projectId": "7"}))],
        &[("GITLAB_TOKEN", "t"), ("GITLAB_BASE_URL", &base)],
    )?;
    m.assert();
    let sc = &out[0]["result"]["structuredContent"];
    assert_eq!(sc["count"], 1);
    assert_eq!(sc["total"], 1);
    assert_eq!(sc["hasMore"], false);
    Ok(())
}

#[test]
fn upstream_not_found_is_tool_error() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v4/projects/1/issues/99");
        then.status(404)
            .json_body(serde_json::json!({"message": "404 Issue Not Found"}));
    });
    let base = server.url("/api/v4");
    let out = run_with_env(
        &[call(3, "get_issue", serde_json::json!({"projectId": 1, "issueIid": 99}))],
        &[("GITLAB_TOKEN", "t"), ("GITLAB_BASE_URL", &base)],
    )?;
    assert!(out[0].get("error").is_none());
    let result = &out[0]["result"];
    assert_eq!(result["isError"], true);
    let err = &result["structuredContent"]["error"];
    assert_eq!(err["code"], "not_found");
    assert_eq!(err["status"], 404);
    assert_eq!(err["retriable"], false);
    Ok(())
}

#[test]
fn rate_limit_surfaces_retry_hint() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v4/projects/1/merge_requests");
        then.status(429).header("Retry-After", "12");
    });
    let base = server.url("/api/v4");
    let out = run_with_env(
        &[call(1, "list_merge_requests", serde_json::json!({"projectId": 1}))],
        &[("GITLAB_TOKEN", "t"), ("GITLAB_BASE_URL", &base)],
    )?;
    let err = &out[0]["result"]["structuredContent"]["error"];
    assert_eq!(err["code"], "rate_limited");
    assert_eq!(err["retryAfterSeconds"], 12);
    assert_eq!(err["retriable"], true);
    Ok(())
}

#[test]
fn missing_credentials_never_reach_gitlab() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!([]));
    });
    let base = server.url("/api/v4");
    let out = run_with_env(
        &[call(1, "list_projects", serde_json::json!({}))],
        &[("GITLAB_BASE_URL", &base)],
    )?;
    assert_eq!(m.hits(), 0);
    let result = &out[0]["result"];
    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["error"]["code"], "unauthorized");
    Ok(())
}

#[test]
fn call_metadata_overrides_environment_token() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/user")
            .header("authorization", "Bearer per-call");
        then.status(200)
            .json_body(serde_json::json!({"id": 1, "username": "caller"}));
    });
    let base = server.url("/api/v4");
    let req = serde_json::json!({
        "jsonrpc": "2.0", "id": 1, "method": "tools/call",
        "params": {
            "name": "get_current_user",
            "arguments": {},
            "_meta": {"headers": {"X-GitLab-Access-Token": "per-call", "X-GitLab-Base-URL": base}}
        }
    });
    let out = run_with_env(&[req], &[("GITLAB_TOKEN", "env-token")])?;
    m.assert();
    assert_eq!(out[0]["result"]["structuredContent"]["username"], "caller");
    Ok(())
}

#[test]
fn ping_is_opt_in() -> anyhow::Result<()> {
    let req = call(1, "ping", serde_json::json!({"message": "hi"}));
    let off = run_with_env(&[req.clone()], &[])?;
    assert_eq!(off[0]["error"]["code"], -32601);

    let on = run_with_env(&[req], &[("GITLAB_MCP_ENABLE_PING", "1")])?;
    assert_eq!(on[0]["result"]["structuredContent"]["message"], "hi");
    Ok(())
}

#[test]
fn invalid_arguments_are_rpc_errors() -> anyhow::Result<()> {
    let out = run_with_env(
        &[
            call(1, "get_project", serde_json::json!({})),
            call(2, "list_projects", serde_json::json!({"page": 0})),
            serde_json::json!({"jsonrpc":"2.0","id":3,"method":"resources/list"}),
        ],
        &[("GITLAB_TOKEN", "t")],
    )?;
    assert_eq!(out[0]["error"]["code"], -32602);
    assert_eq!(out[1]["error"]["code"], -32602);
    assert_eq!(out[2]["error"]["code"], -32601);
    Ok(())
}

#[test]
fn content_length_framed_input_is_accepted() -> anyhow::Result<()> {
    let msg = serde_json::json!({"jsonrpc":"2.0","id":9,"method":"initialize","params":{}}).to_string();
    command(&[])?
        .write_stdin(frame(&msg))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"protocolVersion\":\"2024-11-05\""));
    Ok(())
}

#[test]
fn malformed_line_gets_parse_error() -> anyhow::Result<()> {
    command(&[])?
        .write_stdin("{not json\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("-32700"));
    Ok(())
}

#[test]
fn test_connection_flag_fails_when_unreachable() -> anyhow::Result<()> {
    command(&[
        ("GITLAB_TOKEN", "t"),
        ("GITLAB_BASE_URL", "http://127.0.0.1:1/api/v4"),
    ])?
    .arg("--test-connection")
    .assert()
    .failure()
    .stdout(predicate::str::contains("\"connected\": false"));
    Ok(())
}

#[test]
fn test_connection_flag_succeeds() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v4/user");
        then.status(200)
            .json_body(serde_json::json!({"id": 3, "username": "tester"}));
    });
    let base = server.url("/api/v4");
    command(&[("GITLAB_TOKEN", "t"), ("GITLAB_BASE_URL", &base)])?
        .arg("--test-connection")
        .assert()
        .success()
        .stdout(predicate::str::contains("@tester"));
    Ok(())
}

#[test]
fn no_content_action_reports_success() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/api/v4/projects/1/pipelines/5/cancel");
        then.status(204);
    });
    let base = server.url("/api/v4");
    let out = run_with_env(
        &[call(1, "cancel_pipeline", serde_json::json!({"projectId": 1, "pipelineId": 5}))],
        &[("GITLAB_TOKEN", "t"), ("GITLAB_BASE_URL", &base)],
    )?;
    let result = &out[0]["result"];
    assert!(result.get("isError").is_none());
    assert_eq!(result["structuredContent"]["success"], true);
    Ok(())
}
