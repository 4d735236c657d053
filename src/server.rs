use crate::auth::{TenantCredentials, ACCESS_TOKEN_HEADER, TOKEN_HEADER};
use crate::client::GitLabClient;
use crate::config::Config;
use crate::http;
use crate::mcp::{mcp_error, mcp_wrap};
use crate::tools::*;
use crate::types::ConnectionStatus;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

// Minimal JSON-RPC 2.0 types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Str(String),
    Num(i64),
    Null,
}

#[derive(Debug, Serialize, Deserialize)]
struct Request {
    #[serde(default)]
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    /// Absent means notification; an explicit `null` is still a request.
    #[serde(default, deserialize_with = "present_id")]
    id: Option<Id>,
}

fn present_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Id>, D::Error> {
    Id::deserialize(d).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn rpc_error(id: Option<Id>, code: i64, message: &str, data: Option<Value>) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.into(),
            data,
        }),
        id,
    }
}

fn rpc_ok(id: Option<Id>, result: Value) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: Some(result),
        error: None,
        id,
    }
}

#[derive(Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
    #[serde(default, rename = "_meta")]
    meta: Option<CallMeta>,
}

/// Per-call metadata. `headers` carries the inbound credential headers
/// (`X-GitLab-Token`, `X-GitLab-Access-Token`, `X-GitLab-Base-URL`).
#[derive(Deserialize, Default)]
struct CallMeta {
    #[serde(default)]
    headers: serde_json::Map<String, Value>,
}

/// Environment defaults overlaid with the call's own headers. A call that
/// names any token replaces both environment tokens.
fn merge_headers(defaults: HeaderMap, meta: Option<&CallMeta>) -> HeaderMap {
    let Some(meta) = meta else {
        return defaults;
    };
    let mut headers = defaults;
    let mut overrides = HeaderMap::new();
    for (name, value) in &meta.headers {
        let Some(v) = value.as_str() else { continue };
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()),
            HeaderValue::from_str(v),
        ) else {
            continue;
        };
        overrides.insert(name, value);
    }
    if overrides.contains_key(TOKEN_HEADER) || overrides.contains_key(ACCESS_TOKEN_HEADER) {
        headers.remove(TOKEN_HEADER);
        headers.remove(ACCESS_TOKEN_HEADER);
    }
    for (name, value) in overrides.iter() {
        headers.insert(name.clone(), value.clone());
    }
    headers
}

/// JSON-RPC shell over one shared outbound transport.
pub struct Server {
    config: Config,
    http: reqwest::Client,
}

impl Server {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = http::build_client(&config)?;
        Ok(Self { config, http })
    }

    /// Handle one framed message. Returns `None` for notifications and
    /// transport framing lines.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("content-length:") {
            return None;
        }
        let req: Request = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                return Some(rpc_error(
                    None,
                    -32700,
                    &format!("Parse error: {}", e),
                    None,
                ))
            }
        };
        debug!("Received method={}", req.method);
        if req.id.is_none() {
            debug!("Notification {} acknowledged without response", req.method);
            return None;
        }
        Some(self.dispatch(req).await)
    }

    async fn dispatch(&self, req: Request) -> Response {
        match req.method.as_str() {
            "initialize" => handle_initialize(req.id),
            "tools/list" => self.handle_tools_list(req.id),
            "tools/call" => self.handle_tools_call(req.id, req.params).await,
            "ping" => rpc_ok(req.id, serde_json::json!({})),
            other => rpc_error(req.id, -32601, &format!("Method not found: {}", other), None),
        }
    }

    fn handle_tools_list(&self, id: Option<Id>) -> Response {
        let tools = tool_descriptors(self.config.enable_ping);
        rpc_ok(id, serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Option<Id>, params: Value) -> Response {
        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(c) => c,
            Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None),
        };
        if !is_known_tool(&call.name, self.config.enable_ping) {
            return rpc_error(id, -32601, &format!("Tool not found: {}", call.name), None);
        }
        if call.name == PING_TOOL {
            return handle_ping(id, call.arguments);
        }

        let call_id = Uuid::new_v4();
        debug!("[{}] tools/call {}", call_id, call.name);

        let headers = merge_headers(self.config.default_headers(), call.meta.as_ref());
        let creds = match TenantCredentials::from_headers(&headers) {
            Ok(c) => c,
            Err(e) => {
                warn!("[{}] {} rejected: {}", call_id, call.name, e);
                if call.name == "test_connection" {
                    let status = ConnectionStatus {
                        connected: false,
                        message: e.to_string(),
                        user: None,
                    };
                    let text = format!("Not connected: {}", status.message);
                    return match serde_json::to_value(&status) {
                        Ok(v) => rpc_ok(id, mcp_wrap(v, Some(text), false)),
                        Err(e) => rpc_error(id, -32603, &e.to_string(), None),
                    };
                }
                return rpc_ok(id, mcp_error(&e));
            }
        };
        let client = GitLabClient::with_http(self.http.clone(), creds);

        match call_tool(&client, &call.name, call.arguments).await {
            Ok(out) => {
                debug!("[{}] {} ok", call_id, call.name);
                rpc_ok(id, mcp_wrap(out.structured, Some(out.text), false))
            }
            Err(e @ ToolError::InvalidParams(_)) => rpc_error(id, -32602, &e.to_string(), None),
            Err(e @ ToolError::UnknownTool(_)) => rpc_error(id, -32601, &e.to_string(), None),
            Err(ToolError::GitLab(e)) => {
                warn!("[{}] {} failed: {} ({})", call_id, call.name, e, e.code());
                rpc_ok(id, mcp_error(&e))
            }
        }
    }
}

fn handle_initialize(id: Option<Id>) -> Response {
    rpc_ok(
        id,
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": "gitlab-mcp",
                "version": env!("CARGO_PKG_VERSION"),
            }
        }),
    )
}

fn handle_ping(id: Option<Id>, params: Value) -> Response {
    let input: PingInput = serde_json::from_value(params).unwrap_or(PingInput { message: None });
    let message = input.message.unwrap_or_else(|| "pong".to_string());
    let out = PingOutput { message };
    match serde_json::to_value(&out) {
        Ok(v) => rpc_ok(id, mcp_wrap(v, Some(out.message), false)),
        Err(e) => rpc_error(id, -32603, &e.to_string(), None),
    }
}

pub async fn run_stdio_server(config: Config) -> anyhow::Result<()> {
    info!(
        "Starting gitlab-mcp stdio server; protocol={}",
        PROTOCOL_VERSION
    );
    let server = Server::new(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if let Some(resp) = server.handle_line(&line).await {
            let payload = serde_json::to_string(&resp)?;
            out.write_all(payload.as_bytes()).await?;
            out.write_all(b"\n").await?;
            out.flush().await?;
        }
    }
    debug!("stdin closed; shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;

    fn server(enable_ping: bool) -> Server {
        Server::new(Config {
            enable_ping,
            ..Config::default()
        })
        .unwrap()
    }

    async fn call(s: &Server, line: &str) -> Value {
        let resp = s.handle_line(line).await.expect("response");
        serde_json::to_value(resp).unwrap()
    }

    #[tokio::test]
    async fn framing_and_notifications_are_silent() {
        let s = server(false);
        assert!(s.handle_line("").await.is_none());
        assert!(s.handle_line("Content-Length: 52").await.is_none());
        assert!(s
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn parse_and_method_errors() {
        let s = server(false);
        let v = call(&s, "{not json").await;
        assert_eq!(v["error"]["code"], -32700);
        let v = call(&s, r#"{"jsonrpc":"2.0","method":"nope","id":1}"#).await;
        assert_eq!(v["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn null_id_is_a_request_not_a_notification() {
        let s = server(false);
        let resp = s
            .handle_line(r#"{"jsonrpc":"2.0","method":"initialize","id":null}"#)
            .await
            .expect("null id must be answered");
        let v = serde_json::to_value(resp).unwrap();
        assert!(v["id"].is_null());
        assert_eq!(v["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn initialize_reports_protocol() {
        let s = server(false);
        let v = call(&s, r#"{"jsonrpc":"2.0","method":"initialize","id":"a"}"#).await;
        assert_eq!(v["id"], "a");
        assert_eq!(v["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(v["result"]["serverInfo"]["name"], "gitlab-mcp");
    }

    #[tokio::test]
    async fn missing_credentials_is_tool_error_not_rpc_error() {
        let s = server(false);
        let v = call(
            &s,
            r#"{"jsonrpc":"2.0","method":"tools/call","id":2,"params":{"name":"get_project","arguments":{"projectId":1}}}"#,
        )
        .await;
        assert!(v.get("error").is_none());
        assert_eq!(v["result"]["isError"], true);
        assert_eq!(v["result"]["structuredContent"]["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_connection_without_credentials_reports_disconnected() {
        let s = server(false);
        let v = call(
            &s,
            r#"{"jsonrpc":"2.0","method":"tools/call","id":3,"params":{"name":"test_connection","arguments":{}}}"#,
        )
        .await;
        assert!(v["result"].get("isError").is_none());
        assert_eq!(v["result"]["structuredContent"]["connected"], false);
    }

    #[tokio::test]
    async fn ping_tool_is_gated() {
        let line = r#"{"jsonrpc":"2.0","method":"tools/call","id":4,"params":{"name":"ping","arguments":{"message":"hi"}}}"#;
        let off = call(&server(false), line).await;
        assert_eq!(off["error"]["code"], -32601);
        let on = call(&server(true), line).await;
        assert_eq!(on["result"]["structuredContent"]["message"], "hi");
    }

    #[test]
    fn call_headers_replace_environment_tokens() {
        let cfg = Config {
            access_token: Some("env-oauth".into()),
            base_url: Some("https://env.example/api/v4".into()),
            ..Config::default()
        };
        let meta: CallMeta = serde_json::from_value(serde_json::json!({
            "headers": {"X-GitLab-Token": "call-pat"}
        }))
        .unwrap();
        let headers = merge_headers(cfg.default_headers(), Some(&meta));
        let creds = TenantCredentials::from_headers(&headers).unwrap();
        assert_eq!(creds.credential(), &Credential::PrivateToken("call-pat".into()));
        assert_eq!(creds.base_url(), "https://env.example/api/v4");
    }
}
