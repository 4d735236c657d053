use crate::error::GitLabError;
use serde_json::{json, Value};

// Build an MCP-compliant result envelope for tools/call outputs.
// - content: always a single text block so clients can render something.
// - structuredContent: the typed JSON result.
// - isError: included only when true to keep payloads small.
pub fn mcp_wrap(structured: Value, text_opt: Option<String>, is_error: bool) -> Value {
    let text = match text_opt {
        Some(s) => s,
        None => serde_json::to_string(&structured).unwrap_or_else(|_| "{}".to_string()),
    };
    let mut obj = json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": structured,
    });
    if is_error {
        if let Some(map) = obj.as_object_mut() {
            map.insert("isError".to_string(), Value::Bool(true));
        }
    }
    obj
}

/// Tool result for a GitLab failure. The agent gets the retry metadata in
/// `structuredContent.error` and a readable line in the text block.
pub fn mcp_error(err: &GitLabError) -> Value {
    let info = err.to_info();
    let mut text = format!("Error ({}): {}", info.code, info.message);
    if let Some(secs) = info.retry_after_seconds {
        text.push_str(&format!(" Retry after {} seconds.", secs));
    }
    let structured = json!({ "error": info });
    mcp_wrap(structured, Some(text), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_omits_is_error_on_success() {
        let v = mcp_wrap(json!({"a": 1}), None, false);
        assert_eq!(v["content"][0]["type"], "text");
        assert_eq!(v["content"][0]["text"], "{\"a\":1}");
        assert_eq!(v["structuredContent"]["a"], 1);
        assert!(v.get("isError").is_none());
    }

    #[test]
    fn rate_limit_error_carries_retry_metadata() {
        let err = GitLabError::RateLimit {
            retry_after_seconds: 30,
            message: "Rate limit exceeded".into(),
        };
        let v = mcp_error(&err);
        assert_eq!(v["isError"], true);
        let e = &v["structuredContent"]["error"];
        assert_eq!(e["code"], "rate_limited");
        assert_eq!(e["retriable"], true);
        assert_eq!(e["retryAfterSeconds"], 30);
        assert_eq!(e["status"], 429);
        assert!(v["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Retry after 30 seconds"));
    }

    #[test]
    fn not_found_is_not_retriable() {
        let err = GitLabError::Api {
            status: 404,
            message: "404 Project Not Found".into(),
        };
        let e = mcp_error(&err)["structuredContent"]["error"].clone();
        assert_eq!(e["code"], "not_found");
        assert_eq!(e["retriable"], false);
        assert!(e.get("retryAfterSeconds").is_none());
    }
}
