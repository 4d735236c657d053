use gitlab_mcp::http::{encode_path_segment, filter_query};
use gitlab_mcp::inputs::{ListMergeRequestsInput, ListRunnersInput};
use gitlab_mcp::pagination::{clamp_per_page, PageParams};

#[test]
fn path_segments_escape_slashes_and_spaces() {
    assert_eq!(encode_path_segment("group/sub/project"), "group%2Fsub%2Fproject");
    assert_eq!(encode_path_segment("src/main.rs"), "src%2Fmain.rs");
    assert_eq!(encode_path_segment("needs review"), "needs%20review");
    assert_eq!(encode_path_segment("42"), "42");
}

#[test]
fn merge_request_filters_drop_identifiers_and_paging() {
    let input: ListMergeRequestsInput = serde_json::from_value(serde_json::json!({
        "projectId": "acme/app",
        "state": "opened",
        "labels": ["bug", "backend"],
        "authorId": 12,
        "draft": false,
        "page": 2,
        "perPage": 30
    }))
    .unwrap();
    let q = filter_query(&input);
    assert!(q.contains(&("state".into(), "opened".into())));
    assert!(q.contains(&("labels".into(), "bug,backend".into())));
    assert!(q.contains(&("author_id".into(), "12".into())));
    assert!(q.contains(&("draft".into(), "false".into())));
    assert!(!q.iter().any(|(k, _)| k == "project_id" || k == "page" || k == "per_page"));
    assert_eq!(input.page, PageParams::new(Some(2), Some(30)));
}

#[test]
fn runner_tag_list_is_comma_separated() {
    let input: ListRunnersInput = serde_json::from_value(serde_json::json!({
        "type": "project_type",
        "tagList": ["docker", "linux"]
    }))
    .unwrap();
    let q = filter_query(&input);
    assert!(q.contains(&("tag_list".into(), "docker,linux".into())));
}

#[test]
fn page_size_policy() {
    assert_eq!(clamp_per_page(None), 20);
    assert_eq!(clamp_per_page(Some(1000)), 100);
    let pairs = PageParams::new(None, None).with_defaults().query_pairs();
    assert_eq!(pairs, vec![("per_page".to_string(), "20".to_string())]);
}
