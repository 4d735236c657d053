//! Tool catalogue and dispatch.
//!
//! Every client operation is exposed under its own snake_case name. Tool
//! arguments are camelCase JSON; list tools share `page`/`perPage`.

use crate::client::GitLabClient;
use crate::error::GitLabError;
use crate::format::{pagination_footer, render_diffs, render_list, Markdown};
use crate::inputs::*;
use crate::pagination::{PageParams, Paginated, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PING_TOOL: &str = "ping";

const NO_CONTENT: &str = "GitLab accepted the request and returned no content";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingInput {
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingOutput {
    pub message: String,
}

/// Result of a successful tool call: structured JSON plus its Markdown text.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub structured: Value,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    UnknownTool(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    GitLab(#[from] GitLabError),
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::GitLab(e.into())
    }
}

// ---------------------------------------------------------------------------
// Schemas

fn project_id() -> Value {
    json!({"type": ["string", "integer"], "description": "Project ID or full path (e.g. group/project)"})
}

fn group_id() -> Value {
    json!({"type": ["string", "integer"], "description": "Group ID or full path"})
}

fn string(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn integer(description: &str) -> Value {
    json!({"type": "integer", "description": description})
}

fn boolean(description: &str) -> Value {
    json!({"type": "boolean", "description": description})
}

fn strings(description: &str) -> Value {
    json!({"type": "array", "items": {"type": "string"}, "description": description})
}

fn integers(description: &str) -> Value {
    json!({"type": "array", "items": {"type": "integer"}, "description": description})
}

fn sort() -> Value {
    one_of(&["asc", "desc"], "Sort direction")
}

fn one_of(values: &[&str], description: &str) -> Value {
    json!({"type": "string", "enum": values, "description": description})
}

fn tool(name: &str, description: &str, properties: Value, required: &[&str]) -> ToolDescriptor {
    ToolDescriptor {
        name: name.into(),
        description: description.into(),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

/// List tool: adds the shared `page`/`perPage` properties.
fn list_tool(name: &str, description: &str, properties: Value, required: &[&str]) -> ToolDescriptor {
    let mut props = match properties {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    props.insert(
        "page".into(),
        json!({"type": "integer", "minimum": 1, "description": "Page number (1-based)"}),
    );
    props.insert(
        "perPage".into(),
        json!({
            "type": "integer", "minimum": 1, "maximum": MAX_PER_PAGE,
            "description": format!("Items per page (default {})", DEFAULT_PER_PAGE)
        }),
    );
    tool(name, description, Value::Object(props), required)
}

fn commit_props(mut extra: Map<String, Value>) -> Value {
    extra.insert("branch".into(), string("Branch to commit to"));
    extra.insert("commitMessage".into(), string("Commit message"));
    extra.insert("startBranch".into(), string("Create `branch` from this branch"));
    extra.insert("authorEmail".into(), string("Commit author email"));
    extra.insert("authorName".into(), string("Commit author name"));
    extra.insert("lastCommitId".into(), string("Fail unless the file was last changed by this commit"));
    Value::Object(extra)
}

fn webhook_event_props(mut extra: Map<String, Value>) -> Value {
    for key in [
        "pushEvents",
        "issuesEvents",
        "mergeRequestsEvents",
        "tagPushEvents",
        "noteEvents",
        "pipelineEvents",
        "jobEvents",
        "releasesEvents",
        "enableSslVerification",
    ] {
        extra.insert(key.into(), json!({"type": "boolean"}));
    }
    extra.insert("token".into(), string("Secret token sent with each delivery"));
    Value::Object(extra)
}

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

fn build_catalogue() -> Vec<ToolDescriptor> {
    let states = ["opened", "closed", "merged", "locked", "all"];
    let mut tools = vec![
        tool(
            "test_connection",
            "Check that the configured credentials can reach GitLab. Never fails; reports connected=false instead.",
            json!({}),
            &[],
        ),
        // Projects
        list_tool(
            "list_projects",
            "List projects visible to the authenticated user",
            json!({
                "search": string("Filter by name"),
                "owned": boolean("Only projects owned by the user"),
                "membership": boolean("Only projects the user is a member of"),
                "starred": boolean("Only starred projects"),
                "visibility": one_of(&["public", "internal", "private"], "Visibility filter"),
                "archived": boolean("Archived filter"),
                "orderBy": string("id, name, path, created_at, updated_at, last_activity_at"),
                "sort": sort(),
                "simple": boolean("Return reduced project fields"),
            }),
            &[],
        ),
        tool("get_project", "Get a project", json!({"projectId": project_id()}), &["projectId"]),
        tool(
            "create_project",
            "Create a project",
            json!({
                "name": string("Project name"),
                "path": string("Repository path"),
                "namespaceId": integer("Namespace (group) to create the project in"),
                "description": string("Description"),
                "visibility": one_of(&["public", "internal", "private"], "Visibility"),
                "initializeWithReadme": boolean("Create an initial README"),
                "defaultBranch": string("Default branch name"),
                "topics": strings("Topics"),
            }),
            &["name"],
        ),
        tool(
            "update_project",
            "Update project settings",
            json!({
                "projectId": project_id(),
                "name": string("New name"),
                "path": string("New path"),
                "description": string("Description"),
                "visibility": one_of(&["public", "internal", "private"], "Visibility"),
                "defaultBranch": string("Default branch"),
                "topics": strings("Topics"),
            }),
            &["projectId"],
        ),
        tool("delete_project", "Delete a project", json!({"projectId": project_id()}), &["projectId"]),
        tool(
            "fork_project",
            "Fork a project",
            json!({
                "projectId": project_id(),
                "namespaceId": integer("Target namespace ID"),
                "namespacePath": string("Target namespace path"),
                "name": string("Name of the fork"),
                "path": string("Path of the fork"),
                "visibility": one_of(&["public", "internal", "private"], "Visibility"),
            }),
            &["projectId"],
        ),
        tool("archive_project", "Archive a project", json!({"projectId": project_id()}), &["projectId"]),
        tool("unarchive_project", "Unarchive a project", json!({"projectId": project_id()}), &["projectId"]),
        // Branches
        list_tool(
            "list_branches",
            "List repository branches",
            json!({"projectId": project_id(), "search": string("Filter by name")}),
            &["projectId"],
        ),
        tool(
            "get_branch",
            "Get a branch",
            json!({"projectId": project_id(), "branch": string("Branch name")}),
            &["projectId", "branch"],
        ),
        tool(
            "create_branch",
            "Create a branch",
            json!({"projectId": project_id(), "branch": string("New branch name"), "ref": string("Branch, tag or SHA to branch from")}),
            &["projectId", "branch", "ref"],
        ),
        tool(
            "delete_branch",
            "Delete a branch",
            json!({"projectId": project_id(), "branch": string("Branch name")}),
            &["projectId", "branch"],
        ),
        tool(
            "protect_branch",
            "Protect a branch",
            json!({
                "projectId": project_id(),
                "name": string("Branch name or wildcard"),
                "pushAccessLevel": integer("0, 30, 40"),
                "mergeAccessLevel": integer("0, 30, 40"),
                "allowForcePush": boolean("Allow force push"),
            }),
            &["projectId", "name"],
        ),
        tool(
            "unprotect_branch",
            "Remove branch protection",
            json!({"projectId": project_id(), "branch": string("Branch name")}),
            &["projectId", "branch"],
        ),
        // Commits
        list_tool(
            "list_commits",
            "List repository commits",
            json!({
                "projectId": project_id(),
                "refName": string("Branch, tag or range"),
                "since": string("ISO 8601 lower bound"),
                "until": string("ISO 8601 upper bound"),
                "path": string("Only commits touching this path"),
                "author": string("Author filter"),
                "withStats": boolean("Include stats"),
                "firstParent": boolean("Follow only the first parent"),
            }),
            &["projectId"],
        ),
        tool(
            "get_commit",
            "Get a commit",
            json!({"projectId": project_id(), "sha": string("Commit SHA or ref"), "stats": boolean("Include stats")}),
            &["projectId", "sha"],
        ),
        list_tool(
            "get_commit_diff",
            "Get the diff of a commit",
            json!({"projectId": project_id(), "sha": string("Commit SHA")}),
            &["projectId", "sha"],
        ),
        tool(
            "cherry_pick_commit",
            "Cherry-pick a commit onto a branch",
            json!({
                "projectId": project_id(),
                "sha": string("Commit SHA"),
                "branch": string("Target branch"),
                "dryRun": boolean("Only check whether it applies"),
                "message": string("Custom commit message"),
            }),
            &["projectId", "sha", "branch"],
        ),
        // Tags
        list_tool(
            "list_tags",
            "List repository tags",
            json!({
                "projectId": project_id(),
                "search": string("Filter by name"),
                "orderBy": string("name, updated or version"),
                "sort": sort(),
            }),
            &["projectId"],
        ),
        tool(
            "get_tag",
            "Get a tag",
            json!({"projectId": project_id(), "tagName": string("Tag name")}),
            &["projectId", "tagName"],
        ),
        tool(
            "create_tag",
            "Create a tag",
            json!({
                "projectId": project_id(),
                "tagName": string("Tag name"),
                "ref": string("Branch, tag or SHA to tag"),
                "message": string("Annotation message"),
            }),
            &["projectId", "tagName", "ref"],
        ),
        tool(
            "delete_tag",
            "Delete a tag",
            json!({"projectId": project_id(), "tagName": string("Tag name")}),
            &["projectId", "tagName"],
        ),
        // Tree and compare
        list_tool(
            "get_repository_tree",
            "List files and directories in the repository",
            json!({
                "projectId": project_id(),
                "path": string("Directory path"),
                "ref": string("Branch, tag or SHA"),
                "recursive": boolean("Walk subdirectories"),
            }),
            &["projectId"],
        ),
        tool(
            "compare_refs",
            "Compare two branches, tags or commits",
            json!({
                "projectId": project_id(),
                "from": string("Base ref"),
                "to": string("Head ref"),
                "straight": boolean("Direct comparison instead of merge-base"),
            }),
            &["projectId", "from", "to"],
        ),
        // Files
        tool(
            "get_file",
            "Get a repository file with metadata; content is decoded for display",
            json!({"projectId": project_id(), "filePath": string("File path"), "ref": string("Branch, tag or SHA (default HEAD)")}),
            &["projectId", "filePath"],
        ),
        tool(
            "get_file_raw",
            "Get the raw content of a repository file",
            json!({"projectId": project_id(), "filePath": string("File path"), "ref": string("Branch, tag or SHA (default HEAD)")}),
            &["projectId", "filePath"],
        ),
        tool(
            "create_file",
            "Create a file in a commit",
            commit_props(obj(json!({
                "projectId": project_id(),
                "filePath": string("File path"),
                "content": string("File content"),
                "encoding": one_of(&["text", "base64"], "Content encoding"),
            }))),
            &["projectId", "filePath", "branch", "content", "commitMessage"],
        ),
        tool(
            "update_file",
            "Update a file in a commit",
            commit_props(obj(json!({
                "projectId": project_id(),
                "filePath": string("File path"),
                "content": string("File content"),
                "encoding": one_of(&["text", "base64"], "Content encoding"),
            }))),
            &["projectId", "filePath", "branch", "content", "commitMessage"],
        ),
        tool(
            "delete_file",
            "Delete a file in a commit",
            commit_props(obj(json!({"projectId": project_id(), "filePath": string("File path")}))),
            &["projectId", "filePath", "branch", "commitMessage"],
        ),
        // Merge requests
        list_tool(
            "list_merge_requests",
            "List merge requests in a project, or across all projects when projectId is omitted",
            json!({
                "projectId": project_id(),
                "state": one_of(&states, "State filter"),
                "scope": one_of(&["created_by_me", "assigned_to_me", "all"], "Scope"),
                "orderBy": string("created_at, updated_at, title"),
                "sort": sort(),
                "milestone": string("Milestone title"),
                "labels": strings("Labels (all must match)"),
                "authorId": integer("Author user ID"),
                "authorUsername": string("Author username"),
                "assigneeId": integer("Assignee user ID"),
                "reviewerUsername": string("Reviewer username"),
                "sourceBranch": string("Source branch"),
                "targetBranch": string("Target branch"),
                "search": string("Search title and description"),
                "draft": boolean("Draft filter"),
                "createdAfter": string("ISO 8601"),
                "createdBefore": string("ISO 8601"),
                "updatedAfter": string("ISO 8601"),
                "updatedBefore": string("ISO 8601"),
            }),
            &[],
        ),
        tool(
            "get_merge_request",
            "Get a merge request",
            json!({"projectId": project_id(), "mergeRequestIid": integer("Merge request IID")}),
            &["projectId", "mergeRequestIid"],
        ),
        tool(
            "create_merge_request",
            "Open a merge request",
            json!({
                "projectId": project_id(),
                "sourceBranch": string("Source branch"),
                "targetBranch": string("Target branch"),
                "title": string("Title"),
                "description": string("Description"),
                "assigneeIds": integers("Assignee user IDs"),
                "reviewerIds": integers("Reviewer user IDs"),
                "labels": strings("Labels"),
                "milestoneId": integer("Milestone ID"),
                "targetProjectId": integer("Target project for cross-project MRs"),
                "removeSourceBranch": boolean("Delete source branch on merge"),
                "squash": boolean("Squash commits on merge"),
                "allowCollaboration": boolean("Allow commits from upstream members"),
            }),
            &["projectId", "sourceBranch", "targetBranch", "title"],
        ),
        tool(
            "update_merge_request",
            "Update a merge request",
            json!({
                "projectId": project_id(),
                "mergeRequestIid": integer("Merge request IID"),
                "title": string("Title"),
                "description": string("Description"),
                "targetBranch": string("Target branch"),
                "stateEvent": one_of(&["close", "reopen"], "State change"),
                "assigneeIds": integers("Assignee user IDs"),
                "reviewerIds": integers("Reviewer user IDs"),
                "labels": strings("Replace labels"),
                "addLabels": strings("Labels to add"),
                "removeLabels": strings("Labels to remove"),
                "milestoneId": integer("Milestone ID"),
                "removeSourceBranch": boolean("Delete source branch on merge"),
                "squash": boolean("Squash on merge"),
                "discussionLocked": boolean("Lock discussion"),
            }),
            &["projectId", "mergeRequestIid"],
        ),
        tool(
            "merge_merge_request",
            "Merge a merge request",
            json!({
                "projectId": project_id(),
                "mergeRequestIid": integer("Merge request IID"),
                "mergeCommitMessage": string("Merge commit message"),
                "squashCommitMessage": string("Squash commit message"),
                "squash": boolean("Squash commits"),
                "shouldRemoveSourceBranch": boolean("Delete source branch"),
                "mergeWhenPipelineSucceeds": boolean("Merge once the pipeline passes"),
                "sha": string("Expected source branch HEAD"),
            }),
            &["projectId", "mergeRequestIid"],
        ),
        tool(
            "approve_merge_request",
            "Approve a merge request",
            json!({"projectId": project_id(), "mergeRequestIid": integer("Merge request IID")}),
            &["projectId", "mergeRequestIid"],
        ),
        tool(
            "rebase_merge_request",
            "Rebase a merge request onto its target branch",
            json!({"projectId": project_id(), "mergeRequestIid": integer("Merge request IID")}),
            &["projectId", "mergeRequestIid"],
        ),
        tool(
            "get_merge_request_diff",
            "Get the file changes of a merge request",
            json!({"projectId": project_id(), "mergeRequestIid": integer("Merge request IID")}),
            &["projectId", "mergeRequestIid"],
        ),
        list_tool(
            "list_merge_request_commits",
            "List commits of a merge request",
            json!({"projectId": project_id(), "mergeRequestIid": integer("Merge request IID")}),
            &["projectId", "mergeRequestIid"],
        ),
        list_tool(
            "list_merge_request_notes",
            "List comments on a merge request",
            json!({
                "projectId": project_id(),
                "mergeRequestIid": integer("Merge request IID"),
                "sort": sort(),
                "orderBy": string("created_at or updated_at"),
            }),
            &["projectId", "mergeRequestIid"],
        ),
        tool(
            "create_merge_request_note",
            "Comment on a merge request",
            json!({
                "projectId": project_id(),
                "mergeRequestIid": integer("Merge request IID"),
                "body": string("Comment text (Markdown)"),
                "internal": boolean("Internal note"),
            }),
            &["projectId", "mergeRequestIid", "body"],
        ),
        // Issues
        list_tool(
            "list_issues",
            "List issues in a project, or across all projects when projectId is omitted",
            json!({
                "projectId": project_id(),
                "state": one_of(&["opened", "closed", "all"], "State filter"),
                "scope": one_of(&["created_by_me", "assigned_to_me", "all"], "Scope"),
                "labels": strings("Labels (all must match)"),
                "milestone": string("Milestone title"),
                "authorId": integer("Author user ID"),
                "authorUsername": string("Author username"),
                "assigneeId": integer("Assignee user ID"),
                "assigneeUsername": string("Assignee username"),
                "search": string("Search title and description"),
                "confidential": boolean("Confidential filter"),
                "orderBy": string("created_at, updated_at, priority, due_date"),
                "sort": sort(),
                "createdAfter": string("ISO 8601"),
                "createdBefore": string("ISO 8601"),
                "updatedAfter": string("ISO 8601"),
                "updatedBefore": string("ISO 8601"),
            }),
            &[],
        ),
        tool(
            "get_issue",
            "Get an issue",
            json!({"projectId": project_id(), "issueIid": integer("Issue IID")}),
            &["projectId", "issueIid"],
        ),
        tool(
            "create_issue",
            "Create an issue",
            json!({
                "projectId": project_id(),
                "title": string("Title"),
                "description": string("Description"),
                "assigneeIds": integers("Assignee user IDs"),
                "labels": strings("Labels"),
                "milestoneId": integer("Milestone ID"),
                "dueDate": string("YYYY-MM-DD"),
                "confidential": boolean("Confidential"),
                "weight": integer("Weight"),
                "issueType": one_of(&["issue", "incident", "test_case", "task"], "Issue type"),
            }),
            &["projectId", "title"],
        ),
        tool(
            "update_issue",
            "Update an issue",
            json!({
                "projectId": project_id(),
                "issueIid": integer("Issue IID"),
                "title": string("Title"),
                "description": string("Description"),
                "stateEvent": one_of(&["close", "reopen"], "State change"),
                "assigneeIds": integers("Assignee user IDs"),
                "labels": strings("Replace labels"),
                "addLabels": strings("Labels to add"),
                "removeLabels": strings("Labels to remove"),
                "milestoneId": integer("Milestone ID"),
                "dueDate": string("YYYY-MM-DD"),
                "confidential": boolean("Confidential"),
                "weight": integer("Weight"),
                "discussionLocked": boolean("Lock discussion"),
            }),
            &["projectId", "issueIid"],
        ),
        tool(
            "delete_issue",
            "Delete an issue",
            json!({"projectId": project_id(), "issueIid": integer("Issue IID")}),
            &["projectId", "issueIid"],
        ),
        list_tool(
            "list_issue_notes",
            "List comments on an issue",
            json!({
                "projectId": project_id(),
                "issueIid": integer("Issue IID"),
                "sort": sort(),
                "orderBy": string("created_at or updated_at"),
            }),
            &["projectId", "issueIid"],
        ),
        tool(
            "create_issue_note",
            "Comment on an issue",
            json!({
                "projectId": project_id(),
                "issueIid": integer("Issue IID"),
                "body": string("Comment text (Markdown)"),
                "internal": boolean("Internal note"),
            }),
            &["projectId", "issueIid", "body"],
        ),
        tool(
            "update_issue_note",
            "Edit a comment on an issue",
            json!({
                "projectId": project_id(),
                "issueIid": integer("Issue IID"),
                "noteId": integer("Note ID"),
                "body": string("New comment text"),
            }),
            &["projectId", "issueIid", "noteId", "body"],
        ),
        tool(
            "delete_issue_note",
            "Delete a comment on an issue",
            json!({"projectId": project_id(), "issueIid": integer("Issue IID"), "noteId": integer("Note ID")}),
            &["projectId", "issueIid", "noteId"],
        ),
        // Labels
        list_tool(
            "list_labels",
            "List project labels",
            json!({
                "projectId": project_id(),
                "search": string("Filter by name"),
                "withCounts": boolean("Include issue and MR counts"),
                "includeAncestorGroups": boolean("Include group labels"),
            }),
            &["projectId"],
        ),
        tool(
            "create_label",
            "Create a label",
            json!({
                "projectId": project_id(),
                "name": string("Label name"),
                "color": string("Color, e.g. #FF0000"),
                "description": string("Description"),
                "priority": integer("Priority"),
            }),
            &["projectId", "name", "color"],
        ),
        tool(
            "update_label",
            "Update a label",
            json!({
                "projectId": project_id(),
                "labelId": {"type": ["string", "integer"], "description": "Label ID or name"},
                "newName": string("New name"),
                "color": string("Color"),
                "description": string("Description"),
                "priority": integer("Priority"),
            }),
            &["projectId", "labelId"],
        ),
        tool(
            "delete_label",
            "Delete a label",
            json!({"projectId": project_id(), "labelId": {"type": ["string", "integer"], "description": "Label ID or name"}}),
            &["projectId", "labelId"],
        ),
        // Pipelines
        list_tool(
            "list_pipelines",
            "List pipelines",
            json!({
                "projectId": project_id(),
                "scope": one_of(&["running", "pending", "finished", "branches", "tags"], "Scope"),
                "status": string("Status filter, e.g. success, failed, running"),
                "source": string("Trigger source"),
                "ref": string("Branch or tag"),
                "sha": string("Commit SHA"),
                "username": string("Triggering user"),
                "updatedAfter": string("ISO 8601"),
                "updatedBefore": string("ISO 8601"),
                "orderBy": string("id, status, ref, updated_at, user_id"),
                "sort": sort(),
            }),
            &["projectId"],
        ),
        tool(
            "get_pipeline",
            "Get a pipeline",
            json!({"projectId": project_id(), "pipelineId": integer("Pipeline ID")}),
            &["projectId", "pipelineId"],
        ),
        tool(
            "create_pipeline",
            "Run a pipeline for a ref",
            json!({
                "projectId": project_id(),
                "ref": string("Branch or tag"),
                "variables": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "key": {"type": "string"},
                            "value": {"type": "string"},
                            "variableType": {"type": "string", "enum": ["env_var", "file"]}
                        },
                        "required": ["key", "value"]
                    }
                },
            }),
            &["projectId", "ref"],
        ),
        tool(
            "retry_pipeline",
            "Retry failed jobs of a pipeline",
            json!({"projectId": project_id(), "pipelineId": integer("Pipeline ID")}),
            &["projectId", "pipelineId"],
        ),
        tool(
            "cancel_pipeline",
            "Cancel a pipeline",
            json!({"projectId": project_id(), "pipelineId": integer("Pipeline ID")}),
            &["projectId", "pipelineId"],
        ),
        tool(
            "delete_pipeline",
            "Delete a pipeline",
            json!({"projectId": project_id(), "pipelineId": integer("Pipeline ID")}),
            &["projectId", "pipelineId"],
        ),
        // Jobs
        list_tool(
            "list_pipeline_jobs",
            "List jobs of a pipeline",
            json!({
                "projectId": project_id(),
                "pipelineId": integer("Pipeline ID"),
                "scope": strings("Job statuses to include"),
                "includeRetried": boolean("Include retried jobs"),
            }),
            &["projectId", "pipelineId"],
        ),
        list_tool(
            "list_project_jobs",
            "List jobs of a project",
            json!({"projectId": project_id(), "scope": strings("Job statuses to include")}),
            &["projectId"],
        ),
        tool(
            "get_job",
            "Get a job",
            json!({"projectId": project_id(), "jobId": integer("Job ID")}),
            &["projectId", "jobId"],
        ),
        tool(
            "get_job_log",
            "Get the log (trace) of a job",
            json!({"projectId": project_id(), "jobId": integer("Job ID")}),
            &["projectId", "jobId"],
        ),
        tool(
            "retry_job",
            "Retry a job",
            json!({"projectId": project_id(), "jobId": integer("Job ID")}),
            &["projectId", "jobId"],
        ),
        tool(
            "cancel_job",
            "Cancel a job",
            json!({"projectId": project_id(), "jobId": integer("Job ID")}),
            &["projectId", "jobId"],
        ),
        tool(
            "play_job",
            "Start a manual job",
            json!({"projectId": project_id(), "jobId": integer("Job ID")}),
            &["projectId", "jobId"],
        ),
        // Releases
        list_tool(
            "list_releases",
            "List releases",
            json!({"projectId": project_id(), "orderBy": string("released_at or created_at"), "sort": sort()}),
            &["projectId"],
        ),
        tool(
            "get_release",
            "Get a release by tag",
            json!({"projectId": project_id(), "tagName": string("Tag name")}),
            &["projectId", "tagName"],
        ),
        tool(
            "create_release",
            "Create a release",
            json!({
                "projectId": project_id(),
                "tagName": string("Tag name"),
                "name": string("Release title"),
                "description": string("Release notes (Markdown)"),
                "ref": string("Ref to create the tag from when it does not exist"),
                "releasedAt": string("ISO 8601"),
                "milestones": strings("Milestone titles"),
                "assets": {
                    "type": "object",
                    "properties": {
                        "links": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": {"type": "string"},
                                    "url": {"type": "string"},
                                    "linkType": {"type": "string", "enum": ["other", "runbook", "image", "package"]}
                                },
                                "required": ["name", "url"]
                            }
                        }
                    }
                },
            }),
            &["projectId", "tagName"],
        ),
        tool(
            "update_release",
            "Update a release",
            json!({
                "projectId": project_id(),
                "tagName": string("Tag name"),
                "name": string("Release title"),
                "description": string("Release notes"),
                "releasedAt": string("ISO 8601"),
                "milestones": strings("Milestone titles"),
            }),
            &["projectId", "tagName"],
        ),
        tool(
            "delete_release",
            "Delete a release (the tag is kept)",
            json!({"projectId": project_id(), "tagName": string("Tag name")}),
            &["projectId", "tagName"],
        ),
        // Groups
        list_tool(
            "list_groups",
            "List groups",
            json!({
                "search": string("Filter by name"),
                "owned": boolean("Only owned groups"),
                "allAvailable": boolean("All groups the user can see"),
                "topLevelOnly": boolean("Only top-level groups"),
                "minAccessLevel": integer("Minimum access level"),
                "orderBy": string("name, path, id"),
                "sort": sort(),
            }),
            &[],
        ),
        tool("get_group", "Get a group", json!({"groupId": group_id()}), &["groupId"]),
        list_tool(
            "list_group_projects",
            "List projects in a group",
            json!({
                "groupId": group_id(),
                "search": string("Filter by name"),
                "archived": boolean("Archived filter"),
                "visibility": one_of(&["public", "internal", "private"], "Visibility"),
                "includeSubgroups": boolean("Include subgroup projects"),
                "orderBy": string("id, name, path, created_at, updated_at, last_activity_at"),
                "sort": sort(),
            }),
            &["groupId"],
        ),
        list_tool(
            "list_subgroups",
            "List subgroups of a group",
            json!({
                "groupId": group_id(),
                "search": string("Filter by name"),
                "owned": boolean("Only owned groups"),
                "allAvailable": boolean("All groups the user can see"),
            }),
            &["groupId"],
        ),
        // Users
        tool("get_current_user", "Get the authenticated user", json!({}), &[]),
        tool("get_user", "Get a user", json!({"userId": integer("User ID")}), &["userId"]),
        list_tool(
            "list_users",
            "List or search users",
            json!({
                "username": string("Exact username"),
                "search": string("Search name, username or email"),
                "active": boolean("Only active users"),
                "blocked": boolean("Only blocked users"),
            }),
            &[],
        ),
        // Members
        list_tool(
            "list_project_members",
            "List project members",
            json!({
                "projectId": project_id(),
                "query": string("Filter by name or username"),
                "includeInherited": boolean("Include members inherited from groups"),
            }),
            &["projectId"],
        ),
        tool(
            "add_project_member",
            "Add a member to a project",
            json!({
                "projectId": project_id(),
                "userId": integer("User ID"),
                "accessLevel": integer("10 guest, 20 reporter, 30 developer, 40 maintainer, 50 owner"),
                "expiresAt": string("YYYY-MM-DD"),
            }),
            &["projectId", "userId", "accessLevel"],
        ),
        tool(
            "update_project_member",
            "Change a project member's access level",
            json!({
                "projectId": project_id(),
                "userId": integer("User ID"),
                "accessLevel": integer("New access level"),
                "expiresAt": string("YYYY-MM-DD"),
            }),
            &["projectId", "userId", "accessLevel"],
        ),
        tool(
            "remove_project_member",
            "Remove a member from a project",
            json!({"projectId": project_id(), "userId": integer("User ID")}),
            &["projectId", "userId"],
        ),
        list_tool(
            "list_group_members",
            "List group members",
            json!({
                "groupId": group_id(),
                "query": string("Filter by name or username"),
                "includeInherited": boolean("Include members inherited from parent groups"),
            }),
            &["groupId"],
        ),
        // Variables
        list_tool(
            "list_variables",
            "List project CI/CD variables",
            json!({"projectId": project_id()}),
            &["projectId"],
        ),
        tool(
            "get_variable",
            "Get a project CI/CD variable",
            json!({"projectId": project_id(), "key": string("Variable key"), "environmentScope": string("Environment scope")}),
            &["projectId", "key"],
        ),
        tool(
            "create_variable",
            "Create a project CI/CD variable",
            json!({
                "projectId": project_id(),
                "key": string("Variable key"),
                "value": string("Value"),
                "variableType": one_of(&["env_var", "file"], "Type"),
                "protected": boolean("Only on protected refs"),
                "masked": boolean("Mask in job logs"),
                "raw": boolean("Do not expand variable references"),
                "environmentScope": string("Environment scope"),
                "description": string("Description"),
            }),
            &["projectId", "key", "value"],
        ),
        tool(
            "update_variable",
            "Update a project CI/CD variable",
            json!({
                "projectId": project_id(),
                "key": string("Variable key"),
                "value": string("Value"),
                "variableType": one_of(&["env_var", "file"], "Type"),
                "protected": boolean("Only on protected refs"),
                "masked": boolean("Mask in job logs"),
                "raw": boolean("Do not expand variable references"),
                "environmentScope": string("Environment scope"),
                "description": string("Description"),
            }),
            &["projectId", "key"],
        ),
        tool(
            "delete_variable",
            "Delete a project CI/CD variable",
            json!({"projectId": project_id(), "key": string("Variable key"), "environmentScope": string("Environment scope")}),
            &["projectId", "key"],
        ),
        // Webhooks
        list_tool("list_webhooks", "List project webhooks", json!({"projectId": project_id()}), &["projectId"]),
        tool(
            "get_webhook",
            "Get a project webhook",
            json!({"projectId": project_id(), "hookId": integer("Hook ID")}),
            &["projectId", "hookId"],
        ),
        tool(
            "create_webhook",
            "Create a project webhook",
            webhook_event_props(obj(json!({"projectId": project_id(), "url": string("Delivery URL")}))),
            &["projectId", "url"],
        ),
        tool(
            "update_webhook",
            "Update a project webhook",
            webhook_event_props(obj(json!({
                "projectId": project_id(),
                "hookId": integer("Hook ID"),
                "url": string("Delivery URL"),
            }))),
            &["projectId", "hookId"],
        ),
        tool(
            "delete_webhook",
            "Delete a project webhook",
            json!({"projectId": project_id(), "hookId": integer("Hook ID")}),
            &["projectId", "hookId"],
        ),
        // Runners
        list_tool(
            "list_runners",
            "List runners available to the user",
            json!({
                "type": one_of(&["instance_type", "group_type", "project_type"], "Runner type"),
                "status": string("online, offline, stale, never_contacted"),
                "paused": boolean("Paused filter"),
                "tagList": strings("Runner tags"),
            }),
            &[],
        ),
        list_tool(
            "list_project_runners",
            "List runners available to a project",
            json!({
                "projectId": project_id(),
                "type": one_of(&["instance_type", "group_type", "project_type"], "Runner type"),
                "status": string("online, offline, stale, never_contacted"),
            }),
            &["projectId"],
        ),
        tool("get_runner", "Get a runner", json!({"runnerId": integer("Runner ID")}), &["runnerId"]),
    ];
    tools.insert(
        0,
        tool(
            PING_TOOL,
            "Health check; echoes a message.",
            json!({"message": {"type": "string"}}),
            &[],
        ),
    );
    tools
}

/// Every descriptor, ping included. Built once per process.
fn catalogue() -> &'static [ToolDescriptor] {
    static TOOLS: OnceLock<Vec<ToolDescriptor>> = OnceLock::new();
    TOOLS.get_or_init(build_catalogue)
}

pub fn tool_descriptors(enable_ping: bool) -> Vec<ToolDescriptor> {
    catalogue()
        .iter()
        .filter(|t| enable_ping || t.name != PING_TOOL)
        .cloned()
        .collect()
}

pub fn is_known_tool(name: &str, enable_ping: bool) -> bool {
    static NAMES: OnceLock<HashSet<&'static str>> = OnceLock::new();
    let names = NAMES.get_or_init(|| catalogue().iter().map(|t| t.name.as_str()).collect());
    names.contains(name) && (enable_ping || name != PING_TOOL)
}

// ---------------------------------------------------------------------------
// Dispatch

fn args<T: DeserializeOwned>(v: Value) -> Result<T, ToolError> {
    let v = if v.is_null() { json!({}) } else { v };
    serde_json::from_value(v).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

/// Apply the page policy before decoding a list input: page 0 is refused,
/// perPage defaults to 20 and is clamped to 1..=100.
fn paged_args<T: DeserializeOwned>(v: Value) -> Result<T, ToolError> {
    let mut v = if v.is_null() { json!({}) } else { v };
    if let Some(map) = v.as_object_mut() {
        let page: PageParams = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        page.validate().map_err(ToolError::InvalidParams)?;
        if let Some(per_page) = page.with_defaults().per_page {
            map.insert("perPage".into(), json!(per_page));
        }
    }
    args(v)
}

/// One resource, or a bare success when GitLab answered 204.
fn one<T: Serialize + Markdown>(item: Option<T>) -> Result<ToolOutput, ToolError> {
    let Some(item) = item else {
        return done(NO_CONTENT.to_string());
    };
    Ok(ToolOutput {
        text: item.detail(),
        structured: serde_json::to_value(&item)?,
    })
}

fn many<T: Serialize + Markdown>(title: &str, page: Paginated<T>) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput {
        text: render_list(title, &page),
        structured: serde_json::to_value(&page)?,
    })
}

fn done(message: String) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput {
        structured: json!({ "success": true, "message": message }),
        text: message,
    })
}

fn text(structured: Value, text: String) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput { structured, text })
}

/// Run one tool against GitLab. The client carries the caller's
/// credentials; GitLab failures come back as [`ToolError::GitLab`].
pub async fn call_tool(client: &GitLabClient, name: &str, a: Value) -> Result<ToolOutput, ToolError> {
    match name {
        "test_connection" => one(Some(client.test_connection().await)),

        // Projects
        "list_projects" => {
            let i: ListProjectsInput = paged_args(a)?;
            many("Projects", client.list_projects(&i).await?)
        }
        "get_project" => {
            let i: ProjectInput = args(a)?;
            one(client.get_project(&i.project_id).await?)
        }
        "create_project" => {
            let i: CreateProjectInput = args(a)?;
            one(client.create_project(&i).await?)
        }
        "update_project" => {
            let i: UpdateProjectInput = args(a)?;
            one(client.update_project(&i).await?)
        }
        "delete_project" => {
            let i: ProjectInput = args(a)?;
            client.delete_project(&i.project_id).await?;
            done(format!("Project {} scheduled for deletion", i.project_id))
        }
        "fork_project" => {
            let i: ForkProjectInput = args(a)?;
            one(client.fork_project(&i).await?)
        }
        "archive_project" => {
            let i: ProjectInput = args(a)?;
            one(client.archive_project(&i.project_id).await?)
        }
        "unarchive_project" => {
            let i: ProjectInput = args(a)?;
            one(client.unarchive_project(&i.project_id).await?)
        }

        // Branches
        "list_branches" => {
            let i: ListBranchesInput = paged_args(a)?;
            many("Branches", client.list_branches(&i).await?)
        }
        "get_branch" => {
            let i: BranchInput = args(a)?;
            one(client.get_branch(&i).await?)
        }
        "create_branch" => {
            let i: CreateBranchInput = args(a)?;
            one(client.create_branch(&i).await?)
        }
        "delete_branch" => {
            let i: BranchInput = args(a)?;
            client.delete_branch(&i).await?;
            done(format!("Deleted branch `{}`", i.branch))
        }
        "protect_branch" => {
            let i: ProtectBranchInput = args(a)?;
            one(client.protect_branch(&i).await?)
        }
        "unprotect_branch" => {
            let i: BranchInput = args(a)?;
            client.unprotect_branch(&i).await?;
            done(format!("Removed protection from `{}`", i.branch))
        }

        // Commits
        "list_commits" => {
            let i: ListCommitsInput = paged_args(a)?;
            many("Commits", client.list_commits(&i).await?)
        }
        "get_commit" => {
            let i: CommitInput = args(a)?;
            one(client.get_commit(&i).await?)
        }
        "get_commit_diff" => {
            let i: CommitDiffInput = paged_args(a)?;
            let page = client.get_commit_diff(&i).await?;
            let title = format!("Diff of {}", i.sha);
            text(
                serde_json::to_value(&page)?,
                format!(
                    "{}\n{}",
                    render_diffs(&title, &page.items),
                    pagination_footer(&page)
                ),
            )
        }
        "cherry_pick_commit" => {
            let i: CherryPickInput = args(a)?;
            one(client.cherry_pick_commit(&i).await?)
        }

        // Tags
        "list_tags" => {
            let i: ListTagsInput = paged_args(a)?;
            many("Tags", client.list_tags(&i).await?)
        }
        "get_tag" => {
            let i: TagInput = args(a)?;
            one(client.get_tag(&i).await?)
        }
        "create_tag" => {
            let i: CreateTagInput = args(a)?;
            one(client.create_tag(&i).await?)
        }
        "delete_tag" => {
            let i: TagInput = args(a)?;
            client.delete_tag(&i).await?;
            done(format!("Deleted tag `{}`", i.tag_name))
        }

        // Tree and compare
        "get_repository_tree" => {
            let i: RepositoryTreeInput = paged_args(a)?;
            many("Repository tree", client.get_repository_tree(&i).await?)
        }
        "compare_refs" => {
            let i: CompareInput = args(a)?;
            one(client.compare_refs(&i).await?)
        }

        // Files
        "get_file" => {
            let i: FileInput = args(a)?;
            one(client.get_file(&i).await?)
        }
        "get_file_raw" => {
            let i: FileInput = args(a)?;
            let raw = client.get_file_raw(&i).await?;
            text(json!({ "filePath": i.file_path, "content": raw }), raw)
        }
        "create_file" => {
            let i: WriteFileInput = args(a)?;
            one(client.create_file(&i).await?)
        }
        "update_file" => {
            let i: WriteFileInput = args(a)?;
            one(client.update_file(&i).await?)
        }
        "delete_file" => {
            let i: DeleteFileInput = args(a)?;
            client.delete_file(&i).await?;
            done(format!("Deleted `{}` on `{}`", i.file_path, i.commit.branch))
        }

        // Merge requests
        "list_merge_requests" => {
            let i: ListMergeRequestsInput = paged_args(a)?;
            many("Merge requests", client.list_merge_requests(&i).await?)
        }
        "get_merge_request" => {
            let i: MergeRequestInput = args(a)?;
            one(client.get_merge_request(&i).await?)
        }
        "create_merge_request" => {
            let i: CreateMergeRequestInput = args(a)?;
            one(client.create_merge_request(&i).await?)
        }
        "update_merge_request" => {
            let i: UpdateMergeRequestInput = args(a)?;
            one(client.update_merge_request(&i).await?)
        }
        "merge_merge_request" => {
            let i: MergeMergeRequestInput = args(a)?;
            one(client.merge_merge_request(&i).await?)
        }
        "approve_merge_request" => {
            let i: MergeRequestInput = args(a)?;
            client.approve_merge_request(&i).await?;
            done(format!("Approved !{}", i.merge_request_iid))
        }
        "rebase_merge_request" => {
            let i: MergeRequestInput = args(a)?;
            let in_progress = client.rebase_merge_request(&i).await?;
            let message = format!("Rebase of !{} requested", i.merge_request_iid);
            text(
                json!({ "success": true, "rebaseInProgress": in_progress, "message": message }),
                message,
            )
        }
        "get_merge_request_diff" => {
            let i: MergeRequestInput = args(a)?;
            let diffs = client.get_merge_request_diff(&i).await?;
            let title = format!("Changes in !{}", i.merge_request_iid);
            text(serde_json::to_value(&diffs)?, render_diffs(&title, &diffs))
        }
        "list_merge_request_commits" => {
            let i: MergeRequestPageInput = paged_args(a)?;
            many("Commits", client.list_merge_request_commits(&i).await?)
        }
        "list_merge_request_notes" => {
            let i: MergeRequestPageInput = paged_args(a)?;
            many("Comments", client.list_merge_request_notes(&i).await?)
        }
        "create_merge_request_note" => {
            let i: CreateMergeRequestNoteInput = args(a)?;
            one(client.create_merge_request_note(&i).await?)
        }

        // Issues
        "list_issues" => {
            let i: ListIssuesInput = paged_args(a)?;
            many("Issues", client.list_issues(&i).await?)
        }
        "get_issue" => {
            let i: IssueInput = args(a)?;
            one(client.get_issue(&i).await?)
        }
        "create_issue" => {
            let i: CreateIssueInput = args(a)?;
            one(client.create_issue(&i).await?)
        }
        "update_issue" => {
            let i: UpdateIssueInput = args(a)?;
            one(client.update_issue(&i).await?)
        }
        "delete_issue" => {
            let i: IssueInput = args(a)?;
            client.delete_issue(&i).await?;
            done(format!("Deleted issue #{}", i.issue_iid))
        }
        "list_issue_notes" => {
            let i: IssuePageInput = paged_args(a)?;
            many("Comments", client.list_issue_notes(&i).await?)
        }
        "create_issue_note" => {
            let i: CreateIssueNoteInput = args(a)?;
            one(client.create_issue_note(&i).await?)
        }
        "update_issue_note" => {
            let i: UpdateIssueNoteInput = args(a)?;
            one(client.update_issue_note(&i).await?)
        }
        "delete_issue_note" => {
            let i: IssueNoteInput = args(a)?;
            client.delete_issue_note(&i).await?;
            done(format!("Deleted note {} on #{}", i.note_id, i.issue_iid))
        }

        // Labels
        "list_labels" => {
            let i: ListLabelsInput = paged_args(a)?;
            many("Labels", client.list_labels(&i).await?)
        }
        "create_label" => {
            let i: CreateLabelInput = args(a)?;
            one(client.create_label(&i).await?)
        }
        "update_label" => {
            let i: UpdateLabelInput = args(a)?;
            one(client.update_label(&i).await?)
        }
        "delete_label" => {
            let i: LabelInput = args(a)?;
            client.delete_label(&i).await?;
            done(format!("Deleted label {}", i.label_id))
        }

        // Pipelines
        "list_pipelines" => {
            let i: ListPipelinesInput = paged_args(a)?;
            many("Pipelines", client.list_pipelines(&i).await?)
        }
        "get_pipeline" => {
            let i: PipelineInput = args(a)?;
            one(client.get_pipeline(&i).await?)
        }
        "create_pipeline" => {
            let i: CreatePipelineInput = args(a)?;
            one(client.create_pipeline(&i).await?)
        }
        "retry_pipeline" => {
            let i: PipelineInput = args(a)?;
            one(client.retry_pipeline(&i).await?)
        }
        "cancel_pipeline" => {
            let i: PipelineInput = args(a)?;
            one(client.cancel_pipeline(&i).await?)
        }
        "delete_pipeline" => {
            let i: PipelineInput = args(a)?;
            client.delete_pipeline(&i).await?;
            done(format!("Deleted pipeline #{}", i.pipeline_id))
        }

        // Jobs
        "list_pipeline_jobs" => {
            let i: ListPipelineJobsInput = paged_args(a)?;
            many("Jobs", client.list_pipeline_jobs(&i).await?)
        }
        "list_project_jobs" => {
            let i: ListProjectJobsInput = paged_args(a)?;
            many("Jobs", client.list_project_jobs(&i).await?)
        }
        "get_job" => {
            let i: JobInput = args(a)?;
            one(client.get_job(&i).await?)
        }
        "get_job_log" => {
            let i: JobInput = args(a)?;
            let trace = client.get_job_log(&i).await?;
            let rendered = format!("## Log of job #{}\n\n```\n{}\n```\n", i.job_id, trace.trim_end());
            text(json!({ "jobId": i.job_id, "log": trace }), rendered)
        }
        "retry_job" => {
            let i: JobInput = args(a)?;
            one(client.retry_job(&i).await?)
        }
        "cancel_job" => {
            let i: JobInput = args(a)?;
            one(client.cancel_job(&i).await?)
        }
        "play_job" => {
            let i: JobInput = args(a)?;
            one(client.play_job(&i).await?)
        }

        // Releases
        "list_releases" => {
            let i: ListReleasesInput = paged_args(a)?;
            many("Releases", client.list_releases(&i).await?)
        }
        "get_release" => {
            let i: ReleaseInput = args(a)?;
            one(client.get_release(&i).await?)
        }
        "create_release" => {
            let i: CreateReleaseInput = args(a)?;
            one(client.create_release(&i).await?)
        }
        "update_release" => {
            let i: UpdateReleaseInput = args(a)?;
            one(client.update_release(&i).await?)
        }
        "delete_release" => {
            let i: ReleaseInput = args(a)?;
            one(client.delete_release(&i).await?)
        }

        // Groups
        "list_groups" => {
            let i: ListGroupsInput = paged_args(a)?;
            many("Groups", client.list_groups(&i).await?)
        }
        "get_group" => {
            let i: GroupInput = args(a)?;
            one(client.get_group(&i.group_id).await?)
        }
        "list_group_projects" => {
            let i: ListGroupProjectsInput = paged_args(a)?;
            many("Projects", client.list_group_projects(&i).await?)
        }
        "list_subgroups" => {
            let i: ListSubgroupsInput = paged_args(a)?;
            many("Subgroups", client.list_subgroups(&i).await?)
        }

        // Users
        "get_current_user" => one(client.get_current_user().await?),
        "get_user" => {
            let i: UserInput = args(a)?;
            one(client.get_user(i.user_id).await?)
        }
        "list_users" => {
            let i: ListUsersInput = paged_args(a)?;
            many("Users", client.list_users(&i).await?)
        }

        // Members
        "list_project_members" => {
            let i: ListProjectMembersInput = paged_args(a)?;
            many("Members", client.list_project_members(&i).await?)
        }
        "add_project_member" => {
            let i: AddMemberInput = args(a)?;
            one(client.add_project_member(&i).await?)
        }
        "update_project_member" => {
            let i: UpdateMemberInput = args(a)?;
            one(client.update_project_member(&i).await?)
        }
        "remove_project_member" => {
            let i: MemberInput = args(a)?;
            client.remove_project_member(&i).await?;
            done(format!("Removed user {} from project {}", i.user_id, i.project_id))
        }
        "list_group_members" => {
            let i: ListGroupMembersInput = paged_args(a)?;
            many("Members", client.list_group_members(&i).await?)
        }

        // Variables
        "list_variables" => {
            let i: ProjectPageInput = paged_args(a)?;
            many("Variables", client.list_variables(&i).await?)
        }
        "get_variable" => {
            let i: VariableInput = args(a)?;
            one(client.get_variable(&i).await?)
        }
        "create_variable" => {
            let i: CreateVariableInput = args(a)?;
            one(client.create_variable(&i).await?)
        }
        "update_variable" => {
            let i: UpdateVariableInput = args(a)?;
            one(client.update_variable(&i).await?)
        }
        "delete_variable" => {
            let i: VariableInput = args(a)?;
            client.delete_variable(&i).await?;
            done(format!("Deleted variable `{}`", i.key))
        }

        // Webhooks
        "list_webhooks" => {
            let i: ProjectPageInput = paged_args(a)?;
            many("Webhooks", client.list_webhooks(&i).await?)
        }
        "get_webhook" => {
            let i: WebhookInput = args(a)?;
            one(client.get_webhook(&i).await?)
        }
        "create_webhook" => {
            let i: CreateWebhookInput = args(a)?;
            one(client.create_webhook(&i).await?)
        }
        "update_webhook" => {
            let i: UpdateWebhookInput = args(a)?;
            one(client.update_webhook(&i).await?)
        }
        "delete_webhook" => {
            let i: WebhookInput = args(a)?;
            client.delete_webhook(&i).await?;
            done(format!("Deleted webhook #{}", i.hook_id))
        }

        // Runners
        "list_runners" => {
            let i: ListRunnersInput = paged_args(a)?;
            many("Runners", client.list_runners(&i).await?)
        }
        "list_project_runners" => {
            let i: ListProjectRunnersInput = paged_args(a)?;
            many("Runners", client.list_project_runners(&i).await?)
        }
        "get_runner" => {
            let i: RunnerInput = args(a)?;
            one(client.get_runner(i.runner_id).await?)
        }

        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_names_are_unique() {
        let tools = tool_descriptors(true);
        let names: HashSet<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len());
        assert!(names.contains("ping"));
        assert!(names.contains("test_connection"));
        assert!(names.contains("get_merge_request_diff"));
    }

    #[test]
    fn ping_is_gated() {
        assert!(!is_known_tool("ping", false));
        assert!(is_known_tool("ping", true));
        assert!(!tool_descriptors(false).iter().any(|t| t.name == "ping"));
    }

    #[test]
    fn known_tool_lookup_matches_catalogue() {
        for t in tool_descriptors(false) {
            assert!(is_known_tool(&t.name, false), "{}", t.name);
        }
        assert!(!is_known_tool("no_such_tool", true));
        assert_eq!(tool_descriptors(true).len(), tool_descriptors(false).len() + 1);
        assert_eq!(tool_descriptors(true)[0].name, PING_TOOL);
    }

    #[test]
    fn bodiless_resource_is_plain_success() {
        let out = one::<crate::types::Project>(None).unwrap();
        assert_eq!(out.structured["success"], true);
        assert_eq!(out.text, NO_CONTENT);
    }

    #[test]
    fn tool_errors_render_rpc_messages() {
        assert_eq!(
            ToolError::InvalidParams("page must be >= 1".into()).to_string(),
            "Invalid params: page must be >= 1"
        );
        assert_eq!(ToolError::UnknownTool("x".into()).to_string(), "Tool not found: x");
        let gl: ToolError = GitLabError::authentication("no token").into();
        assert_eq!(gl.to_string(), "no token");
    }

    #[test]
    fn list_tools_advertise_paging() {
        let tools = tool_descriptors(false);
        let issues = tools.iter().find(|t| t.name == "list_issues").unwrap();
        assert_eq!(issues.input_schema["properties"]["perPage"]["maximum"], 100);
        let get = tools.iter().find(|t| t.name == "get_issue").unwrap();
        assert!(get.input_schema["properties"].get("page").is_none());
        assert_eq!(get.input_schema["required"], json!(["projectId", "issueIid"]));
    }

    #[test]
    fn page_policy_defaults_and_clamps() {
        let i: ListIssuesInput = paged_args(json!({"projectId": 1})).unwrap();
        assert_eq!(i.page.per_page, Some(20));
        let i: ListIssuesInput = paged_args(json!({"perPage": 500})).unwrap();
        assert_eq!(i.page.per_page, Some(100));
        let i: ListProjectsInput = paged_args(Value::Null).unwrap();
        assert_eq!(i.page.per_page, Some(20));
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = paged_args::<ListIssuesInput>(json!({"page": 0})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(m) if m.contains("page")));
    }

    #[test]
    fn missing_required_argument_is_invalid_params() {
        let err = args::<IssueInput>(json!({"projectId": 1})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }
}
