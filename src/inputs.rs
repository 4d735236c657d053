//! Tool inputs.
//!
//! Arguments arrive camelCase. List filters are turned into snake_case query
//! parameters by `http::filter_query`, so identifier fields on them are
//! `skip_serializing`. Write payloads serialize straight to GitLab's
//! snake_case JSON bodies and drop unset fields.

use crate::pagination::PageParams;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(u64),
}

/// Project and group identifiers may be numeric ids or `namespace/path`
/// strings; both are carried as strings.
pub fn id_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match StringOrNumber::deserialize(d)? {
        StringOrNumber::Str(s) => s,
        StringOrNumber::Num(n) => n.to_string(),
    })
}

pub fn opt_id_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<StringOrNumber>::deserialize(d)? {
        Some(StringOrNumber::Str(s)) => Some(s),
        Some(StringOrNumber::Num(n)) => Some(n.to_string()),
        None => None,
    })
}

// Write endpoints take labels as one comma-separated string.
fn csv<S: Serializer>(v: &Option<Vec<String>>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(items) => s.serialize_str(&items.join(",")),
        None => s.serialize_none(),
    }
}

// ---------------------------------------------------------------------------
// Identifier inputs

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInput {
    #[serde(deserialize_with = "id_string")]
    pub group_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub user_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub branch: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub sha: String,
    #[serde(default)]
    pub stats: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub tag_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequestInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub merge_request_iid: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub issue_iid: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueNoteInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub issue_iid: u64,
    pub note_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    /// Label id or name.
    #[serde(deserialize_with = "id_string")]
    pub label_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub pipeline_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub job_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub tag_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub user_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub key: String,
    #[serde(default)]
    pub environment_scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub hook_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerInput {
    pub runner_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub file_path: String,
    /// Branch, tag or commit; defaults to `HEAD`.
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

// ---------------------------------------------------------------------------
// List filters

/// Project-scoped list with no filters beyond paging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPageInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsInput {
    pub search: Option<String>,
    pub owned: Option<bool>,
    pub membership: Option<bool>,
    pub starred: Option<bool>,
    pub visibility: Option<String>,
    pub archived: Option<bool>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub simple: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBranchesInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommitsInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub ref_name: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub path: Option<String>,
    pub author: Option<String>,
    pub with_stats: Option<bool>,
    pub first_parent: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDiffInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    #[serde(skip_serializing)]
    pub sha: String,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTagsInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryTreeInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub path: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub recursive: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub from: String,
    pub to: String,
    pub straight: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMergeRequestsInput {
    /// Omit to list across every project visible to the caller.
    #[serde(default, deserialize_with = "opt_id_string", skip_serializing)]
    pub project_id: Option<String>,
    pub state: Option<String>,
    pub scope: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub milestone: Option<String>,
    pub labels: Option<Vec<String>>,
    pub author_id: Option<u64>,
    pub author_username: Option<String>,
    pub assignee_id: Option<u64>,
    pub reviewer_username: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub search: Option<String>,
    pub draft: Option<bool>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

/// Paged sub-resource of one merge request (commits, notes).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequestPageInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    #[serde(skip_serializing)]
    pub merge_request_iid: u64,
    pub sort: Option<String>,
    pub order_by: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIssuesInput {
    #[serde(default, deserialize_with = "opt_id_string", skip_serializing)]
    pub project_id: Option<String>,
    pub state: Option<String>,
    pub scope: Option<String>,
    pub labels: Option<Vec<String>>,
    pub milestone: Option<String>,
    pub author_id: Option<u64>,
    pub author_username: Option<String>,
    pub assignee_id: Option<u64>,
    pub assignee_username: Option<String>,
    pub search: Option<String>,
    pub confidential: Option<bool>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePageInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    #[serde(skip_serializing)]
    pub issue_iid: u64,
    pub sort: Option<String>,
    pub order_by: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLabelsInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub search: Option<String>,
    pub with_counts: Option<bool>,
    pub include_ancestor_groups: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelinesInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub scope: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub sha: Option<String>,
    pub username: Option<String>,
    pub updated_after: Option<String>,
    pub updated_before: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelineJobsInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    #[serde(skip_serializing)]
    pub pipeline_id: u64,
    pub scope: Option<String>,
    pub include_retried: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectJobsInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub scope: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReleasesInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupsInput {
    pub search: Option<String>,
    pub owned: Option<bool>,
    pub all_available: Option<bool>,
    pub top_level_only: Option<bool>,
    pub min_access_level: Option<u32>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubgroupsInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub group_id: String,
    pub search: Option<String>,
    pub owned: Option<bool>,
    pub all_available: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupProjectsInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub group_id: String,
    pub search: Option<String>,
    pub archived: Option<bool>,
    pub visibility: Option<String>,
    pub include_subgroups: Option<bool>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersInput {
    pub username: Option<String>,
    pub search: Option<String>,
    pub active: Option<bool>,
    pub blocked: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectMembersInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    pub query: Option<String>,
    /// Use `/members/all` to include inherited members.
    #[serde(default, skip_serializing)]
    pub include_inherited: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupMembersInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub group_id: String,
    pub query: Option<String>,
    #[serde(default, skip_serializing)]
    pub include_inherited: Option<bool>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRunnersInput {
    #[serde(rename = "type")]
    pub runner_type: Option<String>,
    pub status: Option<String>,
    pub paused: Option<bool>,
    pub tag_list: Option<Vec<String>>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectRunnersInput {
    #[serde(deserialize_with = "id_string", skip_serializing)]
    pub project_id: String,
    #[serde(rename = "type")]
    pub runner_type: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

// ---------------------------------------------------------------------------
// Write payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct CreateProjectInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_with_readme: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ProjectChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub changes: ProjectChanges,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ForkOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkProjectInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub options: ForkOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub branch: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ProtectBranch {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_access_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_access_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_force_push: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectBranchInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub rule: ProtectBranch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct CherryPick {
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CherryPickInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub sha: String,
    #[serde(flatten)]
    pub options: CherryPick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewTag {
    pub tag_name: String,
    #[serde(rename(deserialize = "ref", serialize = "ref"))]
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub tag: NewTag,
}

/// Commit metadata shared by file create/update/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct FileCommitOptions {
    pub branch: String,
    pub commit_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct FileWrite {
    pub content: String,
    /// `text` (default) or `base64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(flatten)]
    pub commit: FileCommitOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteFileInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub file_path: String,
    #[serde(flatten)]
    pub file: FileWrite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub file_path: String,
    #[serde(flatten)]
    pub commit: FileCommitOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewMergeRequest {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_ids: Option<Vec<u64>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_source_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_collaboration: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMergeRequestInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub merge_request: NewMergeRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct MergeRequestChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// `close` or `reopen`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_ids: Option<Vec<u64>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub add_labels: Option<Vec<String>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub remove_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_source_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_locked: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMergeRequestInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub merge_request_iid: u64,
    #[serde(flatten)]
    pub changes: MergeRequestChanges,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct MergeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash_commit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_remove_source_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_when_pipeline_succeeds: Option<bool>,
    /// Merge only if the source branch HEAD still matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeMergeRequestInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub merge_request_iid: u64,
    #[serde(flatten)]
    pub options: MergeOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NoteBody {
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMergeRequestNoteInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub merge_request_iid: u64,
    #[serde(flatten)]
    pub note: NoteBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueNoteInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub issue_iid: u64,
    #[serde(flatten)]
    pub note: NoteBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueNoteInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub issue_iid: u64,
    pub note_id: u64,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub issue: NewIssue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct IssueChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `close` or `reopen`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub add_labels: Option<Vec<String>>,
    #[serde(serialize_with = "csv", skip_serializing_if = "Option::is_none")]
    pub remove_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_locked: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub issue_iid: u64,
    #[serde(flatten)]
    pub changes: IssueChanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewLabel {
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub label: NewLabel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct LabelChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabelInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(deserialize_with = "id_string")]
    pub label_id: String,
    #[serde(flatten)]
    pub changes: LabelChanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct PipelineVariable {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewPipeline {
    #[serde(rename(deserialize = "ref", serialize = "ref"))]
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<PipelineVariable>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub pipeline: NewPipeline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ReleaseLinkInput {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ReleaseAssetsInput {
    #[serde(default)]
    pub links: Vec<ReleaseLinkInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewRelease {
    pub tag_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Commit or branch to create the tag from when it does not exist.
    #[serde(
        rename(deserialize = "ref", serialize = "ref"),
        skip_serializing_if = "Option::is_none"
    )]
    pub git_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<ReleaseAssetsInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReleaseInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub release: NewRelease,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct ReleaseChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReleaseInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub tag_name: String,
    #[serde(flatten)]
    pub changes: ReleaseChanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewMember {
    pub user_id: u64,
    pub access_level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub member: NewMember,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct MemberChanges {
    pub access_level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub user_id: u64,
    #[serde(flatten)]
    pub changes: MemberChanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewVariable {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariableInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub variable: NewVariable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct VariableChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariableInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub key: String,
    #[serde(flatten)]
    pub changes: VariableChanges,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct WebhookEvents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_push_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub releases_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ssl_verification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct NewWebhook {
    pub url: String,
    #[serde(flatten)]
    pub events: WebhookEvents,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(flatten)]
    pub hook: NewWebhook,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase", serialize = "snake_case"))]
pub struct WebhookChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub events: WebhookEvents,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookInput {
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    pub hook_id: u64,
    #[serde(flatten)]
    pub changes: WebhookChanges,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::filter_query;
    use serde_json::json;

    #[test]
    fn project_id_accepts_number_or_path() {
        let a: ProjectInput = serde_json::from_value(json!({"projectId": 42})).unwrap();
        assert_eq!(a.project_id, "42");
        let b: ProjectInput =
            serde_json::from_value(json!({"projectId": "group/sub-project"})).unwrap();
        assert_eq!(b.project_id, "group/sub-project");
    }

    #[test]
    fn list_filters_drop_identifiers_from_query() {
        let input: ListIssuesInput = serde_json::from_value(json!({
            "projectId": "g/p",
            "state": "opened",
            "assigneeUsername": "alice",
            "labels": ["bug", "p1"],
            "page": 2,
            "perPage": 10
        }))
        .unwrap();
        assert_eq!(input.project_id.as_deref(), Some("g/p"));
        assert_eq!(input.page.page, Some(2));
        let mut q = filter_query(&input);
        q.sort();
        assert_eq!(
            q,
            vec![
                ("assignee_username".to_string(), "alice".to_string()),
                ("labels".to_string(), "bug,p1".to_string()),
                ("state".to_string(), "opened".to_string()),
            ]
        );
    }

    #[test]
    fn create_payload_serializes_snake_case_without_nulls() {
        let input: CreateMergeRequestInput = serde_json::from_value(json!({
            "projectId": 7,
            "sourceBranch": "feature",
            "targetBranch": "main",
            "title": "Add thing",
            "labels": ["a", "b"],
            "removeSourceBranch": true
        }))
        .unwrap();
        let body = serde_json::to_value(&input.merge_request).unwrap();
        assert_eq!(
            body,
            json!({
                "source_branch": "feature",
                "target_branch": "main",
                "title": "Add thing",
                "labels": "a,b",
                "remove_source_branch": true
            })
        );
    }

    #[test]
    fn update_payload_only_carries_set_fields() {
        let input: UpdateIssueInput = serde_json::from_value(json!({
            "projectId": "1",
            "issueIid": 3,
            "stateEvent": "close"
        }))
        .unwrap();
        assert_eq!(input.issue_iid, 3);
        let body = serde_json::to_value(&input.changes).unwrap();
        assert_eq!(body, json!({"state_event": "close"}));
    }

    #[test]
    fn tree_ref_is_sent_as_ref() {
        let input: RepositoryTreeInput = serde_json::from_value(json!({
            "projectId": 1, "ref": "develop", "recursive": true
        }))
        .unwrap();
        let mut q = filter_query(&input);
        q.sort();
        assert_eq!(
            q,
            vec![
                ("recursive".to_string(), "true".to_string()),
                ("ref".to_string(), "develop".to_string()),
            ]
        );
    }

    #[test]
    fn file_write_flattens_commit_options() {
        let input: WriteFileInput = serde_json::from_value(json!({
            "projectId": 1,
            "filePath": "docs/a.md",
            "branch": "main",
            "content": "hello",
            "commitMessage": "docs: add a"
        }))
        .unwrap();
        let body = serde_json::to_value(&input.file).unwrap();
        assert_eq!(
            body,
            json!({"content": "hello", "branch": "main", "commit_message": "docs: add a"})
        );
    }
}
