use super::{project_path, GitLabClient};
use crate::error::Result;
use crate::inputs::{
    CreateMergeRequestInput, CreateMergeRequestNoteInput, ListMergeRequestsInput,
    MergeMergeRequestInput, MergeRequestInput, MergeRequestPageInput, UpdateMergeRequestInput,
};
use crate::pagination::Paginated;
use crate::types::{Commit, Diff, MergeRequest, Note};
use reqwest::Method;
use serde::Deserialize;

fn mr_path(project_id: &str, iid: u64) -> String {
    format!("{}/merge_requests/{}", project_path(project_id), iid)
}

/// `GET .../changes` wraps the diffs in the merge request itself; only the
/// `changes` array is kept.
#[derive(Deserialize)]
struct MergeRequestChangesEnvelope {
    #[serde(default)]
    changes: Vec<Diff>,
}

impl GitLabClient {
    /// Project-scoped when `project_id` is set, otherwise every merge request
    /// visible to the caller.
    pub async fn list_merge_requests(
        &self,
        input: &ListMergeRequestsInput,
    ) -> Result<Paginated<MergeRequest>> {
        let path = match &input.project_id {
            Some(id) => format!("{}/merge_requests", project_path(id)),
            None => "/merge_requests".to_string(),
        };
        self.list(&path, input, &input.page).await
    }

    pub async fn get_merge_request(&self, input: &MergeRequestInput) -> Result<Option<MergeRequest>> {
        self.get(&mr_path(&input.project_id, input.merge_request_iid))
            .await
    }

    pub async fn create_merge_request(
        &self,
        input: &CreateMergeRequestInput,
    ) -> Result<Option<MergeRequest>> {
        let path = format!("{}/merge_requests", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.merge_request)
            .await
    }

    pub async fn update_merge_request(
        &self,
        input: &UpdateMergeRequestInput,
    ) -> Result<Option<MergeRequest>> {
        self.send_body(
            Method::PUT,
            &mr_path(&input.project_id, input.merge_request_iid),
            &input.changes,
        )
        .await
    }

    pub async fn merge_merge_request(&self, input: &MergeMergeRequestInput) -> Result<Option<MergeRequest>> {
        let path = format!(
            "{}/merge",
            mr_path(&input.project_id, input.merge_request_iid)
        );
        self.send_body(Method::PUT, &path, &input.options).await
    }

    pub async fn approve_merge_request(&self, input: &MergeRequestInput) -> Result<()> {
        let path = format!(
            "{}/approve",
            mr_path(&input.project_id, input.merge_request_iid)
        );
        let _: Option<serde_json::Value> = self.post_empty(&path).await?;
        Ok(())
    }

    /// Rebase is asynchronous upstream; GitLab answers 202 with
    /// `rebase_in_progress`.
    pub async fn rebase_merge_request(&self, input: &MergeRequestInput) -> Result<bool> {
        #[derive(Deserialize)]
        struct RebaseAccepted {
            #[serde(default)]
            rebase_in_progress: bool,
        }
        let path = format!(
            "{}/rebase",
            mr_path(&input.project_id, input.merge_request_iid)
        );
        let accepted: Option<RebaseAccepted> = self
            .request_json(Method::PUT, &path, &Vec::new(), None)
            .await?;
        Ok(accepted.map(|a| a.rebase_in_progress).unwrap_or(false))
    }

    pub async fn get_merge_request_diff(&self, input: &MergeRequestInput) -> Result<Vec<Diff>> {
        let path = format!(
            "{}/changes",
            mr_path(&input.project_id, input.merge_request_iid)
        );
        let envelope: Option<MergeRequestChangesEnvelope> = self.get(&path).await?;
        Ok(envelope.map(|e| e.changes).unwrap_or_default())
    }

    pub async fn list_merge_request_commits(
        &self,
        input: &MergeRequestPageInput,
    ) -> Result<Paginated<Commit>> {
        let path = format!(
            "{}/commits",
            mr_path(&input.project_id, input.merge_request_iid)
        );
        self.list(&path, input, &input.page).await
    }

    pub async fn list_merge_request_notes(
        &self,
        input: &MergeRequestPageInput,
    ) -> Result<Paginated<Note>> {
        let path = format!(
            "{}/notes",
            mr_path(&input.project_id, input.merge_request_iid)
        );
        self.list(&path, input, &input.page).await
    }

    pub async fn create_merge_request_note(
        &self,
        input: &CreateMergeRequestNoteInput,
    ) -> Result<Option<Note>> {
        let path = format!(
            "{}/notes",
            mr_path(&input.project_id, input.merge_request_iid)
        );
        self.send_body(Method::POST, &path, &input.note).await
    }
}
