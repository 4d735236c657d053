use super::{project_path, GitLabClient};
use crate::error::Result;
use crate::http::encode_path_segment;
use crate::inputs::{
    CreateIssueInput, CreateIssueNoteInput, CreateLabelInput, IssueInput, IssueNoteInput,
    IssuePageInput, LabelInput, ListIssuesInput, ListLabelsInput, UpdateIssueInput,
    UpdateIssueNoteInput, UpdateLabelInput,
};
use crate::pagination::Paginated;
use crate::types::{Issue, Label, Note};
use reqwest::Method;
use serde_json::json;

fn issue_path(project_id: &str, iid: u64) -> String {
    format!("{}/issues/{}", project_path(project_id), iid)
}

fn label_path(project_id: &str, label_id: &str) -> String {
    format!(
        "{}/labels/{}",
        project_path(project_id),
        encode_path_segment(label_id)
    )
}

impl GitLabClient {
    // Issues

    pub async fn list_issues(&self, input: &ListIssuesInput) -> Result<Paginated<Issue>> {
        let path = match &input.project_id {
            Some(id) => format!("{}/issues", project_path(id)),
            None => "/issues".to_string(),
        };
        self.list(&path, input, &input.page).await
    }

    pub async fn get_issue(&self, input: &IssueInput) -> Result<Option<Issue>> {
        self.get(&issue_path(&input.project_id, input.issue_iid))
            .await
    }

    pub async fn create_issue(&self, input: &CreateIssueInput) -> Result<Option<Issue>> {
        let path = format!("{}/issues", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.issue).await
    }

    pub async fn update_issue(&self, input: &UpdateIssueInput) -> Result<Option<Issue>> {
        self.send_body(
            Method::PUT,
            &issue_path(&input.project_id, input.issue_iid),
            &input.changes,
        )
        .await
    }

    pub async fn delete_issue(&self, input: &IssueInput) -> Result<()> {
        self.delete(&issue_path(&input.project_id, input.issue_iid))
            .await
    }

    // Issue notes

    pub async fn list_issue_notes(&self, input: &IssuePageInput) -> Result<Paginated<Note>> {
        let path = format!("{}/notes", issue_path(&input.project_id, input.issue_iid));
        self.list(&path, input, &input.page).await
    }

    pub async fn create_issue_note(&self, input: &CreateIssueNoteInput) -> Result<Option<Note>> {
        let path = format!("{}/notes", issue_path(&input.project_id, input.issue_iid));
        self.send_body(Method::POST, &path, &input.note).await
    }

    pub async fn update_issue_note(&self, input: &UpdateIssueNoteInput) -> Result<Option<Note>> {
        let path = format!(
            "{}/notes/{}",
            issue_path(&input.project_id, input.issue_iid),
            input.note_id
        );
        self.send_body(Method::PUT, &path, &json!({ "body": input.body }))
            .await
    }

    pub async fn delete_issue_note(&self, input: &IssueNoteInput) -> Result<()> {
        let path = format!(
            "{}/notes/{}",
            issue_path(&input.project_id, input.issue_iid),
            input.note_id
        );
        self.delete(&path).await
    }

    // Labels

    pub async fn list_labels(&self, input: &ListLabelsInput) -> Result<Paginated<Label>> {
        let path = format!("{}/labels", project_path(&input.project_id));
        self.list(&path, input, &input.page).await
    }

    pub async fn create_label(&self, input: &CreateLabelInput) -> Result<Option<Label>> {
        let path = format!("{}/labels", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.label).await
    }

    pub async fn update_label(&self, input: &UpdateLabelInput) -> Result<Option<Label>> {
        self.send_body(
            Method::PUT,
            &label_path(&input.project_id, &input.label_id),
            &input.changes,
        )
        .await
    }

    pub async fn delete_label(&self, input: &LabelInput) -> Result<()> {
        self.delete(&label_path(&input.project_id, &input.label_id))
            .await
    }
}
