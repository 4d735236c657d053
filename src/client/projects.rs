use super::{project_path, GitLabClient};
use crate::error::Result;
use crate::inputs::{CreateProjectInput, ForkProjectInput, ListProjectsInput, UpdateProjectInput};
use crate::pagination::Paginated;
use crate::types::Project;
use reqwest::Method;

impl GitLabClient {
    pub async fn list_projects(&self, input: &ListProjectsInput) -> Result<Paginated<Project>> {
        self.list("/projects", input, &input.page).await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        self.get(&project_path(project_id)).await
    }

    pub async fn create_project(&self, input: &CreateProjectInput) -> Result<Option<Project>> {
        self.send_body(Method::POST, "/projects", input).await
    }

    pub async fn update_project(&self, input: &UpdateProjectInput) -> Result<Option<Project>> {
        self.send_body(Method::PUT, &project_path(&input.project_id), &input.changes)
            .await
    }

    /// GitLab schedules the deletion and answers 202.
    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.delete(&project_path(project_id)).await
    }

    pub async fn fork_project(&self, input: &ForkProjectInput) -> Result<Option<Project>> {
        let path = format!("{}/fork", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.options).await
    }

    pub async fn archive_project(&self, project_id: &str) -> Result<Option<Project>> {
        self.post_empty(&format!("{}/archive", project_path(project_id)))
            .await
    }

    pub async fn unarchive_project(&self, project_id: &str) -> Result<Option<Project>> {
        self.post_empty(&format!("{}/unarchive", project_path(project_id)))
            .await
    }
}
