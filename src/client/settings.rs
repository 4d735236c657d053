use super::{project_path, GitLabClient};
use crate::error::Result;
use crate::http::encode_path_segment;
use crate::inputs::{
    CreateVariableInput, CreateWebhookInput, ListProjectRunnersInput, ListRunnersInput,
    ProjectPageInput, UpdateVariableInput, UpdateWebhookInput, VariableInput, WebhookInput,
};
use crate::pagination::Paginated;
use crate::types::{Runner, Variable, Webhook};
use reqwest::Method;

fn variable_path(project_id: &str, key: &str) -> String {
    format!(
        "{}/variables/{}",
        project_path(project_id),
        encode_path_segment(key)
    )
}

// Variables sharing a key across environments are told apart by scope.
fn scope_filter(scope: &Option<String>) -> Vec<(String, String)> {
    match scope {
        Some(s) => vec![("filter[environment_scope]".to_string(), s.clone())],
        None => Vec::new(),
    }
}

fn hook_path(project_id: &str, hook_id: u64) -> String {
    format!("{}/hooks/{}", project_path(project_id), hook_id)
}

impl GitLabClient {
    // CI/CD variables

    pub async fn list_variables(&self, input: &ProjectPageInput) -> Result<Paginated<Variable>> {
        let path = format!("{}/variables", project_path(&input.project_id));
        self.list(&path, input, &input.page).await
    }

    pub async fn get_variable(&self, input: &VariableInput) -> Result<Option<Variable>> {
        self.request_json(
            Method::GET,
            &variable_path(&input.project_id, &input.key),
            &scope_filter(&input.environment_scope),
            None,
        )
        .await
    }

    pub async fn create_variable(&self, input: &CreateVariableInput) -> Result<Option<Variable>> {
        let path = format!("{}/variables", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.variable).await
    }

    pub async fn update_variable(&self, input: &UpdateVariableInput) -> Result<Option<Variable>> {
        let body = serde_json::to_value(&input.changes)?;
        self.request_json(
            Method::PUT,
            &variable_path(&input.project_id, &input.key),
            &scope_filter(&input.changes.environment_scope),
            Some(&body),
        )
        .await
    }

    pub async fn delete_variable(&self, input: &VariableInput) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .request_json(
                Method::DELETE,
                &variable_path(&input.project_id, &input.key),
                &scope_filter(&input.environment_scope),
                None,
            )
            .await?;
        Ok(())
    }

    // Webhooks

    pub async fn list_webhooks(&self, input: &ProjectPageInput) -> Result<Paginated<Webhook>> {
        let path = format!("{}/hooks", project_path(&input.project_id));
        self.list(&path, input, &input.page).await
    }

    pub async fn get_webhook(&self, input: &WebhookInput) -> Result<Option<Webhook>> {
        self.get(&hook_path(&input.project_id, input.hook_id)).await
    }

    pub async fn create_webhook(&self, input: &CreateWebhookInput) -> Result<Option<Webhook>> {
        let path = format!("{}/hooks", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.hook).await
    }

    pub async fn update_webhook(&self, input: &UpdateWebhookInput) -> Result<Option<Webhook>> {
        self.send_body(
            Method::PUT,
            &hook_path(&input.project_id, input.hook_id),
            &input.changes,
        )
        .await
    }

    pub async fn delete_webhook(&self, input: &WebhookInput) -> Result<()> {
        self.delete(&hook_path(&input.project_id, input.hook_id))
            .await
    }

    // Runners

    /// Runners owned by the caller.
    pub async fn list_runners(&self, input: &ListRunnersInput) -> Result<Paginated<Runner>> {
        self.list("/runners", input, &input.page).await
    }

    pub async fn list_project_runners(
        &self,
        input: &ListProjectRunnersInput,
    ) -> Result<Paginated<Runner>> {
        let path = format!("{}/runners", project_path(&input.project_id));
        self.list(&path, input, &input.page).await
    }

    pub async fn get_runner(&self, runner_id: u64) -> Result<Option<Runner>> {
        self.get(&format!("/runners/{}", runner_id)).await
    }
}
