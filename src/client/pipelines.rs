use super::{project_path, GitLabClient};
use crate::error::Result;
use crate::inputs::{
    CreatePipelineInput, JobInput, ListPipelineJobsInput, ListPipelinesInput,
    ListProjectJobsInput, PipelineInput,
};
use crate::pagination::Paginated;
use crate::types::{Job, Pipeline};
use reqwest::Method;

fn pipeline_path(project_id: &str, pipeline_id: u64) -> String {
    format!("{}/pipelines/{}", project_path(project_id), pipeline_id)
}

fn job_path(project_id: &str, job_id: u64) -> String {
    format!("{}/jobs/{}", project_path(project_id), job_id)
}

impl GitLabClient {
    // Pipelines

    pub async fn list_pipelines(&self, input: &ListPipelinesInput) -> Result<Paginated<Pipeline>> {
        let path = format!("{}/pipelines", project_path(&input.project_id));
        self.list(&path, input, &input.page).await
    }

    pub async fn get_pipeline(&self, input: &PipelineInput) -> Result<Option<Pipeline>> {
        self.get(&pipeline_path(&input.project_id, input.pipeline_id))
            .await
    }

    pub async fn create_pipeline(&self, input: &CreatePipelineInput) -> Result<Option<Pipeline>> {
        let path = format!("{}/pipeline", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.pipeline).await
    }

    pub async fn retry_pipeline(&self, input: &PipelineInput) -> Result<Option<Pipeline>> {
        let path = format!(
            "{}/retry",
            pipeline_path(&input.project_id, input.pipeline_id)
        );
        self.post_empty(&path).await
    }

    pub async fn cancel_pipeline(&self, input: &PipelineInput) -> Result<Option<Pipeline>> {
        let path = format!(
            "{}/cancel",
            pipeline_path(&input.project_id, input.pipeline_id)
        );
        self.post_empty(&path).await
    }

    pub async fn delete_pipeline(&self, input: &PipelineInput) -> Result<()> {
        self.delete(&pipeline_path(&input.project_id, input.pipeline_id))
            .await
    }

    // Jobs

    pub async fn list_pipeline_jobs(&self, input: &ListPipelineJobsInput) -> Result<Paginated<Job>> {
        let path = format!(
            "{}/jobs",
            pipeline_path(&input.project_id, input.pipeline_id)
        );
        self.list(&path, input, &input.page).await
    }

    pub async fn list_project_jobs(&self, input: &ListProjectJobsInput) -> Result<Paginated<Job>> {
        let path = format!("{}/jobs", project_path(&input.project_id));
        self.list(&path, input, &input.page).await
    }

    pub async fn get_job(&self, input: &JobInput) -> Result<Option<Job>> {
        self.get(&job_path(&input.project_id, input.job_id)).await
    }

    /// Job trace as plain text.
    pub async fn get_job_log(&self, input: &JobInput) -> Result<String> {
        let path = format!("{}/trace", job_path(&input.project_id, input.job_id));
        self.request_text(&path, &Vec::new()).await
    }

    pub async fn retry_job(&self, input: &JobInput) -> Result<Option<Job>> {
        let path = format!("{}/retry", job_path(&input.project_id, input.job_id));
        self.post_empty(&path).await
    }

    pub async fn cancel_job(&self, input: &JobInput) -> Result<Option<Job>> {
        let path = format!("{}/cancel", job_path(&input.project_id, input.job_id));
        self.post_empty(&path).await
    }

    /// Trigger a manual job.
    pub async fn play_job(&self, input: &JobInput) -> Result<Option<Job>> {
        let path = format!("{}/play", job_path(&input.project_id, input.job_id));
        self.post_empty(&path).await
    }
}
