use super::{project_path, GitLabClient};
use crate::error::Result;
use crate::http::encode_path_segment;
use crate::inputs::{
    BranchInput, CherryPickInput, CommitDiffInput, CommitInput, CompareInput, CreateBranchInput,
    CreateReleaseInput, CreateTagInput, DeleteFileInput, FileInput, ListBranchesInput,
    ListCommitsInput, ListReleasesInput, ListTagsInput, ProtectBranchInput, ReleaseInput,
    RepositoryTreeInput, TagInput, UpdateReleaseInput, WriteFileInput,
};
use crate::pagination::Paginated;
use crate::types::{
    Branch, Commit, Compare, Diff, FileCommit, FileContent, ProtectedBranch, Release, Tag,
    TreeItem,
};
use reqwest::Method;

const DEFAULT_FILE_REF: &str = "HEAD";

fn repo_path(project_id: &str, rest: &str) -> String {
    format!("{}/repository/{}", project_path(project_id), rest)
}

impl GitLabClient {
    // Branches

    pub async fn list_branches(&self, input: &ListBranchesInput) -> Result<Paginated<Branch>> {
        self.list(&repo_path(&input.project_id, "branches"), input, &input.page)
            .await
    }

    pub async fn get_branch(&self, input: &BranchInput) -> Result<Option<Branch>> {
        let rest = format!("branches/{}", encode_path_segment(&input.branch));
        self.get(&repo_path(&input.project_id, &rest)).await
    }

    pub async fn create_branch(&self, input: &CreateBranchInput) -> Result<Option<Branch>> {
        let query = vec![
            ("branch".to_string(), input.branch.clone()),
            ("ref".to_string(), input.git_ref.clone()),
        ];
        self.request_json(
            Method::POST,
            &repo_path(&input.project_id, "branches"),
            &query,
            None,
        )
        .await
    }

    pub async fn delete_branch(&self, input: &BranchInput) -> Result<()> {
        let rest = format!("branches/{}", encode_path_segment(&input.branch));
        self.delete(&repo_path(&input.project_id, &rest)).await
    }

    pub async fn protect_branch(&self, input: &ProtectBranchInput) -> Result<Option<ProtectedBranch>> {
        let path = format!("{}/protected_branches", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.rule).await
    }

    pub async fn unprotect_branch(&self, input: &BranchInput) -> Result<()> {
        let path = format!(
            "{}/protected_branches/{}",
            project_path(&input.project_id),
            encode_path_segment(&input.branch)
        );
        self.delete(&path).await
    }

    // Commits

    pub async fn list_commits(&self, input: &ListCommitsInput) -> Result<Paginated<Commit>> {
        self.list(&repo_path(&input.project_id, "commits"), input, &input.page)
            .await
    }

    pub async fn get_commit(&self, input: &CommitInput) -> Result<Option<Commit>> {
        let rest = format!("commits/{}", encode_path_segment(&input.sha));
        let query = match input.stats {
            Some(s) => vec![("stats".to_string(), s.to_string())],
            None => Vec::new(),
        };
        self.request_json(
            Method::GET,
            &repo_path(&input.project_id, &rest),
            &query,
            None,
        )
        .await
    }

    pub async fn get_commit_diff(&self, input: &CommitDiffInput) -> Result<Paginated<Diff>> {
        let rest = format!("commits/{}/diff", encode_path_segment(&input.sha));
        self.list(&repo_path(&input.project_id, &rest), input, &input.page)
            .await
    }

    pub async fn cherry_pick_commit(&self, input: &CherryPickInput) -> Result<Option<Commit>> {
        let rest = format!("commits/{}/cherry_pick", encode_path_segment(&input.sha));
        self.send_body(
            Method::POST,
            &repo_path(&input.project_id, &rest),
            &input.options,
        )
        .await
    }

    // Tags

    pub async fn list_tags(&self, input: &ListTagsInput) -> Result<Paginated<Tag>> {
        self.list(&repo_path(&input.project_id, "tags"), input, &input.page)
            .await
    }

    pub async fn get_tag(&self, input: &TagInput) -> Result<Option<Tag>> {
        let rest = format!("tags/{}", encode_path_segment(&input.tag_name));
        self.get(&repo_path(&input.project_id, &rest)).await
    }

    pub async fn create_tag(&self, input: &CreateTagInput) -> Result<Option<Tag>> {
        self.send_body(
            Method::POST,
            &repo_path(&input.project_id, "tags"),
            &input.tag,
        )
        .await
    }

    pub async fn delete_tag(&self, input: &TagInput) -> Result<()> {
        let rest = format!("tags/{}", encode_path_segment(&input.tag_name));
        self.delete(&repo_path(&input.project_id, &rest)).await
    }

    // Tree and compare

    pub async fn get_repository_tree(
        &self,
        input: &RepositoryTreeInput,
    ) -> Result<Paginated<TreeItem>> {
        self.list(&repo_path(&input.project_id, "tree"), input, &input.page)
            .await
    }

    pub async fn compare_refs(&self, input: &CompareInput) -> Result<Option<Compare>> {
        let query = crate::http::filter_query(input);
        self.request_json(
            Method::GET,
            &repo_path(&input.project_id, "compare"),
            &query,
            None,
        )
        .await
    }

    // Files

    fn file_path(project_id: &str, file_path: &str) -> String {
        repo_path(project_id, &format!("files/{}", encode_path_segment(file_path)))
    }

    fn file_ref(input: &FileInput) -> Vec<(String, String)> {
        let r = input.git_ref.as_deref().unwrap_or(DEFAULT_FILE_REF);
        vec![("ref".to_string(), r.to_string())]
    }

    pub async fn get_file(&self, input: &FileInput) -> Result<Option<FileContent>> {
        self.request_json(
            Method::GET,
            &Self::file_path(&input.project_id, &input.file_path),
            &Self::file_ref(input),
            None,
        )
        .await
    }

    /// Raw file body; not parsed as JSON.
    pub async fn get_file_raw(&self, input: &FileInput) -> Result<String> {
        let path = format!(
            "{}/raw",
            Self::file_path(&input.project_id, &input.file_path)
        );
        self.request_text(&path, &Self::file_ref(input)).await
    }

    pub async fn create_file(&self, input: &WriteFileInput) -> Result<Option<FileCommit>> {
        self.send_body(
            Method::POST,
            &Self::file_path(&input.project_id, &input.file_path),
            &input.file,
        )
        .await
    }

    pub async fn update_file(&self, input: &WriteFileInput) -> Result<Option<FileCommit>> {
        self.send_body(
            Method::PUT,
            &Self::file_path(&input.project_id, &input.file_path),
            &input.file,
        )
        .await
    }

    pub async fn delete_file(&self, input: &DeleteFileInput) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .send_body(
                Method::DELETE,
                &Self::file_path(&input.project_id, &input.file_path),
                &input.commit,
            )
            .await?;
        Ok(())
    }

    // Releases

    pub async fn list_releases(&self, input: &ListReleasesInput) -> Result<Paginated<Release>> {
        let path = format!("{}/releases", project_path(&input.project_id));
        self.list(&path, input, &input.page).await
    }

    fn release_path(project_id: &str, tag_name: &str) -> String {
        format!(
            "{}/releases/{}",
            project_path(project_id),
            encode_path_segment(tag_name)
        )
    }

    pub async fn get_release(&self, input: &ReleaseInput) -> Result<Option<Release>> {
        self.get(&Self::release_path(&input.project_id, &input.tag_name))
            .await
    }

    pub async fn create_release(&self, input: &CreateReleaseInput) -> Result<Option<Release>> {
        let path = format!("{}/releases", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.release).await
    }

    pub async fn update_release(&self, input: &UpdateReleaseInput) -> Result<Option<Release>> {
        self.send_body(
            Method::PUT,
            &Self::release_path(&input.project_id, &input.tag_name),
            &input.changes,
        )
        .await
    }

    pub async fn delete_release(&self, input: &ReleaseInput) -> Result<Option<Release>> {
        self.request_json(
            Method::DELETE,
            &Self::release_path(&input.project_id, &input.tag_name),
            &Vec::new(),
            None,
        )
        .await
    }
}
