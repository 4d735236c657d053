use super::{group_path, project_path, GitLabClient};
use crate::error::Result;
use crate::inputs::{
    AddMemberInput, ListGroupMembersInput, ListGroupProjectsInput, ListGroupsInput,
    ListProjectMembersInput, ListSubgroupsInput, ListUsersInput, MemberInput, UpdateMemberInput,
};
use crate::pagination::Paginated;
use crate::types::{Group, Member, Project, User};
use reqwest::Method;

fn members_path(base: String, include_inherited: Option<bool>) -> String {
    if include_inherited.unwrap_or(false) {
        format!("{}/members/all", base)
    } else {
        format!("{}/members", base)
    }
}

impl GitLabClient {
    // Groups

    pub async fn list_groups(&self, input: &ListGroupsInput) -> Result<Paginated<Group>> {
        self.list("/groups", input, &input.page).await
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>> {
        self.get(&group_path(group_id)).await
    }

    pub async fn list_group_projects(
        &self,
        input: &ListGroupProjectsInput,
    ) -> Result<Paginated<Project>> {
        let path = format!("{}/projects", group_path(&input.group_id));
        self.list(&path, input, &input.page).await
    }

    pub async fn list_subgroups(&self, input: &ListSubgroupsInput) -> Result<Paginated<Group>> {
        let path = format!("{}/subgroups", group_path(&input.group_id));
        self.list(&path, input, &input.page).await
    }

    // Users

    pub async fn get_current_user(&self) -> Result<Option<User>> {
        self.get("/user").await
    }

    pub async fn get_user(&self, user_id: u64) -> Result<Option<User>> {
        self.get(&format!("/users/{}", user_id)).await
    }

    pub async fn list_users(&self, input: &ListUsersInput) -> Result<Paginated<User>> {
        self.list("/users", input, &input.page).await
    }

    // Members

    pub async fn list_project_members(
        &self,
        input: &ListProjectMembersInput,
    ) -> Result<Paginated<Member>> {
        let path = members_path(project_path(&input.project_id), input.include_inherited);
        self.list(&path, input, &input.page).await
    }

    pub async fn list_group_members(
        &self,
        input: &ListGroupMembersInput,
    ) -> Result<Paginated<Member>> {
        let path = members_path(group_path(&input.group_id), input.include_inherited);
        self.list(&path, input, &input.page).await
    }

    pub async fn add_project_member(&self, input: &AddMemberInput) -> Result<Option<Member>> {
        let path = format!("{}/members", project_path(&input.project_id));
        self.send_body(Method::POST, &path, &input.member).await
    }

    pub async fn update_project_member(&self, input: &UpdateMemberInput) -> Result<Option<Member>> {
        let path = format!(
            "{}/members/{}",
            project_path(&input.project_id),
            input.user_id
        );
        self.send_body(Method::PUT, &path, &input.changes).await
    }

    pub async fn remove_project_member(&self, input: &MemberInput) -> Result<()> {
        let path = format!(
            "{}/members/{}",
            project_path(&input.project_id),
            input.user_id
        );
        self.delete(&path).await
    }
}
