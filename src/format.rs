//! Markdown renderings of GitLab entities for the text block of tool results.
//!
//! Optional fields are printed only when present. Lists end with a
//! pagination footer so agents know whether to ask for the next page.

use crate::pagination::Paginated;
use crate::types::*;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

pub trait Markdown {
    /// One list line.
    fn summary(&self) -> String;

    /// Full rendering for single-resource results.
    fn detail(&self) -> String {
        self.summary()
    }
}

/// `YYYY-MM-DD HH:MM UTC` for RFC 3339 timestamps; anything else is shown
/// unchanged (GitLab sends bare dates for due dates).
pub fn format_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => t.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn field(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        out.push_str(&format!("- **{}:** {}\n", name, v));
    }
}

fn time_field(out: &mut String, name: &str, value: Option<&String>) {
    if let Some(v) = value {
        field(out, name, Some(&format_time(v)));
    }
}

fn flag_field(out: &mut String, name: &str, value: Option<bool>) {
    if let Some(v) = value {
        field(out, name, Some(if v { "yes" } else { "no" }));
    }
}

fn users(list: &[User]) -> Option<String> {
    if list.is_empty() {
        return None;
    }
    Some(
        list.iter()
            .map(|u| format!("@{}", u.username))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn joined(list: &[String]) -> Option<String> {
    if list.is_empty() {
        None
    } else {
        Some(list.join(", "))
    }
}

fn description(out: &mut String, text: Option<&String>) {
    if let Some(d) = text.filter(|d| !d.trim().is_empty()) {
        out.push('\n');
        out.push_str(d.trim_end());
        out.push('\n');
    }
}

/// List rendering with a header line and pagination footer.
pub fn render_list<T: Markdown>(title: &str, page: &Paginated<T>) -> String {
    let mut out = format!("## {}\n\n", title);
    if page.is_empty() {
        out.push_str("_No results._\n");
    } else {
        for item in &page.items {
            out.push_str("- ");
            out.push_str(&item.summary());
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(&pagination_footer(page));
    out
}

pub fn pagination_footer<T>(page: &Paginated<T>) -> String {
    let mut parts = vec![match page.total {
        Some(total) => format!("Showing {} of {}", page.count, total),
        None => format!("Showing {}", page.count),
    }];
    match (page.page, page.total_pages) {
        (Some(p), Some(tp)) => parts.push(format!("page {} of {}", p, tp)),
        (Some(p), None) => parts.push(format!("page {}", p)),
        _ => {}
    }
    if let Some(next) = page.next_page {
        parts.push(format!("next page: {}", next));
    }
    format!("_{}_\n", parts.join(" · "))
}

/// Plain bullet list for results GitLab does not paginate.
pub fn render_items<T: Markdown>(title: &str, items: &[T]) -> String {
    let mut out = format!("## {}\n\n", title);
    if items.is_empty() {
        out.push_str("_No results._\n");
    }
    for item in items {
        out.push_str("- ");
        out.push_str(&item.summary());
        out.push('\n');
    }
    out
}

impl Markdown for User {
    fn summary(&self) -> String {
        match &self.name {
            Some(n) => format!("@{} ({}) #{}", self.username, n, self.id),
            None => format!("@{} #{}", self.username, self.id),
        }
    }

    fn detail(&self) -> String {
        let mut out = format!("### @{}\n\n", self.username);
        field(&mut out, "ID", Some(&self.id.to_string()));
        field(&mut out, "Name", self.name.as_deref());
        field(&mut out, "State", self.state.as_deref());
        field(&mut out, "Email", self.email.as_deref());
        flag_field(&mut out, "Admin", self.is_admin);
        time_field(&mut out, "Created", self.created_at.as_ref());
        field(&mut out, "URL", self.web_url.as_deref());
        description(&mut out, self.bio.as_ref());
        out
    }
}

impl Markdown for Project {
    fn summary(&self) -> String {
        let path = self.path_with_namespace.as_deref().unwrap_or(&self.name);
        let mut s = format!("**{}** (#{})", path, self.id);
        if let Some(v) = &self.visibility {
            s.push_str(&format!(" [{}]", v));
        }
        if self.archived == Some(true) {
            s.push_str(" archived");
        }
        s
    }

    fn detail(&self) -> String {
        let title = self.path_with_namespace.as_deref().unwrap_or(&self.name);
        let mut out = format!("### {}\n\n", title);
        field(&mut out, "ID", Some(&self.id.to_string()));
        field(&mut out, "Visibility", self.visibility.as_deref());
        field(&mut out, "Default branch", self.default_branch.as_deref());
        flag_field(&mut out, "Archived", self.archived);
        field(&mut out, "Stars", self.star_count.map(|n| n.to_string()).as_deref());
        field(&mut out, "Forks", self.forks_count.map(|n| n.to_string()).as_deref());
        field(
            &mut out,
            "Open issues",
            self.open_issues_count.map(|n| n.to_string()).as_deref(),
        );
        field(&mut out, "Topics", joined(&self.topics).as_deref());
        time_field(&mut out, "Created", self.created_at.as_ref());
        time_field(&mut out, "Last activity", self.last_activity_at.as_ref());
        field(&mut out, "Clone (HTTP)", self.http_url_to_repo.as_deref());
        field(&mut out, "Clone (SSH)", self.ssh_url_to_repo.as_deref());
        field(&mut out, "URL", self.web_url.as_deref());
        description(&mut out, self.description.as_ref());
        out
    }
}

impl Markdown for Branch {
    fn summary(&self) -> String {
        let mut s = format!("`{}`", self.name);
        if self.default == Some(true) {
            s.push_str(" (default)");
        }
        if self.protected == Some(true) {
            s.push_str(" protected");
        }
        if let Some(c) = &self.commit {
            s.push_str(&format!(" at {}", c.short_id.as_deref().unwrap_or(&c.id)));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### Branch `{}`\n\n", self.name);
        flag_field(&mut out, "Default", self.default);
        flag_field(&mut out, "Protected", self.protected);
        flag_field(&mut out, "Merged", self.merged);
        flag_field(&mut out, "Developers can push", self.developers_can_push);
        flag_field(&mut out, "Developers can merge", self.developers_can_merge);
        if let Some(c) = &self.commit {
            field(&mut out, "Commit", Some(&c.summary()));
        }
        field(&mut out, "URL", self.web_url.as_deref());
        out
    }
}

impl Markdown for ProtectedBranch {
    fn summary(&self) -> String {
        let mut s = format!("`{}` protected", self.name);
        if self.allow_force_push == Some(true) {
            s.push_str(", force push allowed");
        }
        if self.code_owner_approval_required == Some(true) {
            s.push_str(", code owner approval required");
        }
        s
    }
}

impl Markdown for Commit {
    fn summary(&self) -> String {
        let sha = self.short_id.as_deref().unwrap_or(&self.id);
        let title = self.title.as_deref().unwrap_or("");
        let mut s = format!("`{}` {}", sha, title);
        if let Some(a) = &self.author_name {
            s.push_str(&format!(" ({})", a));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### Commit {}\n\n", self.id);
        field(&mut out, "Title", self.title.as_deref());
        match (&self.author_name, &self.author_email) {
            (Some(n), Some(e)) => field(&mut out, "Author", Some(&format!("{} <{}>", n, e))),
            (Some(n), None) => field(&mut out, "Author", Some(n)),
            _ => {}
        }
        time_field(&mut out, "Authored", self.authored_date.as_ref());
        field(&mut out, "Committer", self.committer_name.as_deref());
        time_field(&mut out, "Committed", self.committed_date.as_ref());
        field(&mut out, "Parents", joined(&self.parent_ids).as_deref());
        if let Some(st) = &self.stats {
            field(
                &mut out,
                "Stats",
                Some(&format!("+{} -{} ({} total)", st.additions, st.deletions, st.total)),
            );
        }
        field(&mut out, "URL", self.web_url.as_deref());
        if let Some(m) = &self.message {
            if Some(m.trim()) != self.title.as_deref() {
                description(&mut out, Some(m));
            }
        }
        out
    }
}

impl Markdown for Tag {
    fn summary(&self) -> String {
        let mut s = format!("`{}`", self.name);
        if let Some(c) = &self.commit {
            s.push_str(&format!(" -> {}", c.short_id.as_deref().unwrap_or(&c.id)));
        }
        if self.protected == Some(true) {
            s.push_str(" protected");
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### Tag `{}`\n\n", self.name);
        field(&mut out, "Target", self.target.as_deref());
        flag_field(&mut out, "Protected", self.protected);
        time_field(&mut out, "Created", self.created_at.as_ref());
        if let Some(c) = &self.commit {
            field(&mut out, "Commit", Some(&c.summary()));
        }
        description(&mut out, self.message.as_ref());
        out
    }
}

impl Markdown for MergeRequest {
    fn summary(&self) -> String {
        let mut s = format!("!{} **{}** [{}]", self.iid, self.title, self.state);
        if let (Some(src), Some(dst)) = (&self.source_branch, &self.target_branch) {
            s.push_str(&format!(" `{}` -> `{}`", src, dst));
        }
        if let Some(a) = &self.author {
            s.push_str(&format!(" by @{}", a.username));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### !{} {}\n\n", self.iid, self.title);
        field(&mut out, "State", Some(&self.state));
        if let (Some(src), Some(dst)) = (&self.source_branch, &self.target_branch) {
            field(&mut out, "Branches", Some(&format!("`{}` -> `{}`", src, dst)));
        }
        field(
            &mut out,
            "Author",
            self.author.as_ref().map(|a| format!("@{}", a.username)).as_deref(),
        );
        field(&mut out, "Assignees", users(&self.assignees).as_deref());
        field(&mut out, "Reviewers", users(&self.reviewers).as_deref());
        field(&mut out, "Labels", joined(&self.labels).as_deref());
        field(
            &mut out,
            "Milestone",
            self.milestone.as_ref().map(|m| m.title.as_str()),
        );
        flag_field(&mut out, "Draft", self.draft);
        field(
            &mut out,
            "Merge status",
            self.detailed_merge_status
                .as_deref()
                .or(self.merge_status.as_deref()),
        );
        flag_field(&mut out, "Conflicts", self.has_conflicts);
        field(&mut out, "Head SHA", self.sha.as_deref());
        field(&mut out, "Merge commit", self.merge_commit_sha.as_deref());
        field(
            &mut out,
            "Merged by",
            self.merged_by.as_ref().map(|u| format!("@{}", u.username)).as_deref(),
        );
        time_field(&mut out, "Created", self.created_at.as_ref());
        time_field(&mut out, "Updated", self.updated_at.as_ref());
        time_field(&mut out, "Merged", self.merged_at.as_ref());
        time_field(&mut out, "Closed", self.closed_at.as_ref());
        field(
            &mut out,
            "Comments",
            self.user_notes_count.map(|n| n.to_string()).as_deref(),
        );
        field(&mut out, "URL", self.web_url.as_deref());
        description(&mut out, self.description.as_ref());
        out
    }
}

impl Markdown for Issue {
    fn summary(&self) -> String {
        let mut s = format!("#{} **{}** [{}]", self.iid, self.title, self.state);
        if !self.labels.is_empty() {
            s.push_str(&format!(" ({})", self.labels.join(", ")));
        }
        if let Some(a) = users(&self.assignees) {
            s.push_str(&format!(" -> {}", a));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### #{} {}\n\n", self.iid, self.title);
        field(&mut out, "State", Some(&self.state));
        field(
            &mut out,
            "Author",
            self.author.as_ref().map(|a| format!("@{}", a.username)).as_deref(),
        );
        field(&mut out, "Assignees", users(&self.assignees).as_deref());
        field(&mut out, "Labels", joined(&self.labels).as_deref());
        field(
            &mut out,
            "Milestone",
            self.milestone.as_ref().map(|m| m.title.as_str()),
        );
        flag_field(&mut out, "Confidential", self.confidential);
        field(&mut out, "Due", self.due_date.as_deref());
        field(&mut out, "Weight", self.weight.map(|w| w.to_string()).as_deref());
        time_field(&mut out, "Created", self.created_at.as_ref());
        time_field(&mut out, "Updated", self.updated_at.as_ref());
        time_field(&mut out, "Closed", self.closed_at.as_ref());
        field(
            &mut out,
            "Comments",
            self.user_notes_count.map(|n| n.to_string()).as_deref(),
        );
        field(&mut out, "URL", self.web_url.as_deref());
        description(&mut out, self.description.as_ref());
        out
    }
}

impl Markdown for Note {
    fn summary(&self) -> String {
        let who = self
            .author
            .as_ref()
            .map(|a| format!("@{}", a.username))
            .unwrap_or_else(|| "unknown".to_string());
        let when = self
            .created_at
            .as_deref()
            .map(format_time)
            .unwrap_or_default();
        let mut s = format!("**{}** {} (note {})", who, when, self.id);
        if self.system == Some(true) {
            s.push_str(" system");
        }
        if self.internal == Some(true) {
            s.push_str(" internal");
        }
        s.push_str(":\n  ");
        s.push_str(&self.body.trim().replace('\n', "\n  "));
        s
    }
}

impl Markdown for Label {
    fn summary(&self) -> String {
        let mut s = format!("**{}**", self.name);
        if let Some(c) = &self.color {
            s.push_str(&format!(" `{}`", c));
        }
        if let Some(d) = self.description.as_deref().filter(|d| !d.is_empty()) {
            s.push_str(&format!(": {}", d));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### Label {}\n\n", self.name);
        field(&mut out, "ID", Some(&self.id.to_string()));
        field(&mut out, "Color", self.color.as_deref());
        field(&mut out, "Priority", self.priority.map(|p| p.to_string()).as_deref());
        field(
            &mut out,
            "Open issues",
            self.open_issues_count.map(|n| n.to_string()).as_deref(),
        );
        field(
            &mut out,
            "Open merge requests",
            self.open_merge_requests_count.map(|n| n.to_string()).as_deref(),
        );
        description(&mut out, self.description.as_ref());
        out
    }
}

impl Markdown for Pipeline {
    fn summary(&self) -> String {
        let mut s = format!("Pipeline #{} **{}**", self.id, self.status);
        if let Some(r) = &self.ref_name {
            s.push_str(&format!(" on `{}`", r));
        }
        if let Some(sha) = &self.sha {
            s.push_str(&format!(" ({})", &sha[..sha.len().min(8)]));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### Pipeline #{}\n\n", self.id);
        field(&mut out, "Status", Some(&self.status));
        field(&mut out, "Ref", self.ref_name.as_deref());
        field(&mut out, "SHA", self.sha.as_deref());
        field(&mut out, "Source", self.source.as_deref());
        field(
            &mut out,
            "Triggered by",
            self.user.as_ref().map(|u| format!("@{}", u.username)).as_deref(),
        );
        field(
            &mut out,
            "Duration",
            self.duration.map(|d| format!("{:.0}s", d)).as_deref(),
        );
        time_field(&mut out, "Created", self.created_at.as_ref());
        time_field(&mut out, "Started", self.started_at.as_ref());
        time_field(&mut out, "Finished", self.finished_at.as_ref());
        field(&mut out, "URL", self.web_url.as_deref());
        out
    }
}

impl Markdown for Job {
    fn summary(&self) -> String {
        let mut s = format!("Job #{} **{}** [{}]", self.id, self.name, self.status);
        if let Some(stage) = &self.stage {
            s.push_str(&format!(" stage `{}`", stage));
        }
        if let Some(d) = self.duration {
            s.push_str(&format!(" {:.0}s", d));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### Job #{} {}\n\n", self.id, self.name);
        field(&mut out, "Status", Some(&self.status));
        field(&mut out, "Stage", self.stage.as_deref());
        field(&mut out, "Ref", self.ref_name.as_deref());
        field(
            &mut out,
            "Pipeline",
            self.pipeline.as_ref().map(|p| format!("#{}", p.id)).as_deref(),
        );
        flag_field(&mut out, "Allow failure", self.allow_failure);
        field(&mut out, "Failure reason", self.failure_reason.as_deref());
        field(
            &mut out,
            "Duration",
            self.duration.map(|d| format!("{:.0}s", d)).as_deref(),
        );
        field(
            &mut out,
            "Queued",
            self.queued_duration.map(|d| format!("{:.0}s", d)).as_deref(),
        );
        field(
            &mut out,
            "User",
            self.user.as_ref().map(|u| format!("@{}", u.username)).as_deref(),
        );
        time_field(&mut out, "Created", self.created_at.as_ref());
        time_field(&mut out, "Started", self.started_at.as_ref());
        time_field(&mut out, "Finished", self.finished_at.as_ref());
        field(&mut out, "URL", self.web_url.as_deref());
        out
    }
}

impl Markdown for Group {
    fn summary(&self) -> String {
        let path = self.full_path.as_deref().unwrap_or(&self.path);
        let mut s = format!("**{}** (#{})", path, self.id);
        if let Some(v) = &self.visibility {
            s.push_str(&format!(" [{}]", v));
        }
        s
    }

    fn detail(&self) -> String {
        let title = self.full_name.as_deref().unwrap_or(&self.name);
        let mut out = format!("### {}\n\n", title);
        field(&mut out, "ID", Some(&self.id.to_string()));
        field(&mut out, "Path", self.full_path.as_deref().or(Some(self.path.as_str())));
        field(&mut out, "Visibility", self.visibility.as_deref());
        field(&mut out, "Parent", self.parent_id.map(|p| p.to_string()).as_deref());
        time_field(&mut out, "Created", self.created_at.as_ref());
        field(&mut out, "URL", self.web_url.as_deref());
        description(&mut out, self.description.as_ref());
        out
    }
}

impl Markdown for Release {
    fn summary(&self) -> String {
        let mut s = format!("`{}`", self.tag_name);
        if let Some(n) = self.name.as_deref().filter(|n| *n != self.tag_name) {
            s.push_str(&format!(" {}", n));
        }
        if let Some(at) = &self.released_at {
            s.push_str(&format!(" released {}", format_time(at)));
        }
        s
    }

    fn detail(&self) -> String {
        let title = self.name.as_deref().unwrap_or(&self.tag_name);
        let mut out = format!("### Release {}\n\n", title);
        field(&mut out, "Tag", Some(&self.tag_name));
        field(
            &mut out,
            "Author",
            self.author.as_ref().map(|a| format!("@{}", a.username)).as_deref(),
        );
        if let Some(c) = &self.commit {
            field(&mut out, "Commit", Some(&c.summary()));
        }
        time_field(&mut out, "Created", self.created_at.as_ref());
        time_field(&mut out, "Released", self.released_at.as_ref());
        if let Some(assets) = &self.assets {
            for link in &assets.links {
                field(&mut out, "Asset", Some(&format!("[{}]({})", link.name, link.url)));
            }
        }
        description(&mut out, self.description.as_ref());
        out
    }
}

/// Decoded file text, or `None` for binary content.
pub fn decode_file_content(file: &FileContent) -> Option<String> {
    let content = file.content.as_deref()?;
    if file.encoding.as_deref() != Some("base64") {
        return Some(content.to_string());
    }
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(cleaned).ok()?;
    String::from_utf8(bytes).ok()
}

impl Markdown for FileContent {
    fn summary(&self) -> String {
        format!("`{}`", self.file_path)
    }

    fn detail(&self) -> String {
        let mut out = format!("### {}\n\n", self.file_path);
        field(&mut out, "Ref", self.ref_name.as_deref());
        field(&mut out, "Size", self.size.map(|s| format!("{} bytes", s)).as_deref());
        field(&mut out, "Last commit", self.last_commit_id.as_deref());
        match decode_file_content(self) {
            Some(text) => {
                out.push_str("\n```\n");
                out.push_str(&text);
                if !text.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("```\n");
            }
            None if self.content.is_some() => out.push_str("\n_Binary content not shown._\n"),
            None => {}
        }
        out
    }
}

impl Markdown for FileCommit {
    fn summary(&self) -> String {
        match &self.branch {
            Some(b) => format!("`{}` committed to `{}`", self.file_path, b),
            None => format!("`{}` committed", self.file_path),
        }
    }
}

impl Markdown for TreeItem {
    fn summary(&self) -> String {
        let marker = if self.item_type == "tree" { "/" } else { "" };
        format!("`{}{}` ({})", self.path, marker, self.item_type)
    }
}

impl Markdown for Diff {
    fn summary(&self) -> String {
        let change = if self.new_file {
            "added"
        } else if self.deleted_file {
            "deleted"
        } else if self.renamed_file {
            "renamed"
        } else {
            "modified"
        };
        if self.renamed_file {
            format!("`{}` -> `{}` ({})", self.old_path, self.new_path, change)
        } else {
            format!("`{}` ({})", self.new_path, change)
        }
    }

    fn detail(&self) -> String {
        let mut out = format!("#### {}\n", self.summary());
        if !self.diff.is_empty() {
            out.push_str("\n```diff\n");
            out.push_str(&self.diff);
            if !self.diff.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out
    }
}

/// Diff set with every patch inline.
pub fn render_diffs(title: &str, diffs: &[Diff]) -> String {
    let mut out = format!("## {}\n\n", title);
    if diffs.is_empty() {
        out.push_str("_No changes._\n");
    }
    for d in diffs {
        out.push_str(&d.detail());
        out.push('\n');
    }
    out
}

impl Markdown for Compare {
    fn summary(&self) -> String {
        format!("{} commits, {} files changed", self.commits.len(), self.diffs.len())
    }

    fn detail(&self) -> String {
        let mut out = format!("### Comparison\n\n{}\n", self.summary());
        if self.compare_same_ref == Some(true) {
            out.push_str("\n_Both refs point at the same commit._\n");
        }
        if self.compare_timeout == Some(true) {
            out.push_str("\n_GitLab timed out; the result may be incomplete._\n");
        }
        if !self.commits.is_empty() {
            out.push('\n');
            out.push_str(&render_items("Commits", &self.commits));
        }
        if !self.diffs.is_empty() {
            out.push('\n');
            out.push_str(&render_diffs("Changes", &self.diffs));
        }
        out
    }
}

impl Markdown for Member {
    fn summary(&self) -> String {
        let mut s = format!(
            "@{} {} ({})",
            self.username,
            access_level_name(self.access_level),
            self.access_level
        );
        if let Some(exp) = &self.expires_at {
            s.push_str(&format!(" expires {}", exp));
        }
        s
    }
}

impl Markdown for Variable {
    fn summary(&self) -> String {
        let mut s = format!("`{}`", self.key);
        if let Some(scope) = &self.environment_scope {
            s.push_str(&format!(" scope `{}`", scope));
        }
        let mut tags = Vec::new();
        if self.protected == Some(true) {
            tags.push("protected");
        }
        if self.masked == Some(true) {
            tags.push("masked");
        }
        if !tags.is_empty() {
            s.push_str(&format!(" [{}]", tags.join(", ")));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### Variable `{}`\n\n", self.key);
        let value = if self.masked == Some(true) {
            Some("(masked)")
        } else {
            self.value.as_deref()
        };
        field(&mut out, "Value", value);
        field(&mut out, "Type", self.variable_type.as_deref());
        field(&mut out, "Scope", self.environment_scope.as_deref());
        flag_field(&mut out, "Protected", self.protected);
        flag_field(&mut out, "Masked", self.masked);
        flag_field(&mut out, "Raw", self.raw);
        description(&mut out, self.description.as_ref());
        out
    }
}

impl Markdown for Webhook {
    fn summary(&self) -> String {
        let events: Vec<&str> = [
            (self.push_events, "push"),
            (self.issues_events, "issues"),
            (self.merge_requests_events, "merge_requests"),
            (self.tag_push_events, "tag_push"),
            (self.note_events, "note"),
            (self.pipeline_events, "pipeline"),
            (self.job_events, "job"),
            (self.releases_events, "releases"),
        ]
        .iter()
        .filter(|(on, _)| *on == Some(true))
        .map(|(_, name)| *name)
        .collect();
        if events.is_empty() {
            format!("Hook #{} {}", self.id, self.url)
        } else {
            format!("Hook #{} {} ({})", self.id, self.url, events.join(", "))
        }
    }

    fn detail(&self) -> String {
        let mut out = format!("### {}\n\n", self.summary());
        flag_field(&mut out, "SSL verification", self.enable_ssl_verification);
        time_field(&mut out, "Created", self.created_at.as_ref());
        out
    }
}

impl Markdown for Runner {
    fn summary(&self) -> String {
        let label = self
            .description
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("runner");
        let mut s = format!("Runner #{} {}", self.id, label);
        if let Some(st) = &self.status {
            s.push_str(&format!(" [{}]", st));
        }
        if let Some(t) = &self.runner_type {
            s.push_str(&format!(" {}", t));
        }
        s
    }

    fn detail(&self) -> String {
        let mut out = format!("### {}\n\n", self.summary());
        flag_field(&mut out, "Paused", self.paused);
        flag_field(&mut out, "Shared", self.is_shared);
        flag_field(&mut out, "Online", self.online);
        field(&mut out, "IP", self.ip_address.as_deref());
        field(&mut out, "Tags", joined(&self.tag_list).as_deref());
        time_field(&mut out, "Last contact", self.contacted_at.as_ref());
        out
    }
}

impl Markdown for ConnectionStatus {
    fn summary(&self) -> String {
        if self.connected {
            format!("Connected: {}", self.message)
        } else {
            format!("Not connected: {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PaginationMeta;

    fn issue() -> Issue {
        serde_json::from_value(serde_json::json!({
            "id": 10, "iid": 3, "title": "Crash on save", "state": "opened",
            "labels": ["bug"], "created_at": "2024-03-05T10:20:30.000Z",
            "assignees": [{"id": 1, "username": "alice"}]
        }))
        .unwrap()
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_time("2024-03-05T10:20:30.000Z"), "2024-03-05 10:20 UTC");
        assert_eq!(format_time("2024-03-05T12:20:30+02:00"), "2024-03-05 10:20 UTC");
        assert_eq!(format_time("2024-03-05"), "2024-03-05");
    }

    #[test]
    fn issue_detail_skips_absent_fields() {
        let text = issue().detail();
        assert!(text.contains("### #3 Crash on save"));
        assert!(text.contains("- **Assignees:** @alice"));
        assert!(text.contains("- **Created:** 2024-03-05 10:20 UTC"));
        assert!(!text.contains("Milestone"));
        assert!(!text.contains("Due"));
    }

    #[test]
    fn list_footer_reports_totals_and_next_page() {
        let page = Paginated::from_meta(
            vec![issue()],
            PaginationMeta {
                total: Some(42),
                total_pages: Some(3),
                page: Some(2),
                next_page: Some(3),
                ..Default::default()
            },
        );
        let text = render_list("Issues", &page);
        assert!(text.starts_with("## Issues\n\n- #3 **Crash on save** [opened]"));
        assert!(text.contains("_Showing 1 of 42 · page 2 of 3 · next page: 3_"));
    }

    #[test]
    fn empty_list_says_so() {
        let page: Paginated<Issue> = Paginated::from_items(Vec::new(), false);
        let text = render_list("Issues", &page);
        assert!(text.contains("_No results._"));
        assert!(text.contains("_Showing 0_"));
    }

    #[test]
    fn base64_file_content_is_decoded() {
        let file: FileContent = serde_json::from_value(serde_json::json!({
            "file_name": "README.md", "file_path": "README.md",
            "encoding": "base64", "content": "aGVsbG8K", "ref": "main"
        }))
        .unwrap();
        assert_eq!(decode_file_content(&file).as_deref(), Some("hello\n"));
        assert!(file.detail().contains("```\nhello\n```"));
    }

    #[test]
    fn masked_variable_value_is_hidden() {
        let v: Variable = serde_json::from_value(serde_json::json!({
            "key": "TOKEN", "value": "s3cret", "masked": true
        }))
        .unwrap();
        let text = v.detail();
        assert!(text.contains("(masked)"));
        assert!(!text.contains("s3cret"));
    }
}
