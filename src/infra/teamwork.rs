use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ticket::{TicketId, TicketSummary};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct TeamworkClient {
    http: Client,
    api_root: String,
    api_key: String,
}

impl TeamworkClient {
    pub fn new(api_root: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_root,
            api_key,
        }
    }

    /// Teamwork takes the API key as the basic-auth user with any password.
    fn auth_header(api_key: &str) -> String {
        let credentials = format!("{api_key}:xxx");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn task_endpoint(api_root: &str, id: TicketId) -> String {
        format!("{}/tasks/{}.json", api_root.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl IssueTrackerService for TeamworkClient {
    async fn fetch_ticket(&self, id: TicketId) -> AppResult<TicketSummary> {
        let url = Self::task_endpoint(&self.api_root, id);
        debug!(%url, "fetching task");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, Self::auth_header(&self.api_key))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Teamwork: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Teamwork responded with {status}: {body}"
            )));
        }

        let payload: TeamworkTaskResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Teamwork response: {err}"))
        })?;

        Ok(payload.todo_item.into())
    }
}

#[derive(Deserialize)]
struct TeamworkTaskResponse {
    #[serde(rename = "todo-item")]
    todo_item: TeamworkTask,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TeamworkTask {
    content: String,
    #[serde(default)]
    project_name: String,
    #[serde(default)]
    todo_list_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    creator_firstname: String,
    #[serde(default)]
    creator_lastname: String,
    #[serde(default)]
    responsible_party_summary: Option<String>,
    #[serde(default)]
    estimated_minutes: Option<Minutes>,
}

/// Older Teamwork accounts send numeric fields as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Minutes {
    Number(u64),
    Text(String),
}

impl Minutes {
    fn value(&self) -> Option<u64> {
        match self {
            Minutes::Number(minutes) => Some(*minutes),
            Minutes::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<TeamworkTask> for TicketSummary {
    fn from(task: TeamworkTask) -> Self {
        let creator_name = format!("{} {}", task.creator_firstname, task.creator_lastname)
            .trim()
            .to_string();
        TicketSummary {
            title: task.content,
            project_name: task.project_name,
            list_name: task.todo_list_name,
            description: task.description,
            creator_name,
            assignee: task
                .responsible_party_summary
                .filter(|name| !name.trim().is_empty()),
            estimated_minutes: task
                .estimated_minutes
                .and_then(|minutes| minutes.value())
                .filter(|minutes| *minutes > 0),
        }
    }
}
