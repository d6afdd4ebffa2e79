//! REST client for the project-management backend

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::transport::{ApiRequest, HttpTransport, Method, Transport};
use crate::board::{group_tasks, merge_user_stories_into_tasks};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    Epic, KanbanStatus, NewProject, Project, ProjectMember, Requirement, Sprint, Task, TaskColumns,
    UserStory,
};
use crate::parse;
use crate::payload;

/// Client for the backend REST API
///
/// Every call is a single request. A non-success status is returned as
/// [`ApiError::Status`] and nothing from the response body is used.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a client that talks HTTP to the configured backend
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(
            config.api_base_url.clone(),
            Arc::new(transport),
        ))
    }

    /// Create a client with a specific transport
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus one percent-encoded path segment per element
    fn url(&self, segments: &[&str]) -> Result<String, ApiError> {
        let invalid = |message: String| ApiError::InvalidUrl {
            url: self.base_url.clone(),
            message,
        };
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    /// Send a request and decode the JSON body (`null` for an empty body)
    fn request(
        &self,
        method: Method,
        path: &[&str],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest {
            method,
            url: self.url(path)?,
            body,
        };
        log::debug!("{} {}", request.method, request.url);

        let response = self.transport.send(&request).map_err(|e| {
            log::warn!("{} {} failed: {}", request.method, request.url, e);
            e
        })?;

        if !response.is_success() {
            let message = response.error_message();
            log::warn!(
                "{} {} returned {}: {}",
                request.method,
                request.url,
                response.status,
                message
            );
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    fn send_json<T: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        payload: &T,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(payload).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.request(method, path, Some(body))
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Projects the user owns or belongs to
    pub fn list_projects_by_user(&self, user_id: &str) -> Result<Vec<Project>, ApiError> {
        let value = self.request(Method::Get, &["projects", "user", user_id], None)?;
        Ok(parse::parse_projects(&value)?)
    }

    pub fn get_project(&self, project_id: &str) -> Result<Project, ApiError> {
        let value = self.request(Method::Get, &["projects", project_id], None)?;
        Ok(parse::parse_project(&value)?)
    }

    pub fn create_project(&self, project: &NewProject) -> Result<Project, ApiError> {
        let value = self.send_json(Method::Post, &["projects"], project)?;
        Ok(parse::parse_project(&value)?)
    }

    pub fn update_project(&self, project_id: &str, project: &NewProject) -> Result<Project, ApiError> {
        let value = self.send_json(Method::Put, &["projects", project_id], project)?;
        Ok(parse::parse_project(&value)?)
    }

    pub fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        self.request(Method::Delete, &["projects", project_id], None)?;
        Ok(())
    }

    // =========================================================================
    // Project-user relations
    // =========================================================================

    pub fn list_project_members(&self, project_id: &str) -> Result<Vec<ProjectMember>, ApiError> {
        let value = self.request(Method::Get, &["projects", project_id, "users"], None)?;
        Ok(parse::parse_project_members(&value)?)
    }

    pub fn add_project_member(&self, member: &ProjectMember) -> Result<(), ApiError> {
        self.send_json(Method::Post, &["project-users"], member)?;
        Ok(())
    }

    pub fn remove_project_member(&self, project_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.request(
            Method::Delete,
            &["project-users", project_id, user_id],
            None,
        )?;
        Ok(())
    }

    // =========================================================================
    // Requirements and epics
    // =========================================================================

    pub fn get_requirements(&self, project_id: &str) -> Result<Vec<Requirement>, ApiError> {
        let value = self.request(
            Method::Get,
            &["projects", project_id, "requirements"],
            None,
        )?;
        Ok(parse::parse_requirements(&value)?)
    }

    /// Epics of a project; related requirements reuse uuids from `existing`
    pub fn get_epics(&self, project_id: &str, existing: &[Requirement]) -> Result<Vec<Epic>, ApiError> {
        let value = self.request(Method::Get, &["projects", project_id, "epics"], None)?;
        Ok(parse::parse_epics(&value, existing)?)
    }

    pub fn create_requirements(
        &self,
        project_id: &str,
        requirements: &[Requirement],
    ) -> Result<(), ApiError> {
        let body = payload::requirements_batch_payload(project_id, requirements);
        self.send_json(
            Method::Post,
            &["projects", project_id, "requirements", "batch"],
            &body,
        )?;
        Ok(())
    }

    pub fn create_epics(&self, project_id: &str, epics: &[Epic]) -> Result<(), ApiError> {
        let body = payload::epics_batch_payload(project_id, epics);
        self.send_json(
            Method::Post,
            &["projects", project_id, "epics", "batch"],
            &body,
        )?;
        Ok(())
    }

    // =========================================================================
    // User stories, tasks and sprints
    // =========================================================================

    pub fn get_user_stories(&self, project_id: &str) -> Result<Vec<UserStory>, ApiError> {
        let value = self.request(
            Method::Get,
            &["projects", project_id, "user-stories"],
            None,
        )?;
        Ok(parse::parse_user_stories(&value)?)
    }

    pub fn create_user_stories(&self, project_id: &str, stories: &[UserStory]) -> Result<(), ApiError> {
        let body = payload::user_stories_batch_payload(project_id, stories);
        self.send_json(
            Method::Post,
            &["projects", project_id, "user-stories", "batch"],
            &body,
        )?;
        Ok(())
    }

    pub fn get_tasks(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        let value = self.request(Method::Get, &["projects", project_id, "tasks"], None)?;
        Ok(parse::parse_tasks(&value)?)
    }

    /// Tasks already grouped by the backend
    pub fn get_task_columns(&self, project_id: &str) -> Result<TaskColumns, ApiError> {
        let value = self.request(
            Method::Get,
            &["projects", project_id, "tasks", "khanban"],
            None,
        )?;
        Ok(parse::parse_task_columns(&value)?)
    }

    pub fn update_task_status(
        &self,
        project_id: &str,
        task_id: &str,
        status: KanbanStatus,
    ) -> Result<(), ApiError> {
        self.send_json(
            Method::Patch,
            &["projects", project_id, "tasks", task_id, "status"],
            &payload::task_status_payload(status),
        )?;
        Ok(())
    }

    pub fn delete_task(&self, project_id: &str, task_id: &str) -> Result<(), ApiError> {
        self.request(
            Method::Delete,
            &["projects", project_id, "tasks", task_id],
            None,
        )?;
        Ok(())
    }

    pub fn create_sprint(&self, sprint: &Sprint) -> Result<(), ApiError> {
        self.send_json(
            Method::Post,
            &["projects", sprint.project_id.as_str(), "sprints"],
            &payload::sprint_payload(sprint),
        )?;
        Ok(())
    }

    /// Tasks and user stories of a project merged into one board
    pub fn board(&self, project_id: &str) -> Result<TaskColumns, ApiError> {
        let tasks = self.get_tasks(project_id)?;
        let stories = self.get_user_stories(project_id)?;
        Ok(merge_user_stories_into_tasks(&group_tasks(tasks), &stories))
    }
}
