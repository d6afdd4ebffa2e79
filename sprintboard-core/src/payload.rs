//! Payload builders for the backend write endpoints
//!
//! Each builder borrows domain records and returns a serializable struct with
//! the exact field names the backend expects. Values are only renamed,
//! flattened to identifiers, or defaulted.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    Comment, Epic, KanbanStatus, Priority, RecordUuid, RelatedRequirement, Requirement, Sprint,
    TeamMember, UserStory,
};

/// Avatar sent for team members that have none
pub const DEFAULT_AVATAR_URL: &str = "https://www.gravatar.com/avatar/?d=mp";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementPayload<'a> {
    pub uuid: &'a RecordUuid,
    pub id_title: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub priority: Priority,
    pub category: &'a str,
    pub epic_ref: &'a str,
    pub project_ref: &'a str,
}

/// Body of `POST /projects/{id}/requirements/batch`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementsBatch<'a> {
    pub requirements: Vec<RequirementPayload<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRequirementPayload<'a> {
    pub uuid: &'a RecordUuid,
    pub id_title: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicPayload<'a> {
    pub uuid: &'a RecordUuid,
    pub id_title: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub project_ref: &'a str,
    pub related_requirements: Vec<RelatedRequirementPayload<'a>>,
}

/// Body of `POST /projects/{id}/epics/batch`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpicsBatch<'a> {
    pub epics: Vec<EpicPayload<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStoryPayload<'a> {
    pub uuid: &'a RecordUuid,
    #[serde(rename = "idTitle")]
    pub id_title: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub priority: Priority,
    pub points: u32,
    pub acceptance_criteria: &'a [String],
    pub assigned_epic: &'a str,
    pub comments: &'a [Comment],
    pub status_khanban: &'a str,
    pub total_tasks: u32,
    pub task_completed: u32,
    pub task_list: &'a [String],
    pub project_id: &'a str,
}

/// Body of `POST /projects/{id}/user-stories/batch`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStoriesBatch<'a> {
    pub user_stories: Vec<UserStoryPayload<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMemberPayload<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub avatar: &'a str,
}

/// Body of `POST /projects/{id}/sprints`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintPayload<'a> {
    pub id: &'a str,
    pub project_id: &'a str,
    pub name: &'a str,
    pub goal: &'a str,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Story uuids only
    pub user_stories: Vec<&'a RecordUuid>,
    /// Task ids only
    pub tasks: Vec<&'a str>,
    pub team_members: Vec<TeamMemberPayload<'a>>,
}

/// Body of `PATCH /projects/{id}/tasks/{task_id}/status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStatusPayload {
    pub status_khanban: &'static str,
}

/// Returns `fallback` when the record carries no value of its own
fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

pub fn requirements_batch_payload<'a>(
    project_ref: &'a str,
    requirements: &'a [Requirement],
) -> RequirementsBatch<'a> {
    RequirementsBatch {
        requirements: requirements
            .iter()
            .map(|r| RequirementPayload {
                uuid: &r.uuid,
                id_title: &r.id_title,
                title: &r.title,
                description: &r.description,
                priority: r.priority,
                category: &r.category,
                epic_ref: &r.epic_ref,
                project_ref: or_default(&r.project_ref, project_ref),
            })
            .collect(),
    }
}

fn related_payload(related: &RelatedRequirement) -> RelatedRequirementPayload<'_> {
    RelatedRequirementPayload {
        uuid: &related.uuid,
        id_title: &related.id_title,
        title: &related.title,
        description: &related.description,
        category: &related.category,
    }
}

pub fn epics_batch_payload<'a>(project_ref: &'a str, epics: &'a [Epic]) -> EpicsBatch<'a> {
    EpicsBatch {
        epics: epics
            .iter()
            .map(|e| EpicPayload {
                uuid: &e.uuid,
                id_title: &e.id_title,
                title: &e.title,
                description: &e.description,
                project_ref: or_default(&e.project_ref, project_ref),
                related_requirements: e.related_requirements.iter().map(related_payload).collect(),
            })
            .collect(),
    }
}

pub fn user_stories_batch_payload<'a>(
    project_id: &'a str,
    stories: &'a [UserStory],
) -> UserStoriesBatch<'a> {
    UserStoriesBatch {
        user_stories: stories
            .iter()
            .map(|s| UserStoryPayload {
                uuid: &s.uuid,
                id_title: &s.id_title,
                title: &s.title,
                description: &s.description,
                priority: s.priority,
                points: s.points,
                acceptance_criteria: &s.acceptance_criteria,
                assigned_epic: &s.assigned_epic,
                comments: &s.comments,
                status_khanban: &s.status_khanban,
                total_tasks: s.total_tasks,
                task_completed: s.task_completed,
                task_list: &s.task_list,
                project_id,
            })
            .collect(),
    }
}

fn team_member_payload(member: &TeamMember) -> TeamMemberPayload<'_> {
    TeamMemberPayload {
        id: &member.id,
        name: &member.name,
        role: &member.role,
        avatar: member
            .avatar
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(DEFAULT_AVATAR_URL),
    }
}

pub fn sprint_payload(sprint: &Sprint) -> SprintPayload<'_> {
    SprintPayload {
        id: &sprint.id,
        project_id: &sprint.project_id,
        name: &sprint.name,
        goal: &sprint.goal,
        start_date: sprint.start_date,
        end_date: sprint.end_date,
        user_stories: sprint.user_stories.iter().map(|s| &s.uuid).collect(),
        tasks: sprint.tasks.iter().map(|t| t.id.as_str()).collect(),
        team_members: sprint.team_members.iter().map(team_member_payload).collect(),
    }
}

pub fn task_status_payload(status: KanbanStatus) -> TaskStatusPayload {
    TaskStatusPayload {
        status_khanban: status.label(),
    }
}
