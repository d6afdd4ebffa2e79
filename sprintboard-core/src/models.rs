use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::normalize::normalize_status;

/// Priority of a requirement, user story or task
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// The label the backend stores
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow bucket a task or user story is shown in on the board
///
/// Ordered by board position, backlog first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KanbanStatus {
    #[default]
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl KanbanStatus {
    /// All columns in board order
    pub const ALL: [KanbanStatus; 5] = [
        KanbanStatus::Backlog,
        KanbanStatus::Todo,
        KanbanStatus::InProgress,
        KanbanStatus::InReview,
        KanbanStatus::Done,
    ];

    /// Key of the column in a grouped board (`backlog`, `todo`, ...)
    pub fn column_key(&self) -> &'static str {
        match self {
            KanbanStatus::Backlog => "backlog",
            KanbanStatus::Todo => "todo",
            KanbanStatus::InProgress => "inprogress",
            KanbanStatus::InReview => "inreview",
            KanbanStatus::Done => "done",
        }
    }

    /// Human-readable label, also what gets written back as `status_khanban`
    pub fn label(&self) -> &'static str {
        match self {
            KanbanStatus::Backlog => "Backlog",
            KanbanStatus::Todo => "To Do",
            KanbanStatus::InProgress => "In Progress",
            KanbanStatus::InReview => "In Review",
            KanbanStatus::Done => "Done",
        }
    }
}

impl fmt::Display for KanbanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Client-side stable identifier of a requirement, epic or user story
///
/// Carried exactly as the backend sent it, whatever its format. Only records
/// that arrive without one get a freshly generated v4 uuid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordUuid(String);

impl RecordUuid {
    /// A new random v4 uuid
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Keeps a present value, generates one when it is missing or blank
    pub fn or_generate(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            Self::generate()
        } else {
            Self(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single project requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Backend row id (empty until the backend has stored it)
    pub id: String,

    /// Stable internal identifier
    pub uuid: RecordUuid,

    /// Human-readable identifier (e.g., "REQ-001")
    pub id_title: String,

    pub title: String,

    pub description: String,

    pub priority: Priority,

    /// Free-form category (functional, non-functional, ...)
    pub category: String,

    /// Epic this requirement belongs to, if any
    pub epic_ref: String,

    pub project_ref: String,
}

/// Requirement as embedded in an epic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRequirement {
    pub id_title: String,
    pub title: String,
    pub description: String,
    pub uuid: RecordUuid,
    pub category: String,
}

/// An epic grouping related requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epic {
    pub uuid: RecordUuid,
    pub id: String,
    /// Human-readable identifier (e.g., "EPIC-001")
    pub id_title: String,
    pub title: String,
    pub description: String,
    pub project_ref: String,
    /// Requirements in the order the backend listed them
    pub related_requirements: Vec<RelatedRequirement>,
}

/// Comment left on a user story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A user story as shown in the backlog and on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub uuid: RecordUuid,

    #[serde(rename = "idTitle")]
    pub id_title: String,

    pub title: String,

    pub description: String,

    pub priority: Priority,

    /// Estimation in story points
    pub points: u32,

    #[serde(rename = "acceptanceCriteria")]
    pub acceptance_criteria: Vec<String>,

    /// Epic the story is assigned to (empty when unassigned)
    pub assigned_epic: String,

    pub comments: Vec<Comment>,

    /// Free-form kanban label as stored by the backend
    pub status_khanban: String,

    pub total_tasks: u32,

    pub task_completed: u32,

    /// Ids of the tasks that belong to this story
    pub task_list: Vec<String>,
}

impl UserStory {
    /// Board column this story is placed in
    pub fn status(&self) -> KanbanStatus {
        normalize_status(&self.status_khanban)
    }
}

/// A task on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub story_points: u32,
    pub assignee_id: String,
    /// Display name of the assignee
    pub assignee: String,
    pub status_khanban: String,
}

impl Task {
    /// Board column this task is placed in
    pub fn status(&self) -> KanbanStatus {
        normalize_status(&self.status_khanban)
    }
}

/// Anything that can sit in a kanban column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardItem {
    Task(Task),
    UserStory(UserStory),
}

impl BoardItem {
    pub fn title(&self) -> &str {
        match self {
            BoardItem::Task(task) => &task.title,
            BoardItem::UserStory(story) => &story.title,
        }
    }

    /// Task id, or the story's human-readable id
    pub fn display_id(&self) -> &str {
        match self {
            BoardItem::Task(task) => &task.id,
            BoardItem::UserStory(story) => &story.id_title,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            BoardItem::Task(task) => task.priority,
            BoardItem::UserStory(story) => story.priority,
        }
    }

    pub fn status(&self) -> KanbanStatus {
        match self {
            BoardItem::Task(task) => task.status(),
            BoardItem::UserStory(story) => story.status(),
        }
    }
}

/// Board contents grouped by workflow column
///
/// Every item lives in exactly one column, the one its normalized
/// `status_khanban` selects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskColumns {
    #[serde(default)]
    pub backlog: Vec<BoardItem>,
    #[serde(default)]
    pub todo: Vec<BoardItem>,
    #[serde(default)]
    pub inprogress: Vec<BoardItem>,
    #[serde(default)]
    pub inreview: Vec<BoardItem>,
    #[serde(default)]
    pub done: Vec<BoardItem>,
}

impl TaskColumns {
    /// Creates a board with five empty columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in the given column
    pub fn column(&self, status: KanbanStatus) -> &[BoardItem] {
        match status {
            KanbanStatus::Backlog => &self.backlog,
            KanbanStatus::Todo => &self.todo,
            KanbanStatus::InProgress => &self.inprogress,
            KanbanStatus::InReview => &self.inreview,
            KanbanStatus::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: KanbanStatus) -> &mut Vec<BoardItem> {
        match status {
            KanbanStatus::Backlog => &mut self.backlog,
            KanbanStatus::Todo => &mut self.todo,
            KanbanStatus::InProgress => &mut self.inprogress,
            KanbanStatus::InReview => &mut self.inreview,
            KanbanStatus::Done => &mut self.done,
        }
    }

    /// Appends an item to the end of the column its status selects
    pub fn push(&mut self, item: BoardItem) {
        let status = item.status();
        self.column_mut(status).push(item);
    }

    /// Columns in board order
    pub fn iter(&self) -> impl Iterator<Item = (KanbanStatus, &[BoardItem])> {
        KanbanStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    /// Total number of items across all columns
    pub fn len(&self) -> usize {
        self.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Member of a sprint team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A sprint with its planned stories, tasks and team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub goal: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub user_stories: Vec<UserStory>,
    pub tasks: Vec<Task>,
    pub team_members: Vec<TeamMember>,
}

impl Sprint {
    /// Creates an empty sprint for a project
    pub fn new(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            project_id: project_id.into(),
            name: name.into(),
            goal: String::new(),
            start_date: None,
            end_date: None,
            user_stories: Vec::new(),
            tasks: Vec::new(),
            team_members: Vec::new(),
        }
    }
}

/// A project as listed for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
}

/// Fields needed to create or update a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub owner_id: String,
}

/// Project-user relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub project_id: String,
    pub user_id: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            priority: Priority::Medium,
            story_points: 0,
            assignee_id: String::new(),
            assignee: String::new(),
            status_khanban: status.to_string(),
        }
    }

    #[test]
    fn test_status_labels_round_trip_through_normalizer() {
        for status in KanbanStatus::ALL {
            assert_eq!(normalize_status(status.label()), status);
            assert_eq!(normalize_status(status.column_key()), status);
        }
    }

    #[test]
    fn test_push_routes_by_status() {
        let mut columns = TaskColumns::new();
        columns.push(BoardItem::Task(task("1", "In Progress")));
        columns.push(BoardItem::Task(task("2", "")));

        assert_eq!(columns.inprogress.len(), 1);
        assert_eq!(columns.backlog.len(), 1);
        assert_eq!(columns.len(), 2);
        assert!(!columns.is_empty());
    }

    #[test]
    fn test_columns_serialize_with_fixed_keys() {
        let value = serde_json::to_value(TaskColumns::new()).unwrap();
        let object = value.as_object().unwrap();
        for status in KanbanStatus::ALL {
            assert!(object[status.column_key()].as_array().unwrap().is_empty());
        }
        assert_eq!(object.len(), 5);
    }

    #[test]
    fn test_board_item_is_tagged() {
        let value = serde_json::to_value(BoardItem::Task(task("t1", "done"))).unwrap();
        assert_eq!(value["kind"], "task");
        assert_eq!(value["id"], "t1");
    }

    #[test]
    fn test_record_uuid_keeps_present_value() {
        let kept = RecordUuid::or_generate(" 65f1c2a9e4b0a1b2c3d4e5f6 ");
        assert_eq!(kept.as_str(), "65f1c2a9e4b0a1b2c3d4e5f6");

        let generated = RecordUuid::or_generate("");
        assert!(Uuid::parse_str(generated.as_str()).is_ok());
        assert_ne!(generated, RecordUuid::or_generate(""));
    }

    #[test]
    fn test_record_uuid_serializes_as_plain_string() {
        let uuid = RecordUuid::or_generate("abc-123");
        assert_eq!(serde_json::to_value(&uuid).unwrap(), serde_json::json!("abc-123"));
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::High.to_string(), "High");
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
