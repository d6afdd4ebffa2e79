//! Entity parsers
//!
//! Converts JSON returned by the backend into domain records. Each record is
//! decoded into a typed raw struct first. Fields never fail a parse: a value
//! that is missing, `null` or of the wrong JSON type is replaced by `""`, `0`,
//! `[]` or `None`, and a warning is logged for the wrong-typed ones. Only a
//! payload that is not a list at all is rejected.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ParseError;
use crate::models::{
    BoardItem, Comment, Epic, Project, ProjectMember, RecordUuid, RelatedRequirement, Requirement,
    Task, TaskColumns, UserStory,
};
use crate::normalize::{collate, normalize_priority, normalize_status};

/// Naive timestamps (no offset) are read as UTC
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn substitute_default<T: Default>(value: &Value, reason: impl std::fmt::Display) -> T {
    log::warn!("Substituting default for malformed value {}: {}", value, reason);
    T::default()
}

/// Decodes a field, falling back to its default when the type is wrong
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(&value).unwrap_or_else(|e| substitute_default(&value, e)))
}

/// Decodes a list field element by element, dropping elements of the wrong type
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match T::deserialize(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    log::warn!("Dropping malformed list element {}: {}", item, e);
                    None
                }
            })
            .collect(),
        other => substitute_default(&other, "expected a list"),
    })
}

fn integral(number: f64) -> Option<u64> {
    (number.is_finite() && number >= 0.0 && number.fract() == 0.0).then_some(number as u64)
}

/// Non-negative count from an integer, an integral float or a numeric string
fn count_from_value(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }?;
    u32::try_from(count).ok()
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0);
    }
    Ok(count_from_value(&value)
        .unwrap_or_else(|| substitute_default(&value, "expected a non-negative count")))
}

/// Backend ids arrive either as strings or as numbers
fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => n
            .as_i64()
            .map(|id| id.to_string())
            .or_else(|| n.as_f64().and_then(integral).map(|id| id.to_string())),
        _ => None,
    }
}

fn id_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(String::new());
    }
    Ok(id_from_value(&value).unwrap_or_else(|| substitute_default(&value, "expected an id")))
}

fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let id = id_from_value(item);
                if id.is_none() {
                    log::warn!("Dropping malformed id {}", item);
                }
                id
            })
            .collect(),
        other => substitute_default(&other, "expected a list of ids"),
    })
}

fn timestamp_from_str(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let timestamp = match &value {
        Value::Null => return Ok(None),
        Value::String(text) => timestamp_from_str(text),
        _ => None,
    };
    if timestamp.is_none() {
        log::warn!("Ignoring unreadable timestamp {}", value);
    }
    Ok(timestamp)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequirement {
    #[serde(default, deserialize_with = "id_or_empty")]
    id: String,
    #[serde(default, deserialize_with = "id_or_empty")]
    uuid: String,
    #[serde(default, alias = "id_title", deserialize_with = "lenient")]
    id_title: String,
    #[serde(default, deserialize_with = "lenient")]
    title: String,
    #[serde(default, deserialize_with = "lenient")]
    description: String,
    #[serde(default, deserialize_with = "lenient")]
    priority: String,
    #[serde(default, deserialize_with = "lenient")]
    category: String,
    #[serde(default, alias = "epic_ref", deserialize_with = "id_or_empty")]
    epic_ref: String,
    #[serde(default, alias = "project_ref", deserialize_with = "id_or_empty")]
    project_ref: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRelatedRequirement {
    #[serde(default, alias = "id_title", deserialize_with = "lenient")]
    id_title: String,
    #[serde(default, deserialize_with = "lenient")]
    title: String,
    #[serde(default, deserialize_with = "lenient")]
    description: String,
    #[serde(default, deserialize_with = "id_or_empty")]
    uuid: String,
    #[serde(default, deserialize_with = "lenient")]
    category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEpic {
    #[serde(default, deserialize_with = "id_or_empty")]
    uuid: String,
    #[serde(default, deserialize_with = "id_or_empty")]
    id: String,
    #[serde(default, alias = "id_title", deserialize_with = "lenient")]
    id_title: String,
    #[serde(default, deserialize_with = "lenient")]
    title: String,
    #[serde(default, deserialize_with = "lenient")]
    description: String,
    #[serde(default, alias = "project_ref", deserialize_with = "id_or_empty")]
    project_ref: String,
    #[serde(
        default,
        alias = "related_requirements",
        deserialize_with = "lenient_list"
    )]
    related_requirements: Vec<RawRelatedRequirement>,
}

#[derive(Debug, Default, Deserialize)]
struct RawComment {
    #[serde(default, deserialize_with = "id_or_empty")]
    id: String,
    #[serde(default, alias = "userId", deserialize_with = "id_or_empty")]
    user_id: String,
    #[serde(default, alias = "comment", deserialize_with = "lenient")]
    text: String,
    #[serde(default, alias = "timestamp", deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUserStory {
    #[serde(default, deserialize_with = "id_or_empty")]
    uuid: String,
    #[serde(default, rename = "idTitle", alias = "id_title", deserialize_with = "lenient")]
    id_title: String,
    #[serde(default, deserialize_with = "lenient")]
    title: String,
    #[serde(default, deserialize_with = "lenient")]
    description: String,
    #[serde(default, deserialize_with = "lenient")]
    priority: String,
    #[serde(default, deserialize_with = "lenient_count")]
    points: u32,
    #[serde(
        default,
        rename = "acceptanceCriteria",
        alias = "acceptance_criteria",
        deserialize_with = "lenient_list"
    )]
    acceptance_criteria: Vec<String>,
    #[serde(default, deserialize_with = "id_or_empty")]
    assigned_epic: String,
    #[serde(default, deserialize_with = "lenient_list")]
    comments: Vec<RawComment>,
    #[serde(default, deserialize_with = "lenient")]
    status_khanban: String,
    #[serde(default, deserialize_with = "lenient_count")]
    total_tasks: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    task_completed: u32,
    #[serde(default, alias = "taskList", deserialize_with = "id_list")]
    task_list: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTask {
    #[serde(default, deserialize_with = "id_or_empty")]
    id: String,
    #[serde(default, deserialize_with = "lenient")]
    title: String,
    #[serde(default, deserialize_with = "lenient")]
    description: String,
    #[serde(default, deserialize_with = "lenient")]
    priority: String,
    #[serde(default, alias = "storyPoints", deserialize_with = "lenient_count")]
    story_points: u32,
    #[serde(default, alias = "assigneeId", deserialize_with = "id_or_empty")]
    assignee_id: String,
    #[serde(default, deserialize_with = "lenient")]
    assignee: String,
    #[serde(default, deserialize_with = "lenient")]
    status_khanban: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawProject {
    #[serde(default, deserialize_with = "id_or_empty")]
    id: String,
    #[serde(default, deserialize_with = "lenient")]
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    description: String,
    #[serde(default, alias = "ownerId", deserialize_with = "id_or_empty")]
    owner_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawProjectMember {
    #[serde(default, alias = "projectId", deserialize_with = "id_or_empty")]
    project_id: String,
    #[serde(default, alias = "userId", deserialize_with = "id_or_empty")]
    user_id: String,
    #[serde(default, deserialize_with = "lenient")]
    role: String,
}

/// Decodes one record; anything that is not an object becomes an all-default record
fn decode_record<T: DeserializeOwned + Default>(item: &Value, entity: &str, index: usize) -> T {
    if !item.is_object() {
        log::warn!("{} record {} is not an object, using defaults", entity, index);
        return T::default();
    }
    T::deserialize(item).unwrap_or_else(|e| {
        log::warn!("{} record {} is malformed, using defaults: {}", entity, index, e);
        T::default()
    })
}

/// Decodes a list of records, either a bare array or wrapped as `{key: [...]}`
///
/// `null` is treated as an empty list.
fn decode_records<T: DeserializeOwned + Default>(
    payload: &Value,
    entity: &'static str,
    key: &str,
) -> Result<Vec<T>, ParseError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get(key) {
            Some(Value::Array(items)) => items,
            _ => return Err(ParseError::NotAList { entity }),
        },
        Value::Null => return Ok(Vec::new()),
        _ => return Err(ParseError::NotAList { entity }),
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_record(item, entity, index))
        .collect())
}

/// Parses requirements, sorted by `idTitle`
pub fn parse_requirements(payload: &Value) -> Result<Vec<Requirement>, ParseError> {
    let raw: Vec<RawRequirement> = decode_records(payload, "requirement", "requirements")?;

    let mut requirements: Vec<Requirement> = raw
        .into_iter()
        .map(|r| Requirement {
            id: r.id,
            uuid: RecordUuid::or_generate(&r.uuid),
            id_title: r.id_title,
            title: r.title,
            description: r.description,
            priority: normalize_priority(&r.priority),
            category: r.category,
            epic_ref: r.epic_ref,
            project_ref: r.project_ref,
        })
        .collect();

    requirements.sort_by(|a, b| collate(&a.id_title, &b.id_title));
    Ok(requirements)
}

/// Parses epics, sorted by `idTitle`
///
/// A related requirement whose `idTitle` matches one of `existing` takes that
/// requirement's uuid, so the same requirement has one identity across epics.
pub fn parse_epics(payload: &Value, existing: &[Requirement]) -> Result<Vec<Epic>, ParseError> {
    let raw: Vec<RawEpic> = decode_records(payload, "epic", "epics")?;

    let mut known: HashMap<&str, &RecordUuid> = HashMap::new();
    for req in existing.iter().filter(|r| !r.id_title.is_empty()) {
        known.entry(req.id_title.as_str()).or_insert(&req.uuid);
    }

    let mut epics: Vec<Epic> = raw
        .into_iter()
        .map(|e| Epic {
            uuid: RecordUuid::or_generate(&e.uuid),
            id: e.id,
            id_title: e.id_title,
            title: e.title,
            description: e.description,
            project_ref: e.project_ref,
            related_requirements: e
                .related_requirements
                .into_iter()
                .map(|r| RelatedRequirement {
                    uuid: match known.get(r.id_title.as_str()) {
                        Some(uuid) => (*uuid).clone(),
                        None => RecordUuid::or_generate(&r.uuid),
                    },
                    id_title: r.id_title,
                    title: r.title,
                    description: r.description,
                    category: r.category,
                })
                .collect(),
        })
        .collect();

    epics.sort_by(|a, b| collate(&a.id_title, &b.id_title));
    Ok(epics)
}

/// Parses user stories, sorted by `idTitle`
pub fn parse_user_stories(payload: &Value) -> Result<Vec<UserStory>, ParseError> {
    let raw: Vec<RawUserStory> = decode_records(payload, "user story", "user_stories")?;

    let mut stories: Vec<UserStory> = raw
        .into_iter()
        .map(|s| UserStory {
            uuid: RecordUuid::or_generate(&s.uuid),
            id_title: s.id_title,
            title: s.title,
            description: s.description,
            priority: normalize_priority(&s.priority),
            points: s.points,
            acceptance_criteria: s.acceptance_criteria,
            assigned_epic: s.assigned_epic,
            comments: s
                .comments
                .into_iter()
                .map(|c| Comment {
                    id: c.id,
                    user_id: c.user_id,
                    text: c.text,
                    created_at: c.created_at,
                })
                .collect(),
            status_khanban: s.status_khanban,
            total_tasks: s.total_tasks,
            task_completed: s.task_completed,
            task_list: s.task_list,
        })
        .collect();

    stories.sort_by(|a, b| collate(&a.id_title, &b.id_title));
    Ok(stories)
}

/// Parses tasks, keeping the order the backend returned them in
pub fn parse_tasks(payload: &Value) -> Result<Vec<Task>, ParseError> {
    let raw: Vec<RawTask> = decode_records(payload, "task", "tasks")?;

    Ok(raw
        .into_iter()
        .map(|t| Task {
            id: t.id,
            title: t.title,
            description: t.description,
            priority: normalize_priority(&t.priority),
            story_points: t.story_points,
            assignee_id: t.assignee_id,
            assignee: t.assignee,
            status_khanban: t.status_khanban,
        })
        .collect())
}

/// Parses the status-grouped task listing (`{"todo": [...], ...}`)
///
/// Tasks are re-routed by their own status. A task without a status takes
/// the label of the group it was listed under. Groups are read in board
/// order of the column their key names, ties by key, so tasks re-routed into
/// one column always land in the same order.
pub fn parse_task_columns(payload: &Value) -> Result<TaskColumns, ParseError> {
    let groups = match payload {
        Value::Object(groups) => groups,
        Value::Null => return Ok(TaskColumns::new()),
        _ => return Err(ParseError::NotAList { entity: "task column" }),
    };

    let mut ordered: Vec<(&String, &Value)> = groups.iter().collect();
    ordered.sort_by(|(a, _), (b, _)| {
        normalize_status(a)
            .cmp(&normalize_status(b))
            .then_with(|| a.cmp(b))
    });

    let mut columns = TaskColumns::new();
    for (key, tasks) in ordered {
        let fallback = normalize_status(key);
        for mut task in parse_tasks(tasks)? {
            if task.status_khanban.trim().is_empty() {
                task.status_khanban = fallback.label().to_string();
            }
            columns.push(BoardItem::Task(task));
        }
    }
    Ok(columns)
}

/// Parses a list of projects
pub fn parse_projects(payload: &Value) -> Result<Vec<Project>, ParseError> {
    let raw: Vec<RawProject> = decode_records(payload, "project", "projects")?;
    Ok(raw.into_iter().map(project_from_raw).collect())
}

/// Parses a single project object
pub fn parse_project(payload: &Value) -> Result<Project, ParseError> {
    if !payload.is_object() {
        return Err(ParseError::InvalidRecord {
            entity: "project",
            index: 0,
            message: format!("expected an object, got {}", payload),
        });
    }
    Ok(project_from_raw(decode_record(payload, "project", 0)))
}

fn project_from_raw(p: RawProject) -> Project {
    Project {
        id: p.id,
        name: p.name,
        description: p.description,
        owner_id: p.owner_id,
    }
}

/// Parses the members of a project
pub fn parse_project_members(payload: &Value) -> Result<Vec<ProjectMember>, ParseError> {
    let raw: Vec<RawProjectMember> = decode_records(payload, "project member", "users")?;
    Ok(raw
        .into_iter()
        .map(|m| ProjectMember {
            project_id: m.project_id,
            user_id: m.user_id,
            role: m.role,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KanbanStatus, Priority};
    use serde_json::json;

    const KNOWN_UUID: &str = "6f1c1b0e-8a5e-4c1e-9a37-3f0b8f0c2d11";

    #[test]
    fn test_parse_requirements_fills_defaults() {
        let payload = json!([{ "idTitle": "REQ-001", "title": "Login" }]);
        let reqs = parse_requirements(&payload).unwrap();

        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].title, "Login");
        assert_eq!(reqs[0].description, "");
        assert_eq!(reqs[0].category, "");
        assert_eq!(reqs[0].priority, Priority::Medium);
        assert!(uuid::Uuid::parse_str(reqs[0].uuid.as_str()).is_ok());
    }

    #[test]
    fn test_parse_requirements_normalizes_priority() {
        let payload = json!([
            { "idTitle": "REQ-001", "priority": "alta" },
            { "idTitle": "REQ-002", "priority": "baja" },
            { "idTitle": "REQ-003", "priority": null },
        ]);
        let reqs = parse_requirements(&payload).unwrap();
        let priorities: Vec<_> = reqs.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::Low, Priority::Medium]
        );
    }

    #[test]
    fn test_parse_requirements_keeps_existing_uuid() {
        let payload = json!([{ "idTitle": "REQ-001", "uuid": KNOWN_UUID }]);
        let first = parse_requirements(&payload).unwrap();
        let second = parse_requirements(&payload).unwrap();

        assert_eq!(first[0].uuid.to_string(), KNOWN_UUID);
        assert_eq!(first[0].uuid, second[0].uuid);
    }

    #[test]
    fn test_parse_requirements_sorted_by_id_title() {
        let payload = json!([
            { "idTitle": "REQ-010" },
            { "idTitle": "req-002" },
            { "idTitle": "REQ-001" },
        ]);
        let reqs = parse_requirements(&payload).unwrap();
        let ids: Vec<_> = reqs.iter().map(|r| r.id_title.as_str()).collect();
        assert_eq!(ids, vec!["REQ-001", "req-002", "REQ-010"]);
    }

    #[test]
    fn test_parse_requirements_ties_keep_input_order() {
        let payload = json!([
            { "idTitle": "REQ-001", "title": "first" },
            { "idTitle": "REQ-001", "title": "second" },
        ]);
        let reqs = parse_requirements(&payload).unwrap();
        assert_eq!(reqs[0].title, "first");
        assert_eq!(reqs[1].title, "second");
    }

    #[test]
    fn test_parse_requirements_accepts_integer_ids_and_wrapper() {
        let payload = json!({ "requirements": [{ "id": 42, "projectRef": 7 }] });
        let reqs = parse_requirements(&payload).unwrap();
        assert_eq!(reqs[0].id, "42");
        assert_eq!(reqs[0].project_ref, "7");
    }

    #[test]
    fn test_parse_requirements_defaults_wrong_types() {
        let payload = json!([
            { "idTitle": "REQ-001", "title": "Login" },
            { "idTitle": "REQ-002", "title": 42, "category": ["x"], "priority": true }
        ]);
        let reqs = parse_requirements(&payload).unwrap();

        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].title, "Login");
        assert_eq!(reqs[1].id_title, "REQ-002");
        assert_eq!(reqs[1].title, "");
        assert_eq!(reqs[1].category, "");
        assert_eq!(reqs[1].priority, Priority::Medium);
    }

    #[test]
    fn test_parse_requirements_keeps_non_rfc_uuid() {
        let payload = json!([
            { "idTitle": "REQ-001", "uuid": "65f1c2a9e4b0a1b2c3d4e5f6" },
            { "idTitle": "REQ-002" }
        ]);
        let reqs = parse_requirements(&payload).unwrap();

        assert_eq!(reqs[0].uuid.as_str(), "65f1c2a9e4b0a1b2c3d4e5f6");
        assert!(uuid::Uuid::parse_str(reqs[1].uuid.as_str()).is_ok());

        let again = parse_requirements(&serde_json::to_value(&reqs).unwrap()).unwrap();
        assert_eq!(again[0].uuid, reqs[0].uuid);
        assert_eq!(again[1].uuid, reqs[1].uuid);
    }

    #[test]
    fn test_parse_records_that_are_not_objects_get_defaults() {
        let reqs = parse_requirements(&json!(["oops", { "idTitle": "REQ-001" }])).unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].id_title, "");
        assert!(!reqs[0].uuid.as_str().is_empty());
        assert_eq!(reqs[1].id_title, "REQ-001");
    }

    #[test]
    fn test_parse_requirements_rejects_non_list() {
        assert!(matches!(
            parse_requirements(&json!("oops")),
            Err(ParseError::NotAList { .. })
        ));
        assert!(parse_requirements(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_parse_epics_reuses_requirement_uuids() {
        let existing = parse_requirements(&json!([
            { "idTitle": "REQ-001", "uuid": KNOWN_UUID }
        ]))
        .unwrap();

        let payload = json!([{
            "idTitle": "EPIC-001",
            "title": "Accounts",
            "relatedRequirements": [
                { "idTitle": "REQ-001", "title": "Login" },
                { "idTitle": "REQ-099", "title": "Audit" }
            ]
        }]);
        let epics = parse_epics(&payload, &existing).unwrap();

        let related = &epics[0].related_requirements;
        assert_eq!(related[0].uuid, existing[0].uuid);
        assert_ne!(related[1].uuid, existing[0].uuid);
        assert!(!related[1].uuid.as_str().is_empty());
    }

    #[test]
    fn test_parse_epics_existing_match_wins_over_embedded_uuid() {
        let existing = parse_requirements(&json!([
            { "idTitle": "REQ-001", "uuid": KNOWN_UUID }
        ]))
        .unwrap();
        let payload = json!([{
            "idTitle": "EPIC-001",
            "relatedRequirements": [
                { "idTitle": "REQ-001", "uuid": "0b6a3d4e-1111-4c1e-9a37-3f0b8f0c2d11" }
            ]
        }]);
        let epics = parse_epics(&payload, &existing).unwrap();
        assert_eq!(epics[0].related_requirements[0].uuid.to_string(), KNOWN_UUID);
    }

    #[test]
    fn test_parse_epics_sorted_and_related_order_kept() {
        let payload = json!([
            { "idTitle": "EPIC-002", "relatedRequirements": null },
            {
                "idTitle": "EPIC-001",
                "relatedRequirements": [
                    { "idTitle": "REQ-003" },
                    { "idTitle": "REQ-001" }
                ]
            },
        ]);
        let epics = parse_epics(&payload, &[]).unwrap();

        assert_eq!(epics[0].id_title, "EPIC-001");
        assert_eq!(epics[1].id_title, "EPIC-002");
        assert!(epics[1].related_requirements.is_empty());
        let related: Vec<_> = epics[0]
            .related_requirements
            .iter()
            .map(|r| r.id_title.as_str())
            .collect();
        assert_eq!(related, vec!["REQ-003", "REQ-001"]);
    }

    #[test]
    fn test_parse_user_stories() {
        let payload = json!([{
            "uuid": KNOWN_UUID,
            "idTitle": "US-001",
            "title": "As a user I can log in",
            "priority": "High",
            "points": 5,
            "acceptanceCriteria": ["Valid credentials log in"],
            "assigned_epic": "EPIC-001",
            "comments": [
                { "id": 1, "user_id": "u1", "text": "Looks good", "created_at": "2024-03-01T10:00:00Z" }
            ],
            "status_khanban": "In Progress",
            "total_tasks": 3,
            "task_completed": 1,
            "task_list": ["t1", 2]
        }]);
        let stories = parse_user_stories(&payload).unwrap();
        let story = &stories[0];

        assert_eq!(story.uuid.to_string(), KNOWN_UUID);
        assert_eq!(story.priority, Priority::High);
        assert_eq!(story.points, 5);
        assert_eq!(story.acceptance_criteria.len(), 1);
        assert_eq!(story.comments[0].id, "1");
        assert!(story.comments[0].created_at.is_some());
        assert_eq!(story.status(), KanbanStatus::InProgress);
        assert_eq!(story.task_list, vec!["t1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_parse_user_stories_defaults() {
        let stories = parse_user_stories(&json!([{ "title": "Bare" }])).unwrap();
        let story = &stories[0];
        assert_eq!(story.points, 0);
        assert_eq!(story.total_tasks, 0);
        assert!(story.acceptance_criteria.is_empty());
        assert!(story.comments.is_empty());
        assert!(story.task_list.is_empty());
        assert_eq!(story.status(), KanbanStatus::Backlog);
    }

    #[test]
    fn test_parse_tasks_keeps_input_order() {
        let payload = json!([
            { "id": "t2", "status_khanban": "done" },
            { "id": "t1", "status_khanban": "To Do", "story_points": 3 },
        ]);
        let tasks = parse_tasks(&payload).unwrap();
        assert_eq!(tasks[0].id, "t2");
        assert_eq!(tasks[1].id, "t1");
        assert_eq!(tasks[1].story_points, 3);
    }

    #[test]
    fn test_parse_task_columns() {
        let payload = json!({
            "todo": [{ "id": "t1", "status_khanban": "To Do" }],
            "In Review": [{ "id": "t2" }],
            "done": [{ "id": "t3", "status_khanban": "weird" }],
        });
        let columns = parse_task_columns(&payload).unwrap();

        assert_eq!(columns.todo.len(), 1);
        assert_eq!(columns.inreview.len(), 1);
        assert_eq!(columns.inreview[0].display_id(), "t2");
        assert_eq!(columns.backlog.len(), 1);
        assert!(columns.done.is_empty());
    }

    #[test]
    fn test_parse_tasks_reads_loose_numbers() {
        let payload = json!([
            { "id": "t1" },
            { "id": "t2", "story_points": 3.0 },
            { "id": "t3", "story_points": " 5 " },
            { "id": "t4", "story_points": 2.5 },
            { "id": "t5", "story_points": -1 },
            { "id": 6.0, "story_points": "many" },
        ]);
        let tasks = parse_tasks(&payload).unwrap();
        let points: Vec<_> = tasks.iter().map(|t| t.story_points).collect();

        assert_eq!(points, vec![0, 3, 5, 0, 0, 0]);
        assert_eq!(tasks[5].id, "6");
    }

    #[test]
    fn test_parse_user_stories_defaults_wrong_types() {
        let payload = json!([{
            "idTitle": "US-001",
            "points": "8",
            "total_tasks": "lots",
            "acceptanceCriteria": ["Works offline", 3],
            "comments": [
                { "id": 1, "text": "naive time", "created_at": "2024-03-01T10:00:00" },
                { "id": 2, "text": "bad time", "created_at": "yesterday" },
                "not a comment"
            ],
            "task_list": ["t1", null, 2],
            "status_khanban": 7
        }]);
        let stories = parse_user_stories(&payload).unwrap();
        let story = &stories[0];

        assert_eq!(story.points, 8);
        assert_eq!(story.total_tasks, 0);
        assert_eq!(story.acceptance_criteria, vec!["Works offline".to_string()]);
        assert_eq!(story.comments.len(), 2);
        assert_eq!(
            story.comments[0].created_at.map(|t| t.to_rfc3339()),
            Some("2024-03-01T10:00:00+00:00".to_string())
        );
        assert_eq!(story.comments[1].created_at, None);
        assert_eq!(story.task_list, vec!["t1".to_string(), "2".to_string()]);
        assert_eq!(story.status(), KanbanStatus::Backlog);
    }

    #[test]
    fn test_parse_epics_defaults_wrong_related_list() {
        let payload = json!([
            { "idTitle": "EPIC-001", "relatedRequirements": "REQ-001" },
            { "idTitle": "EPIC-002", "relatedRequirements": [{ "idTitle": "REQ-001", "uuid": 17 }] }
        ]);
        let epics = parse_epics(&payload, &[]).unwrap();

        assert!(epics[0].related_requirements.is_empty());
        assert_eq!(epics[1].related_requirements[0].uuid.as_str(), "17");
    }

    #[test]
    fn test_parse_task_columns_reads_groups_in_board_order() {
        let payload = json!({
            "done": [{ "id": "t3", "status_khanban": "todo" }],
            "todo": [{ "id": "t1" }],
            "backlog": [{ "id": "t0", "status_khanban": "To Do" }],
        });
        let columns = parse_task_columns(&payload).unwrap();
        assert_eq!(
            columns.todo.iter().map(BoardItem::display_id).collect::<Vec<_>>(),
            vec!["t0", "t1", "t3"]
        );
    }

    #[test]
    fn test_parse_projects_and_members() {
        let projects = parse_projects(&json!([{ "id": 1, "name": "Board", "ownerId": "u1" }])).unwrap();
        assert_eq!(projects[0].id, "1");
        assert_eq!(projects[0].owner_id, "u1");

        let project = parse_project(&json!({ "id": "p1", "name": "Solo" })).unwrap();
        assert_eq!(project.name, "Solo");
        assert!(matches!(
            parse_project(&json!("p1")),
            Err(ParseError::InvalidRecord { .. })
        ));

        let members =
            parse_project_members(&json!({ "users": [{ "projectId": "p1", "userId": "u2", "role": "dev" }] }))
                .unwrap();
        assert_eq!(members[0].user_id, "u2");
        assert_eq!(members[0].role, "dev");
    }
}
