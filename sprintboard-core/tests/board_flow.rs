//! End-to-end flows from raw API JSON to board columns and back to payloads

use serde_json::json;
use sprintboard_core::parse::{parse_epics, parse_requirements, parse_tasks, parse_user_stories};
use sprintboard_core::payload::user_stories_batch_payload;
use sprintboard_core::{
    group_tasks, merge_user_stories_into_tasks, normalize_priorities, user_story_title_by_task_id,
    BoardItem, KanbanStatus, Priority, StoryIndex,
};

fn ids(items: &[BoardItem]) -> Vec<&str> {
    items.iter().map(BoardItem::display_id).collect()
}

#[test]
fn raw_tasks_are_grouped_by_status() {
    let tasks = parse_tasks(&json!([
        { "id": "t1", "status_khanban": "To Do" },
        { "id": "t2", "status_khanban": "done" },
        { "id": "t3", "status_khanban": "weird" },
    ]))
    .unwrap();

    let columns = group_tasks(tasks);

    assert_eq!(ids(&columns.todo), vec!["t1"]);
    assert_eq!(ids(&columns.done), vec!["t2"]);
    assert_eq!(ids(&columns.backlog), vec!["t3"]);
    assert!(columns.inprogress.is_empty());
    assert!(columns.inreview.is_empty());
}

#[test]
fn priority_list_is_normalized() {
    assert_eq!(
        normalize_priorities(&["alta", "baja", "media", "???"]),
        vec![Priority::High, Priority::Low, Priority::Medium, Priority::Medium]
    );
}

#[test]
fn stories_are_merged_after_tasks_and_linked_back() {
    let tasks = parse_tasks(&json!([
        { "id": "t1", "status_khanban": "backlog" },
        { "id": "t2", "status_khanban": "In Review" },
    ]))
    .unwrap();
    let stories = parse_user_stories(&json!([
        { "idTitle": "US-002", "title": "Share", "status_khanban": "", "task_list": ["t1"] },
        { "idTitle": "US-001", "title": "Login", "status_khanban": " in review", "task_list": ["t2"] },
    ]))
    .unwrap();

    let columns = group_tasks(tasks);
    let board = merge_user_stories_into_tasks(&columns, &stories);

    assert_eq!(ids(&board.backlog), vec!["t1", "US-002"]);
    assert_eq!(ids(&board.inreview), vec!["t2", "US-001"]);
    assert_eq!(board.len(), columns.len() + stories.len());
    assert_eq!(board.column(KanbanStatus::Todo).len(), 0);

    assert_eq!(user_story_title_by_task_id(&board, "t2"), Some("Login"));
    assert_eq!(StoryIndex::build(&board).title_for("t1"), Some("Share"));
}

#[test]
fn reparsing_keeps_uuids_and_epics_share_them() {
    let requirements_json = json!([
        { "idTitle": "REQ-002", "title": "Reset password" },
        { "idTitle": "REQ-001", "title": "Login" },
    ]);
    let requirements = parse_requirements(&requirements_json).unwrap();

    // Feed the parsed records back through the parser, as a save/reload would.
    let reloaded = parse_requirements(&serde_json::to_value(&requirements).unwrap()).unwrap();
    assert_eq!(reloaded, requirements);

    let epics = parse_epics(
        &json!([{
            "idTitle": "EPIC-001",
            "relatedRequirements": [
                { "idTitle": "REQ-001" },
                { "idTitle": "REQ-002" }
            ]
        }]),
        &reloaded,
    )
    .unwrap();

    let related = &epics[0].related_requirements;
    assert_eq!(related[0].uuid, reloaded[0].uuid);
    assert_eq!(related[1].uuid, reloaded[1].uuid);
}

#[test]
fn parsed_stories_produce_batch_payload() {
    let stories = parse_user_stories(&json!([{
        "idTitle": "US-001",
        "acceptanceCriteria": ["Works offline"],
        "priority": "ALTA",
        "task_list": [1, 2]
    }]))
    .unwrap();

    let body = serde_json::to_value(user_stories_batch_payload("p1", &stories)).unwrap();
    let item = &body["user_stories"][0];

    assert_eq!(item["acceptance_criteria"], json!(["Works offline"]));
    assert_eq!(item["priority"], "High");
    assert_eq!(item["task_list"], json!(["1", "2"]));
    assert_eq!(item["uuid"], stories[0].uuid.to_string());
}

#[test]
fn one_malformed_task_does_not_blank_the_board() {
    let tasks = parse_tasks(&json!([
        { "id": "t1", "status_khanban": "To Do" },
        { "id": "t2", "status_khanban": "done", "story_points": 3.0, "title": 42 },
    ]))
    .unwrap();

    let columns = group_tasks(tasks);

    assert_eq!(ids(&columns.todo), vec!["t1"]);
    assert_eq!(ids(&columns.done), vec!["t2"]);
    assert_eq!(columns.done[0].title(), "");
}
