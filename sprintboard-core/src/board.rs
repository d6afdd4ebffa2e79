//! Board assembly: groups tasks and user stories into kanban columns

use std::collections::HashMap;

use crate::models::{BoardItem, Task, TaskColumns, UserStory};

/// Groups tasks into columns by their normalized status, keeping input order
pub fn group_tasks<I>(tasks: I) -> TaskColumns
where
    I: IntoIterator<Item = Task>,
{
    let mut columns = TaskColumns::new();
    for task in tasks {
        columns.push(BoardItem::Task(task));
    }
    columns
}

/// Returns a new board with `stories` appended after the existing items
///
/// Each story goes to the end of the column its `status_khanban` selects
/// (unknown statuses go to the backlog). Neither input is modified.
pub fn merge_user_stories_into_tasks(columns: &TaskColumns, stories: &[UserStory]) -> TaskColumns {
    let mut merged = columns.clone();
    for story in stories {
        merged.push(BoardItem::UserStory(story.clone()));
    }
    merged
}

/// Finds the title of the user story whose `task_list` contains `task_id`
///
/// Linear scan over every column; fine for a single board. Use
/// [`StoryIndex`] when the same board is queried many times.
pub fn user_story_title_by_task_id<'a>(columns: &'a TaskColumns, task_id: &str) -> Option<&'a str> {
    columns
        .iter()
        .flat_map(|(_, items)| items.iter())
        .find_map(|item| match item {
            BoardItem::UserStory(story) if story.task_list.iter().any(|id| id == task_id) => {
                Some(story.title.as_str())
            }
            _ => None,
        })
}

/// Precomputed task id -> parent story title lookup
#[derive(Debug, Clone, Default)]
pub struct StoryIndex {
    titles: HashMap<String, String>,
}

impl StoryIndex {
    /// Builds the index from a board
    ///
    /// When a task is listed by several stories the first one in board order
    /// wins, matching [`user_story_title_by_task_id`].
    pub fn build(columns: &TaskColumns) -> Self {
        let mut titles = HashMap::new();
        for (_, items) in columns.iter() {
            for item in items {
                if let BoardItem::UserStory(story) = item {
                    for task_id in &story.task_list {
                        titles
                            .entry(task_id.clone())
                            .or_insert_with(|| story.title.clone());
                    }
                }
            }
        }
        Self { titles }
    }

    pub fn title_for(&self, task_id: &str) -> Option<&str> {
        self.titles.get(task_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
