//! Terminal output

use colored::{ColoredString, Colorize};

use sprintboard_core::{
    BoardItem, Epic, KanbanStatus, Priority, Project, ProjectMember, Requirement, StoryIndex,
    TaskColumns, UserStory,
};

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => priority.as_str().red(),
        Priority::Medium => priority.as_str().yellow(),
        Priority::Low => priority.as_str().green(),
    }
}

fn column_heading(status: KanbanStatus, count: usize) -> ColoredString {
    let heading = format!("{} ({})", status.label(), count);
    match status {
        KanbanStatus::Backlog => heading.dimmed(),
        KanbanStatus::Todo => heading.blue().bold(),
        KanbanStatus::InProgress => heading.yellow().bold(),
        KanbanStatus::InReview => heading.magenta().bold(),
        KanbanStatus::Done => heading.green().bold(),
    }
}

pub fn print_board(columns: &TaskColumns) {
    let index = StoryIndex::build(columns);

    for (status, items) in columns.iter() {
        println!("{}", column_heading(status, items.len()));
        if items.is_empty() {
            println!("  {}", "-".dimmed());
        }
        for item in items {
            match item {
                BoardItem::Task(task) => {
                    let parent = index
                        .title_for(&task.id)
                        .map(|title| format!(" ({})", title).dimmed().to_string())
                        .unwrap_or_default();
                    println!(
                        "  {} {} [{}] {}pt{}",
                        task.id.cyan(),
                        task.title,
                        priority_label(task.priority),
                        task.story_points,
                        parent
                    );
                }
                BoardItem::UserStory(story) => {
                    println!(
                        "  {} {} [{}] {}/{} tasks",
                        story.id_title.cyan().bold(),
                        story.title.bold(),
                        priority_label(story.priority),
                        story.task_completed,
                        story.total_tasks
                    );
                }
            }
        }
        println!();
    }
}

pub fn print_requirements(requirements: &[Requirement]) {
    if requirements.is_empty() {
        println!("{}", "No requirements found.".yellow());
        return;
    }
    for req in requirements {
        println!(
            "{} {} [{}] {}",
            req.id_title.cyan(),
            req.title,
            priority_label(req.priority),
            req.category.dimmed()
        );
    }
}

pub fn print_epics(epics: &[Epic]) {
    if epics.is_empty() {
        println!("{}", "No epics found.".yellow());
        return;
    }
    for epic in epics {
        println!("{} {}", epic.id_title.cyan().bold(), epic.title.bold());
        if !epic.description.is_empty() {
            println!("  {}", epic.description.dimmed());
        }
        for req in &epic.related_requirements {
            println!("  - {} {}", req.id_title.cyan(), req.title);
        }
    }
}

pub fn print_stories(stories: &[UserStory]) {
    if stories.is_empty() {
        println!("{}", "No user stories found.".yellow());
        return;
    }
    for story in stories {
        println!(
            "{} {} [{}] {}pt {}",
            story.id_title.cyan(),
            story.title,
            priority_label(story.priority),
            story.points,
            story.status().label().dimmed()
        );
    }
}

pub fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("{}", "No projects found.".yellow());
        return;
    }
    for project in projects {
        println!("{} {}", project.id.cyan(), project.name.bold());
        if !project.description.is_empty() {
            println!("  {}", project.description.dimmed());
        }
    }
}

pub fn print_members(members: &[ProjectMember]) {
    if members.is_empty() {
        println!("{}", "No members found.".yellow());
        return;
    }
    for member in members {
        println!("{} {}", member.user_id.cyan(), member.role.dimmed());
    }
}
