//! Application state passed explicitly to views
//!
//! Each context starts from its `Default` value and can be reset back to it.
//! Collections are only ever replaced whole.

use crate::models::{Epic, Requirement, Sprint, UserStory};

/// Signed-in user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Who is signed in. Initially nobody.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What the user has selected. Initially nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionContext {
    pub project_id: Option<String>,
    pub sprint_id: Option<String>,
    pub epic_id: Option<String>,
}

impl SelectionContext {
    /// Selects a project; sprint and epic selections belong to the old one
    /// and are cleared
    pub fn select_project(&mut self, project_id: impl Into<String>) {
        self.project_id = Some(project_id.into());
        self.sprint_id = None;
        self.epic_id = None;
    }

    pub fn select_sprint(&mut self, sprint_id: impl Into<String>) {
        self.sprint_id = Some(sprint_id.into());
    }

    pub fn select_epic(&mut self, epic_id: impl Into<String>) {
        self.epic_id = Some(epic_id.into());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Data loaded for the selected project. Initially empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionsContext {
    sprints: Vec<Sprint>,
    epics: Vec<Epic>,
    requirements: Vec<Requirement>,
    user_stories: Vec<UserStory>,
}

impl CollectionsContext {
    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    pub fn epics(&self) -> &[Epic] {
        &self.epics
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn user_stories(&self) -> &[UserStory] {
        &self.user_stories
    }

    pub fn set_sprints(&mut self, sprints: Vec<Sprint>) {
        self.sprints = sprints;
    }

    pub fn set_epics(&mut self, epics: Vec<Epic>) {
        self.epics = epics;
    }

    pub fn set_requirements(&mut self, requirements: Vec<Requirement>) {
        self.requirements = requirements;
    }

    pub fn set_user_stories(&mut self, user_stories: Vec<UserStory>) {
        self.user_stories = user_stories;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// All contexts a view may depend on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppContext {
    pub session: SessionContext,
    pub selection: SelectionContext,
    pub collections: CollectionsContext,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects another project and drops everything loaded for the old one
    pub fn switch_project(&mut self, project_id: impl Into<String>) {
        self.selection.select_project(project_id);
        self.collections.reset();
    }

    /// Signs out and clears all state
    pub fn reset(&mut self) {
        self.session.reset();
        self.selection.reset();
        self.collections.reset();
    }
}
