pub mod api;
pub mod board;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod generation;
pub mod models;
pub mod normalize;
pub mod parse;
pub mod payload;

// Re-export commonly used types
pub use api::{ApiClient, HttpTransport, Transport};
pub use board::{group_tasks, merge_user_stories_into_tasks, user_story_title_by_task_id, StoryIndex};
pub use config::{config_path, Config};
pub use context::{AppContext, CollectionsContext, SelectionContext, Session, SessionContext};
pub use error::{ApiError, ConfigError, ParseError};
pub use fetch::{FetchState, Query};
pub use generation::{
    parse_generated_requirements, parse_generated_value, GeneratedRequirements, GenerationProxy,
    GenerationRequest, ProxyResponse,
};
pub use models::{
    BoardItem, Comment, Epic, KanbanStatus, NewProject, Priority, Project, ProjectMember,
    RecordUuid, RelatedRequirement, Requirement, Sprint, Task, TaskColumns, TeamMember, UserStory,
};
pub use normalize::{normalize_priorities, normalize_priority, normalize_status};
