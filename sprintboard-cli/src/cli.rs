use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sprintboard_core::config::{ENV_API_URL, ENV_GENERATION_URL};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Sprint boards, backlogs and requirements from the terminal")]
pub struct Cli {
    /// Config file to read instead of the default location (must exist)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[clap(long, global = true, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// Requirements-generation service URL
    #[clap(long, global = true, env = ENV_GENERATION_URL)]
    pub generation_url: Option<String>,

    /// Print raw JSON instead of formatted output
    #[clap(long, global = true)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[clap(flatten)]
    Api(ApiCommand),

    /// Generate requirements and epics from a description
    Generate {
        /// What the project is about
        #[clap(long, short = 'm')]
        message: String,

        /// Ask the service to keep the answer in its knowledge base
        #[clap(long)]
        save_to_kb: bool,

        /// Store the generated requirements and epics in this project
        #[clap(long, short = 'p')]
        project: Option<String>,
    },

    /// Show or write configuration
    #[clap(subcommand)]
    Config(ConfigCommand),
}

/// Commands that talk to the backend
#[derive(Subcommand, Debug)]
pub enum ApiCommand {
    /// List the projects of a user
    Projects {
        /// User id
        #[clap(long, short = 'u')]
        user: String,
    },

    /// Manage a single project
    #[clap(subcommand)]
    Project(ProjectCommand),

    /// Show the kanban board (tasks and user stories) of a project
    Board {
        /// Project id
        project: String,

        /// Use the backend's pre-grouped task listing (tasks only)
        #[clap(long)]
        grouped: bool,
    },

    /// List the epics of a project
    Epics {
        /// Project id
        project: String,
    },

    /// List the requirements of a project
    Requirements {
        /// Project id
        project: String,
    },

    /// List the user stories of a project
    Stories {
        /// Project id
        project: String,
    },

    /// Move a task to another board column
    MoveTask {
        /// Project id
        project: String,

        /// Task id
        task: String,

        /// Target column (backlog, todo, "in progress", "in review", done)
        status: String,
    },

    /// Delete a task
    DeleteTask {
        /// Project id
        project: String,

        /// Task id
        task: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Show a project
    Show {
        /// Project id
        id: String,
    },

    /// Create a project
    Create {
        #[clap(long)]
        name: String,

        #[clap(long, default_value = "")]
        description: String,

        /// Owner user id
        #[clap(long)]
        owner: String,
    },

    /// Rename or re-describe a project
    Update {
        /// Project id
        id: String,

        #[clap(long)]
        name: String,

        #[clap(long, default_value = "")]
        description: String,

        /// Owner user id
        #[clap(long)]
        owner: String,
    },

    /// Delete a project
    Delete {
        /// Project id
        id: String,
    },

    /// List project members
    Members {
        /// Project id
        id: String,
    },

    /// Add a user to a project
    AddMember {
        /// Project id
        id: String,

        #[clap(long)]
        user: String,

        #[clap(long, default_value = "member")]
        role: String,
    },

    /// Remove a user from a project
    RemoveMember {
        /// Project id
        id: String,

        #[clap(long)]
        user: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the path of the config file
    Path,

    /// Write the effective configuration to the config file
    Init,
}
