mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use sprintboard_core::normalize::status_key;
use sprintboard_core::{
    config_path, normalize_status, parse_generated_value, ApiClient, Config, GenerationProxy,
    GenerationRequest, HttpTransport, KanbanStatus, NewProject, ProjectMember,
};

use crate::cli::{ApiCommand, Cli, Command, ConfigCommand, ProjectCommand};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::debug!("Using backend {}", config.api_base_url);

    match &cli.command {
        Command::Api(command) => {
            let client = ApiClient::new(&config).context("Failed to create HTTP client")?;
            run_api_command(&client, command, cli.json)
        }
        Command::Generate {
            message,
            save_to_kb,
            project,
        } => generate(&config, message, *save_to_kb, project.as_deref(), cli.json),
        Command::Config(config_cmd) => {
            handle_config_command(config_cmd, &config, cli.config.as_deref(), cli.json)
        }
    }
}

/// Config file and environment, then command-line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(url) = &cli.generation_url {
        config.generation_url = Some(url.clone());
    }
    config.validate().context("Invalid command-line option")?;
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Like the normalizer, but refuses labels that would silently fall back
fn parse_status_arg(raw: &str) -> Result<KanbanStatus> {
    let status = normalize_status(raw);
    if status == KanbanStatus::Backlog && status_key(raw) != "backlog" {
        anyhow::bail!(
            "Unknown status '{}'. Use one of: backlog, todo, in progress, in review, done",
            raw
        );
    }
    Ok(status)
}

fn run_api_command(client: &ApiClient, command: &ApiCommand, json: bool) -> Result<()> {
    match command {
        ApiCommand::Projects { user } => {
            let projects = client
                .list_projects_by_user(user)
                .with_context(|| format!("Failed to load projects for user {}", user))?;
            if json {
                print_json(&projects)?;
            } else {
                render::print_projects(&projects);
            }
        }
        ApiCommand::Project(project_cmd) => handle_project_command(client, project_cmd, json)?,
        ApiCommand::Board { project, grouped } => {
            let board = if *grouped {
                client.get_task_columns(project)
            } else {
                client.board(project)
            }
            .with_context(|| format!("Failed to load board for project {}", project))?;
            if json {
                print_json(&board)?;
            } else {
                render::print_board(&board);
            }
        }
        ApiCommand::Epics { project } => {
            let requirements = client
                .get_requirements(project)
                .with_context(|| format!("Failed to load requirements for project {}", project))?;
            let epics = client
                .get_epics(project, &requirements)
                .with_context(|| format!("Failed to load epics for project {}", project))?;
            if json {
                print_json(&epics)?;
            } else {
                render::print_epics(&epics);
            }
        }
        ApiCommand::Requirements { project } => {
            let requirements = client
                .get_requirements(project)
                .with_context(|| format!("Failed to load requirements for project {}", project))?;
            if json {
                print_json(&requirements)?;
            } else {
                render::print_requirements(&requirements);
            }
        }
        ApiCommand::Stories { project } => {
            let stories = client
                .get_user_stories(project)
                .with_context(|| format!("Failed to load user stories for project {}", project))?;
            if json {
                print_json(&stories)?;
            } else {
                render::print_stories(&stories);
            }
        }
        ApiCommand::MoveTask {
            project,
            task,
            status,
        } => {
            let status = parse_status_arg(status)?;
            client
                .update_task_status(project, task, status)
                .with_context(|| format!("Failed to move task {}", task))?;
            println!("{} {} -> {}", "Moved".green(), task, status.label());
        }
        ApiCommand::DeleteTask { project, task } => {
            client
                .delete_task(project, task)
                .with_context(|| format!("Failed to delete task {}", task))?;
            println!("{} {}", "Deleted task".green(), task);
        }
    }

    Ok(())
}

fn handle_project_command(client: &ApiClient, command: &ProjectCommand, json: bool) -> Result<()> {
    match command {
        ProjectCommand::Show { id } => {
            let project = client
                .get_project(id)
                .with_context(|| format!("Failed to load project {}", id))?;
            if json {
                print_json(&project)?;
            } else {
                render::print_projects(std::slice::from_ref(&project));
            }
        }
        ProjectCommand::Create {
            name,
            description,
            owner,
        } => {
            let project = client
                .create_project(&NewProject {
                    name: name.clone(),
                    description: description.clone(),
                    owner_id: owner.clone(),
                })
                .context("Failed to create project")?;
            println!("{} {}", "Project created:".green(), project.id);
        }
        ProjectCommand::Update {
            id,
            name,
            description,
            owner,
        } => {
            client
                .update_project(
                    id,
                    &NewProject {
                        name: name.clone(),
                        description: description.clone(),
                        owner_id: owner.clone(),
                    },
                )
                .with_context(|| format!("Failed to update project {}", id))?;
            println!("{} {}", "Project updated:".green(), id);
        }
        ProjectCommand::Delete { id } => {
            client
                .delete_project(id)
                .with_context(|| format!("Failed to delete project {}", id))?;
            println!("{} {}", "Project deleted:".green(), id);
        }
        ProjectCommand::Members { id } => {
            let members = client
                .list_project_members(id)
                .with_context(|| format!("Failed to load members of project {}", id))?;
            if json {
                print_json(&members)?;
            } else {
                render::print_members(&members);
            }
        }
        ProjectCommand::AddMember { id, user, role } => {
            client
                .add_project_member(&ProjectMember {
                    project_id: id.clone(),
                    user_id: user.clone(),
                    role: role.clone(),
                })
                .with_context(|| format!("Failed to add {} to project {}", user, id))?;
            println!("{} {} ({})", "Member added:".green(), user, role);
        }
        ProjectCommand::RemoveMember { id, user } => {
            client
                .remove_project_member(id, user)
                .with_context(|| format!("Failed to remove {} from project {}", user, id))?;
            println!("{} {}", "Member removed:".green(), user);
        }
    }
    Ok(())
}

fn generate(
    config: &Config,
    message: &str,
    save_to_kb: bool,
    project: Option<&str>,
    json: bool,
) -> Result<()> {
    let transport = HttpTransport::new(config.timeout()).context("Failed to create HTTP client")?;
    let proxy = GenerationProxy::from_config(config, Arc::new(transport));

    let response = proxy.handle(&GenerationRequest {
        message: message.to_string(),
        save_to_kb,
    });
    if !response.is_success() {
        let reason = response
            .body
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("unknown error");
        anyhow::bail!("Generation failed ({}): {}", response.status, reason);
    }

    let generated =
        parse_generated_value(&response.body).context("Failed to read generated requirements")?;

    if json {
        print_json(&serde_json::json!({
            "requirements": generated.requirements,
            "epics": generated.epics,
        }))?;
    } else {
        render::print_requirements(&generated.requirements);
        println!();
        render::print_epics(&generated.epics);
    }

    if let Some(project) = project {
        let client = ApiClient::new(config).context("Failed to create HTTP client")?;
        client
            .create_requirements(project, &generated.requirements)
            .context("Failed to store generated requirements")?;
        client
            .create_epics(project, &generated.epics)
            .context("Failed to store generated epics")?;
        println!(
            "{} {} requirements and {} epics in project {}",
            "Stored".green(),
            generated.requirements.len(),
            generated.epics.len(),
            project
        );
    }

    Ok(())
}

fn handle_config_command(
    command: &ConfigCommand,
    config: &Config,
    config_file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let path = match config_file {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };
    match command {
        ConfigCommand::Show => {
            if json {
                print_json(config)?;
            } else {
                println!("api_base_url:   {}", config.api_base_url);
                println!(
                    "generation_url: {}",
                    config.generation_url.as_deref().unwrap_or("(not set)")
                );
                match config.timeout_secs {
                    Some(secs) => println!("timeout_secs:   {}", secs),
                    None => println!("timeout_secs:   (default)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Init => {
            config.save(&path)?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_arg() {
        assert_eq!(parse_status_arg("in progress").unwrap(), KanbanStatus::InProgress);
        assert_eq!(parse_status_arg("Backlog").unwrap(), KanbanStatus::Backlog);
        assert!(parse_status_arg("later").is_err());
    }

    #[test]
    fn test_cli_parses_board_command() {
        let cli = Cli::parse_from(["sprintboard", "board", "p1", "--json"]);
        assert!(cli.json);
        match cli.command {
            Command::Api(ApiCommand::Board { project, grouped }) => {
                assert_eq!(project, "p1");
                assert!(!grouped);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_config_file_and_generate() {
        let cli = Cli::parse_from([
            "sprintboard",
            "--config",
            "/tmp/board.yaml",
            "generate",
            "-m",
            "A todo app",
        ]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/board.yaml")));
        assert!(matches!(cli.command, Command::Generate { ref message, .. } if message == "A todo app"));
    }
}
