//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::HierarchyOutput;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{render_forest, HierarchyIssue};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let local_dir = local_dir(cli)?;
    let mut settings = Settings::load(Some(local_dir.as_path()))?;
    if cli.strict {
        settings.strict = true;
    }
    debug!(?settings, "effective settings");
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Build { file, compact }) => cmd_build(&container, file, *compact),
        Some(Commands::Tree { file, depth, label }) => {
            cmd_tree(&container, file, *depth, label.as_deref())
        }
        Some(Commands::Roots { file }) => cmd_roots(&container, file),
        Some(Commands::Leaves { file }) => cmd_leaves(&container, file),
        Some(Commands::Check { file }) => cmd_check(&container, file),
        Some(Commands::Config { command }) => cmd_config(&container, command, &local_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("resolve current directory", e))),
    }
}

fn report_issues(issues: &[HierarchyIssue]) {
    for issue in issues {
        output::warning(issue);
    }
}

fn build_output(container: &ServiceContainer, file: &Path) -> CliResult<HierarchyOutput> {
    let result = container.hierarchy_service().build(file)?;
    Ok(result)
}

#[instrument(level = "debug", skip(container))]
fn cmd_build(container: &ServiceContainer, file: &Path, compact: bool) -> CliResult<()> {
    let result = build_output(container, file)?;
    report_issues(&result.issues);

    let serialized = if container.settings.pretty && !compact {
        serde_json::to_string_pretty(&result.forest)
    } else {
        serde_json::to_string(&result.forest)
    };
    let json = serialized.map_err(|e| ApplicationError::OperationFailed {
        context: "serialize hierarchy".to_string(),
        source: Box::new(e),
    })?;

    output::info(&json);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    file: &Path,
    depth: Option<usize>,
    label: Option<&str>,
) -> CliResult<()> {
    let result = build_output(container, file)?;
    report_issues(&result.issues);

    let mut options = container.settings.render_options();
    if depth.is_some() {
        options.expand_depth = depth;
    }
    if let Some(label) = label {
        options.label_field = label.to_string();
    }

    print!("{}", render_forest(&result.forest, &options));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_roots(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let result = build_output(container, file)?;
    report_issues(&result.issues);
    for root in &result.forest {
        output::info(root.id());
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_leaves(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let result = build_output(container, file)?;
    report_issues(&result.issues);
    for node in crate::domain::flatten(&result.forest) {
        if node.children.is_empty() {
            output::info(node.id());
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_check(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let result = build_output(container, file)?;
    let stats = result.stats;

    output::header(&format!("Hierarchy: {}", file.display()));
    output::detail(&format!("nodes:  {}", stats.nodes));
    output::detail(&format!("roots:  {}", stats.roots));
    output::detail(&format!("leaves: {}", stats.leaves));
    output::detail(&format!("depth:  {}", stats.depth));

    if result.issues.is_empty() {
        output::success("no issues");
    } else {
        output::header(&format!("Issues ({})", result.issues.len()));
        for issue in &result.issues {
            output::issue(issue);
        }
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"<unavailable>"),
            }
            output::action("local", &local_config_path(local_dir).display());
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(local_dir)
            };

            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }

            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| {
                    CliError::Infra(InfraError::io(format!("write {}", path.display()), e))
                })?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}
