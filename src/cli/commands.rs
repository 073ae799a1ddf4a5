//! Command dispatch: each subcommand maps to one `_handler`.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::run_script;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Employee, Operation, OrgEngine};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { chart }) => _tree(cli, chart.as_deref()),
        Some(Commands::Apply {
            chart,
            ops,
            strict,
            export,
            history,
        }) => _apply(cli, chart.as_deref(), ops, *strict, *export, *history),
        Some(Commands::Demo) => _demo(cli),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

/// Settings for a run: layered config plus command line overrides.
fn effective_settings(cli: &Cli, chart: Option<&Path>) -> CliResult<Settings> {
    let mut settings = Settings::load(chart.and_then(Path::parent))?;
    if chart.is_none() {
        // Local config lives next to the default chart, if there is one
        if let Some(default_chart) = settings.default_chart.clone() {
            settings = Settings::load(default_chart.parent())?;
        }
    }
    if let Some(policy) = cli.redo_policy {
        settings.redo_policy = policy;
    }
    if cli.show_ids {
        settings.show_ids = true;
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

fn resolve_chart(chart: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    chart
        .map(Path::to_path_buf)
        .or_else(|| settings.default_chart.clone())
        .ok_or_else(|| {
            CliError::Usage("no chart given (use --chart or set default_chart)".to_string())
        })
}

fn print_tree(engine: &OrgEngine, show_ids: bool) {
    output::info(&engine.tree().to_tree_string(show_ids));
}

#[instrument(skip(cli))]
fn _tree(cli: &Cli, chart: Option<&Path>) -> CliResult<()> {
    let settings = effective_settings(cli, chart)?;
    let path = resolve_chart(chart, &settings)?;
    let container = ServiceContainer::new(settings);
    let engine = container
        .charts
        .load_engine(&path, container.settings.redo_policy)?;
    print_tree(&engine, container.settings.show_ids);
    Ok(())
}

#[instrument(skip(cli, ops))]
fn _apply(
    cli: &Cli,
    chart: Option<&Path>,
    ops: &[Operation],
    strict: bool,
    export: bool,
    history: bool,
) -> CliResult<()> {
    let settings = effective_settings(cli, chart)?;
    let path = resolve_chart(chart, &settings)?;
    let container = ServiceContainer::new(settings);
    let mut engine = container
        .charts
        .load_engine(&path, container.settings.redo_policy)?;

    let outcomes = run_script(&mut engine, ops, strict)?;
    outcomes.iter().for_each(output::outcome);

    if export {
        output::info(&container.charts.export(&engine)?);
    } else {
        print_tree(&engine, container.settings.show_ids);
    }
    if history {
        output::records("undo", engine.history());
        output::records("redo", engine.redo_stack());
    }

    if strict {
        if let Some(e) = outcomes.iter().find_map(|o| o.result.as_ref().err()) {
            return Err(e.clone().into());
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _demo(cli: &Cli) -> CliResult<()> {
    let settings = effective_settings(cli, None)?;
    let root = Employee::new(1, "CEO").with_subordinates(vec![
        Employee::new(2, "Employee 1"),
        Employee::new(3, "Employee 2"),
    ]);
    let mut engine = OrgEngine::new(root)?.with_policy(settings.redo_policy);

    output::header("Initial chart");
    print_tree(&engine, settings.show_ids);

    let steps = [
        Operation::Move {
            employee: 2,
            supervisor: 3,
        },
        Operation::Move {
            employee: 3,
            supervisor: 2,
        },
        Operation::Move {
            employee: 1,
            supervisor: 2,
        },
        Operation::Undo,
        Operation::Redo,
    ];
    for op in steps {
        output::info("");
        run_script(&mut engine, &[op], false)?
            .iter()
            .for_each(output::outcome);
        print_tree(&engine, settings.show_ids);
    }
    Ok(())
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = effective_settings(cli, None)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {}", p.display())),
                None => output::detail("global: (no config directory)"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(Path::new("<chart_dir>")).display()
            ));
        }
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
