//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{Operation, RedoPolicy};

/// Organization chart engine: reparent employees with cycle checks and undo/redo
#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Override the configured redo policy (discard | retain)
    #[arg(long, global = true)]
    pub redo_policy: Option<RedoPolicy>,

    /// Show employee ids next to names
    #[arg(long, global = true)]
    pub show_ids: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a chart as a tree
    Tree {
        /// Chart file (default: configured default_chart)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        chart: Option<PathBuf>,
    },

    /// Apply operations to a chart and show the result
    Apply {
        /// Chart file (default: configured default_chart)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        chart: Option<PathBuf>,

        /// Operations: move:<employee>:<supervisor>, undo, redo
        #[arg(required = true, num_args = 1..)]
        ops: Vec<Operation>,

        /// Abort on the first rejected operation
        #[arg(long)]
        strict: bool,

        /// Print the resulting chart as TOML instead of a tree
        #[arg(long)]
        export: bool,

        /// Also list pending undo/redo entries
        #[arg(long)]
        history: bool,
    },

    /// Walk through the move/undo/redo sample scenario
    Demo,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}
