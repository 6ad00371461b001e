//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build org-chart hierarchies from flat person records with manager links
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .orgtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Fail on duplicate ids and unresolved or malformed manager references
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the hierarchy as JSON
    Build {
        /// JSON file with person records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the hierarchy as tree
    Tree {
        /// JSON file with person records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Collapse everything below this level
        #[arg(long)]
        depth: Option<usize>,
        /// Record field used as label
        #[arg(short, long)]
        label: Option<String>,
    },

    /// List root ids
    Roots {
        /// JSON file with person records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List leaf ids
    Leaves {
        /// JSON file with person records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Report data issues and statistics
    Check {
        /// JSON file with person records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
