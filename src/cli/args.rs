//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--scene <path>`: Scene snapshot to read
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shotpath - sequence edit paths and publishing for a DCC pipeline engine
#[derive(Parser, Debug)]
#[command(name = "shotpath")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if shotpath was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Scene snapshot exported by the host (default: ./scene.json)
    #[arg(long, global = true)]
    pub scene: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the edit paths from a level sequence to its root sequences
    #[command(
        name = "paths",
        long_about = "List every edit path from a level sequence up to a root sequence.\n\n\
            A sequence used as a shot in several parent sequences has one path per \
            use. Cyclic branches are reported and skipped.",
        after_help = "\
EXAMPLES:
    # Paths of a shot, root first
    shotpath paths /Game/Cine/SH010.SH010

    # Full asset paths instead of names
    shotpath paths /Game/Cine/SH010.SH010 --full"
    )]
    Paths {
        /// Level sequence asset path
        sequence: String,

        /// Print full asset paths instead of names
        #[arg(long)]
        full: bool,
    },

    /// Show the edit index built from the scene
    Index,

    /// List the publish items for the current selection
    Collect,

    /// Validate and publish the current selection
    #[command(
        name = "publish",
        after_help = "\
EXAMPLES:
    # Preview what would be published
    shotpath publish --dry-run

    # Publish one item with a comment
    shotpath publish --item \"SEQ > SH010\" -m \"first pass\""
    )]
    Publish {
        /// Only publish the item with this name
        #[arg(long)]
        item: Option<String>,

        /// Publish description
        #[arg(short = 'm', long)]
        description: Option<String>,

        /// Validate only, do not update the scene
        #[arg(long)]
        dry_run: bool,

        /// Date used for date fields (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },

    /// Show the render command for a level sequence item
    Render {
        /// Item name (default: first level sequence item)
        #[arg(long)]
        item: Option<String>,

        /// Date used for date fields (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },

    /// Loader actions for a published file
    Load {
        /// Published file description (JSON)
        publish: PathBuf,

        /// Action to run; lists available actions when omitted
        #[arg(long)]
        action: Option<String>,
    },

    /// Show the engine menu, or resolve a menu command
    Menu {
        /// Command to execute
        #[arg(long)]
        execute: Option<String>,

        /// Resolve the command without opening anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Get, set, or list configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    shotpath completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    shotpath completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_publish_flags() {
        let cli = Cli::try_parse_from([
            "shotpath",
            "--json",
            "publish",
            "--dry-run",
            "--date",
            "2024-03-09",
            "-m",
            "note",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Publish {
                dry_run,
                date,
                description,
                ..
            } => {
                assert!(dry_run);
                assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2024, 3, 9));
                assert_eq!(description.as_deref(), Some("note"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
