use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sw_core::types::{OutputFormat, Role};

#[derive(Parser)]
#[command(name = "sw")]
#[command(about = "Standup Wheel: fair moderator and note-taker rotation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Project directory holding .standup/config.toml (defaults to CWD)
    #[arg(long, global = true)]
    pub cd: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick this round's moderator and note-taker
    Spin {
        /// Wheel state document (.toml or .json)
        #[arg(long)]
        state: PathBuf,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Print the updated state document to stdout
        #[arg(long)]
        emit_state: bool,
    },

    /// Manage the team roster
    Team {
        #[command(subcommand)]
        cmd: TeamCommands,
    },

    /// Reassign a role in the latest round, bypassing fairness
    Override {
        #[arg(long)]
        state: PathBuf,

        #[arg(long, value_enum)]
        role: Role,

        /// Member id or name
        #[arg(long)]
        member: String,
    },

    /// Show/manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum TeamCommands {
    /// Print a fresh state document seeded with the default team
    Seed {
        /// Comma-separated names overriding the configured default team
        #[arg(long)]
        names: Option<String>,
    },

    /// List members with their activity and last-served dates
    List {
        #[arg(long)]
        state: PathBuf,
    },

    /// Add a member, active this week with no role history
    Add {
        #[arg(long)]
        state: PathBuf,

        #[arg(long)]
        name: String,
    },

    /// Remove a member from the team
    Remove {
        #[arg(long)]
        state: PathBuf,

        /// Member id or name
        #[arg(long)]
        member: String,
    },

    /// Flip (or set with --active) whether a member takes part this week
    Toggle {
        #[arg(long)]
        state: PathBuf,

        /// Member id or name
        #[arg(long)]
        member: String,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Mark everyone active except this week's pinned holders
    ResetWeek {
        #[arg(long)]
        state: PathBuf,
    },

    /// Change this week's pinned moderator or note-taker
    Pin {
        #[arg(long)]
        state: PathBuf,

        #[arg(long, value_enum)]
        role: Role,

        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate configuration files
    Validate,
    /// Write a commented template to .standup/config.toml
    Init,
}
