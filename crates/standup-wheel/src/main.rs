use anyhow::Result;
use clap::Parser;

mod cli;
mod config_cmds;
mod override_cmd;
mod spin_cmd;
mod team_cmds;

use cli::{Cli, Commands, ConfigCommands, TeamCommands};

fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let format = cli.format;
    let cd = cli.cd;

    match cli.command {
        Commands::Spin {
            state,
            seed,
            emit_state,
        } => spin_cmd::handle_spin(state, seed, emit_state, cd, format)?,
        Commands::Team { cmd } => match cmd {
            TeamCommands::Seed { names } => team_cmds::handle_team_seed(names, cd, format)?,
            TeamCommands::List { state } => team_cmds::handle_team_list(state, format)?,
            TeamCommands::Add { state, name } => {
                team_cmds::handle_team_add(state, name, cd, format)?
            }
            TeamCommands::Remove { state, member } => {
                team_cmds::handle_team_remove(state, member, cd, format)?
            }
            TeamCommands::Toggle {
                state,
                member,
                active,
            } => team_cmds::handle_team_toggle(state, member, active, cd, format)?,
            TeamCommands::ResetWeek { state } => {
                team_cmds::handle_team_reset_week(state, cd, format)?
            }
            TeamCommands::Pin { state, role, name } => {
                team_cmds::handle_team_pin(state, role, name, cd, format)?
            }
        },
        Commands::Override {
            state,
            role,
            member,
        } => override_cmd::handle_override(state, role, member, cd, format)?,
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => config_cmds::handle_config_show(cd, format)?,
            ConfigCommands::Validate => config_cmds::handle_config_validate(cd)?,
            ConfigCommands::Init => config_cmds::handle_config_init(cd)?,
        },
    }

    Ok(())
}

/// Resolve the project root from `--cd`, defaulting to the current directory.
pub(crate) fn determine_project_root(cd: Option<&str>) -> Result<std::path::PathBuf> {
    let path = if let Some(cd_path) = cd {
        std::path::PathBuf::from(cd_path)
    } else {
        std::env::current_dir()?
    };

    Ok(path.canonicalize()?)
}
