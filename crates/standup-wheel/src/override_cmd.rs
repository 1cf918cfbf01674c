use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use sw_core::types::{OutputFormat, Role};
use sw_roster::{HistoryLog, WheelState, override_assignment};

use crate::team_cmds::{load_parts, print_state, resolve_member};

/// Reassign `role` in the latest round. `member` is an id or a name.
pub(crate) fn handle_override(
    state_path: PathBuf,
    role: Role,
    member: String,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let (mut roster, mut history, mut pinned) = load_parts(&state_path, cd)?;
    let member_id = resolve_member(&roster, &member)?;

    let latest = history
        .last_mut()
        .context("No round recorded yet; spin the wheel first")?;
    override_assignment(&mut roster, latest, role, &member_id, Utc::now())?;
    let new_name = latest.holder(role).name.clone();

    pinned.set(role, new_name.as_str());
    eprintln!("{} overridden: {}", role, new_name);

    print_state(&WheelState::from_parts(roster, history, pinned), &format)
}
