use std::path::{Path, PathBuf};

use anyhow::Result;
use sw_config::WheelConfig;
use sw_core::AppError;
use sw_core::types::{CurrentWeekRoles, MemberId, OutputFormat, Role};
use sw_roster::{InMemoryHistory, Roster, RosterStore, WheelState};

/// Render a state document: TOML for text output, JSON otherwise.
pub(crate) fn print_state(state: &WheelState, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", state.to_toml()?),
        OutputFormat::Json => println!("{}", state.to_json()?),
    }
    Ok(())
}

/// Resolve `member` as a case-insensitive name, then as an id.
pub(crate) fn resolve_member(roster: &Roster, member: &str) -> Result<MemberId, AppError> {
    let member = member.trim();
    roster
        .find_by_name(member)
        .or_else(|| roster.get(&MemberId::new(member)))
        .map(|m| m.id.clone())
        .ok_or_else(|| AppError::MemberNotFound(member.to_string()))
}

/// Read the state document and split it using the project's team defaults.
pub(crate) fn load_parts(
    state_path: &Path,
    cd: Option<String>,
) -> Result<(Roster, InMemoryHistory, CurrentWeekRoles)> {
    let project_root = crate::determine_project_root(cd.as_deref())?;
    let config = WheelConfig::load_or_default(&project_root)?;
    WheelState::load(state_path)?.into_parts(&config.team)
}

pub(crate) fn handle_team_seed(
    names: Option<String>,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let project_root = crate::determine_project_root(cd.as_deref())?;
    let config = WheelConfig::load_or_default(&project_root)?;

    let names: Vec<String> = names
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect();

    let state = WheelState::seeded(&config.team, &names);
    eprintln!("Seeded team with {} members", state.team.len());
    print_state(&state, &format)
}

pub(crate) fn handle_team_list(state_path: PathBuf, format: OutputFormat) -> Result<()> {
    let state = WheelState::load(&state_path)?;

    match format {
        OutputFormat::Text => {
            if let Some(week) = &state.current_week {
                println!(
                    "This week: moderator {}, note-taker {}",
                    week.moderator, week.note_taker
                );
            }
            println!(
                "{:<20} {:<8} {:<26} {:<26}",
                "NAME", "ACTIVE", "LAST MODERATOR", "LAST NOTE-TAKER"
            );
            for member in &state.team {
                let fmt = |at: Option<chrono::DateTime<chrono::Utc>>| {
                    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string())
                };
                println!(
                    "{:<20} {:<8} {:<26} {:<26}",
                    member.name,
                    if member.is_active { "yes" } else { "no" },
                    fmt(member.last_moderator_at),
                    fmt(member.last_note_taker_at),
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "currentWeek": state.current_week,
                "team": state.team,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

pub(crate) fn handle_team_reset_week(
    state_path: PathBuf,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let (mut roster, history, pinned) = load_parts(&state_path, cd)?;
    roster.reset_week(&pinned);
    eprintln!(
        "{} of {} members active this week",
        roster.active_count(),
        roster.members().len()
    );

    print_state(&WheelState::from_parts(roster, history, pinned), &format)
}

pub(crate) fn handle_team_pin(
    state_path: PathBuf,
    role: Role,
    name: String,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let (mut roster, history, mut pinned) = load_parts(&state_path, cd)?;
    let name = roster
        .find_by_name(name.trim())
        .map(|m| m.name.clone())
        .ok_or_else(|| anyhow::anyhow!("No team member named '{}'", name.trim()))?;

    roster.change_pinned(&mut pinned, role, &name);
    eprintln!("{} this week: {}", role, name);

    print_state(&WheelState::from_parts(roster, history, pinned), &format)
}

pub(crate) fn handle_team_add(
    state_path: PathBuf,
    name: String,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let (mut roster, history, pinned) = load_parts(&state_path, cd)?;
    let added = roster.add_member(&name)?;
    eprintln!("Added {} ({})", added.name, added.id);

    print_state(&WheelState::from_parts(roster, history, pinned), &format)
}

pub(crate) fn handle_team_remove(
    state_path: PathBuf,
    member: String,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let (mut roster, history, pinned) = load_parts(&state_path, cd)?;
    let id = resolve_member(&roster, &member)?;
    let removed = roster.remove_member(&id)?;
    eprintln!("Removed {}", removed.name);

    print_state(&WheelState::from_parts(roster, history, pinned), &format)
}

pub(crate) fn handle_team_toggle(
    state_path: PathBuf,
    member: String,
    active: Option<bool>,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let (mut roster, history, pinned) = load_parts(&state_path, cd)?;
    let id = resolve_member(&roster, &member)?;
    let active = match active {
        Some(active) => active,
        None => !roster.get(&id).is_some_and(|m| m.is_active),
    };
    roster.set_active(&id, active)?;
    eprintln!(
        "{} is {} this week",
        member.trim(),
        if active { "active" } else { "inactive" }
    );

    print_state(&WheelState::from_parts(roster, history, pinned), &format)
}
