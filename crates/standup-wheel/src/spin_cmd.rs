use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use sw_config::{WheelConfig, validate_loaded_config};
use sw_core::types::{Member, OutputFormat, RoundResult};
use sw_roster::{HistoryLog, Roster, WheelState};
use sw_scheduler::{RandomSource, RngSource, apply_round, run_round};

use crate::team_cmds::print_state;

pub(crate) fn handle_spin(
    state_path: PathBuf,
    seed: Option<u64>,
    emit_state: bool,
    cd: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let project_root = crate::determine_project_root(cd.as_deref())?;
    let config = WheelConfig::load_or_default(&project_root)?;
    validate_loaded_config(&config)?;

    let state = WheelState::load(&state_path)?;
    let (mut roster, mut history, pinned) = state.into_parts(&config.team)?;
    roster.apply_pinned(&pinned);

    let mut rng: Box<dyn RandomSource> = match seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_os_rng()),
    };
    let outcome = run_round(
        &roster,
        &pinned,
        history.last(),
        &config,
        rng.as_mut(),
        Utc::now(),
    )
    .context("Failed to spin the wheel")?;
    apply_round(&mut roster, &mut history, &outcome)?;

    if emit_state {
        // stdout carries only the state document; the summary goes to stderr
        print_round_text(&roster, &outcome.result, true);
        let state = WheelState::from_parts(roster, history, outcome.next_pinned);
        return print_state(&state, &format);
    }

    match format {
        OutputFormat::Text => print_round_text(&roster, &outcome.result, false),
        OutputFormat::Json => print_round_json(&roster, &outcome.result)?,
    }
    Ok(())
}

fn slot(roster: &Roster, member: &Member) -> String {
    roster
        .wheel_index(&member.id)
        .map(|i| format!(" (slot {})", i + 1))
        .unwrap_or_default()
}

fn print_round_text(roster: &Roster, result: &RoundResult, to_stderr: bool) {
    let lines = [
        format!("Moderator:  {}{}", result.moderator.name, slot(roster, &result.moderator)),
        format!("Note-taker: {}{}", result.note_taker.name, slot(roster, &result.note_taker)),
    ];
    for line in lines {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

fn print_round_json(roster: &Roster, result: &RoundResult) -> Result<()> {
    let entry = |member: &Member| {
        serde_json::json!({
            "id": member.id,
            "name": member.name,
            "wheelIndex": roster.wheel_index(&member.id),
        })
    };
    let output = serde_json::json!({
        "moderator": entry(&result.moderator),
        "noteTaker": entry(&result.note_taker),
        "timestamp": result.timestamp,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
