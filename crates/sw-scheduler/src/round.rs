//! One round: moderator first, then note-taker, each with its own exclusions.

use chrono::{DateTime, Utc};
use sw_config::WheelConfig;
use sw_core::{AppError, CurrentWeekRoles, RoleKey, RoundResult};
use sw_roster::{HistoryLog, RosterStore};
use tracing::info;

use crate::exclusion::{ExclusionPolicy, moderator_exclusions, note_taker_exclusions};
use crate::random::RandomSource;
use crate::rotation::{SkewRule, select_with_fair_rotation};

/// Result of a round plus the pinned roles for the following one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub result: RoundResult,
    pub next_pinned: CurrentWeekRoles,
}

/// Select a moderator and a note-taker from the active members of `store`.
///
/// Pure: nothing is stamped or recorded. Use [`apply_round`] to commit.
///
/// # Errors
///
/// `AppError::NotEnoughActiveMembers` when fewer than
/// `rotation.min_active_members` members are active.
pub fn run_round<S>(
    store: &S,
    pinned: &CurrentWeekRoles,
    last: Option<&RoundResult>,
    config: &WheelConfig,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> Result<RoundOutcome, AppError>
where
    S: RosterStore + ?Sized,
{
    let team = store.members();
    let active = store.active_members();
    let required = config.rotation.min_active_members;
    if active.len() < required {
        return Err(AppError::NotEnoughActiveMembers {
            active: active.len(),
            required,
        });
    }

    let policy = ExclusionPolicy::from(&config.rotation);
    let skew = SkewRule::from_config(&config.skew);

    let exclude = moderator_exclusions(team, active.len(), pinned, last, &policy);
    let moderator =
        select_with_fair_rotation(&active, RoleKey::LastModeratorAt, &exclude, &skew, rng)?
            .clone();

    let exclude = note_taker_exclusions(team, active.len(), pinned, last, &moderator.id, &policy);
    let note_taker =
        select_with_fair_rotation(&active, RoleKey::LastNoteTakerAt, &exclude, &skew, rng)?
            .clone();

    info!(
        moderator = %moderator.name,
        note_taker = %note_taker.name,
        active = active.len(),
        "Round selected"
    );

    let result = RoundResult {
        moderator,
        note_taker,
        timestamp: now,
    };
    let next_pinned = CurrentWeekRoles::from(&result);
    Ok(RoundOutcome {
        result,
        next_pinned,
    })
}

/// Stamp both winners at the round timestamp and append the round to history.
///
/// Both winners are looked up before anything is stamped, so an unknown id
/// leaves the store and history untouched.
pub fn apply_round<S, H>(
    store: &mut S,
    history: &mut H,
    outcome: &RoundOutcome,
) -> Result<(), AppError>
where
    S: RosterStore + ?Sized,
    H: HistoryLog + ?Sized,
{
    let result = &outcome.result;
    for id in [&result.moderator.id, &result.note_taker.id] {
        if store.get(id).is_none() {
            return Err(AppError::MemberNotFound(id.to_string()));
        }
    }
    store.stamp(&result.moderator.id, RoleKey::LastModeratorAt, result.timestamp)?;
    store.stamp(&result.note_taker.id, RoleKey::LastNoteTakerAt, result.timestamp)?;
    history.append(result.clone());
    Ok(())
}

#[cfg(test)]
#[path = "round_tests.rs"]
mod tests;
