//! Who sits out a selection: pinned current-week holders plus, when the
//! roster is large enough, last round's holder of the same role.

use std::collections::HashSet;

use sw_config::RotationConfig;
use sw_core::{CurrentWeekRoles, Member, MemberId, RoundResult};
use tracing::debug;

/// Roster-size thresholds for excluding the previous round's holders.
///
/// A previous holder is excluded only when the active roster is strictly
/// larger than the matching threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionPolicy {
    pub exclude_previous_moderator_above: usize,
    pub exclude_previous_note_taker_above: usize,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::from(&RotationConfig::default())
    }
}

impl From<&RotationConfig> for ExclusionPolicy {
    fn from(config: &RotationConfig) -> Self {
        Self {
            exclude_previous_moderator_above: config.exclude_previous_moderator_above,
            exclude_previous_note_taker_above: config.exclude_previous_note_taker_above,
        }
    }
}

/// Ids of every team member holding a pinned role, matched by name.
///
/// Matches against the whole team, not only active members.
pub fn pinned_ids(team: &[Member], pinned: &CurrentWeekRoles) -> HashSet<MemberId> {
    team.iter()
        .filter(|m| pinned.is_pinned(m))
        .map(|m| m.id.clone())
        .collect()
}

/// Exclusions for the moderator draw.
pub fn moderator_exclusions(
    team: &[Member],
    active_count: usize,
    pinned: &CurrentWeekRoles,
    last: Option<&RoundResult>,
    policy: &ExclusionPolicy,
) -> HashSet<MemberId> {
    let mut exclude = pinned_ids(team, pinned);
    if let Some(last) = last {
        if active_count > policy.exclude_previous_moderator_above {
            exclude.insert(last.moderator.id.clone());
        }
    }
    debug!(count = exclude.len(), active = active_count, "Moderator exclusions");
    exclude
}

/// Exclusions for the note-taker draw. The round's moderator is always
/// excluded regardless of roster size.
pub fn note_taker_exclusions(
    team: &[Member],
    active_count: usize,
    pinned: &CurrentWeekRoles,
    last: Option<&RoundResult>,
    moderator: &MemberId,
    policy: &ExclusionPolicy,
) -> HashSet<MemberId> {
    let mut exclude = pinned_ids(team, pinned);
    exclude.insert(moderator.clone());
    if let Some(last) = last {
        if active_count > policy.exclude_previous_note_taker_above {
            exclude.insert(last.note_taker.id.clone());
        }
    }
    debug!(count = exclude.len(), active = active_count, "Note-taker exclusions");
    exclude
}
