//! Fair-rotation selection for a single role.
//!
//! Candidates are ranked by when they last held the role (never-served
//! first, then longest idle), the most overdue tier is drawn from
//! uniformly, and an optional skew rule may veto one designated member
//! after the draw. Inputs are never mutated.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use sw_config::SkewConfig;
use sw_core::{AppError, Member, MemberId, RoleKey};
use tracing::{debug, warn};

use crate::random::RandomSource;

/// Which member the skew rule applies to.
#[derive(Clone, Default)]
pub enum SkewMatcher {
    #[default]
    Disabled,
    /// Case-insensitive name equality.
    Name(String),
    Predicate(Arc<dyn Fn(&Member) -> bool + Send + Sync>),
}

impl fmt::Debug for SkewMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Post-draw veto: a matched winner is kept only with `accept_probability`.
#[derive(Debug, Clone)]
pub struct SkewRule {
    pub matcher: SkewMatcher,
    pub accept_probability: f64,
}

impl Default for SkewRule {
    fn default() -> Self {
        Self::disabled()
    }
}

impl SkewRule {
    pub fn disabled() -> Self {
        Self {
            matcher: SkewMatcher::Disabled,
            accept_probability: 1.0,
        }
    }

    pub fn for_name(name: impl Into<String>, accept_probability: f64) -> Self {
        Self {
            matcher: SkewMatcher::Name(name.into()),
            accept_probability,
        }
    }

    pub fn for_predicate<F>(predicate: F, accept_probability: f64) -> Self
    where
        F: Fn(&Member) -> bool + Send + Sync + 'static,
    {
        Self {
            matcher: SkewMatcher::Predicate(Arc::new(predicate)),
            accept_probability,
        }
    }

    pub fn from_config(config: &SkewConfig) -> Self {
        match config.target_name() {
            Some(name) => Self::for_name(name, config.accept_probability),
            None => Self::disabled(),
        }
    }

    pub fn matches(&self, member: &Member) -> bool {
        match &self.matcher {
            SkewMatcher::Disabled => false,
            SkewMatcher::Name(name) => member.matches_name(name),
            SkewMatcher::Predicate(predicate) => predicate(member),
        }
    }
}

/// Pick one member for the role tracked by `role`.
///
/// Exclusions are soft: if they would remove everyone, they are ignored.
/// A single remaining candidate is returned without consulting `rng`.
///
/// # Errors
///
/// `AppError::EmptyRoster` when `members` is empty.
pub fn select_with_fair_rotation<'a>(
    members: &'a [Member],
    role: RoleKey,
    exclude: &HashSet<MemberId>,
    skew: &SkewRule,
    rng: &mut dyn RandomSource,
) -> Result<&'a Member, AppError> {
    if members.is_empty() {
        return Err(AppError::EmptyRoster);
    }

    let mut eligible: Vec<&Member> = members
        .iter()
        .filter(|m| !exclude.contains(&m.id))
        .collect();
    if eligible.is_empty() {
        warn!(
            role = %role,
            excluded = exclude.len(),
            "Exclusions cover every member; selecting from the full roster"
        );
        eligible = members.iter().collect();
    }

    if let [only] = eligible.as_slice() {
        debug!(role = %role, member = %only.name, "Single eligible member");
        return Ok(*only);
    }

    let tier = most_overdue_tier(&eligible, role);
    let baseline = tier[rng.pick_index(tier.len())];
    debug!(
        role = %role,
        eligible = eligible.len(),
        tier = tier.len(),
        member = %baseline.name,
        "Tier draw"
    );

    Ok(apply_skew(baseline, &tier, &eligible, skew, rng))
}

/// Members sharing the earliest priority value, in input order.
///
/// `Option`'s ordering puts `None` (never served) before any timestamp.
fn most_overdue_tier<'a>(eligible: &[&'a Member], role: RoleKey) -> Vec<&'a Member> {
    let best = eligible.iter().map(|m| role.of(m)).min().flatten();
    eligible
        .iter()
        .copied()
        .filter(|m| role.of(m) == best)
        .collect()
}

fn apply_skew<'a>(
    baseline: &'a Member,
    tier: &[&'a Member],
    eligible: &[&'a Member],
    skew: &SkewRule,
    rng: &mut dyn RandomSource,
) -> &'a Member {
    if !skew.matches(baseline) {
        return baseline;
    }

    let roll = rng.next_f64();
    if roll <= skew.accept_probability {
        debug!(member = %baseline.name, roll, "Skewed member confirmed");
        return baseline;
    }

    let tier_rest: Vec<&Member> = tier.iter().copied().filter(|m| !skew.matches(m)).collect();
    if !tier_rest.is_empty() {
        let winner = tier_rest[rng.pick_index(tier_rest.len())];
        debug!(rejected = %baseline.name, member = %winner.name, "Skew re-draw within tier");
        return winner;
    }

    // Can land on a member with a worse priority than the skewed one.
    let eligible_rest: Vec<&Member> = eligible
        .iter()
        .copied()
        .filter(|m| !skew.matches(m))
        .collect();
    if !eligible_rest.is_empty() {
        let winner = eligible_rest[rng.pick_index(eligible_rest.len())];
        debug!(
            rejected = %baseline.name,
            member = %winner.name,
            "Skew re-draw across eligible set"
        );
        return winner;
    }

    baseline
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
