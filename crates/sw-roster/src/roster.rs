use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sw_core::{AppError, CurrentWeekRoles, Member, MemberId, Role, RoleKey, RoundResult};
use tracing::{debug, info};

/// Source of roster snapshots and sink for post-round timestamp updates.
pub trait RosterStore {
    fn members(&self) -> &[Member];

    /// Snapshot of members marked active this week.
    fn active_members(&self) -> Vec<Member> {
        self.members()
            .iter()
            .filter(|m| m.is_active)
            .cloned()
            .collect()
    }

    fn get(&self, id: &MemberId) -> Option<&Member> {
        self.members().iter().find(|m| &m.id == id)
    }

    /// Record that `id` held the role tracked by `key` at `at`.
    fn stamp(&mut self, id: &MemberId, key: RoleKey, at: DateTime<Utc>) -> Result<(), AppError>;
}

/// In-memory roster with unique member ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Member>,
}

impl RosterStore for Roster {
    fn members(&self) -> &[Member] {
        &self.members
    }

    fn stamp(&mut self, id: &MemberId, key: RoleKey, at: DateTime<Utc>) -> Result<(), AppError> {
        let member = self.get_mut(id)?;
        member.stamp(key, at);
        debug!(member = %member.name, role = %key, "Stamped role timestamp");
        Ok(())
    }
}

impl Roster {
    pub fn new(members: Vec<Member>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(&member.id) {
                return Err(AppError::DuplicateMemberId(member.id.to_string()));
            }
        }
        Ok(Self { members })
    }

    /// Fresh roster with every name active and no role history.
    pub fn seed_default(names: &[String]) -> Self {
        Self {
            members: names.iter().map(|name| Member::new(name.trim())).collect(),
        }
    }

    pub fn into_members(self) -> Vec<Member> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_active).count()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.matches_name(name))
    }

    /// Add a new active member. The name is trimmed and must be non-empty.
    pub fn add_member(&mut self, name: &str) -> Result<&Member, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidMemberName);
        }
        self.insert(Member::new(name))?;
        info!(member = name, "Added member");
        Ok(&self.members[self.members.len() - 1])
    }

    pub fn insert(&mut self, member: Member) -> Result<(), AppError> {
        if self.members.iter().any(|m| m.id == member.id) {
            return Err(AppError::DuplicateMemberId(member.id.to_string()));
        }
        self.members.push(member);
        Ok(())
    }

    pub fn remove_member(&mut self, id: &MemberId) -> Result<Member, AppError> {
        let pos = self
            .members
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| AppError::MemberNotFound(id.to_string()))?;
        let removed = self.members.remove(pos);
        info!(member = %removed.name, "Removed member");
        Ok(removed)
    }

    pub fn set_active(&mut self, id: &MemberId, active: bool) -> Result<(), AppError> {
        let member = self.get_mut(id)?;
        member.is_active = active;
        debug!(member = %member.name, active, "Set activity");
        Ok(())
    }

    /// Position of `id` among active members, in roster order.
    pub fn wheel_index(&self, id: &MemberId) -> Option<usize> {
        self.members
            .iter()
            .filter(|m| m.is_active)
            .position(|m| &m.id == id)
    }

    /// Toggle off pinned holders that are still marked active.
    ///
    /// Returns whether anything changed.
    pub fn apply_pinned(&mut self, pinned: &CurrentWeekRoles) -> bool {
        let mut changed = false;
        for member in &mut self.members {
            if member.is_active && pinned.is_pinned(member) {
                member.is_active = false;
                changed = true;
            }
        }
        changed
    }

    /// Start a new week: everyone active except the pinned holders.
    pub fn reset_week(&mut self, pinned: &CurrentWeekRoles) {
        for member in &mut self.members {
            member.is_active = !pinned.is_pinned(member);
        }
        info!(active = self.active_count(), "Reset roster for next week");
    }

    /// Hand a pinned role to `new_name`.
    ///
    /// The new holder is toggled off; the previous holder is toggled back on
    /// unless they still hold the other pinned role.
    pub fn change_pinned(&mut self, pinned: &mut CurrentWeekRoles, role: Role, new_name: &str) {
        let old_name = pinned.name_for(role).to_string();
        let other_name = pinned.name_for(role.other()).to_string();
        for member in &mut self.members {
            if member.matches_name(new_name) {
                member.is_active = false;
            } else if member.matches_name(&old_name) && !member.matches_name(&other_name) {
                member.is_active = true;
            }
        }
        pinned.set(role, new_name);
        info!(role = %role, from = %old_name, to = new_name, "Changed pinned role");
    }

    fn get_mut(&mut self, id: &MemberId) -> Result<&mut Member, AppError> {
        self.members
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| AppError::MemberNotFound(id.to_string()))
    }
}

/// Replace the holder of `role` in a finished round, bypassing fairness.
///
/// The new holder is stamped at `now` and the round timestamp refreshed.
/// The previous holder's timestamp is left as is.
pub fn override_assignment<S: RosterStore + ?Sized>(
    store: &mut S,
    result: &mut RoundResult,
    role: Role,
    member_id: &MemberId,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let member = store
        .get(member_id)
        .cloned()
        .ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))?;
    store.stamp(member_id, role.key(), now)?;

    info!(role = %role, from = %result.holder(role).name, to = %member.name, "Manual override");
    match role {
        Role::Moderator => result.moderator = member,
        Role::NoteTaker => result.note_taker = member,
    }
    result.timestamp = now;
    Ok(())
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod tests;
