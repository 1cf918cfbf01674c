//! Wheel state document: team, round history, and pinned roles.
//!
//! Read from TOML or JSON (by file extension) and rendered back for the
//! caller to store. Nothing here writes to disk.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sw_config::TeamConfig;
use sw_core::{CurrentWeekRoles, Member, RoundResult};

use crate::history::InMemoryHistory;
use crate::roster::Roster;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_week: Option<CurrentWeekRoles>,
    #[serde(default)]
    pub team: Vec<Member>,
    #[serde(default)]
    pub history: Vec<RoundResult>,
}

impl WheelState {
    /// Fresh state with the configured default team and pinned roles.
    ///
    /// `names` overrides the configured default team when non-empty.
    pub fn seeded(team: &TeamConfig, names: &[String]) -> Self {
        let names = if names.is_empty() {
            &team.default_names[..]
        } else {
            names
        };
        Self {
            current_week: Some(CurrentWeekRoles::new(
                &team.default_moderator,
                &team.default_note_taker,
            )),
            team: Roster::seed_default(names).into_members(),
            history: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let state = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        state.with_context(|| format!("Failed to parse state: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML state document")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid JSON state document")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize state as TOML")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize state as JSON")
    }

    /// Pinned roles, falling back to the configured defaults.
    pub fn pinned_or_default(&self, team: &TeamConfig) -> CurrentWeekRoles {
        self.current_week.clone().unwrap_or_else(|| {
            CurrentWeekRoles::new(&team.default_moderator, &team.default_note_taker)
        })
    }

    /// Split into the roster store, history log, and pinned roles.
    pub fn into_parts(
        self,
        team: &TeamConfig,
    ) -> Result<(Roster, InMemoryHistory, CurrentWeekRoles)> {
        let pinned = self.pinned_or_default(team);
        let roster = Roster::new(self.team).context("Invalid team in state document")?;
        Ok((roster, InMemoryHistory::new(self.history), pinned))
    }

    pub fn from_parts(roster: Roster, history: InMemoryHistory, pinned: CurrentWeekRoles) -> Self {
        Self {
            current_week: Some(pinned),
            team: roster.into_members(),
            history: history.into_entries(),
        }
    }
}
