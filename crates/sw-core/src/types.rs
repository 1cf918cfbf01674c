use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Opaque member identifier, unique within a roster.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh ULID-backed identifier.
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A person on the team roster.
///
/// Field names on the wire keep the camelCase shape of exported team data
/// (`isActiveThisWeek`, `lastModeratorAt`, `lastNoteTakerAt`).
/// Unset timestamps are omitted on output rather than written as `null`;
/// TOML has no null, and both forms read back the same.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(rename = "isActiveThisWeek", default = "default_active")]
    pub is_active: bool,
    #[serde(
        rename = "lastModeratorAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_moderator_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "lastNoteTakerAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_note_taker_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Member {
    /// New active member with a generated id and no role history.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(MemberId::generate(), name)
    }

    pub fn with_id(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: true,
            last_moderator_at: None,
            last_note_taker_at: None,
        }
    }

    /// Case-insensitive name comparison.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn stamp(&mut self, key: RoleKey, at: DateTime<Utc>) {
        match key {
            RoleKey::LastModeratorAt => self.last_moderator_at = Some(at),
            RoleKey::LastNoteTakerAt => self.last_note_taker_at = Some(at),
        }
    }
}

/// Which per-member timestamp drives the fairness ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKey {
    #[serde(rename = "lastModeratorAt")]
    LastModeratorAt,
    #[serde(rename = "lastNoteTakerAt")]
    LastNoteTakerAt,
}

impl RoleKey {
    pub fn of(&self, member: &Member) -> Option<DateTime<Utc>> {
        match self {
            Self::LastModeratorAt => member.last_moderator_at,
            Self::LastNoteTakerAt => member.last_note_taker_at,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastModeratorAt => "lastModeratorAt",
            Self::LastNoteTakerAt => "lastNoteTakerAt",
        }
    }
}

impl std::fmt::Display for RoleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two roles handed out each round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Moderator,
    NoteTaker,
}

impl Role {
    pub fn key(&self) -> RoleKey {
        match self {
            Self::Moderator => RoleKey::LastModeratorAt,
            Self::NoteTaker => RoleKey::LastNoteTakerAt,
        }
    }

    /// The role whose holder must not also take this one in the same round.
    pub fn other(&self) -> Role {
        match self {
            Self::Moderator => Self::NoteTaker,
            Self::NoteTaker => Self::Moderator,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderator => "moderator",
            Self::NoteTaker => "note-taker",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed round: who got which role, and when.
///
/// Members are snapshots taken at selection time, not live roster entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub moderator: Member,
    pub note_taker: Member,
    pub timestamp: DateTime<Utc>,
}

impl RoundResult {
    pub fn holder(&self, role: Role) -> &Member {
        match role {
            Role::Moderator => &self.moderator,
            Role::NoteTaker => &self.note_taker,
        }
    }
}

/// Names of this week's fixed role holders.
///
/// Pinned holders sit out the next round. Matching against the roster is
/// by case-insensitive name, so a renamed or removed member simply stops
/// matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeekRoles {
    pub moderator: String,
    pub note_taker: String,
}

impl CurrentWeekRoles {
    pub fn new(moderator: impl Into<String>, note_taker: impl Into<String>) -> Self {
        Self {
            moderator: moderator.into(),
            note_taker: note_taker.into(),
        }
    }

    pub fn name_for(&self, role: Role) -> &str {
        match role {
            Role::Moderator => &self.moderator,
            Role::NoteTaker => &self.note_taker,
        }
    }

    pub fn set(&mut self, role: Role, name: impl Into<String>) {
        match role {
            Role::Moderator => self.moderator = name.into(),
            Role::NoteTaker => self.note_taker = name.into(),
        }
    }

    /// True when `member` holds either pinned role.
    pub fn is_pinned(&self, member: &Member) -> bool {
        member.matches_name(&self.moderator) || member.matches_name(&self.note_taker)
    }
}

impl From<&RoundResult> for CurrentWeekRoles {
    fn from(result: &RoundResult) -> Self {
        Self::new(&result.moderator.name, &result.note_taker.name)
    }
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
