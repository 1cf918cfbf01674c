use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config_merge::{merge_toml_values, warn_unknown_sections};
use crate::paths;

/// Current schema version for config.toml
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const DEFAULT_MIN_ACTIVE_MEMBERS: usize = 2;
const DEFAULT_EXCLUDE_PREVIOUS_MODERATOR_ABOVE: usize = 2;
const DEFAULT_EXCLUDE_PREVIOUS_NOTE_TAKER_ABOVE: usize = 3;
const DEFAULT_ACCEPT_PROBABILITY: f64 = 0.05;

const DEFAULT_TEAM_NAMES: [&str; 16] = [
    "Gino",
    "Robert",
    "Ann-Christine",
    "Alina",
    "Sebastian",
    "Mauritz",
    "Andreas",
    "Anna",
    "Aditya",
    "Joshua",
    "Noor",
    "Max",
    "Justus",
    "Johannes",
    "Alessandro",
    "Kenan",
];
const DEFAULT_MODERATOR: &str = "Gino";
const DEFAULT_NOTE_TAKER: &str = "Robert";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub skew: SkewConfig,
    #[serde(default)]
    pub team: TeamConfig,
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            rotation: RotationConfig::default(),
            skew: SkewConfig::default(),
            team: TeamConfig::default(),
        }
    }
}

/// Round-level rotation thresholds.
///
/// The `exclude_*_above` values are strict lower bounds on the active
/// roster size: the previous holder is excluded only when the roster is
/// larger than the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_min_active_members")]
    pub min_active_members: usize,
    #[serde(default = "default_exclude_previous_moderator_above")]
    pub exclude_previous_moderator_above: usize,
    #[serde(default = "default_exclude_previous_note_taker_above")]
    pub exclude_previous_note_taker_above: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            min_active_members: DEFAULT_MIN_ACTIVE_MEMBERS,
            exclude_previous_moderator_above: DEFAULT_EXCLUDE_PREVIOUS_MODERATOR_ABOVE,
            exclude_previous_note_taker_above: DEFAULT_EXCLUDE_PREVIOUS_NOTE_TAKER_ABOVE,
        }
    }
}

fn default_min_active_members() -> usize {
    DEFAULT_MIN_ACTIVE_MEMBERS
}

fn default_exclude_previous_moderator_above() -> usize {
    DEFAULT_EXCLUDE_PREVIOUS_MODERATOR_ABOVE
}

fn default_exclude_previous_note_taker_above() -> usize {
    DEFAULT_EXCLUDE_PREVIOUS_NOTE_TAKER_ABOVE
}

/// Reduced-probability rule for one designated member.
///
/// `name = None` (or an empty string) disables the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_accept_probability")]
    pub accept_probability: f64,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            name: None,
            accept_probability: DEFAULT_ACCEPT_PROBABILITY,
        }
    }
}

impl SkewConfig {
    /// The configured name, ignoring blank values.
    pub fn target_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn default_accept_probability() -> f64 {
    DEFAULT_ACCEPT_PROBABILITY
}

/// Seed team and initial pinned roles for a fresh wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    #[serde(default = "default_team_names")]
    pub default_names: Vec<String>,
    #[serde(default = "default_moderator")]
    pub default_moderator: String,
    #[serde(default = "default_note_taker")]
    pub default_note_taker: String,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            default_names: default_team_names(),
            default_moderator: default_moderator(),
            default_note_taker: default_note_taker(),
        }
    }
}

fn default_team_names() -> Vec<String> {
    DEFAULT_TEAM_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_moderator() -> String {
    DEFAULT_MODERATOR.to_string()
}

fn default_note_taker() -> String {
    DEFAULT_NOTE_TAKER.to_string()
}

impl WheelConfig {
    /// Load user config merged with `{project_root}/.standup/config.toml`.
    ///
    /// Returns `None` when neither file exists.
    pub fn load(project_root: &Path) -> Result<Option<Self>> {
        let project_path = paths::project_config_path(project_root);
        let user_path = paths::user_config_path();
        Self::load_with_paths(user_path.as_deref(), &project_path)
    }

    /// Like [`WheelConfig::load`], falling back to built-in defaults.
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        Ok(Self::load(project_root)?.unwrap_or_default())
    }

    /// Load config from explicit paths. Testable without global filesystem state.
    pub fn load_with_paths(user_path: Option<&Path>, project_path: &Path) -> Result<Option<Self>> {
        let project_exists = project_path.exists();
        let user_path = user_path.filter(|p| p.exists());

        match (user_path, project_exists) {
            (None, false) => Ok(None),
            (Some(user), false) => Self::load_from_path(user).map(Some),
            (None, true) => Self::load_from_path(project_path).map(Some),
            (Some(user), true) => Self::load_merged(user, project_path).map(Some),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        if let Ok(raw) = toml::from_str::<toml::Value>(&content) {
            warn_unknown_sections(&raw, &path.display().to_string());
        }
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.check_schema_version()?;
        Ok(config)
    }

    /// Deep-merge user config (base) with project config (overlay).
    fn load_merged(base_path: &Path, overlay_path: &Path) -> Result<Self> {
        let base_str = std::fs::read_to_string(base_path)
            .with_context(|| format!("Failed to read user config: {}", base_path.display()))?;
        let overlay_str = std::fs::read_to_string(overlay_path).with_context(|| {
            format!("Failed to read project config: {}", overlay_path.display())
        })?;

        let base_val: toml::Value = toml::from_str(&base_str)
            .with_context(|| format!("Failed to parse user config: {}", base_path.display()))?;
        let overlay_val: toml::Value = toml::from_str(&overlay_str).with_context(|| {
            format!("Failed to parse project config: {}", overlay_path.display())
        })?;

        warn_unknown_sections(&base_val, &base_path.display().to_string());
        warn_unknown_sections(&overlay_val, &overlay_path.display().to_string());

        let merged = merge_toml_values(base_val, overlay_val);

        // Roundtrip through string for reliable deserialization
        let merged_str = toml::to_string(&merged).context("Failed to serialize merged config")?;
        let config: Self =
            toml::from_str(&merged_str).context("Failed to deserialize merged config")?;
        config.check_schema_version()?;
        Ok(config)
    }

    /// Reject configs written by a newer binary.
    pub fn check_schema_version(&self) -> Result<()> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            anyhow::bail!(
                "Config schema version {} is newer than this binary supports (v{})",
                self.schema_version,
                CURRENT_SCHEMA_VERSION
            );
        }
        Ok(())
    }

    /// Serialize to TOML for display or writing.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Generate default config TOML with comments as a template.
    pub fn default_template() -> String {
        let names = DEFAULT_TEAM_NAMES
            .iter()
            .map(|name| format!("\"{name}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"# Standup Wheel Configuration
# Location: {{project}}/.standup/config.toml (user-level: ~/.config/standup-wheel/config.toml)

schema_version = {CURRENT_SCHEMA_VERSION}

[rotation]
min_active_members = {DEFAULT_MIN_ACTIVE_MEMBERS}                 # refuse to spin below this many active members
exclude_previous_moderator_above = {DEFAULT_EXCLUDE_PREVIOUS_MODERATOR_ABOVE}   # skip last round's moderator when active > N
exclude_previous_note_taker_above = {DEFAULT_EXCLUDE_PREVIOUS_NOTE_TAKER_ABOVE}  # skip last round's note-taker when active > N

[skew]
# name = "Gino"            # designated member confirmed only with accept_probability
accept_probability = {DEFAULT_ACCEPT_PROBABILITY}

[team]
default_names = [{names}]
default_moderator = "{DEFAULT_MODERATOR}"
default_note_taker = "{DEFAULT_NOTE_TAKER}"
"#
        )
    }

    /// Write the default template to `{project_root}/.standup/config.toml`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn save_default_template(project_root: &Path) -> Result<PathBuf> {
        let path = paths::project_config_path(project_root);
        if path.exists() {
            anyhow::bail!("Config already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&path, Self::default_template())
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "config_merge_tests.rs"]
mod merge_tests;
