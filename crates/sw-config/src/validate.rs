use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

use sw_core::AppError;

use crate::config::WheelConfig;

fn invalid(message: impl Into<String>) -> anyhow::Error {
    AppError::InvalidConfig(message.into()).into()
}

/// Validate the effective configuration for a project.
/// Missing files validate as the built-in defaults.
pub fn validate_config(project_root: &Path) -> Result<()> {
    let config = WheelConfig::load_or_default(project_root)?;
    validate_loaded_config(&config)
}

pub fn validate_loaded_config(config: &WheelConfig) -> Result<()> {
    validate_rotation(config)?;
    validate_skew(config)?;
    validate_team(config)?;
    Ok(())
}

fn validate_rotation(config: &WheelConfig) -> Result<()> {
    let rotation = &config.rotation;
    if rotation.min_active_members < 2 {
        return Err(invalid(format!(
            "rotation.min_active_members must be >= 2 (got {}). \
             A round needs distinct moderator and note-taker.",
            rotation.min_active_members
        )));
    }
    if rotation.exclude_previous_note_taker_above < rotation.exclude_previous_moderator_above {
        return Err(invalid(format!(
            "rotation.exclude_previous_note_taker_above ({}) must be >= \
             rotation.exclude_previous_moderator_above ({}). \
             The note-taker pool already loses the new moderator.",
            rotation.exclude_previous_note_taker_above,
            rotation.exclude_previous_moderator_above
        )));
    }
    Ok(())
}

fn validate_skew(config: &WheelConfig) -> Result<()> {
    let p = config.skew.accept_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(invalid(format!(
            "skew.accept_probability must be within [0, 1] (got {p})"
        )));
    }
    if let Some(name) = config.skew.target_name() {
        let known = config
            .team
            .default_names
            .iter()
            .any(|n| n.to_lowercase() == name.to_lowercase());
        if !known {
            tracing::warn!(
                skew = name,
                "skew.name matches no default team name; it still applies to members added later"
            );
        }
    }
    Ok(())
}

fn validate_team(config: &WheelConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for name in &config.team.default_names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(invalid("team.default_names cannot contain empty names"));
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(invalid(format!(
                "team.default_names contains duplicate name '{trimmed}'"
            )));
        }
    }
    if config.team.default_moderator.trim().is_empty() {
        return Err(invalid("team.default_moderator cannot be empty"));
    }
    if config.team.default_note_taker.trim().is_empty() {
        return Err(invalid("team.default_note_taker cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        validate_loaded_config(&WheelConfig::default()).unwrap();
    }

    #[test]
    fn test_validate_config_without_files_uses_defaults() {
        let dir = tempdir().unwrap();
        // A user-level config may exist on the host; only assert that the
        // project-less path does not error on defaults.
        if !crate::paths::user_config_path().is_some_and(|p| p.exists()) {
            validate_config(dir.path()).unwrap();
        }
    }

    #[test]
    fn test_rejects_min_active_below_two() {
        let mut config = WheelConfig::default();
        config.rotation.min_active_members = 1;
        let err = validate_loaded_config(&config).unwrap_err();
        assert!(err.to_string().contains("min_active_members must be >= 2"));
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let mut config = WheelConfig::default();
        config.rotation.exclude_previous_moderator_above = 5;
        config.rotation.exclude_previous_note_taker_above = 3;
        let err = validate_loaded_config(&config).unwrap_err();
        assert!(err.to_string().contains("exclude_previous_note_taker_above"));
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let mut config = WheelConfig::default();
        config.skew.accept_probability = 1.5;
        assert!(validate_loaded_config(&config).is_err());

        config.skew.accept_probability = -0.1;
        assert!(validate_loaded_config(&config).is_err());

        config.skew.accept_probability = f64::NAN;
        assert!(validate_loaded_config(&config).is_err());
    }

    #[test]
    fn test_accepts_probability_bounds() {
        let mut config = WheelConfig::default();
        config.skew.accept_probability = 0.0;
        validate_loaded_config(&config).unwrap();
        config.skew.accept_probability = 1.0;
        validate_loaded_config(&config).unwrap();
    }

    #[test]
    fn test_rejects_case_insensitive_duplicate_names() {
        let mut config = WheelConfig::default();
        config.team.default_names = vec!["Anna".into(), "anna".into()];
        let err = validate_loaded_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate name"));
    }

    #[test]
    fn test_rejects_blank_names() {
        let mut config = WheelConfig::default();
        config.team.default_names = vec!["Anna".into(), "  ".into()];
        assert!(validate_loaded_config(&config).is_err());
    }

    #[test]
    fn test_unknown_skew_name_is_only_a_warning() {
        let mut config = WheelConfig::default();
        config.skew.name = Some("Someone Else".into());
        validate_loaded_config(&config).unwrap();
    }
}
