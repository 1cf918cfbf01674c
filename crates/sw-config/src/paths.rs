use std::path::{Path, PathBuf};

/// XDG app name used for user-level paths.
pub const APP_NAME: &str = "standup-wheel";
/// Per-project directory holding the wheel config.
pub const PROJECT_DIR_NAME: &str = ".standup";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User config directory (`~/.config/standup-wheel`), if HOME is resolvable.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to user-level config: `~/.config/standup-wheel/config.toml`.
///
/// Returns None if the config directory cannot be determined
/// (e.g., no HOME in containers).
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Path to project-level config: `{project_root}/.standup/config.toml`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR_NAME).join(CONFIG_FILE_NAME)
}
