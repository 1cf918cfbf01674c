//! Wheel configuration loading and validation (.standup/config.toml).

pub mod config;
mod config_merge;
pub mod paths;
pub mod validate;

pub use config::{
    CURRENT_SCHEMA_VERSION, RotationConfig, SkewConfig, TeamConfig, WheelConfig,
};
pub use validate::{validate_config, validate_loaded_config};
