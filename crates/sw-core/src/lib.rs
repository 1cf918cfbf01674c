//! Shared domain types and error taxonomy for the standup wheel.

pub mod error;
pub mod types;

pub use error::AppError;
pub use types::{CurrentWeekRoles, Member, MemberId, OutputFormat, Role, RoleKey, RoundResult};
