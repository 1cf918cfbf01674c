#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Cannot select from an empty roster")]
    EmptyRoster,

    #[error("Not enough active members (active: {active}, required: {required})")]
    NotEnoughActiveMembers { active: usize, required: usize },

    #[error("No member with id '{0}'")]
    MemberNotFound(String),

    #[error("Member id '{0}' already exists in the roster")]
    DuplicateMemberId(String),

    #[error("Member name cannot be empty")]
    InvalidMemberName,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
