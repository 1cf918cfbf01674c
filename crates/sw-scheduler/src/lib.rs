//! Scheduler: fair-rotation role selection, adjacency exclusions, and round driving.

pub mod exclusion;
pub mod random;
pub mod rotation;
pub mod round;

pub use exclusion::{ExclusionPolicy, moderator_exclusions, note_taker_exclusions, pinned_ids};
pub use random::{RandomSource, RngSource, SequenceSource};
pub use rotation::{SkewMatcher, SkewRule, select_with_fair_rotation};
pub use round::{RoundOutcome, apply_round, run_round};
