//! Roster store and history log: the state a round reads from and stamps into.

mod history;
mod roster;
pub mod state;

pub use history::{HistoryLog, InMemoryHistory};
pub use roster::{Roster, RosterStore, override_assignment};
pub use state::WheelState;
