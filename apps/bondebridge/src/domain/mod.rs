//! Domain layer: pure game logic types and helpers.

pub mod game;
pub mod lock;
pub mod payout;
pub mod player_view;
pub mod recorder;
pub mod rules;
pub mod schedule;
pub mod scoring;
pub mod state;

#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_game;
#[cfg(test)]
mod tests_props_scoring;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use game::{Command, GameEvent, GameSession};
pub use lock::{BidControls, LockOutcome};
pub use payout::{Prizes, Standing};
pub use player_view::{standings_table, BidMargin, StandingRow};
pub use schedule::{generate_rounds, ScheduleConfig};
pub use state::{GamePlayerId, GameSettings, GameStatus, Player, PlayerScore, Round, Seat};
