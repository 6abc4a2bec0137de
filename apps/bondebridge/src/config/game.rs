//! Table defaults for new games.

use crate::domain::schedule::ScheduleConfig;
use crate::domain::state::{GameSettings, Seat};

/// Money and schedule settings offered when setting up a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub money_multiplier: i64,
    pub extra_cost_loser: i64,
    pub extra_cost_second_last: i64,
    pub largest_repeats: u8,
    pub second_largest_repeats: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            money_multiplier: 2,
            extra_cost_loser: 100,
            extra_cost_second_last: 50,
            largest_repeats: 3,
            second_largest_repeats: 2,
        }
    }
}

impl GameConfig {
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            money_multiplier: self.money_multiplier,
            extra_cost_loser: self.extra_cost_loser,
            extra_cost_second_last: self.extra_cost_second_last,
        }
    }

    pub fn schedule(&self, starting_dealer: Seat) -> ScheduleConfig {
        ScheduleConfig {
            starting_dealer,
            largest_repeats: self.largest_repeats,
            second_largest_repeats: self.second_largest_repeats,
        }
    }
}
