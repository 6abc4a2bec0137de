//! Score calculator.
//!
//! Scores are never stored; they are replayed from round history on demand.
//! A player's accumulation stops at the first round whose stand is undecided.

use crate::domain::rules::{
    fail_streak_penalty, stand_points, stand_streak_bonus, warning_deduction,
};
use crate::domain::state::{GamePlayerId, Player, Round};

/// Running total for one player while replaying rounds in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub points: i32,
    pub consecutive_stands: u32,
    pub consecutive_fails: u32,
}

impl Tally {
    /// Apply one decided round. Returns true when a stand-streak bonus fired.
    pub fn apply(&mut self, stand: bool, bid: u8) -> bool {
        if stand {
            self.points += stand_points(bid);
            self.consecutive_stands += 1;
            self.consecutive_fails = 0;
        } else {
            self.consecutive_fails += 1;
            self.consecutive_stands = 0;
        }
        self.points -= fail_streak_penalty(self.consecutive_fails);
        let bonus = stand_streak_bonus(self.consecutive_stands);
        self.points += bonus;
        bonus > 0
    }
}

/// Replay `rounds[..end]` for `player`, stopping at the first undecided stand.
pub fn replay(rounds: &[Round], player: GamePlayerId, end: usize) -> Tally {
    let mut tally = Tally::default();
    for round in rounds.iter().take(end) {
        let Some(score) = round.score(player) else {
            break;
        };
        let Some(stand) = score.stand else {
            break;
        };
        tally.apply(stand, score.bid.unwrap_or(0));
    }
    tally
}

/// Score through `through_index` (inclusive), minus the warning deduction.
pub fn player_score(
    rounds: &[Round],
    player: GamePlayerId,
    through_index: usize,
    warnings: u32,
) -> i32 {
    let end = through_index.saturating_add(1);
    replay(rounds, player, end).points - warning_deduction(warnings)
}

/// Interim score for standings display.
///
/// With `halfway` the replay covers rounds before `min(current, ceil(len / 2))`,
/// so an odd game counts its middle round; otherwise it covers everything
/// through `current`.
pub fn halfway_score(
    rounds: &[Round],
    player: GamePlayerId,
    current_index: usize,
    warnings: u32,
    halfway: bool,
) -> i32 {
    let end = if halfway {
        current_index.min(rounds.len().div_ceil(2))
    } else {
        current_index.saturating_add(1)
    };
    replay(rounds, player, end).points - warning_deduction(warnings)
}

/// Stands in a row ending at `index`, counting backwards.
pub fn consecutive_stands(rounds: &[Round], player: GamePlayerId, index: usize) -> u32 {
    let end = index.saturating_add(1).min(rounds.len());
    rounds[..end]
        .iter()
        .rev()
        .take_while(|r| r.score(player).and_then(|s| s.stand) == Some(true))
        .count() as u32
}

/// Whether a stand-streak bonus fired on round `index` itself.
pub fn streak_bonus_reached(rounds: &[Round], player: GamePlayerId, index: usize) -> bool {
    let mut tally = Tally::default();
    for (i, round) in rounds.iter().enumerate().take(index.saturating_add(1)) {
        let Some(score) = round.score(player) else {
            return false;
        };
        let Some(stand) = score.stand else {
            return false;
        };
        let fired = tally.apply(stand, score.bid.unwrap_or(0));
        if i == index {
            return fired;
        }
    }
    false
}

/// Scores for every player through `through_index`, in seat order.
pub fn scores(
    players: &[Player],
    rounds: &[Round],
    through_index: usize,
) -> Vec<(GamePlayerId, i32)> {
    players
        .iter()
        .map(|p| {
            let score = player_score(rounds, p.game_player_id, through_index, p.warnings);
            (p.game_player_id, score)
        })
        .collect()
}
