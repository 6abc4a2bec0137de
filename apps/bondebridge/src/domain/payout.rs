//! Money transfers derived from final (or interim) scores.

use crate::domain::state::{GamePlayerId, GameSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub game_player_id: GamePlayerId,
    pub nickname: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prizes {
    pub winner: String,
    pub loser: String,
    /// Paid by last place to first place.
    pub winner_prize: i64,
    pub second: Option<String>,
    pub second_loser: Option<String>,
    /// Paid by second-last to second place; only defined for four or more players.
    pub second_prize: Option<i64>,
}

/// Sort standings by descending score. Ties keep their incoming (seat) order.
pub fn rank(mut standings: Vec<Standing>) -> Vec<Standing> {
    standings.sort_by(|a, b| b.score.cmp(&a.score));
    standings
}

/// First/last and second/second-last transfers.
///
/// Returns `None` for fewer than two players.
pub fn compute_prizes(standings: &[Standing], settings: &GameSettings) -> Option<Prizes> {
    let ranked = rank(standings.to_vec());
    let n = ranked.len();
    if n < 2 {
        return None;
    }
    let first = &ranked[0];
    let last = &ranked[n - 1];
    let winner_prize =
        (first.score - last.score) as i64 * settings.money_multiplier + settings.extra_cost_loser;

    let (second, second_loser, second_prize) = if n >= 4 {
        let second = &ranked[1];
        let second_last = &ranked[n - 2];
        let prize = (second.score - second_last.score) as i64 * settings.money_multiplier
            + settings.extra_cost_second_last;
        (
            Some(second.nickname.clone()),
            Some(second_last.nickname.clone()),
            Some(prize),
        )
    } else {
        (None, None, None)
    };

    Some(Prizes {
        winner: first.nickname.clone(),
        loser: last.nickname.clone(),
        winner_prize,
        second,
        second_loser,
        second_prize,
    })
}

/// Signed earnings for a 0-based place among `players`, or `None` for middle places.
pub fn earnings_for_place(prizes: &Prizes, place: usize, players: usize) -> Option<i64> {
    if players < 2 || place >= players {
        return None;
    }
    if place == 0 {
        Some(prizes.winner_prize)
    } else if place == players - 1 {
        Some(-prizes.winner_prize)
    } else if place == 1 {
        prizes.second_prize
    } else if place == players - 2 {
        prizes.second_prize.map(|p| -p)
    } else {
        None
    }
}

/// Final earnings per player with ties split between the tied places.
///
/// Requires at least four players; players between second and second-last
/// settle at zero. The result is zero-sum.
pub fn settle_earnings(
    standings: &[Standing],
    settings: &GameSettings,
) -> Option<Vec<(GamePlayerId, f64)>> {
    let ranked = rank(standings.to_vec());
    let n = ranked.len();
    if n < 4 {
        return None;
    }
    let mult = settings.money_multiplier as f64;
    let [first, second, second_last, last] =
        [0, 1, n - 2, n - 1].map(|i| ranked[i].score as f64);

    let winner_prize = (first - last) * mult + settings.extra_cost_loser as f64;
    let second_prize = (second - second_last) * mult + settings.extra_cost_second_last as f64;

    let (mut e_first, mut e_second) = if first == second {
        let split = (winner_prize + second_prize) / 2.0;
        (split, split)
    } else {
        (winner_prize, second_prize)
    };
    let (mut e_second_last, mut e_last) = if last == second_last {
        let split = -(e_first + e_second) / 2.0;
        (split, split)
    } else {
        (-e_second, -e_first)
    };

    if first == second && second == second_last && second_last == last {
        (e_first, e_second, e_second_last, e_last) = (0.0, 0.0, 0.0, 0.0);
    } else if first == second && second == second_last {
        // Three-way tie on top: the three share what last place pays.
        let share = -e_last / 3.0;
        (e_first, e_second, e_second_last) = (share, share, share);
    } else if second == second_last && second_last == last {
        // Three-way tie at the bottom: the three share what first place wins.
        let share = -e_first / 3.0;
        (e_second, e_second_last, e_last) = (share, share, share);
    } else if second == second_last {
        (e_second, e_second_last) = (0.0, 0.0);
    }

    let settled = ranked
        .iter()
        .enumerate()
        .map(|(place, s)| {
            let earnings = match place {
                0 => e_first,
                1 => e_second,
                p if p == n - 1 => e_last,
                p if p == n - 2 => e_second_last,
                _ => 0.0,
            };
            (s.game_player_id, earnings)
        })
        .collect();
    Some(settled)
}
