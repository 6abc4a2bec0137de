//! Read-only projections of a session for display.
//!
//! Nothing here mutates state; every value is re-derived from the session on
//! each call.

use std::collections::HashMap;

use crate::domain::game::GameSession;
use crate::domain::payout::{earnings_for_place, rank, Standing};
use crate::domain::scoring::{consecutive_stands, halfway_score};
use crate::domain::state::{GamePlayerId, Player, Round};

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingRow {
    pub game_player_id: GamePlayerId,
    pub nickname: String,
    pub initials: String,
    /// 0-based rank by descending score; ties keep seat order.
    pub place: usize,
    pub score: i32,
    pub halfway_score: i32,
    pub consecutive_stands: u32,
    pub warnings: u32,
    pub bleedings: u32,
    /// Signed money for this place, `None` for places that neither pay nor receive.
    pub earnings: Option<i64>,
}

/// Short labels per seat: the first letter of each nickname, or the first two
/// when another player shares that first letter.
pub fn initials(players: &[Player]) -> Vec<String> {
    let mut counts: HashMap<Option<char>, usize> = HashMap::new();
    for p in players {
        *counts.entry(p.nickname.chars().next()).or_default() += 1;
    }
    players
        .iter()
        .map(|p| {
            let first = p.nickname.chars().next();
            let take = if counts.get(&first).copied().unwrap_or(0) > 1 {
                2
            } else {
                1
            };
            p.nickname.chars().take(take).collect()
        })
        .collect()
}

/// Standings ordered by place.
pub fn standings_table(session: &GameSession, halfway: bool) -> Vec<StandingRow> {
    let players = session.players();
    let labels = initials(players);
    let current = session.current_round_index();
    let rounds = session.rounds();
    let prizes = session.prizes();

    let ranked: Vec<Standing> = rank(session.standings());
    ranked
        .into_iter()
        .enumerate()
        .filter_map(|(place, standing)| {
            let seat = players
                .iter()
                .position(|p| p.game_player_id == standing.game_player_id)?;
            let player = &players[seat];
            Some(StandingRow {
                game_player_id: standing.game_player_id,
                nickname: standing.nickname,
                initials: labels[seat].clone(),
                place,
                score: standing.score,
                halfway_score: halfway_score(
                    rounds,
                    player.game_player_id,
                    current,
                    player.warnings,
                    halfway,
                ),
                consecutive_stands: consecutive_stands(rounds, player.game_player_id, current),
                warnings: player.warnings,
                bleedings: player.bleedings,
                earnings: prizes
                    .as_ref()
                    .and_then(|p| earnings_for_place(p, place, players.len())),
            })
        })
        .collect()
}

/// How far the table's bids land from the cards dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidMargin {
    Over(u32),
    Under(u32),
    /// Only reachable while the dealer still has to rebid.
    Exact,
}

impl BidMargin {
    pub fn of(round: &Round) -> Self {
        let margin = round.bid_margin();
        match margin.signum() {
            1 => BidMargin::Over(margin.unsigned_abs()),
            -1 => BidMargin::Under(margin.unsigned_abs()),
            _ => BidMargin::Exact,
        }
    }
}

impl std::fmt::Display for BidMargin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BidMargin::Over(n) => write!(f, "+{n}"),
            BidMargin::Under(n) => write!(f, "-{n}"),
            BidMargin::Exact => write!(f, "0"),
        }
    }
}
