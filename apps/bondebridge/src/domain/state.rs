use std::collections::BTreeMap;
use std::fmt;

use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Seat index at the table; position in the game's player order.
pub type Seat = usize;

/// Per-game player identity assigned at game creation.
///
/// Ordering by this id defines seating and turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GamePlayerId(pub i64);

impl fmt::Display for GamePlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Finished,
}

/// Money settings chosen when the game is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub money_multiplier: i64,
    /// Added to the last-place → first-place transfer.
    pub extra_cost_loser: i64,
    /// Added to the second-last → second-place transfer.
    pub extra_cost_second_last: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub player_id: i64,
    pub game_player_id: GamePlayerId,
    pub nickname: String,
    pub warnings: u32,
    pub bleedings: u32,
}

impl Player {
    pub fn new(player_id: i64, game_player_id: GamePlayerId, nickname: impl Into<String>) -> Self {
        Self {
            player_id,
            game_player_id,
            nickname: nickname.into(),
            warnings: 0,
            bleedings: 0,
        }
    }
}

/// One player's bid and outcome in one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerScore {
    /// Backend row id, once the round has been created remotely.
    pub player_scores_id: Option<i64>,
    /// Tricks wagered; `None` until the player bids.
    pub bid: Option<u8>,
    /// `Some(true)` = made exactly the bid, `Some(false)` = failed, `None` = undecided.
    pub stand: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub round_id: Option<i64>,
    pub num_cards: u8,
    pub dealer_index: Seat,
    pub locked: bool,
    scores: BTreeMap<GamePlayerId, PlayerScore>,
}

impl Round {
    /// Fresh, unlocked round with null bids and stands for every player.
    pub fn new(num_cards: u8, dealer_index: Seat, players: &[GamePlayerId]) -> Self {
        Self {
            round_id: None,
            num_cards,
            dealer_index,
            locked: false,
            scores: players
                .iter()
                .map(|id| (*id, PlayerScore::default()))
                .collect(),
        }
    }

    /// Build a round from already-keyed scores (e.g. loaded from the backend).
    pub fn with_scores(
        num_cards: u8,
        dealer_index: Seat,
        locked: bool,
        scores: BTreeMap<GamePlayerId, PlayerScore>,
    ) -> Self {
        Self {
            round_id: None,
            num_cards,
            dealer_index,
            locked,
            scores,
        }
    }

    pub fn score(&self, player: GamePlayerId) -> Option<&PlayerScore> {
        self.scores.get(&player)
    }

    pub fn score_mut(&mut self, player: GamePlayerId) -> Result<&mut PlayerScore, DomainError> {
        self.scores.get_mut(&player).ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("game player {player} has no score in this round"),
            )
        })
    }

    /// Scores in seat order (ascending game player id).
    pub fn scores(&self) -> impl Iterator<Item = (GamePlayerId, &PlayerScore)> {
        self.scores.iter().map(|(id, s)| (*id, s))
    }

    pub fn scores_mut(&mut self) -> impl Iterator<Item = &mut PlayerScore> {
        self.scores.values_mut()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = GamePlayerId> + '_ {
        self.scores.keys().copied()
    }

    /// Sum of all bids, counting missing bids as zero.
    pub fn bid_sum(&self) -> u32 {
        self.scores
            .values()
            .map(|s| s.bid.unwrap_or(0) as u32)
            .sum()
    }

    /// Sum of bids of the players who stood.
    pub fn stood_bid_sum(&self) -> u32 {
        self.scores
            .values()
            .filter(|s| s.stand == Some(true))
            .map(|s| s.bid.unwrap_or(0) as u32)
            .sum()
    }

    /// Signed distance between the bids and the cards dealt.
    ///
    /// Positive: the table bid over; negative: under.
    pub fn bid_margin(&self) -> i32 {
        self.bid_sum() as i32 - self.num_cards as i32
    }

    /// Every player has a decided stand outcome.
    pub fn is_settled(&self) -> bool {
        self.scores.values().all(|s| s.stand.is_some())
    }

    pub fn all_stood(&self) -> bool {
        !self.scores.is_empty() && self.scores.values().all(|s| s.stand == Some(true))
    }
}

/// Seat math for a table of `players` seats. Clockwise is positive.
#[inline]
pub fn seat_offset(seat: Seat, delta: isize, players: usize) -> Seat {
    debug_assert!(players > 0, "seat math needs at least one seat");
    (seat as isize + delta).rem_euclid(players as isize) as Seat
}

/// Returns the next seat clockwise, wrapping at the table size.
#[inline]
pub fn next_seat(seat: Seat, players: usize) -> Seat {
    seat_offset(seat, 1, players)
}

/// Dealer for a 0-based round index; rotates one seat per round.
#[inline]
pub fn dealer_for_round(starting_dealer: Seat, round_index: usize, players: usize) -> Seat {
    (starting_dealer + round_index) % players
}

/// Sort players into seat order and reject duplicate game player ids.
pub fn seat_players(mut players: Vec<Player>) -> Result<Vec<Player>, DomainError> {
    players.sort_by_key(|p| p.game_player_id);
    if players
        .windows(2)
        .any(|w| w[0].game_player_id == w[1].game_player_id)
    {
        return Err(DomainError::validation(
            ValidationKind::InvalidSeat,
            "duplicate game player id",
        ));
    }
    Ok(players)
}

pub fn require_round<'a>(rounds: &'a [Round], index: usize) -> Result<&'a Round, DomainError> {
    rounds.get(index).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::RoundOutOfRange,
            format!("round {index} outside schedule of {} rounds", rounds.len()),
        )
    })
}

pub fn require_round_mut<'a>(
    rounds: &'a mut [Round],
    index: usize,
) -> Result<&'a mut Round, DomainError> {
    let len = rounds.len();
    rounds.get_mut(index).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::RoundOutOfRange,
            format!("round {index} outside schedule of {len} rounds"),
        )
    })
}
