//! Game session reducer.
//!
//! A [`GameSession`] owns everything that changes while a table plays:
//! players, rounds, the current round, the rebid flag and the game status.
//! Every change goes through [`GameSession::apply`], which returns the
//! [`GameEvent`]s describing what happened. Scores and prizes are derived on
//! demand and never stored.

use std::collections::BTreeSet;

use time::OffsetDateTime;

use crate::domain::lock::{
    bid_control_enabled, bid_controls, check_advance, default_missing_stands, resume_round_index,
    toggle_lock, BidControls, LockOutcome,
};
use crate::domain::payout::{compute_prizes, settle_earnings, Prizes, Standing};
use crate::domain::recorder::{adjust_bleedings, adjust_warnings, set_bid, set_stand};
use crate::domain::schedule::{generate_rounds, ScheduleConfig};
use crate::domain::scoring::{halfway_score, player_score, streak_bonus_reached};
use crate::domain::state::{
    seat_players, GamePlayerId, GameSettings, GameStatus, Player, Round, Seat,
};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Change a bid in the current round.
    SetBid { player: GamePlayerId, value: u8 },
    /// Record a stand outcome in the current (locked) round.
    SetStand { player: GamePlayerId, value: bool },
    /// Lock or unlock the current round.
    ToggleLock,
    /// Settle the current round and move on; completes the game on the last round.
    Advance,
    /// Fix a bid in an already played round.
    CorrectBid {
        round_index: usize,
        player: GamePlayerId,
        value: u8,
    },
    /// Fix a stand outcome in an already played round.
    CorrectStand {
        round_index: usize,
        player: GamePlayerId,
        value: bool,
    },
    AdjustWarnings { player: GamePlayerId, increment: bool },
    AdjustBleedings { player: GamePlayerId, increment: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    BidChanged {
        round_index: usize,
        player: GamePlayerId,
    },
    StandChanged {
        round_index: usize,
        player: GamePlayerId,
    },
    RoundLocked { round_index: usize },
    RoundUnlocked { round_index: usize },
    /// Lock rejected: bids add up to the cards dealt and the dealer must change theirs.
    RebidRequired {
        round_index: usize,
        dealer: GamePlayerId,
        bid_sum: u32,
        num_cards: u8,
    },
    RoundAdvanced { from: usize, to: usize },
    /// A stand-streak bonus was newly reached on the round just left.
    StreakCelebration {
        round_index: usize,
        players: Vec<GamePlayerId>,
    },
    GameCompleted,
    PlayerDataChanged { player: GamePlayerId },
}

#[derive(Debug, Clone)]
pub struct GameSession {
    game_id: Option<i64>,
    created_on: Option<OffsetDateTime>,
    settings: GameSettings,
    status: GameStatus,
    players: Vec<Player>,
    rounds: Vec<Round>,
    current_round: usize,
    rebid: bool,
    celebrating: bool,
}

impl GameSession {
    /// Start a new game with a freshly generated schedule.
    pub fn start(
        settings: GameSettings,
        players: Vec<Player>,
        schedule: &ScheduleConfig,
    ) -> Result<Self, DomainError> {
        let players = seat_players(players)?;
        let ids: Vec<GamePlayerId> = players.iter().map(|p| p.game_player_id).collect();
        let rounds = generate_rounds(schedule, &ids)?;
        Self::new(settings, players, rounds, GameStatus::InProgress)
    }

    /// Rebuild a session from stored state, resuming at the first unsettled round.
    pub fn new(
        settings: GameSettings,
        players: Vec<Player>,
        rounds: Vec<Round>,
        status: GameStatus,
    ) -> Result<Self, DomainError> {
        let players = seat_players(players)?;
        if rounds.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::RoundOutOfRange,
                "a game needs at least one round",
            ));
        }
        let expected: BTreeSet<GamePlayerId> = players.iter().map(|p| p.game_player_id).collect();
        for (i, round) in rounds.iter().enumerate() {
            let actual: BTreeSet<GamePlayerId> = round.player_ids().collect();
            if actual != expected {
                return Err(DomainError::validation(
                    ValidationKind::InvalidSeat,
                    format!("round {i} scores do not match the game's players"),
                ));
            }
            if round.dealer_index >= players.len() {
                return Err(DomainError::validation(
                    ValidationKind::InvalidSeat,
                    format!("round {i} dealer {} outside table", round.dealer_index),
                ));
            }
        }
        let current_round = resume_round_index(status, &rounds).min(rounds.len() - 1);
        Ok(Self {
            game_id: None,
            created_on: None,
            settings,
            status,
            players,
            rounds,
            current_round,
            rebid: false,
            celebrating: false,
        })
    }

    pub fn with_game_id(mut self, game_id: i64) -> Self {
        self.game_id = Some(game_id);
        self
    }

    pub fn with_created_on(mut self, created_on: OffsetDateTime) -> Self {
        self.created_on = Some(created_on);
        self
    }

    /// Attach backend row ids after the rounds were created remotely.
    ///
    /// `player_scores_ids[i]` lists the score rows of round `i` in seat order.
    pub fn assign_row_ids(
        &mut self,
        round_ids: &[i64],
        player_scores_ids: &[Vec<i64>],
    ) -> Result<(), DomainError> {
        let n = self.players.len();
        if round_ids.len() != self.rounds.len()
            || player_scores_ids.len() != self.rounds.len()
            || player_scores_ids.iter().any(|row| row.len() != n)
        {
            return Err(DomainError::validation_other(format!(
                "row ids do not cover {} rounds of {n} players",
                self.rounds.len()
            )));
        }
        for ((round, round_id), score_ids) in
            self.rounds.iter_mut().zip(round_ids).zip(player_scores_ids)
        {
            round.round_id = Some(*round_id);
            for (score, id) in round.scores_mut().zip(score_ids) {
                score.player_scores_id = Some(*id);
            }
        }
        Ok(())
    }

    pub fn game_id(&self) -> Option<i64> {
        self.game_id
    }

    pub fn created_on(&self) -> Option<OffsetDateTime> {
        self.created_on
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn current_round_index(&self) -> usize {
        self.current_round
    }

    pub fn current_round(&self) -> &Round {
        &self.rounds[self.current_round]
    }

    pub fn rebid(&self) -> bool {
        self.rebid
    }

    /// Set when the last advance reached a stand-streak bonus; cleared by the next advance.
    pub fn celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn dismiss_celebration(&mut self) {
        self.celebrating = false;
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round + 1 == self.rounds.len()
    }

    pub fn seat_of(&self, player: GamePlayerId) -> Result<Seat, DomainError> {
        self.players
            .iter()
            .position(|p| p.game_player_id == player)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("game player {player}"))
            })
    }

    /// Dealer of the current round.
    pub fn dealer(&self) -> GamePlayerId {
        self.players[self.current_round().dealer_index].game_player_id
    }

    pub fn apply(&mut self, command: Command) -> Result<Vec<GameEvent>, DomainError> {
        match command {
            Command::SetBid { player, value } => self.set_current_bid(player, value),
            Command::SetStand { player, value } => self.set_current_stand(player, value),
            Command::ToggleLock => self.toggle_current_lock(),
            Command::Advance => self.advance(),
            Command::CorrectBid {
                round_index,
                player,
                value,
            } => {
                self.require_played(round_index)?;
                set_bid(&mut self.rounds, round_index, player, value)?;
                Ok(vec![GameEvent::BidChanged {
                    round_index,
                    player,
                }])
            }
            Command::CorrectStand {
                round_index,
                player,
                value,
            } => {
                self.require_played(round_index)?;
                set_stand(&mut self.rounds, round_index, player, value)?;
                Ok(vec![GameEvent::StandChanged {
                    round_index,
                    player,
                }])
            }
            Command::AdjustWarnings { player, increment } => {
                adjust_warnings(&mut self.players, player, increment)?;
                Ok(vec![GameEvent::PlayerDataChanged { player }])
            }
            Command::AdjustBleedings { player, increment } => {
                adjust_bleedings(&mut self.players, player, increment)?;
                Ok(vec![GameEvent::PlayerDataChanged { player }])
            }
        }
    }

    /// Lock the current round, treating a rejected lock as an error.
    ///
    /// The rebid flag is still raised on rejection.
    pub fn lock_current_round_strict(&mut self) -> Result<Vec<GameEvent>, DomainError> {
        if self.current_round().locked {
            return Ok(Vec::new());
        }
        let events = self.toggle_current_lock()?;
        if let Some(GameEvent::RebidRequired {
            bid_sum, num_cards, ..
        }) = events.first()
        {
            return Err(DomainError::validation(
                ValidationKind::RebidRequired,
                format!("dealer must go up or down; bids {bid_sum} equal {num_cards} cards"),
            ));
        }
        Ok(events)
    }

    fn require_in_progress(&self) -> Result<(), DomainError> {
        if self.status == GameStatus::Finished {
            return Err(DomainError::validation(
                ValidationKind::GameFinished,
                "game is finished",
            ));
        }
        Ok(())
    }

    fn require_played(&self, round_index: usize) -> Result<(), DomainError> {
        let played = match self.status {
            GameStatus::Finished => round_index < self.rounds.len(),
            GameStatus::InProgress => round_index < self.current_round,
        };
        if !played {
            return Err(DomainError::validation(
                ValidationKind::RoundOutOfRange,
                format!("round {round_index} has not been played"),
            ));
        }
        Ok(())
    }

    fn set_current_bid(
        &mut self,
        player: GamePlayerId,
        value: u8,
    ) -> Result<Vec<GameEvent>, DomainError> {
        self.require_in_progress()?;
        let seat = self.seat_of(player)?;
        if !bid_control_enabled(self.current_round(), seat, self.rebid) {
            return Err(DomainError::validation(
                ValidationKind::BidControlDisabled,
                format!("bid for game player {player} cannot change now"),
            ));
        }
        let round_index = self.current_round;
        set_bid(&mut self.rounds, round_index, player, value)?;
        Ok(vec![GameEvent::BidChanged {
            round_index,
            player,
        }])
    }

    fn set_current_stand(
        &mut self,
        player: GamePlayerId,
        value: bool,
    ) -> Result<Vec<GameEvent>, DomainError> {
        self.require_in_progress()?;
        if !self.current_round().locked {
            return Err(DomainError::validation(
                ValidationKind::RoundNotLocked,
                "lock the round before entering results",
            ));
        }
        let round_index = self.current_round;
        set_stand(&mut self.rounds, round_index, player, value)?;
        Ok(vec![GameEvent::StandChanged {
            round_index,
            player,
        }])
    }

    fn toggle_current_lock(&mut self) -> Result<Vec<GameEvent>, DomainError> {
        self.require_in_progress()?;
        let round_index = self.current_round;
        let dealer = self.dealer();
        let event = match toggle_lock(&mut self.rounds[round_index]) {
            LockOutcome::Locked => GameEvent::RoundLocked { round_index },
            LockOutcome::Unlocked => GameEvent::RoundUnlocked { round_index },
            LockOutcome::RebidRequired { bid_sum, num_cards } => {
                self.rebid = true;
                GameEvent::RebidRequired {
                    round_index,
                    dealer,
                    bid_sum,
                    num_cards,
                }
            }
        };
        Ok(vec![event])
    }

    fn advance(&mut self) -> Result<Vec<GameEvent>, DomainError> {
        self.require_in_progress()?;
        let from = self.current_round;
        let is_final = self.is_final_round();

        let mut settled = self.rounds[from].clone();
        default_missing_stands(&mut settled);
        check_advance(&settled, is_final)?;
        self.rounds[from] = settled;
        self.rebid = false;
        self.celebrating = false;

        let mut events = Vec::new();
        if !is_final {
            let celebrating: Vec<GamePlayerId> = self
                .players
                .iter()
                .map(|p| p.game_player_id)
                .filter(|id| streak_bonus_reached(&self.rounds, *id, from))
                .collect();
            if !celebrating.is_empty() {
                self.celebrating = true;
                events.push(GameEvent::StreakCelebration {
                    round_index: from,
                    players: celebrating,
                });
            }
        }

        if is_final {
            self.status = GameStatus::Finished;
            tracing::info!(game_id = ?self.game_id, rounds = self.rounds.len(), "game completed");
            events.push(GameEvent::GameCompleted);
        } else {
            self.current_round = from + 1;
            events.push(GameEvent::RoundAdvanced {
                from,
                to: self.current_round,
            });
        }
        Ok(events)
    }

    /// Score of one player through the current round.
    pub fn score_of(&self, player: GamePlayerId) -> Result<i32, DomainError> {
        let seat = self.seat_of(player)?;
        let warnings = self.players[seat].warnings;
        Ok(player_score(&self.rounds, player, self.current_round, warnings))
    }

    /// Scores through the current round, in seat order.
    pub fn scores(&self) -> Vec<(GamePlayerId, i32)> {
        crate::domain::scoring::scores(&self.players, &self.rounds, self.current_round)
    }

    /// Interim scores, truncated at the midpoint when `halfway` is set.
    pub fn halfway_scores(&self, halfway: bool) -> Vec<(GamePlayerId, i32)> {
        self.players
            .iter()
            .map(|p| {
                let score = halfway_score(
                    &self.rounds,
                    p.game_player_id,
                    self.current_round,
                    p.warnings,
                    halfway,
                );
                (p.game_player_id, score)
            })
            .collect()
    }

    /// Current standings in seat order.
    pub fn standings(&self) -> Vec<Standing> {
        self.players
            .iter()
            .zip(self.scores())
            .map(|(p, (id, score))| Standing {
                game_player_id: id,
                nickname: p.nickname.clone(),
                score,
            })
            .collect()
    }

    pub fn prizes(&self) -> Option<Prizes> {
        compute_prizes(&self.standings(), &self.settings)
    }

    /// Tie-aware final settlement per player.
    pub fn settlement(&self) -> Option<Vec<(GamePlayerId, f64)>> {
        settle_earnings(&self.standings(), &self.settings)
    }

    /// -/+ button state for a player's bid in the current round.
    pub fn bid_controls(&self, player: GamePlayerId) -> Result<BidControls, DomainError> {
        let seat = self.seat_of(player)?;
        if self.status == GameStatus::Finished {
            return Ok(BidControls {
                decrement: false,
                increment: false,
            });
        }
        Ok(bid_controls(self.current_round(), seat, player, self.rebid))
    }
}
