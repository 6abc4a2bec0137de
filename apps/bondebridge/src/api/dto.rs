//! JSON payloads exchanged with the BondeBridge backend.
//!
//! Field names follow the wire format exactly; conversions to and from the
//! domain live at the bottom of this module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::domain::game::GameSession;
use crate::domain::state::{GamePlayerId, GameSettings, GameStatus, Player, PlayerScore, Round};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireStatus {
    #[default]
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "finished")]
    Finished,
}

impl From<WireStatus> for GameStatus {
    fn from(s: WireStatus) -> Self {
        match s {
            WireStatus::InProgress => GameStatus::InProgress,
            WireStatus::Finished => GameStatus::Finished,
        }
    }
}

impl From<GameStatus> for WireStatus {
    fn from(s: GameStatus) -> Self {
        match s {
            GameStatus::InProgress => WireStatus::InProgress,
            GameStatus::Finished => WireStatus::Finished,
        }
    }
}

/// Either a bare value or a list; the game endpoint has returned both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(v) => Some(v),
            OneOrMany::Many(v) => v.into_iter().next(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDto {
    pub game_id: i64,
    #[serde(default)]
    pub status: WireStatus,
    pub money_multiplier: i64,
    pub extra_cost_loser: i64,
    pub extra_cost_second_last: i64,
    #[serde(default)]
    pub created_on: Option<String>,
}

impl GameDto {
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            money_multiplier: self.money_multiplier,
            extra_cost_loser: self.extra_cost_loser,
            extra_cost_second_last: self.extra_cost_second_last,
        }
    }

    /// Creation time; naive timestamps are taken as UTC.
    pub fn created_on(&self) -> Option<OffsetDateTime> {
        let raw = self.created_on.as_deref()?.trim();
        OffsetDateTime::parse(raw, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
            .or_else(|_| {
                PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(|p| p.assume_utc())
            })
            .ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScoreDto {
    #[serde(default)]
    pub player_scores_id: Option<i64>,
    /// Not sent by the game endpoint; rows are then matched to seats in row-id order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_player_id: Option<i64>,
    #[serde(default)]
    pub num_tricks: Option<u8>,
    #[serde(default)]
    pub stand: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_id: Option<i64>,
    pub num_cards: u8,
    pub dealer_index: usize,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub player_scores: Vec<PlayerScoreDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub player_id: i64,
    pub game_player_id: i64,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub warnings: Option<u32>,
    #[serde(default)]
    pub bleedings: Option<u32>,
    #[serde(default)]
    pub score: Option<i32>,
}

/// Response of `GET api/bonde/game/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameEnvelope {
    pub game: OneOrMany<GameDto>,
    #[serde(default)]
    pub rounds: Vec<RoundDto>,
    #[serde(default)]
    pub players: Vec<PlayerDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateGameRequest {
    pub money_multiplier: i64,
    pub extra_cost_loser: i64,
    pub extra_cost_second_last: i64,
    /// User ids, in the order their game players should be created.
    pub players: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateGameResponse {
    pub game_id: i64,
    pub game_player_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRoundsRequest {
    pub game_id: i64,
    pub game_player_ids: Vec<i64>,
    pub rounds: Vec<RoundDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRoundsResponse {
    #[serde(default)]
    pub created: bool,
    pub round_ids: Vec<i64>,
    pub player_scores_ids: Vec<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRoundsRequest {
    pub rounds: Vec<RoundDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDataDto {
    pub game_player_id: i64,
    pub score: i32,
    pub warnings: u32,
    pub bleedings: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerDataRequest {
    #[serde(rename = "playerData")]
    pub player_data: Vec<PlayerDataDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddUserRequest {
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddUserResponse {
    #[serde(rename = "addUser")]
    pub add_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDto {
    pub player_id: i64,
    pub nickname: String,
    #[serde(default)]
    pub favorite: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameSummaryPlayer {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameSummary {
    #[serde(flatten)]
    pub game: GameDto,
    #[serde(default)]
    pub players: Vec<GameSummaryPlayer>,
}

/// Response of `GET api/bonde/games`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GamesPage {
    pub games: Vec<GameSummary>,
    #[serde(default, rename = "totalPages")]
    pub total_pages: Option<u32>,
}

/// Filters for `GET api/bonde/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub player_ids: Vec<i64>,
    /// Only games where exactly the selected players took part.
    pub exclusive_select: bool,
    pub only_favorite: bool,
    pub from_date: Option<Date>,
    pub to_date: Option<Date>,
}

impl StatsQuery {
    pub fn to_query_pairs(&self) -> Result<Vec<(&'static str, String)>, AppError> {
        let date_format = format_description!("[year]-[month]-[day]");
        let flag = |b: bool| if b { "True" } else { "False" }.to_string();

        let mut pairs = Vec::new();
        if !self.player_ids.is_empty() {
            let ids: Vec<String> = self.player_ids.iter().map(i64::to_string).collect();
            pairs.push(("playerIds", ids.join(",")));
        }
        pairs.push(("exclusiveselect", flag(self.exclusive_select)));
        pairs.push(("onlyfavorite", flag(self.only_favorite)));
        for (key, date) in [("from_date", self.from_date), ("to_date", self.to_date)] {
            if let Some(date) = date {
                let formatted = date
                    .format(&date_format)
                    .map_err(|e| AppError::config(format!("cannot format {key}: {e}")))?;
                pairs.push((key, formatted));
            }
        }
        Ok(pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuccessRate {
    pub stand_percentage: f64,
    pub total_occurrences: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerEarnings {
    pub total_earnings: f64,
    pub num_games: u32,
    pub avg_earnings: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BleedingRow {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub total_bleedings: Option<i64>,
    #[serde(default)]
    pub total_warnings: Option<i64>,
}

/// Average bid per nickname at one hand size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggressionRow {
    pub num_cards: u8,
    #[serde(flatten)]
    pub averages: BTreeMap<String, f64>,
}

/// Aggregates computed by the backend. Keys of `success_rates` are hand
/// size, then bid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatsResponse {
    pub perc_underbid: f64,
    pub total_avg_diff: f64,
    #[serde(default)]
    pub avg_diffs: Vec<ChartPoint>,
    #[serde(default)]
    pub success_rates: BTreeMap<String, BTreeMap<String, SuccessRate>>,
    #[serde(default)]
    pub player_earnings: BTreeMap<String, PlayerEarnings>,
    #[serde(default)]
    pub bleedings: Vec<BleedingRow>,
    #[serde(default)]
    pub player_aggression: Vec<AggressionRow>,
    #[serde(default)]
    pub player_aggression_stand: Vec<AggressionRow>,
}

// Domain conversions

impl GameEnvelope {
    /// Rebuild a session, resuming at the first unsettled round.
    pub fn into_session(self) -> Result<GameSession, AppError> {
        let game = self
            .game
            .into_first()
            .ok_or_else(|| AppError::decode("game payload is empty"))?;

        let mut players: Vec<Player> = self.players.into_iter().map(Player::from).collect();
        players.sort_by_key(|p| p.game_player_id);
        let seats: Vec<GamePlayerId> = players.iter().map(|p| p.game_player_id).collect();

        let mut rounds = self.rounds;
        rounds.sort_by_key(|r| r.round_id.unwrap_or(i64::MAX));
        let rounds = rounds
            .into_iter()
            .enumerate()
            .map(|(i, dto)| dto.into_round(&seats, i))
            .collect::<Result<Vec<_>, _>>()?;

        let mut session =
            GameSession::new(game.settings(), players, rounds, game.status.into())?
                .with_game_id(game.game_id);
        if let Some(created_on) = game.created_on() {
            session = session.with_created_on(created_on);
        }
        Ok(session)
    }
}

impl From<PlayerDto> for Player {
    fn from(dto: PlayerDto) -> Self {
        Player {
            player_id: dto.player_id,
            game_player_id: GamePlayerId(dto.game_player_id),
            nickname: dto.nickname.unwrap_or_default(),
            warnings: dto.warnings.unwrap_or(0),
            bleedings: dto.bleedings.unwrap_or(0),
        }
    }
}

impl From<&PlayerScoreDto> for PlayerScore {
    fn from(dto: &PlayerScoreDto) -> Self {
        PlayerScore {
            player_scores_id: dto.player_scores_id,
            bid: dto.num_tricks,
            stand: dto.stand,
        }
    }
}

impl RoundDto {
    /// Key scores by player. Rows without a `game_player_id` are matched to
    /// seats by position once sorted by `player_scores_id`; rows created
    /// together get ids in seat order.
    pub fn into_round(self, seats: &[GamePlayerId], index: usize) -> Result<Round, AppError> {
        if self.player_scores.len() != seats.len() {
            return Err(AppError::decode(format!(
                "round {index} has {} scores for {} players",
                self.player_scores.len(),
                seats.len()
            )));
        }
        let mut rows = self.player_scores;
        // Rows without an id go last.
        rows.sort_by_key(|r| (r.player_scores_id.is_none(), r.player_scores_id));
        let scores: BTreeMap<GamePlayerId, PlayerScore> = rows
            .iter()
            .zip(seats)
            .map(|(dto, seat)| {
                let id = dto.game_player_id.map(GamePlayerId).unwrap_or(*seat);
                (id, PlayerScore::from(dto))
            })
            .collect();
        if scores.len() != seats.len() {
            return Err(AppError::decode(format!(
                "round {index} assigns more than one score to a player"
            )));
        }
        let mut round = Round::with_scores(
            self.num_cards,
            self.dealer_index,
            self.locked.unwrap_or(false),
            scores,
        );
        round.round_id = self.round_id;
        Ok(round)
    }

    pub fn from_round(round: &Round) -> Self {
        RoundDto {
            round_id: round.round_id,
            num_cards: round.num_cards,
            dealer_index: round.dealer_index,
            locked: Some(round.locked),
            player_scores: round
                .scores()
                .map(|(id, s)| PlayerScoreDto {
                    player_scores_id: s.player_scores_id,
                    game_player_id: Some(id.0),
                    num_tricks: s.bid,
                    stand: s.stand,
                })
                .collect(),
        }
    }
}

impl CreateGameRequest {
    pub fn new(settings: &GameSettings, user_ids: Vec<i64>) -> Self {
        CreateGameRequest {
            money_multiplier: settings.money_multiplier,
            extra_cost_loser: settings.extra_cost_loser,
            extra_cost_second_last: settings.extra_cost_second_last,
            players: user_ids,
        }
    }
}

impl CreateRoundsRequest {
    pub fn from_session(game_id: i64, session: &GameSession) -> Self {
        CreateRoundsRequest {
            game_id,
            game_player_ids: session.players().iter().map(|p| p.game_player_id.0).collect(),
            rounds: session.rounds().iter().map(RoundDto::from_round).collect(),
        }
    }
}

impl UpdateRoundsRequest {
    pub fn from_session(session: &GameSession) -> Self {
        UpdateRoundsRequest {
            rounds: session.rounds().iter().map(RoundDto::from_round).collect(),
        }
    }
}

impl PlayerDataRequest {
    /// Counters plus the derived score through the current round.
    pub fn from_session(session: &GameSession) -> Self {
        let player_data = session
            .players()
            .iter()
            .zip(session.scores())
            .map(|(p, (_, score))| PlayerDataDto {
                game_player_id: p.game_player_id.0,
                score,
                warnings: p.warnings,
                bleedings: p.bleedings,
            })
            .collect();
        PlayerDataRequest { player_data }
    }
}
