//! In-memory [`BondeApi`] that records every call and fails on demand.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bondebridge::api::dto::{
    AddUserResponse, CreateGameRequest, CreateGameResponse, CreateRoundsRequest,
    CreateRoundsResponse, GameEnvelope, GamesPage, PlayerDataRequest, StatsQuery, StatsResponse,
    UpdateRoundsRequest, UserDto,
};
use bondebridge::{AppError, BondeApi};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    GetGame(i64),
    CreateGame(CreateGameRequest),
    CreateRounds(CreateRoundsRequest),
    UpdateRounds(UpdateRoundsRequest),
    PlayerData(PlayerDataRequest),
    CompleteGame(i64),
    AddUser(String),
    Users,
    Games(u32),
    Stats,
}

impl RecordedCall {
    pub fn label(&self) -> &'static str {
        match self {
            RecordedCall::GetGame(_) => "get_game",
            RecordedCall::CreateGame(_) => "create_game",
            RecordedCall::CreateRounds(_) => "create_rounds",
            RecordedCall::UpdateRounds(_) => "rounds",
            RecordedCall::PlayerData(_) => "player_data",
            RecordedCall::CompleteGame(_) => "complete_game",
            RecordedCall::AddUser(_) => "add_user",
            RecordedCall::Users => "users",
            RecordedCall::Games(_) => "games",
            RecordedCall::Stats => "stats",
        }
    }
}

/// Calls are recorded before the scripted failure is consulted, so failed
/// attempts show up in [`FakeBondeApi::calls`] too.
#[derive(Default)]
pub struct FakeBondeApi {
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<VecDeque<u16>>,
    game: Mutex<Option<Value>>,
}

impl FakeBondeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body served by `get_game`.
    pub fn with_game(self, envelope: Value) -> Self {
        *self.game.lock().expect("fake api lock") = Some(envelope);
        self
    }

    /// The next `times` calls fail with HTTP `status`.
    pub fn fail_next(&self, status: u16, times: usize) {
        let mut failures = self.failures.lock().expect("fake api lock");
        failures.extend(std::iter::repeat(status).take(times));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("fake api lock").clone()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.calls().iter().map(RecordedCall::label).collect()
    }

    fn record(&self, call: RecordedCall) -> Result<(), AppError> {
        self.calls.lock().expect("fake api lock").push(call);
        match self.failures.lock().expect("fake api lock").pop_front() {
            Some(status) => Err(AppError::http(status, "scripted failure")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BondeApi for FakeBondeApi {
    async fn get_game(&self, game_id: i64) -> Result<GameEnvelope, AppError> {
        self.record(RecordedCall::GetGame(game_id))?;
        let body = self
            .game
            .lock()
            .expect("fake api lock")
            .clone()
            .ok_or_else(|| AppError::http(404, "Game not found"))?;
        Ok(serde_json::from_value(body)?)
    }

    async fn create_game(&self, req: &CreateGameRequest) -> Result<CreateGameResponse, AppError> {
        self.record(RecordedCall::CreateGame(req.clone()))?;
        Ok(CreateGameResponse {
            game_id: 1,
            game_player_ids: (1..=req.players.len() as i64).collect(),
        })
    }

    async fn create_rounds(
        &self,
        req: &CreateRoundsRequest,
    ) -> Result<CreateRoundsResponse, AppError> {
        self.record(RecordedCall::CreateRounds(req.clone()))?;
        let seats = req.game_player_ids.len() as i64;
        let round_ids = (1..=req.rounds.len() as i64).collect();
        let player_scores_ids = (0..req.rounds.len() as i64)
            .map(|r| (1..=seats).map(|s| r * seats + s).collect())
            .collect();
        Ok(CreateRoundsResponse {
            created: true,
            round_ids,
            player_scores_ids,
        })
    }

    async fn update_rounds(&self, req: &UpdateRoundsRequest) -> Result<(), AppError> {
        self.record(RecordedCall::UpdateRounds(req.clone()))
    }

    async fn update_player_data(&self, req: &PlayerDataRequest) -> Result<(), AppError> {
        self.record(RecordedCall::PlayerData(req.clone()))
    }

    async fn complete_game(&self, game_id: i64) -> Result<(), AppError> {
        self.record(RecordedCall::CompleteGame(game_id))
    }

    async fn add_user(&self, nickname: &str) -> Result<AddUserResponse, AppError> {
        self.record(RecordedCall::AddUser(nickname.to_string()))?;
        Ok(AddUserResponse { add_user: true })
    }

    async fn users(&self) -> Result<Vec<UserDto>, AppError> {
        self.record(RecordedCall::Users)?;
        Ok(Vec::new())
    }

    async fn games(&self, page: u32) -> Result<GamesPage, AppError> {
        self.record(RecordedCall::Games(page))?;
        Ok(GamesPage {
            games: Vec::new(),
            total_pages: Some(0),
        })
    }

    async fn stats(&self, _query: &StatsQuery) -> Result<Option<StatsResponse>, AppError> {
        self.record(RecordedCall::Stats)?;
        Ok(None)
    }
}
