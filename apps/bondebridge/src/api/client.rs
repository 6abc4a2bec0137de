use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::dto::{
    AddUserRequest, AddUserResponse, CreateGameRequest, CreateGameResponse, CreateRoundsRequest,
    CreateRoundsResponse, GameEnvelope, GamesPage, PlayerDataRequest, StatsQuery, StatsResponse,
    UpdateRoundsRequest, UserDto, UsersResponse,
};
use crate::config::api::ApiConfig;
use crate::error::AppError;

/// Calls against the BondeBridge backend.
#[async_trait]
pub trait BondeApi: Send + Sync {
    async fn get_game(&self, game_id: i64) -> Result<GameEnvelope, AppError>;
    async fn create_game(&self, req: &CreateGameRequest) -> Result<CreateGameResponse, AppError>;
    async fn create_rounds(
        &self,
        req: &CreateRoundsRequest,
    ) -> Result<CreateRoundsResponse, AppError>;
    async fn update_rounds(&self, req: &UpdateRoundsRequest) -> Result<(), AppError>;
    async fn update_player_data(&self, req: &PlayerDataRequest) -> Result<(), AppError>;
    async fn complete_game(&self, game_id: i64) -> Result<(), AppError>;
    async fn add_user(&self, nickname: &str) -> Result<AddUserResponse, AppError>;
    async fn users(&self) -> Result<Vec<UserDto>, AppError>;
    async fn games(&self, page: u32) -> Result<GamesPage, AppError>;
    /// `None` when the backend has no data for the filter (204).
    async fn stats(&self, query: &StatsQuery) -> Result<Option<StatsResponse>, AppError>;
}

pub struct HttpBondeApi {
    client: Client,
    base_url: String,
}

impl HttpBondeApi {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        debug!(path, "GET");
        let resp = self.client.get(self.url(path)).query(query).send().await?;
        read_json(ensure_success(resp).await?).await
    }

    async fn send_json<B, T>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, AppError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(path, %method, "send");
        let resp = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        read_json(ensure_success(resp).await?).await
    }
}

/// Turn a non-2xx response into `AppError::Http`, keeping the backend's `detail`.
async fn ensure_success(resp: Response) -> Result<Response, AppError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AppError::http(status.as_u16(), error_detail(&body)))
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, AppError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// FastAPI-style `{"detail": "..."}` bodies yield the detail; anything else is kept as is.
pub fn error_detail(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: serde_json::Value,
    }
    match serde_json::from_str::<Detail>(body) {
        Ok(Detail {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(Detail { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl BondeApi for HttpBondeApi {
    async fn get_game(&self, game_id: i64) -> Result<GameEnvelope, AppError> {
        self.get_json(&format!("api/bonde/game/{game_id}"), &[]).await
    }

    async fn create_game(&self, req: &CreateGameRequest) -> Result<CreateGameResponse, AppError> {
        self.send_json(reqwest::Method::POST, "api/bonde/game", req).await
    }

    async fn create_rounds(
        &self,
        req: &CreateRoundsRequest,
    ) -> Result<CreateRoundsResponse, AppError> {
        self.send_json(reqwest::Method::POST, "api/bonde/rounds", req).await
    }

    async fn update_rounds(&self, req: &UpdateRoundsRequest) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .send_json(reqwest::Method::PUT, "api/bonde/rounds", req)
            .await?;
        Ok(())
    }

    async fn update_player_data(&self, req: &PlayerDataRequest) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .send_json(reqwest::Method::PUT, "api/bonde/playerdata", req)
            .await?;
        Ok(())
    }

    async fn complete_game(&self, game_id: i64) -> Result<(), AppError> {
        let path = format!("api/game/complete/{game_id}");
        debug!(path = %path, "PUT");
        let resp = self.client.put(self.url(&path)).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn add_user(&self, nickname: &str) -> Result<AddUserResponse, AppError> {
        let req = AddUserRequest {
            nickname: nickname.to_string(),
        };
        self.send_json(reqwest::Method::POST, "api/bonde/adduser", &req).await
    }

    async fn users(&self) -> Result<Vec<UserDto>, AppError> {
        let resp: UsersResponse = self.get_json("api/bonde/users", &[]).await?;
        Ok(resp.users)
    }

    async fn games(&self, page: u32) -> Result<GamesPage, AppError> {
        self.get_json("api/bonde/games", &[("page", page.to_string())]).await
    }

    async fn stats(&self, query: &StatsQuery) -> Result<Option<StatsResponse>, AppError> {
        let pairs = query.to_query_pairs()?;
        debug!(filters = pairs.len(), "GET stats");
        let resp = self
            .client
            .get(self.url("api/bonde/stats"))
            .query(&pairs)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        read_json(resp).await.map(Some)
    }
}
