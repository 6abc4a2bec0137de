//! Sessions and payloads for tests.

use bondebridge::domain::state::{GamePlayerId, GameSettings, Player};
use bondebridge::domain::{Command, GameSession, ScheduleConfig};
use serde_json::{json, Value};

pub fn default_settings() -> GameSettings {
    GameSettings {
        money_multiplier: 2,
        extra_cost_loser: 100,
        extra_cost_second_last: 50,
    }
}

/// Players with game player ids 1..=n in the given order.
pub fn players(names: &[&str]) -> Vec<Player> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let id = i as i64 + 1;
            Player::new(100 + id, GamePlayerId(id), *name)
        })
        .collect()
}

/// A new game with the default schedule and backend game id `game_id`.
pub fn started_session(names: &[&str], game_id: i64) -> GameSession {
    GameSession::start(
        default_settings(),
        players(names),
        &ScheduleConfig::default(),
    )
    .expect("fixture players form a valid table")
    .with_game_id(game_id)
}

/// Apply a command that the test expects to succeed.
pub fn apply_ok(session: &mut GameSession, command: Command) -> Vec<bondebridge::GameEvent> {
    session
        .apply(command)
        .unwrap_or_else(|e| panic!("{command:?} rejected: {e}"))
}

/// `GET api/bonde/game/{id}` body with every round unplayed.
///
/// Scores carry no `game_player_id`, as the backend sends them.
pub fn game_envelope(game_id: i64, session: &GameSession) -> Value {
    let players: Vec<Value> = session
        .players()
        .iter()
        .map(|p| {
            json!({
                "nickname": p.nickname,
                "bleedings": p.bleedings,
                "warnings": p.warnings,
                "score": 0,
                "game_player_id": p.game_player_id.0,
                "player_id": p.player_id,
            })
        })
        .collect();
    let rounds: Vec<Value> = session
        .rounds()
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let scores: Vec<Value> = r
                .scores()
                .map(|(_, s)| {
                    json!({
                        "player_scores_id": s.player_scores_id,
                        "num_tricks": s.bid,
                        "stand": s.stand,
                    })
                })
                .collect();
            json!({
                "round_id": r.round_id.unwrap_or(1000 + i as i64),
                "num_cards": r.num_cards,
                "dealer_index": r.dealer_index,
                "locked": r.locked,
                "player_scores": scores,
            })
        })
        .collect();
    let settings = session.settings();
    json!({
        "game": [{
            "game_id": game_id,
            "status": "in-progress",
            "money_multiplier": settings.money_multiplier,
            "extra_cost_loser": settings.extra_cost_loser,
            "extra_cost_second_last": settings.extra_cost_second_last,
            "created_on": "2025-03-14T20:15:00",
        }],
        "rounds": rounds,
        "players": players,
    })
}
