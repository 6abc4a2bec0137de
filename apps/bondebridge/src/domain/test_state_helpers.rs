//! Test-only builders for sessions and rounds.

use crate::domain::game::{Command, GameSession};
use crate::domain::schedule::ScheduleConfig;
use crate::domain::state::{GamePlayerId, GameSettings, Player, PlayerScore, Round};

pub fn ids(n: i64) -> Vec<GamePlayerId> {
    (1..=n).map(GamePlayerId).collect()
}

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

pub fn settings() -> GameSettings {
    GameSettings {
        money_multiplier: 2,
        extra_cost_loser: 100,
        extra_cost_second_last: 50,
    }
}

/// Four-player session dealing from seat 0.
pub fn four_player_session() -> GameSession {
    GameSession::start(
        settings(),
        players(&["Anne", "Bjørn", "Cato", "Dina"]),
        &ScheduleConfig::default(),
    )
    .expect("four players always produce a schedule")
}

/// A settled round where every player bid `bid` and got `stand`.
pub fn settled_round(num_cards: u8, players: &[GamePlayerId], outcomes: &[(u8, bool)]) -> Round {
    let mut round = Round::new(num_cards, 0, players);
    for (id, (bid, stand)) in players.iter().zip(outcomes) {
        *round.score_mut(*id).expect("player seated") = PlayerScore {
            player_scores_id: None,
            bid: Some(*bid),
            stand: Some(*stand),
        };
    }
    round.locked = true;
    round
}

/// Rounds where a single player's outcomes follow `history`; all others fail.
pub fn history_for(
    player: GamePlayerId,
    others: &[GamePlayerId],
    history: &[(u8, bool)],
) -> Vec<Round> {
    let mut all = vec![player];
    all.extend_from_slice(others);
    history
        .iter()
        .map(|(bid, stand)| {
            let mut outcomes = vec![(*bid, *stand)];
            outcomes.extend(others.iter().map(|_| (0, false)));
            settled_round(13, &all, &outcomes)
        })
        .collect()
}

/// Bid for every player (seat order), lock, record stands and advance.
pub fn play_round(session: &mut GameSession, bids: &[u8], stands: &[bool]) {
    let ids: Vec<GamePlayerId> = session.players().iter().map(|p| p.game_player_id).collect();
    for (id, bid) in ids.iter().zip(bids) {
        session
            .apply(Command::SetBid {
                player: *id,
                value: *bid,
            })
            .expect("bid accepted");
    }
    session
        .lock_current_round_strict()
        .expect("bids do not match cards dealt");
    for (id, stand) in ids.iter().zip(stands) {
        session
            .apply(Command::SetStand {
                player: *id,
                value: *stand,
            })
            .expect("stand accepted");
    }
    session.apply(Command::Advance).expect("round advances");
}
