//! Persistence outbox.
//!
//! Local session state is authoritative. After each command the caller turns
//! the emitted events into [`PersistCommand`]s and hands them to the
//! [`Outbox`], whose worker delivers them in order with bounded retries.
//! Delivery failures never flow back into the session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::api::client::BondeApi;
use crate::api::dto::{PlayerDataRequest, UpdateRoundsRequest};
use crate::config::api::RetryPolicy;
use crate::domain::game::{GameEvent, GameSession};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistCommand {
    Rounds(UpdateRoundsRequest),
    PlayerData(PlayerDataRequest),
    CompleteGame { game_id: i64 },
}

impl PersistCommand {
    pub fn label(&self) -> &'static str {
        match self {
            PersistCommand::Rounds(_) => "rounds",
            PersistCommand::PlayerData(_) => "player_data",
            PersistCommand::CompleteGame { .. } => "complete_game",
        }
    }

    async fn deliver(&self, api: &dyn BondeApi) -> Result<(), AppError> {
        match self {
            PersistCommand::Rounds(req) => api.update_rounds(req).await,
            PersistCommand::PlayerData(req) => api.update_player_data(req).await,
            PersistCommand::CompleteGame { game_id } => api.complete_game(*game_id).await,
        }
    }
}

/// Persistence work implied by `events`, snapshotting `session` as it is now.
///
/// Sessions without a backend game id persist nothing.
pub fn commands_for(session: &GameSession, events: &[GameEvent]) -> Vec<PersistCommand> {
    let Some(game_id) = session.game_id() else {
        debug!(events = events.len(), "session has no game id; nothing to persist");
        return Vec::new();
    };

    let mut rounds = false;
    let mut player_data = false;
    let mut complete = false;
    for event in events {
        match event {
            GameEvent::BidChanged { .. }
            | GameEvent::RoundLocked { .. }
            | GameEvent::RoundUnlocked { .. } => rounds = true,
            GameEvent::StandChanged { .. } | GameEvent::RoundAdvanced { .. } => {
                rounds = true;
                player_data = true;
            }
            GameEvent::PlayerDataChanged { .. } => player_data = true,
            GameEvent::GameCompleted => {
                rounds = true;
                player_data = true;
                complete = true;
            }
            GameEvent::RebidRequired { .. } | GameEvent::StreakCelebration { .. } => {}
        }
    }

    // A corrected bid in a settled round moves scores too.
    if rounds && !player_data {
        player_data = events.iter().any(|e| {
            matches!(e, GameEvent::BidChanged { round_index, .. }
                if *round_index < session.current_round_index()
                    || session.rounds().get(*round_index).is_some_and(|r| r.is_settled()))
        });
    }

    let mut commands = Vec::new();
    if rounds {
        commands.push(PersistCommand::Rounds(UpdateRoundsRequest::from_session(
            session,
        )));
    }
    if player_data {
        commands.push(PersistCommand::PlayerData(PlayerDataRequest::from_session(
            session,
        )));
    }
    if complete {
        commands.push(PersistCommand::CompleteGame { game_id });
    }
    commands
}

/// Delivery totals reported when the outbox shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboxStats {
    pub delivered: usize,
    pub dropped: usize,
}

pub struct Outbox {
    tx: mpsc::UnboundedSender<PersistCommand>,
    worker: JoinHandle<OutboxStats>,
}

impl Outbox {
    /// Start the delivery worker on the current tokio runtime.
    pub fn spawn(api: Arc<dyn BondeApi>, policy: RetryPolicy) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(api, policy, rx));
        Self { tx, worker }
    }

    /// Queue a command without waiting for delivery.
    pub fn enqueue(&self, command: PersistCommand) {
        let label = command.label();
        if self.tx.send(command).is_err() {
            error!(command = label, "outbox worker stopped; command lost");
        }
    }

    pub fn enqueue_all(&self, commands: impl IntoIterator<Item = PersistCommand>) {
        for command in commands {
            self.enqueue(command);
        }
    }

    /// Close the queue and wait until everything queued has been handled.
    pub async fn shutdown(self) -> OutboxStats {
        drop(self.tx);
        match self.worker.await {
            Ok(stats) => stats,
            Err(err) => {
                error!(error = %err, "outbox worker panicked");
                OutboxStats::default()
            }
        }
    }
}

async fn run_worker(
    api: Arc<dyn BondeApi>,
    policy: RetryPolicy,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
) -> OutboxStats {
    let mut stats = OutboxStats::default();
    while let Some(command) = rx.recv().await {
        match deliver_with_retry(api.as_ref(), &command, policy).await {
            Ok(attempts) => {
                debug!(command = command.label(), attempts, "persisted");
                stats.delivered += 1;
            }
            Err(err) => {
                error!(
                    command = command.label(),
                    error = %err,
                    code = %err.code(),
                    "giving up on persistence command"
                );
                stats.dropped += 1;
            }
        }
    }
    stats
}

/// Returns the number of attempts used on success.
async fn deliver_with_retry(
    api: &dyn BondeApi,
    command: &PersistCommand,
    policy: RetryPolicy,
) -> Result<u32, AppError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match command.deliver(api).await {
            Ok(()) => return Ok(attempt),
            Err(err) => {
                if attempt >= max_attempts || !err.is_retryable() {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                warn!(
                    command = command.label(),
                    error = %err,
                    attempt,
                    retry_delay_ms = delay.as_millis() as u64,
                    "persistence failed, retrying"
                );
                sleep(delay).await;
            }
        }
    }
}
