#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod outbox;

// Re-exports for public API
pub use api::{BondeApi, HttpBondeApi};
pub use config::api::{ApiConfig, RetryPolicy};
pub use config::game::GameConfig;
pub use domain::{Command, GameEvent, GameSession};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use outbox::{commands_for, Outbox, OutboxStats, PersistCommand};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    bonde_test_support::logging::init();
}
