//! Error codes for the BondeBridge engine and client.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE.

use core::fmt;

use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Game rule validation
    /// Bid outside 0..=num_cards
    InvalidBid,
    /// Player count cannot produce a schedule
    InvalidPlayerCount,
    /// Seat or dealer index outside the table
    InvalidSeat,
    /// Round index outside the schedule
    RoundOutOfRange,
    /// Sum of bids equals cards dealt
    RebidRequired,
    /// Round must be locked before advancing
    RoundNotLocked,
    /// Every player stood in the same round
    AllPlayersStood,
    /// Stood bids exceed the cards dealt
    StoodTricksExceedCards,
    /// Game already finished
    GameFinished,
    /// Bid control is not interactive for this seat
    BidControlDisabled,
    /// General validation error
    ValidationError,

    // Not found
    PlayerNotFound,
    RoundNotFound,
    GameNotFound,
    NotFound,

    // Client / transport
    /// Backend answered with a non-success status
    UpstreamStatus,
    /// Request could not be sent or timed out
    UpstreamUnavailable,
    /// Response body did not match the expected shape
    DecodeError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidBid => "INVALID_BID",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::InvalidSeat => "INVALID_SEAT",
            Self::RoundOutOfRange => "ROUND_OUT_OF_RANGE",
            Self::RebidRequired => "REBID_REQUIRED",
            Self::RoundNotLocked => "ROUND_NOT_LOCKED",
            Self::AllPlayersStood => "ALL_PLAYERS_STOOD",
            Self::StoodTricksExceedCards => "STOOD_TRICKS_EXCEED_CARDS",
            Self::GameFinished => "GAME_FINISHED",
            Self::BidControlDisabled => "BID_CONTROL_DISABLED",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UpstreamStatus => "UPSTREAM_STATUS",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::DecodeError => "DECODE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::InvalidBid => Self::InvalidBid,
                ValidationKind::InvalidPlayerCount => Self::InvalidPlayerCount,
                ValidationKind::InvalidSeat => Self::InvalidSeat,
                ValidationKind::RoundOutOfRange => Self::RoundOutOfRange,
                ValidationKind::RebidRequired => Self::RebidRequired,
                ValidationKind::RoundNotLocked => Self::RoundNotLocked,
                ValidationKind::AllPlayersStood => Self::AllPlayersStood,
                ValidationKind::StoodTricksExceedCards => Self::StoodTricksExceedCards,
                ValidationKind::GameFinished => Self::GameFinished,
                ValidationKind::BidControlDisabled => Self::BidControlDisabled,
                ValidationKind::Other(_) => Self::ValidationError,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Player => Self::PlayerNotFound,
                NotFoundKind::Round => Self::RoundNotFound,
                NotFoundKind::Game => Self::GameNotFound,
                NotFoundKind::Other(_) => Self::NotFound,
            },
        }
    }
}
