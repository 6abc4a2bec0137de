// Error mapping from domain failures to stable codes.
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn every_validation_kind_has_its_own_code() {
    let cases = [
        (ValidationKind::InvalidBid, "INVALID_BID"),
        (ValidationKind::InvalidPlayerCount, "INVALID_PLAYER_COUNT"),
        (ValidationKind::InvalidSeat, "INVALID_SEAT"),
        (ValidationKind::RoundOutOfRange, "ROUND_OUT_OF_RANGE"),
        (ValidationKind::RebidRequired, "REBID_REQUIRED"),
        (ValidationKind::RoundNotLocked, "ROUND_NOT_LOCKED"),
        (ValidationKind::AllPlayersStood, "ALL_PLAYERS_STOOD"),
        (
            ValidationKind::StoodTricksExceedCards,
            "STOOD_TRICKS_EXCEED_CARDS",
        ),
        (ValidationKind::GameFinished, "GAME_FINISHED"),
        (ValidationKind::BidControlDisabled, "BID_CONTROL_DISABLED"),
        (ValidationKind::Other("x".into()), "VALIDATION_ERROR"),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::validation(kind, "detail").into();
        assert_eq!(app.code().as_str(), code);
    }
}

#[test]
fn not_found_kinds_map_to_specific_codes() {
    let app: AppError = DomainError::not_found(NotFoundKind::Player, "game player 9").into();
    assert_eq!(app.code(), ErrorCode::PlayerNotFound);

    let app: AppError = DomainError::not_found(NotFoundKind::Game, "game 3").into();
    assert_eq!(app.code(), ErrorCode::GameNotFound);

    let app: AppError = DomainError::not_found(NotFoundKind::Other("stats".into()), "none").into();
    assert_eq!(app.code(), ErrorCode::NotFound);
}

#[test]
fn infrastructure_errors_have_fixed_codes() {
    assert_eq!(AppError::config("missing").code(), ErrorCode::ConfigError);
    assert_eq!(AppError::http(500, "boom").code(), ErrorCode::UpstreamStatus);
    assert_eq!(AppError::decode("bad json").code(), ErrorCode::DecodeError);
}

#[test]
fn display_keeps_detail() {
    let app: AppError = DomainError::validation(ValidationKind::InvalidBid, "bid 9").into();
    assert!(app.to_string().contains("bid 9"));
}
