//! Point mutations on round and player state.
//!
//! Nothing here evaluates round-level constraints such as the bid-sum rule;
//! that is the lock transition's job.

use crate::domain::rules::valid_bid_range;
use crate::domain::state::{require_round_mut, GamePlayerId, Player, Round};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Replace one player's bid in one round.
pub fn set_bid(
    rounds: &mut [Round],
    round_index: usize,
    player: GamePlayerId,
    value: u8,
) -> Result<(), DomainError> {
    let round = require_round_mut(rounds, round_index)?;
    if !valid_bid_range(round.num_cards).contains(&value) {
        return Err(DomainError::validation(
            ValidationKind::InvalidBid,
            format!(
                "bid {value} outside 0..={} for round {round_index}",
                round.num_cards
            ),
        ));
    }
    round.score_mut(player)?.bid = Some(value);
    Ok(())
}

/// Replace one player's stand outcome in one round.
pub fn set_stand(
    rounds: &mut [Round],
    round_index: usize,
    player: GamePlayerId,
    value: bool,
) -> Result<(), DomainError> {
    let round = require_round_mut(rounds, round_index)?;
    round.score_mut(player)?.stand = Some(value);
    Ok(())
}

fn find_player_mut(players: &mut [Player], id: GamePlayerId) -> Result<&mut Player, DomainError> {
    players
        .iter_mut()
        .find(|p| p.game_player_id == id)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("game player {id}")))
}

fn step(count: u32, increment: bool) -> u32 {
    if increment {
        count.saturating_add(1)
    } else {
        count.saturating_sub(1)
    }
}

/// Add or remove one warning; never drops below zero. Returns the new count.
pub fn adjust_warnings(
    players: &mut [Player],
    player: GamePlayerId,
    increment: bool,
) -> Result<u32, DomainError> {
    let p = find_player_mut(players, player)?;
    p.warnings = step(p.warnings, increment);
    Ok(p.warnings)
}

/// Add or remove one bleeding; never drops below zero. Returns the new count.
pub fn adjust_bleedings(
    players: &mut [Player],
    player: GamePlayerId,
    increment: bool,
) -> Result<u32, DomainError> {
    let p = find_player_mut(players, player)?;
    p.bleedings = step(p.bleedings, increment);
    Ok(p.bleedings)
}
