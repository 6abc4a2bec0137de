//! Round validator and the open ⇄ locked transition.

use crate::domain::rules::valid_bid_range;
use crate::domain::state::{GamePlayerId, GameStatus, Round, Seat};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    Locked,
    Unlocked,
    /// Bids sum to the cards dealt; the round stays open and the dealer must rebid.
    RebidRequired { bid_sum: u32, num_cards: u8 },
}

/// A round may lock only when the bids (missing = 0) do not add up to the cards dealt.
pub fn lock_allowed(round: &Round) -> bool {
    round.bid_sum() != round.num_cards as u32
}

/// Toggle the round's lock.
///
/// Unlocking always succeeds. Locking fills missing bids with zero, unless the
/// attempt is rejected, in which case the round is left untouched.
pub fn toggle_lock(round: &mut Round) -> LockOutcome {
    if round.locked {
        round.locked = false;
        return LockOutcome::Unlocked;
    }
    if !lock_allowed(round) {
        tracing::debug!(
            num_cards = round.num_cards,
            dealer = round.dealer_index,
            "lock rejected; bids equal cards dealt"
        );
        return LockOutcome::RebidRequired {
            bid_sum: round.bid_sum(),
            num_cards: round.num_cards,
        };
    }
    for score in round.scores_mut() {
        score.bid.get_or_insert(0);
    }
    round.locked = true;
    LockOutcome::Locked
}

/// Whether the bid control for `seat` is interactive.
///
/// Locked rounds accept no bids; during a rebid only the dealer may change theirs.
pub fn bid_control_enabled(round: &Round, seat: Seat, rebid: bool) -> bool {
    !round.locked && (!rebid || seat == round.dealer_index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidControls {
    pub decrement: bool,
    pub increment: bool,
}

/// Enabled state of the -/+ buttons for one player's bid.
pub fn bid_controls(round: &Round, seat: Seat, player: GamePlayerId, rebid: bool) -> BidControls {
    let enabled = bid_control_enabled(round, seat, rebid);
    let bid = round.score(player).and_then(|s| s.bid).unwrap_or(0);
    let range = valid_bid_range(round.num_cards);
    BidControls {
        decrement: enabled && bid > *range.start(),
        increment: enabled && bid < *range.end(),
    }
}

/// Undecided stands count as failures once the table moves on.
pub fn default_missing_stands(round: &mut Round) {
    for score in round.scores_mut() {
        score.stand.get_or_insert(false);
    }
}

/// Gate for leaving the current round. Expects missing stands already defaulted.
pub fn check_advance(round: &Round, is_final: bool) -> Result<(), DomainError> {
    if !round.locked {
        return Err(DomainError::validation(
            ValidationKind::RoundNotLocked,
            "lock the round before entering results",
        ));
    }
    if round.all_stood() {
        return Err(DomainError::validation(
            ValidationKind::AllPlayersStood,
            "all players cannot stand in the same round",
        ));
    }
    let stood = round.stood_bid_sum();
    if !is_final && stood > round.num_cards as u32 {
        return Err(DomainError::validation(
            ValidationKind::StoodTricksExceedCards,
            format!("{stood} stood tricks exceed {} cards dealt", round.num_cards),
        ));
    }
    Ok(())
}

/// Round to show when a game is (re)opened.
///
/// Finished games point at their last round; otherwise the first round that
/// is not fully settled, or `rounds.len()` when every round is settled.
pub fn resume_round_index(status: GameStatus, rounds: &[Round]) -> usize {
    match status {
        GameStatus::Finished => rounds.len().saturating_sub(1),
        GameStatus::InProgress => rounds
            .iter()
            .position(|r| !r.is_settled())
            .unwrap_or(rounds.len()),
    }
}
