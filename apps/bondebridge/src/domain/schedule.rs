//! Round generator: the fixed down/up sequence of hand sizes and dealers.
//!
//! For N players the largest hand is M = floor(52 / N). The down phase deals
//! M, M-1, ..., 2 cards and the up phase 2, 3, ..., M. Tables larger than four
//! repeat the two largest hand sizes in both phases; the repeat counts are
//! totals per phase, so a count of 3 yields three M-card rounds going down
//! and three coming back up.

use std::collections::BTreeSet;

use crate::domain::rules::{
    largest_round_size, MAX_PLAYERS, MIN_HAND_SIZE, MIN_PLAYERS, REPEATS_ABOVE_PLAYERS,
};
use crate::domain::state::{dealer_for_round, GamePlayerId, Round, Seat};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Seat that deals the first round.
    pub starting_dealer: Seat,
    /// Rounds per phase at the largest hand size (tables above four players).
    pub largest_repeats: u8,
    /// Rounds per phase at the second-largest hand size (tables above four players).
    pub second_largest_repeats: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            starting_dealer: 0,
            largest_repeats: 3,
            second_largest_repeats: 2,
        }
    }
}

/// Hand size of every round in playing order.
pub fn round_sizes(players: usize, config: &ScheduleConfig) -> Result<Vec<u8>, DomainError> {
    let largest = largest_round_size(players).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("{players} players; a schedule needs {MIN_PLAYERS}..={MAX_PLAYERS}"),
        )
    })?;
    let repeats = players > REPEATS_ABOVE_PLAYERS;
    let second_largest = largest - 1;

    // Total rounds to deal at `size` within a single phase.
    let rounds_at = |size: u8| -> usize {
        if !repeats {
            return 1;
        }
        if size == largest {
            config.largest_repeats.max(1) as usize
        } else if size == second_largest && size >= MIN_HAND_SIZE {
            config.second_largest_repeats.max(1) as usize
        } else {
            1
        }
    };

    let down = (MIN_HAND_SIZE..=largest).rev();
    let up = MIN_HAND_SIZE..=largest;
    let sizes = down
        .chain(up)
        .flat_map(|size| std::iter::repeat(size).take(rounds_at(size)))
        .collect();
    Ok(sizes)
}

/// Build the full, unplayed round sequence for a new game.
///
/// `players` must be in seat order. Each round starts unlocked with null
/// bids and stands; the dealer moves one seat clockwise per round.
pub fn generate_rounds(
    config: &ScheduleConfig,
    players: &[GamePlayerId],
) -> Result<Vec<Round>, DomainError> {
    let n = players.len();
    let sizes = round_sizes(n, config)?;
    if config.starting_dealer >= n {
        return Err(DomainError::validation(
            ValidationKind::InvalidSeat,
            format!("starting dealer {} outside table of {n}", config.starting_dealer),
        ));
    }
    if players.iter().collect::<BTreeSet<_>>().len() != n {
        return Err(DomainError::validation(
            ValidationKind::InvalidSeat,
            "duplicate game player id",
        ));
    }
    let rounds = sizes
        .into_iter()
        .enumerate()
        .map(|(i, num_cards)| {
            let dealer = dealer_for_round(config.starting_dealer, i, n);
            Round::new(num_cards, dealer, players)
        })
        .collect::<Vec<_>>();
    tracing::debug!(players = n, rounds = rounds.len(), "generated round schedule");
    Ok(rounds)
}
