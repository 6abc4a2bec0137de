//! Property tests for the schedule, lock rule and score replay.

use proptest::prelude::*;

use crate::domain::lock::{toggle_lock, LockOutcome};
use crate::domain::rules::{base_round_count, largest_round_size};
use crate::domain::schedule::{generate_rounds, ScheduleConfig};
use crate::domain::scoring::player_score;
use crate::domain::state::{GamePlayerId, Round};
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::{history_for, ids};

fn others() -> Vec<GamePlayerId> {
    vec![GamePlayerId(2), GamePlayerId(3), GamePlayerId(4)]
}

/// A round plus bids that always fit in it.
fn round_with_bids() -> impl Strategy<Value = (u8, Vec<u8>)> {
    (2u8..=13).prop_flat_map(|cards| (Just(cards), prop::collection::vec(0..=cards, 4)))
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Without repeats, every table plays 2 * (M - 1) rounds and the dealer
    /// moves one seat per round.
    #[test]
    fn prop_schedule_shape(n in 2i64..=26, start in 0usize..26) {
        let start = start % n as usize;
        let config = ScheduleConfig {
            starting_dealer: start,
            largest_repeats: 1,
            second_largest_repeats: 1,
        };
        let rounds = generate_rounds(&config, &ids(n)).unwrap();
        prop_assert_eq!(Some(rounds.len()), base_round_count(n as usize));
        let m = largest_round_size(n as usize).unwrap();
        prop_assert_eq!(rounds[0].num_cards, m);
        prop_assert_eq!(rounds[rounds.len() - 1].num_cards, m);
        for (i, round) in rounds.iter().enumerate() {
            prop_assert_eq!(round.dealer_index, (start + i) % n as usize);
            prop_assert!(round.num_cards >= 2 && round.num_cards <= m);
        }
    }

    /// A lock is rejected exactly when the bids add up to the cards dealt.
    #[test]
    fn prop_lock_rejected_iff_bids_match_cards((cards, bids) in round_with_bids()) {
        let ids = ids(4);
        let mut round = Round::new(cards, 0, &ids);
        for (id, b) in ids.iter().zip(&bids) {
            round.score_mut(*id).unwrap().bid = Some(*b);
        }
        let sum: u32 = bids.iter().map(|b| *b as u32).sum();
        let outcome = toggle_lock(&mut round);
        if sum == cards as u32 {
            prop_assert!(matches!(outcome, LockOutcome::RebidRequired { .. }), "expected rebid");
            prop_assert!(!round.locked);
        } else {
            prop_assert_eq!(outcome, LockOutcome::Locked);
            prop_assert!(round.locked);
        }
    }

    /// Uninterrupted stands on a fixed bid score k * (10 + b²) plus 30 per
    /// streak threshold passed.
    #[test]
    fn prop_stand_run_closed_form(bid in 0u8..=6, k in 1usize..=24) {
        let rounds = history_for(GamePlayerId(1), &others(), &vec![(bid, true); k]);
        let bonuses = [8usize, 12, 16, 20].iter().filter(|t| **t <= k).count() as i32;
        let expected = k as i32 * (10 + (bid as i32).pow(2)) + 30 * bonuses;
        prop_assert_eq!(player_score(&rounds, GamePlayerId(1), k - 1, 0), expected);
    }

    /// An undecided stand cuts the replay: the score equals the score of the
    /// prefix before it.
    #[test]
    fn prop_undecided_stand_truncates(
        history in prop::collection::vec((0u8..=5, any::<bool>()), 1..20),
        cut in 0usize..20,
    ) {
        let cut = cut % history.len();
        let me = GamePlayerId(1);
        let mut rounds = history_for(me, &others(), &history);
        rounds[cut].score_mut(me).unwrap().stand = None;
        let through = history.len() - 1;
        let prefix_score = if cut == 0 {
            0
        } else {
            player_score(&rounds, me, cut - 1, 0)
        };
        prop_assert_eq!(player_score(&rounds, me, through, 0), prefix_score);
    }

    /// Each pair of warnings costs exactly ten points.
    #[test]
    fn prop_warning_pairs_cost_ten(
        history in prop::collection::vec((0u8..=5, any::<bool>()), 1..12),
        warnings in 0u32..20,
    ) {
        let me = GamePlayerId(1);
        let rounds = history_for(me, &others(), &history);
        let through = history.len() - 1;
        let base = player_score(&rounds, me, through, 0);
        prop_assert_eq!(
            player_score(&rounds, me, through, warnings),
            base - (warnings / 2) as i32 * 10
        );
    }
}
