use crate::domain::scoring::{
    consecutive_stands, halfway_score, player_score, replay, scores, streak_bonus_reached,
};
use crate::domain::state::{GamePlayerId, PlayerScore, Round};
use crate::domain::test_state_helpers::{history_for, ids, players};

const ME: GamePlayerId = GamePlayerId(1);

fn others() -> Vec<GamePlayerId> {
    vec![GamePlayerId(2), GamePlayerId(3)]
}

#[test]
fn three_stands_on_three() {
    let rounds = history_for(ME, &others(), &[(3, true); 3]);
    assert_eq!(player_score(&rounds, ME, 2, 0), 57);
}

#[test]
fn zero_bid_stand_is_worth_ten() {
    let rounds = history_for(ME, &others(), &[(0, true)]);
    assert_eq!(player_score(&rounds, ME, 0, 0), 10);
}

#[test]
fn eighth_consecutive_stand_adds_bonus_once() {
    let rounds = history_for(ME, &others(), &[(0, true); 9]);
    assert_eq!(player_score(&rounds, ME, 6, 0), 70);
    assert_eq!(player_score(&rounds, ME, 7, 0), 80 + 30);
    assert_eq!(player_score(&rounds, ME, 8, 0), 90 + 30);
}

#[test]
fn stand_streak_bonus_repeats_every_four() {
    let rounds = history_for(ME, &others(), &[(0, true); 20]);
    assert_eq!(player_score(&rounds, ME, 19, 0), 200 + 4 * 30);
}

#[test]
fn fail_streak_penalties_fire_at_exact_counts() {
    let rounds = history_for(ME, &others(), &[(2, false); 9]);
    assert_eq!(player_score(&rounds, ME, 1, 0), 0);
    assert_eq!(player_score(&rounds, ME, 2, 0), -10);
    assert_eq!(player_score(&rounds, ME, 5, 0), -40);
    assert_eq!(player_score(&rounds, ME, 8, 0), -90);
}

#[test]
fn a_stand_resets_the_fail_streak() {
    let history = [
        (1, false),
        (1, false),
        (1, true),
        (1, false),
        (1, false),
    ];
    let rounds = history_for(ME, &others(), &history);
    assert_eq!(player_score(&rounds, ME, 4, 0), 11);
}

#[test]
fn warnings_deduct_ten_per_pair() {
    let rounds = history_for(ME, &others(), &[(3, true)]);
    assert_eq!(player_score(&rounds, ME, 0, 1), 19);
    assert_eq!(player_score(&rounds, ME, 0, 2), 9);
    assert_eq!(player_score(&rounds, ME, 0, 5), -1);
}

#[test]
fn replay_stops_at_first_undecided_stand() {
    let mut rounds = history_for(ME, &others(), &[(1, true); 3]);
    rounds[1].score_mut(ME).unwrap().stand = None;
    let tally = replay(&rounds, ME, 3);
    assert_eq!(tally.points, 11);
    assert_eq!(tally.consecutive_stands, 1);
}

#[test]
fn through_index_past_history_is_clamped() {
    let rounds = history_for(ME, &others(), &[(1, true); 2]);
    assert_eq!(player_score(&rounds, ME, usize::MAX, 0), 22);
}

#[test]
fn halfway_stops_before_midpoint() {
    let rounds = history_for(ME, &others(), &[(1, true); 8]);
    // len 8: halfway covers rounds [0, min(current, 4)).
    assert_eq!(halfway_score(&rounds, ME, 6, 0, true), 44);
    assert_eq!(halfway_score(&rounds, ME, 2, 0, true), 22);
    assert_eq!(halfway_score(&rounds, ME, 6, 0, false), 77);
}

#[test]
fn halfway_includes_middle_round_of_odd_game() {
    let rounds = history_for(ME, &others(), &[(0, true); 5]);
    // len 5: the midpoint is 2.5, so rounds 0, 1 and 2 count.
    assert_eq!(halfway_score(&rounds, ME, 4, 0, true), 30);
    assert_eq!(halfway_score(&rounds, ME, 1, 0, true), 10);
}

#[test]
fn consecutive_stands_count_back_from_index() {
    let history = [(0, true), (0, false), (0, true), (0, true), (0, true)];
    let rounds = history_for(ME, &others(), &history);
    assert_eq!(consecutive_stands(&rounds, ME, 4), 3);
    assert_eq!(consecutive_stands(&rounds, ME, 1), 0);
    assert_eq!(consecutive_stands(&rounds, ME, 0), 1);
}

#[test]
fn streak_bonus_reached_only_on_threshold_round() {
    let rounds = history_for(ME, &others(), &[(0, true); 12]);
    let fired: Vec<usize> = (0..12)
        .filter(|i| streak_bonus_reached(&rounds, ME, *i))
        .collect();
    assert_eq!(fired, vec![7, 11]);
}

#[test]
fn scoring_is_pure() {
    let rounds = history_for(ME, &others(), &[(2, true), (1, false), (4, true)]);
    let before = rounds.clone();
    let a = player_score(&rounds, ME, 2, 3);
    let b = player_score(&rounds, ME, 2, 3);
    assert_eq!(a, b);
    assert_eq!(rounds, before);
}

#[test]
fn scores_follow_seat_order_and_warnings() {
    let mut seated = players(&["Anne", "Bjørn"]);
    seated[1].warnings = 2;
    let ids = ids(2);
    let mut round = Round::new(3, 0, &ids);
    *round.score_mut(ids[0]).unwrap() = PlayerScore {
        player_scores_id: None,
        bid: Some(2),
        stand: Some(true),
    };
    *round.score_mut(ids[1]).unwrap() = PlayerScore {
        player_scores_id: None,
        bid: Some(1),
        stand: Some(true),
    };
    let all = scores(&seated, &[round], 0);
    assert_eq!(all, vec![(ids[0], 14), (ids[1], 1)]);
}
