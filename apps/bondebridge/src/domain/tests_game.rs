use crate::domain::game::{Command, GameEvent, GameSession};
use crate::domain::player_view::standings_table;
use crate::domain::state::{GamePlayerId, GameStatus, Round};
use crate::domain::test_state_helpers::{
    four_player_session, history_for, ids, play_round, players, settings,
};
use crate::errors::domain::ValidationKind;

fn bid(
    session: &mut GameSession,
    id: i64,
    value: u8,
) -> Result<Vec<GameEvent>, crate::errors::DomainError> {
    session.apply(Command::SetBid {
        player: GamePlayerId(id),
        value,
    })
}

fn stand(session: &mut GameSession, id: i64, value: bool) {
    session
        .apply(Command::SetStand {
            player: GamePlayerId(id),
            value,
        })
        .unwrap();
}

#[test]
fn new_game_starts_on_first_round() {
    let session = four_player_session();
    assert_eq!(session.status(), GameStatus::InProgress);
    assert_eq!(session.current_round_index(), 0);
    assert_eq!(session.current_round().num_cards, 13);
    assert_eq!(session.dealer(), GamePlayerId(1));
    assert!(!session.rebid());
}

#[test]
fn rejected_lock_raises_rebid_for_dealer_only() {
    let mut session = four_player_session();
    for (id, value) in [(1, 4), (2, 3), (3, 3), (4, 3)] {
        bid(&mut session, id, value).unwrap();
    }

    let events = session.apply(Command::ToggleLock).unwrap();
    assert_eq!(
        events,
        vec![GameEvent::RebidRequired {
            round_index: 0,
            dealer: GamePlayerId(1),
            bid_sum: 13,
            num_cards: 13,
        }]
    );
    assert!(session.rebid());
    assert!(!session.current_round().locked);

    let err = bid(&mut session, 2, 2).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::BidControlDisabled));
    let controls = session.bid_controls(GamePlayerId(2)).unwrap();
    assert!(!controls.decrement && !controls.increment);

    bid(&mut session, 1, 5).unwrap();
    let events = session.apply(Command::ToggleLock).unwrap();
    assert_eq!(events, vec![GameEvent::RoundLocked { round_index: 0 }]);
}

#[test]
fn strict_lock_turns_rejection_into_error() {
    let mut session = four_player_session();
    bid(&mut session, 1, 13).unwrap();
    let err = session.lock_current_round_strict().unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::RebidRequired));
    assert!(session.rebid());
}

#[test]
fn lock_fills_missing_bids() {
    let mut session = four_player_session();
    bid(&mut session, 3, 2).unwrap();
    session.apply(Command::ToggleLock).unwrap();
    let round = session.current_round();
    assert!(round.locked);
    assert_eq!(round.score(GamePlayerId(1)).unwrap().bid, Some(0));
    assert_eq!(round.score(GamePlayerId(3)).unwrap().bid, Some(2));
}

#[test]
fn stands_need_a_locked_round() {
    let mut session = four_player_session();
    let err = session
        .apply(Command::SetStand {
            player: GamePlayerId(1),
            value: true,
        })
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::RoundNotLocked));
}

#[test]
fn advance_rejects_all_players_standing() {
    let mut session = four_player_session();
    for (id, value) in [(1, 5), (2, 3), (3, 3), (4, 0)] {
        bid(&mut session, id, value).unwrap();
    }
    session.apply(Command::ToggleLock).unwrap();
    for id in 1..=4 {
        stand(&mut session, id, true);
    }
    let err = session.apply(Command::Advance).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::AllPlayersStood));
    assert_eq!(session.current_round_index(), 0);
}

#[test]
fn advance_rejects_stood_tricks_over_cards() {
    let mut session = four_player_session();
    for (id, value) in [(1, 7), (2, 7)] {
        bid(&mut session, id, value).unwrap();
    }
    session.apply(Command::ToggleLock).unwrap();
    stand(&mut session, 1, true);
    stand(&mut session, 2, true);

    let err = session.apply(Command::Advance).unwrap_err();
    assert_eq!(
        err.validation_kind(),
        Some(&ValidationKind::StoodTricksExceedCards)
    );
    // The failed attempt must not default the open stands.
    assert_eq!(session.current_round().score(GamePlayerId(3)).unwrap().stand, None);

    stand(&mut session, 2, false);
    let events = session.apply(Command::Advance).unwrap();
    assert_eq!(events, vec![GameEvent::RoundAdvanced { from: 0, to: 1 }]);
    let settled = &session.rounds()[0];
    assert_eq!(settled.score(GamePlayerId(3)).unwrap().stand, Some(false));
    assert!(settled.is_settled());
    assert_eq!(session.dealer(), GamePlayerId(2));
}

#[test]
fn advancing_clears_rebid() {
    let mut session = four_player_session();
    bid(&mut session, 1, 13).unwrap();
    session.apply(Command::ToggleLock).unwrap();
    assert!(session.rebid());
    bid(&mut session, 1, 12).unwrap();
    session.apply(Command::ToggleLock).unwrap();
    stand(&mut session, 1, true);
    session.apply(Command::Advance).unwrap();
    assert!(!session.rebid());
}

#[test]
fn final_round_completes_game_and_allows_overflow() {
    let seated = players(&["Anne", "Bjørn", "Cato"]);
    let ids = ids(3);
    let rounds = vec![Round::new(2, 0, &ids), Round::new(2, 1, &ids)];
    let mut session = GameSession::new(settings(), seated, rounds, GameStatus::InProgress)
        .unwrap()
        .with_game_id(42);

    play_round(&mut session, &[1, 0, 0], &[true, false, false]);
    assert!(session.is_final_round());

    for (id, value) in [(1, 2), (2, 2)] {
        bid(&mut session, id, value).unwrap();
    }
    session.apply(Command::ToggleLock).unwrap();
    stand(&mut session, 1, true);
    stand(&mut session, 2, true);
    let events = session.apply(Command::Advance).unwrap();
    assert_eq!(events, vec![GameEvent::GameCompleted]);
    assert_eq!(session.status(), GameStatus::Finished);
    assert_eq!(session.current_round_index(), 1);

    let err = session.apply(Command::ToggleLock).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::GameFinished));
}

#[test]
fn streak_celebration_on_eighth_stand() {
    let me = GamePlayerId(1);
    let others = [GamePlayerId(2), GamePlayerId(3)];
    let all = ids(3);
    let mut rounds = history_for(me, &others, &[(0, true); 7]);
    rounds.push(Round::new(13, 0, &all));
    rounds.push(Round::new(13, 1, &all));
    let mut session = GameSession::new(
        settings(),
        players(&["Anne", "Bjørn", "Cato"]),
        rounds,
        GameStatus::InProgress,
    )
    .unwrap();
    assert_eq!(session.current_round_index(), 7);

    session.lock_current_round_strict().unwrap();
    stand(&mut session, 1, true);
    let events = session.apply(Command::Advance).unwrap();
    assert_eq!(
        events[0],
        GameEvent::StreakCelebration {
            round_index: 7,
            players: vec![me],
        }
    );
    assert!(session.celebrating());
    assert_eq!(session.score_of(me).unwrap(), 80 + 30);
    session.dismiss_celebration();
    assert!(!session.celebrating());
}

#[test]
fn resume_clamps_to_last_round() {
    let me = GamePlayerId(1);
    let others = [GamePlayerId(2)];
    let rounds = history_for(me, &others, &[(1, true), (0, false)]);
    let session = GameSession::new(
        settings(),
        players(&["Anne", "Bjørn"]),
        rounds,
        GameStatus::InProgress,
    )
    .unwrap();
    assert_eq!(session.current_round_index(), 1);
}

#[test]
fn rounds_must_match_seated_players() {
    let rounds = vec![Round::new(2, 0, &ids(3))];
    let err = GameSession::new(
        settings(),
        players(&["Anne", "Bjørn"]),
        rounds,
        GameStatus::InProgress,
    )
    .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::InvalidSeat));
}

#[test]
fn corrections_only_touch_played_rounds() {
    let mut session = four_player_session();
    play_round(&mut session, &[2, 1, 0, 0], &[true, false, false, false]);
    assert_eq!(session.score_of(GamePlayerId(1)).unwrap(), 14);

    session
        .apply(Command::CorrectBid {
            round_index: 0,
            player: GamePlayerId(1),
            value: 3,
        })
        .unwrap();
    assert_eq!(session.score_of(GamePlayerId(1)).unwrap(), 19);

    let err = session
        .apply(Command::CorrectStand {
            round_index: 1,
            player: GamePlayerId(1),
            value: true,
        })
        .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::RoundOutOfRange));
}

#[test]
fn warnings_feed_into_score() {
    let mut session = four_player_session();
    play_round(&mut session, &[2, 1, 0, 0], &[true, false, false, false]);
    for _ in 0..3 {
        let events = session
            .apply(Command::AdjustWarnings {
                player: GamePlayerId(1),
                increment: true,
            })
            .unwrap();
        assert_eq!(
            events,
            vec![GameEvent::PlayerDataChanged {
                player: GamePlayerId(1)
            }]
        );
    }
    assert_eq!(session.players()[0].warnings, 3);
    assert_eq!(session.score_of(GamePlayerId(1)).unwrap(), 4);
}

#[test]
fn prizes_and_standings_follow_scores() {
    let mut session = four_player_session();
    play_round(&mut session, &[3, 2, 1, 0], &[true, true, false, false]);
    // 19, 14, 0, 0
    let prizes = session.prizes().unwrap();
    assert_eq!(prizes.winner, "Anne");
    assert_eq!(prizes.winner_prize, 19 * 2 + 100);
    assert_eq!(prizes.second_prize, Some(14 * 2 + 50));

    let table = standings_table(&session, false);
    let order: Vec<&str> = table.iter().map(|r| r.nickname.as_str()).collect();
    assert_eq!(order, vec!["Anne", "Bjørn", "Cato", "Dina"]);
    assert_eq!(table[0].earnings, Some(138));
    assert_eq!(table[3].earnings, Some(-138));
    assert_eq!(table[0].consecutive_stands, 0);
    assert_eq!(table[1].initials, "B");
}
