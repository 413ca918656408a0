use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::state::{HiddenWinCondition, Phase, SocialClass, WinCondition};
use crate::domain::test_state_helpers::{cards, day_state, night_state, pid, player};
use crate::domain::turns::apply_play;
use crate::domain::victory::check_instant_victories;
use crate::domain::voting::{cast_vote, eliminate, finalize_vote};
use crate::domain::GameState;
use crate::errors::domain::ValidationKind;

fn village() -> GameState {
    day_state(vec![
        player("a", SocialClass::Middle, &["5C", "6C"]),
        player("b", SocialClass::Upper, &["7C", "8C"]),
        player("c", SocialClass::Lower, &["9C", "TC"]),
    ])
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn hanged_martyr_wins() {
    let mut state = village();
    state.players[0].hidden_condition = HiddenWinCondition::Martyr;

    cast_vote(&mut state, &pid("b"), &pid("a")).unwrap();
    cast_vote(&mut state, &pid("c"), &pid("a")).unwrap();
    let outcome = finalize_vote(&mut state, &mut rng()).unwrap();

    assert_eq!(outcome.eliminated, Some(pid("a")));
    assert_eq!(outcome.winners, vec![pid("a")]);
    assert_eq!(state.winner_ids, vec![pid("a")]);
    assert_eq!(state.phase, Phase::Discussion, "no night after a win");
    assert!(state
        .victory_reason
        .as_deref()
        .is_some_and(|r| r.contains("hidden goal reached")));
}

#[test]
fn simultaneous_goals_make_co_winners() {
    let mut state = village();
    state.players[0].hidden_condition = HiddenWinCondition::Martyr;
    state.players[2].win_condition = WinCondition::OutRank { target: pid("a") };

    let winners = eliminate(&mut state, &pid("a")).unwrap();

    assert_eq!(winners, vec![pid("a"), pid("c")]);
    let reason = state.victory_reason.clone().unwrap();
    assert!(reason.contains("A:") && reason.contains("C:"), "{reason}");
}

#[test]
fn winners_are_final_once_declared() {
    let mut state = village();
    state.players[0].hidden_condition = HiddenWinCondition::Martyr;
    eliminate(&mut state, &pid("a")).unwrap();
    let before = state.winner_ids.clone();

    state.players[1].hidden_condition = HiddenWinCondition::FirstOut;
    state.finish_order.push(pid("b"));
    assert!(check_instant_victories(&mut state).is_empty());
    assert_eq!(state.winner_ids, before);
    assert!(eliminate(&mut state, &pid("b")).is_err());
}

#[test]
fn tie_is_broken_among_leaders_and_night_falls() {
    let mut state = village();
    cast_vote(&mut state, &pid("a"), &pid("b")).unwrap();
    cast_vote(&mut state, &pid("b"), &pid("a")).unwrap();

    let outcome = finalize_vote(&mut state, &mut rng()).unwrap();

    let out = outcome.eliminated.unwrap();
    assert!(out == pid("a") || out == pid("b"));
    assert_eq!(outcome.tally.values().sum::<usize>(), 2);
    assert_eq!(state.phase, Phase::Play);
    assert!(!state.turn_order.contains(&out));
    assert!(state.votes.is_empty());
    assert!(state.current_turn.is_some());
}

#[test]
fn empty_vote_eliminates_nobody() {
    let mut state = village();
    let outcome = finalize_vote(&mut state, &mut rng()).unwrap();
    assert_eq!(outcome.eliminated, None);
    assert_eq!(state.phase, Phase::Play);
    assert_eq!(state.turn_order.len(), 3);
}

#[test]
fn votes_are_validated_and_sour_the_target() {
    let mut state = village();
    let err = cast_vote(&mut state, &pid("a"), &pid("a")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::InvalidVote));
    assert!(cast_vote(&mut state, &pid("a"), &pid("zz")).is_err());

    cast_vote(&mut state, &pid("a"), &pid("b")).unwrap();
    assert_eq!(state.relationships.get(&pid("b"), &pid("a")), -1);
    assert_eq!(state.affinity.get(&pid("b"), &pid("a")), 40);

    state.players[2].eliminated = true;
    let err = cast_vote(&mut state, &pid("a"), &pid("c")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::InvalidVote));

    let mut night = night_state(vec![
        player("a", SocialClass::Middle, &["5C"]),
        player("b", SocialClass::Middle, &["6C"]),
        player("c", SocialClass::Middle, &["7C"]),
    ]);
    let err = cast_vote(&mut night, &pid("a"), &pid("b")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));
}

#[test]
fn first_out_wins_for_the_upper_tier() {
    let mut state = night_state(vec![
        player("a", SocialClass::Upper, &["9C"]),
        player("b", SocialClass::Middle, &["3C", "4C"]),
        player("c", SocialClass::Middle, &["6C", "7C"]),
    ]);
    state.players[0].win_condition = WinCondition::FinishFirst;
    state.players[2].win_condition = WinCondition::OutRank { target: pid("b") };

    let out = apply_play(&mut state, &pid("a"), &cards(&["9C"])).unwrap();

    assert_eq!(out.winners(), Some(&[pid("a")][..]));
    assert_eq!(state.finish_order, vec![pid("a")]);
}

#[test]
fn helping_a_target_out_first_wins() {
    let mut state = night_state(vec![
        player("a", SocialClass::Lower, &["9C"]),
        player("b", SocialClass::Middle, &["3C", "4C"]),
        player("c", SocialClass::Middle, &["6C", "7C"]),
    ]);
    state.players[1].win_condition = WinCondition::Help { target: pid("a") };
    state.players[2].hidden_condition = HiddenWinCondition::Protect { target: pid("a") };

    apply_play(&mut state, &pid("a"), &cards(&["9C"])).unwrap();

    assert_eq!(state.winner_ids, vec![pid("b"), pid("c")]);
}

#[test]
fn outranking_waits_for_the_target_to_go_out() {
    let mut state = night_state(vec![
        player("m", SocialClass::Middle, &["5C"]),
        player("u", SocialClass::Upper, &["KD"]),
        player("l", SocialClass::Lower, &["9C", "TC"]),
    ]);
    state.players[0].win_condition = WinCondition::OutRank { target: pid("u") };

    let out = apply_play(&mut state, &pid("m"), &cards(&["5C"])).unwrap();
    assert_eq!(out.winners(), None, "u still holds cards");
    assert_eq!(state.finish_order, vec![pid("m")]);
    assert!(state.winner_ids.is_empty());
    assert_eq!(state.current_turn, Some(pid("u")));

    let out = apply_play(&mut state, &pid("u"), &cards(&["KD"])).unwrap();
    assert_eq!(out.winners(), Some(&[pid("m")][..]));
    assert_eq!(state.finish_order, vec![pid("m"), pid("u")]);
}

#[test]
fn revenge_needs_the_target_out_or_behind() {
    let mut state = night_state(vec![
        player("a", SocialClass::Lower, &["5C"]),
        player("b", SocialClass::Middle, &["6C", "7C"]),
        player("c", SocialClass::Middle, &["9C", "TC"]),
    ]);
    state.players[0].hidden_condition = HiddenWinCondition::RevengeOn { target: pid("b") };

    apply_play(&mut state, &pid("a"), &cards(&["5C"])).unwrap();
    assert!(state.winner_ids.is_empty());

    state.phase = Phase::Discussion;
    let winners = eliminate(&mut state, &pid("b")).unwrap();
    assert_eq!(winners, vec![pid("a")]);
}
