use crate::domain::state::{Phase, SocialClass, WinCondition};
use crate::domain::test_state_helpers::{cards, night_state, pid, place_on_table, player};
use crate::domain::turns::{apply_pass, apply_play, pass_threshold, TurnEvent};
use crate::domain::rules::DECK_SIZE;
use crate::errors::domain::ValidationKind;

fn three_players() -> crate::domain::GameState {
    night_state(vec![
        player("a", SocialClass::Middle, &["5C", "5D", "5H", "5S", "9C", "8C"]),
        player("b", SocialClass::Middle, &["3C", "4C", "KD"]),
        player("c", SocialClass::Middle, &["6C", "7C", "QH"]),
    ])
}

#[test]
fn quad_on_a_two_reverses_and_clears() {
    let mut state = three_players();
    place_on_table(&mut state, "c", &["2S"]);

    let out = apply_play(&mut state, &pid("a"), &cards(&["5C", "5D", "5H", "5S"])).unwrap();

    assert!(state.table.reversed);
    assert!(state.table.cards.is_empty());
    assert_eq!(state.table.leader, None);
    assert_eq!(state.table.clear_count, 1);
    assert!(out.events.contains(&TurnEvent::Revolution { reversed: true }));
    assert!(out.table_cleared());
    assert_eq!(state.player(&pid("a")).unwrap().hand, cards(&["9C", "8C"]));
    assert_eq!(state.current_turn, Some(pid("b")));
    assert_eq!(state.card_total(), DECK_SIZE);
}

#[test]
fn quad_wins_instantly_for_the_reversal_goal() {
    let mut state = three_players();
    state.players[0].class = SocialClass::Lower;
    state.players[0].win_condition = WinCondition::TriggerReversal;

    let out = apply_play(&mut state, &pid("a"), &cards(&["5C", "5D", "5H", "5S"])).unwrap();

    assert_eq!(out.winners(), Some(&[pid("a")][..]));
    assert!(state.is_game_over());
    assert!(apply_pass(&mut state, &pid("a")).is_err());
}

#[test]
fn table_clears_after_everyone_but_the_leader_passes() {
    let mut state = three_players();
    assert_eq!(pass_threshold(&state), 3);

    apply_play(&mut state, &pid("a"), &cards(&["9C"])).unwrap();
    assert_eq!(pass_threshold(&state), 2);
    let first = apply_pass(&mut state, &pid("b")).unwrap();
    assert!(!first.table_cleared());
    let second = apply_pass(&mut state, &pid("c")).unwrap();
    assert!(second.table_cleared());

    assert!(state.table.cards.is_empty());
    assert_eq!(state.table.clear_count, 1);
    assert_eq!(state.current_turn, Some(pid("a")));
}

#[test]
fn finished_leader_does_not_count_toward_the_threshold() {
    let mut state = night_state(vec![
        player("a", SocialClass::Middle, &["9C"]),
        player("b", SocialClass::Middle, &["3C", "4C"]),
        player("c", SocialClass::Middle, &["6C", "7C"]),
    ]);
    let out = apply_play(&mut state, &pid("a"), &cards(&["9C"])).unwrap();
    assert!(out.events.contains(&TurnEvent::Finished { player: pid("a") }));
    assert_eq!(pass_threshold(&state), 2);

    apply_pass(&mut state, &pid("b")).unwrap();
    let out = apply_pass(&mut state, &pid("c")).unwrap();
    assert!(out.table_cleared());
    assert_eq!(state.current_turn, Some(pid("b")));
}

#[test]
fn eight_cuts_and_the_turn_moves_on() {
    let mut state = three_players();
    let out = apply_play(&mut state, &pid("a"), &cards(&["8C"])).unwrap();
    assert!(out.events.contains(&TurnEvent::Cut { player: pid("a") }));
    assert!(state.table.cards.is_empty());
    assert_eq!(state.table.clear_count, 1);
    assert_eq!(state.current_turn, Some(pid("b")));
}

#[test]
fn skip_flag_is_consumed_once() {
    let mut state = three_players();
    state.players[1].skip_next_turn = true;

    let out = apply_play(&mut state, &pid("a"), &cards(&["9C"])).unwrap();

    assert!(out.events.contains(&TurnEvent::TurnSkipped { player: pid("b") }));
    assert_eq!(state.current_turn, Some(pid("c")));
    assert!(!state.players[1].skip_next_turn);
}

#[test]
fn rejects_out_of_turn_and_foreign_cards() {
    let mut state = three_players();
    let err = apply_play(&mut state, &pid("b"), &cards(&["3C"])).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::OutOfTurn));

    let err = apply_play(&mut state, &pid("a"), &cards(&["3C"])).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::CardNotInHand));

    state.phase = Phase::Discussion;
    let err = apply_pass(&mut state, &pid("a")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));
}

#[test]
fn third_clear_ends_the_night() {
    let mut state = three_players();
    state.table.clear_count = 2;

    let out = apply_play(&mut state, &pid("a"), &cards(&["8C"])).unwrap();

    assert!(out.night_ended());
    assert_eq!(state.phase, Phase::Discussion);
    assert_eq!(state.day, 2);
    assert_eq!(state.current_turn, None);
    assert_eq!(state.card_total(), DECK_SIZE);
}

#[test]
fn last_hand_standing_ends_the_night_with_shared_win() {
    let mut state = night_state(vec![
        player("a", SocialClass::Middle, &["5C"]),
        player("b", SocialClass::Middle, &["6C"]),
        player("c", SocialClass::Middle, &["7C", "7D"]),
    ]);
    state.players[1].eliminated = true;

    let out = apply_play(&mut state, &pid("a"), &cards(&["5C"])).unwrap();

    assert!(out.night_ended());
    assert_eq!(out.winners(), Some(&[pid("a"), pid("c")][..]));
    assert!(state
        .victory_reason
        .as_deref()
        .is_some_and(|r| r.contains("share the win")));
}

#[test]
fn reconcile_moves_the_pointer_off_an_emptied_hand() {
    use crate::domain::turns::reconcile_turn;
    let mut state = night_state(vec![
        player("a", SocialClass::Middle, &["5C"]),
        player("b", SocialClass::Middle, &["6C"]),
        player("c", SocialClass::Middle, &["7C", "7D"]),
    ]);
    // A steal emptied a's hand while it was a's turn.
    let card = state.players[0].hand.remove(0);
    state.players[1].hand.push(card);
    state.finish_order.push(pid("a"));

    let out = reconcile_turn(&mut state).unwrap();

    assert_eq!(state.current_turn, Some(pid("b")));
    assert!(!out.night_ended());
}
