use crate::domain::cheat::{
    begin_cheat, correct_over_defense, is_vacuous_defense, park_pending, resolve_cheat,
    take_pending, validate_cheat, CheatAttempt, CheatEffect, CheatJudgment, CheatVerdict,
    DefenderPenalty,
};
use crate::domain::deduction::deduce;
use crate::domain::facts::{FactKind, FactPayload};
use crate::domain::rules::DECK_SIZE;
use crate::domain::state::{Phase, SocialClass};
use crate::domain::test_state_helpers::{cards, night_state, pid, player};
use crate::domain::GameState;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

fn table() -> GameState {
    night_state(vec![
        player("a", SocialClass::Lower, &["3C", "4C"]),
        player("b", SocialClass::Upper, &["9H", "TH", "JH"]),
        player("c", SocialClass::Middle, &["5D", "6D"]),
    ])
}

fn attempt() -> CheatAttempt {
    CheatAttempt {
        attacker: pid("a"),
        target: pid("b"),
        method: "marks the deck while dealing".into(),
    }
}

fn verdict(judgment: CheatJudgment, effect: CheatEffect, index: Option<usize>) -> CheatVerdict {
    CheatVerdict {
        judgment,
        effect,
        target_card_index: index,
        defender_penalty: None,
        narrative: "test".into(),
    }
}

#[test]
fn only_the_lower_tier_cheats_once_per_night() {
    let mut state = table();
    let err = validate_cheat(&state, &pid("c"), &pid("b")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::CheatNotAllowed));
    let err = validate_cheat(&state, &pid("a"), &pid("a")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::InvalidTarget));

    begin_cheat(&mut state, &pid("a"), &pid("b"), "sleight").unwrap();
    let err = begin_cheat(&mut state, &pid("a"), &pid("c"), "again").unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::AlreadyUsed, _)));

    state.phase = Phase::Discussion;
    let err = validate_cheat(&state, &pid("a"), &pid("b")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));
}

#[test]
fn exposed_cheat_costs_trust_with_every_witness() {
    let mut state = table();
    let before = state.clone();
    let mut judged = verdict(CheatJudgment::BigFail, CheatEffect::StealCard, Some(0));
    judged.narrative = "The card slipped from a sleeve.".into();

    let res = resolve_cheat(&mut state, &attempt(), "I watch the dealer", judged).unwrap();

    assert_eq!(res.exposed_attacker, Some(pid("a")));
    assert_eq!(res.entry.effect, CheatEffect::NoEffect, "failures carry no effect");
    assert_eq!(state.players[0].hand, before.players[0].hand);
    assert_eq!(state.players[1].hand, before.players[1].hand);
    for witness in ["b", "c"] {
        assert_eq!(state.relationships.get(&pid(witness), &pid("a")), -1);
        assert_eq!(state.trust.get(&pid(witness), &pid("a")), 30);
    }
    assert_eq!(state.facts.of_kind(FactKind::CheatExposed).count(), 1);
    assert_eq!(state.cheat_log.len(), 1);
    assert!(deduce(&state).untrustworthy.contains(&pid("a")));
}

#[test]
fn draw_still_sours_the_target() {
    let mut state = table();
    resolve_cheat(
        &mut state,
        &attempt(),
        "I keep my cards close",
        verdict(CheatJudgment::Draw, CheatEffect::RevealHand, None),
    )
    .unwrap();
    assert_eq!(state.relationships.get(&pid("b"), &pid("a")), -1);
    assert_eq!(state.relationships.get(&pid("c"), &pid("a")), 0);
    assert!(!state.players[1].hand_revealed);
    assert_eq!(state.trust.get(&pid("b"), &pid("a")), 50);
}

#[test]
fn steal_clamps_the_index() {
    let mut state = table();
    resolve_cheat(
        &mut state,
        &attempt(),
        "nothing",
        verdict(CheatJudgment::BigSuccess, CheatEffect::StealCard, Some(99)),
    )
    .unwrap();
    assert_eq!(state.players[1].hand, cards(&["9H", "TH"]));
    assert_eq!(state.players[0].hand, cards(&["3C", "4C", "JH"]));
    assert_eq!(state.card_total(), DECK_SIZE);
}

#[test]
fn steal_of_last_card_finishes_the_target() {
    let mut state = night_state(vec![
        player("a", SocialClass::Lower, &["3C"]),
        player("b", SocialClass::Upper, &["9H"]),
        player("c", SocialClass::Middle, &["5D"]),
    ]);
    let res = resolve_cheat(
        &mut state,
        &attempt(),
        "hmm",
        verdict(CheatJudgment::BigSuccess, CheatEffect::StealCard, None),
    )
    .unwrap();
    assert_eq!(res.emptied_hand, Some(pid("b")));
    assert_eq!(state.finish_order, vec![pid("b")]);
}

#[test]
fn swap_trades_the_chosen_card_for_the_targets_first() {
    let mut state = table();
    resolve_cheat(
        &mut state,
        &attempt(),
        "nothing in particular",
        verdict(CheatJudgment::BigSuccess, CheatEffect::SwapCard, Some(1)),
    )
    .unwrap();
    assert_eq!(state.players[0].hand, cards(&["3C", "9H"]));
    assert_eq!(state.players[1].hand, cards(&["4C", "TH", "JH"]));
}

#[test]
fn skip_and_reveal_effects_set_flags() {
    let mut state = table();
    let mut judged = verdict(CheatJudgment::BigSuccess, CheatEffect::SkipTurn, None);
    judged.defender_penalty = Some(DefenderPenalty::RevealHand);
    resolve_cheat(&mut state, &attempt(), "x", judged).unwrap();
    assert!(state.players[1].skip_next_turn);
    assert!(state.players[1].hand_revealed);
}

#[test]
fn vacuous_defenses_are_recognised() {
    assert!(is_vacuous_defense(""));
    assert!(is_vacuous_defense("no"));
    assert!(is_vacuous_defense("I block everything"));
    assert!(is_vacuous_defense("I guard against all tricks"));
    assert!(is_vacuous_defense("すべて防ぐ"));
    assert!(!is_vacuous_defense("I keep my hand face down under the lamp"));
}

#[test]
fn over_defense_hands_the_attacker_a_big_success() {
    let fixed = correct_over_defense(
        verdict(CheatJudgment::BigFail, CheatEffect::NoEffect, None),
        "I stop everything",
    );
    assert_eq!(fixed.judgment, CheatJudgment::BigSuccess);
    assert_eq!(fixed.effect, CheatEffect::RevealHand);
    assert_eq!(fixed.defender_penalty, Some(DefenderPenalty::RevealHand));

    let kept = verdict(CheatJudgment::Draw, CheatEffect::NoEffect, None);
    assert_eq!(
        correct_over_defense(kept.clone(), "I count my cards after each round"),
        kept
    );

    let mut penalised = verdict(CheatJudgment::Draw, CheatEffect::PeekHand, None);
    penalised.defender_penalty = Some(DefenderPenalty::SkipTurn);
    let fixed = correct_over_defense(penalised, "I count my cards after each round");
    assert_eq!(fixed.judgment, CheatJudgment::BigSuccess);
    assert_eq!(fixed.effect, CheatEffect::PeekHand);
    assert_eq!(fixed.defender_penalty, Some(DefenderPenalty::SkipTurn));
}

#[test]
fn one_pending_attempt_for_the_right_defender() {
    let mut state = table();
    park_pending(&mut state, attempt(), "You feel watched.").unwrap();
    let err = park_pending(&mut state, attempt(), "again").unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::PendingCheatExists, _)));

    let err = take_pending(&mut state, &pid("c")).unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::PendingCheat, _)));
    let pending = take_pending(&mut state, &pid("b")).unwrap();
    assert_eq!(pending.attempt, attempt());
    assert!(state.pending_cheat.is_none());
}

#[test]
fn exposure_is_logged_once_per_round() {
    let mut state = table();
    let failed = || verdict(CheatJudgment::BigFail, CheatEffect::NoEffect, None);
    resolve_cheat(&mut state, &attempt(), "look", failed()).unwrap();
    resolve_cheat(&mut state, &attempt(), "look", failed()).unwrap();
    let exposures: Vec<_> = state.facts.of_kind(FactKind::CheatExposed).collect();
    assert_eq!(exposures.len(), 1);
    assert_eq!(
        exposures[0].payload,
        FactPayload::CheatExposed { target: pid("b") }
    );
    assert_eq!(state.cheat_log.len(), 2);
}

#[test]
fn cheat_phase_settles_when_the_human_cannot_act() {
    let mut state = table();
    state.cheat_phase_done = false;
    state.players[0].is_human = true;
    assert!(!crate::domain::cheat::settle_cheat_phase(&mut state));

    state.players[0].cheat_used = true;
    assert!(crate::domain::cheat::settle_cheat_phase(&mut state));
}

#[test]
fn completing_the_phase_needs_no_pending_defense() {
    use crate::domain::cheat::complete_cheat_phase;
    let mut state = table();
    state.cheat_phase_done = false;
    park_pending(&mut state, attempt(), "psst").unwrap();
    assert!(complete_cheat_phase(&mut state, &pid("b")).is_err());
    take_pending(&mut state, &pid("b")).unwrap();
    complete_cheat_phase(&mut state, &pid("b")).unwrap();
    assert!(state.cheat_phase_done);
}

#[test]
fn players_who_went_out_cannot_cheat() {
    let mut state = night_state(vec![
        player("a", SocialClass::Lower, &[]),
        player("b", SocialClass::Upper, &["9H", "TH"]),
        player("c", SocialClass::Middle, &["5D", "6D"]),
    ]);
    state.finish_order.push(pid("a"));

    let err = validate_cheat(&state, &pid("a"), &pid("b")).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::CheatNotAllowed));

    let before = state.clone();
    assert!(begin_cheat(&mut state, &pid("a"), &pid("b"), "sleight").is_err());
    assert_eq!(state, before);
    assert!(state.players[0].hand.is_empty());
}
