use crate::domain::cheat::{CheatEffect, CheatJudgment, CheatLogEntry};
use crate::domain::deduction::{compute_deduction, ContradictionKind, Tactic};
use crate::domain::facts::{Claim, FactLog, FactPayload};
use crate::domain::state::{GameRole, Investigation, SocialClass};
use crate::domain::test_state_helpers::pid;
use crate::domain::Card;

fn claim(log: &mut FactLog, who: &str, round: u16, claim: Claim) {
    log.record(pid(who), round, FactPayload::RoleClaim { claim });
}

const DETECTIVE: Claim = Claim::Role(GameRole::Detective);
const MIDDLE: Claim = Claim::Class(SocialClass::Middle);

fn investigation(subject: &str, finding: SocialClass) -> Investigation {
    Investigation {
        investigator: pid("det"),
        subject: pid(subject),
        finding,
        day: 1,
    }
}

#[test]
fn competing_detective_claims_suggest_a_roller() {
    let mut log = FactLog::default();
    claim(&mut log, "b", 1, DETECTIVE);
    claim(&mut log, "a", 1, DETECTIVE);
    claim(&mut log, "b", 2, DETECTIVE);

    let report = compute_deduction(&log, &[], None);

    assert_eq!(report.detective_claimants, vec![pid("b"), pid("a")]);
    assert!(report.confirmed_safe.is_empty());
    assert!(report.tactics.contains(&Tactic::Roller {
        claimants: vec![pid("b"), pid("a")]
    }));
    assert!(report.templates.iter().any(|t| t.contains("vote out b")));
}

#[test]
fn a_lone_claimant_is_tentatively_safe() {
    let mut log = FactLog::default();
    claim(&mut log, "a", 1, DETECTIVE);
    let report = compute_deduction(&log, &[], None);
    assert!(report.confirmed_safe.contains(&pid("a")));
    assert!(report.tactics.contains(&Tactic::Shield { target: pid("a") }));
}

#[test]
fn strong_card_from_a_middle_claimant_is_a_contradiction() {
    let mut log = FactLog::default();
    claim(&mut log, "a", 1, MIDDLE);
    log.record(pid("a"), 1, FactPayload::StrongCardPlay { card: Card::Joker });
    claim(&mut log, "b", 1, MIDDLE);

    let report = compute_deduction(&log, &[], None);

    assert_eq!(report.contradictions.len(), 1);
    assert_eq!(report.contradictions[0].player, pid("a"));
    assert_eq!(report.contradictions[0].kind, ContradictionKind::StrongCardAsMiddle);
    assert!(report.tactics.contains(&Tactic::Pressure { target: pid("a") }));
}

#[test]
fn exposed_attackers_are_untrustworthy() {
    let entry = |attacker: &str, judgment| CheatLogEntry {
        attacker: pid(attacker),
        target: pid("z"),
        method: String::new(),
        defense: String::new(),
        judgment,
        effect: CheatEffect::NoEffect,
        defender_penalty: None,
        narrative: String::new(),
        day: 1,
    };
    let log = vec![entry("a", CheatJudgment::BigFail), entry("b", CheatJudgment::Draw)];

    let report = compute_deduction(&FactLog::default(), &log, None);

    assert!(report.untrustworthy.contains(&pid("a")));
    assert!(!report.untrustworthy.contains(&pid("b")));
}

#[test]
fn investigation_unmasks_a_fake_detective() {
    let mut log = FactLog::default();
    claim(&mut log, "a", 1, DETECTIVE);
    let inv = investigation("a", SocialClass::Lower);

    let report = compute_deduction(&log, &[], Some(&inv));

    assert!(!report.confirmed_safe.contains(&pid("a")));
    assert_eq!(report.contradictions[0].kind, ContradictionKind::FakeInvestigator);
}

#[test]
fn investigation_catches_a_false_class_claim() {
    let mut log = FactLog::default();
    claim(&mut log, "a", 1, MIDDLE);
    let report = compute_deduction(&log, &[], Some(&investigation("a", SocialClass::Upper)));
    assert_eq!(report.contradictions[0].kind, ContradictionKind::FalseClass);
}

#[test]
fn investigation_confirms_a_true_detective() {
    let mut log = FactLog::default();
    claim(&mut log, "a", 1, DETECTIVE);
    claim(&mut log, "b", 1, DETECTIVE);
    let report = compute_deduction(&log, &[], Some(&investigation("a", SocialClass::Middle)));
    assert!(report.confirmed_safe.contains(&pid("a")));
    assert!(report.contradictions.is_empty());
}

#[test]
fn deduction_is_a_pure_function_of_its_inputs() {
    let mut log = FactLog::default();
    claim(&mut log, "a", 1, DETECTIVE);
    claim(&mut log, "c", 1, MIDDLE);
    log.record(pid("c"), 1, FactPayload::StrongCardPlay { card: Card::Joker });
    let inv = investigation("c", SocialClass::Lower);
    assert_eq!(
        compute_deduction(&log, &[], Some(&inv)),
        compute_deduction(&log, &[], Some(&inv))
    );
}
