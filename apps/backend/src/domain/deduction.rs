//! Deduction engine.
//!
//! A pure function of the fact log, the cheat log and the latest
//! investigation. Nothing here is incremental: [`compute_deduction`] is
//! re-run whenever a summary is needed, and its output is only ever handed to
//! the oracle to ground generated speech.
//!
//! Rules, in order:
//! 1. Competing investigator claims flag a roller tactic; a lone claimant is
//!    tentatively confirmed safe.
//! 2. A middle-tier claimant seen playing a strong card is contradicted.
//! 3. An attacker exposed by a `big_fail` is untrustworthy.
//! 4. An investigation result is cross-checked against the subject's claims.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::cheat::{CheatJudgment, CheatLogEntry};
use super::facts::{Claim, FactKind, FactLog, FactPayload};
use super::state::{GameRole, GameState, Investigation, PlayerId, SocialClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
    /// Claimed the middle tier yet played a strong card.
    StrongCardAsMiddle,
    /// Claimed detective, investigated as not middle.
    FakeInvestigator,
    /// Claimed middle, investigated as not middle.
    FalseClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub player: PlayerId,
    pub kind: ContradictionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tactic", rename_all = "snake_case")]
pub enum Tactic {
    /// Several detective claims: vote them out one after another.
    Roller { claimants: Vec<PlayerId> },
    /// Push a vote against a contradicted or exposed player.
    Pressure { target: PlayerId },
    /// Keep a confirmed player alive.
    Shield { target: PlayerId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionReport {
    pub detective_claimants: Vec<PlayerId>,
    pub confirmed_safe: BTreeSet<PlayerId>,
    pub contradictions: Vec<Contradiction>,
    pub untrustworthy: BTreeSet<PlayerId>,
    pub tactics: Vec<Tactic>,
    pub summaries: Vec<String>,
    pub templates: Vec<String>,
}

fn claims_by_actor(facts: &FactLog) -> BTreeMap<&PlayerId, BTreeSet<Claim>> {
    let mut by_actor: BTreeMap<&PlayerId, BTreeSet<Claim>> = BTreeMap::new();
    for fact in facts.of_kind(FactKind::RoleClaim) {
        if let FactPayload::RoleClaim { claim } = &fact.payload {
            by_actor.entry(&fact.actor).or_default().insert(*claim);
        }
    }
    by_actor
}

/// Detective claimants in the order they first claimed.
fn detective_claimants(facts: &FactLog) -> Vec<PlayerId> {
    let mut seen = Vec::new();
    for fact in facts.of_kind(FactKind::RoleClaim) {
        if matches!(
            fact.payload,
            FactPayload::RoleClaim {
                claim: Claim::Role(GameRole::Detective)
            }
        ) && !seen.contains(&fact.actor)
        {
            seen.push(fact.actor.clone());
        }
    }
    seen
}

pub fn compute_deduction(
    facts: &FactLog,
    cheat_log: &[CheatLogEntry],
    investigation: Option<&Investigation>,
) -> DeductionReport {
    let mut report = DeductionReport::default();
    let claims = claims_by_actor(facts);

    // 1. investigator claims
    let claimants = detective_claimants(facts);
    match claimants.as_slice() {
        [] => {}
        [only] => {
            report.confirmed_safe.insert(only.clone());
            report
                .summaries
                .push(format!("{only} is the only detective claim so far."));
        }
        [first, second, ..] => {
            report.tactics.push(Tactic::Roller {
                claimants: claimants.clone(),
            });
            report.summaries.push(format!(
                "{} players claim detective: {}.",
                claimants.len(),
                join(&claimants)
            ));
            report.templates.push(format!(
                "There are {} detective claims. Let's vote out {first} today and {second} next.",
                claimants.len()
            ));
        }
    }
    report.detective_claimants = claimants;

    // 2. strong cards from a self-declared middle
    let strong_players: BTreeSet<&PlayerId> = facts
        .of_kind(FactKind::StrongCardPlay)
        .map(|f| &f.actor)
        .collect();
    for (actor, set) in &claims {
        if set.contains(&Claim::Class(SocialClass::Middle)) && strong_players.contains(actor) {
            push_contradiction(&mut report, actor, ContradictionKind::StrongCardAsMiddle);
            report.summaries.push(format!(
                "{actor} claims the middle tier but played a top card."
            ));
            report.templates.push(format!(
                "{actor}, you say you're middle tier, so why were you holding such strong cards?"
            ));
        }
    }

    // 3. exposed cheaters
    let exposed: BTreeSet<PlayerId> = cheat_log
        .iter()
        .filter(|e| e.judgment == CheatJudgment::BigFail)
        .map(|e| e.attacker.clone())
        .chain(
            facts
                .of_kind(FactKind::CheatExposed)
                .map(|f| f.actor.clone()),
        )
        .collect();
    for attacker in &exposed {
        report
            .summaries
            .push(format!("{attacker} was caught cheating and cannot be trusted."));
        report.tactics.push(Tactic::Pressure {
            target: attacker.clone(),
        });
    }
    report.untrustworthy = exposed;

    // 4. investigation against claims
    if let Some(inv) = investigation {
        let subject = &inv.subject;
        let subject_claims = claims.get(subject).cloned().unwrap_or_default();
        let neutral = inv.finding == SocialClass::Middle;
        let claimed_detective = subject_claims.contains(&Claim::Role(GameRole::Detective));
        let claimed_middle = subject_claims.contains(&Claim::Class(SocialClass::Middle));

        if claimed_detective && !neutral {
            report.confirmed_safe.remove(subject);
            push_contradiction(&mut report, subject, ContradictionKind::FakeInvestigator);
            report
                .summaries
                .push(format!("{subject} claimed detective but is not middle tier: a fake."));
            report.templates.push(format!(
                "{subject} is a fake detective. The investigation proves it."
            ));
        } else if claimed_middle && !neutral {
            report.confirmed_safe.remove(subject);
            push_contradiction(&mut report, subject, ContradictionKind::FalseClass);
            report
                .summaries
                .push(format!("{subject} claimed the middle tier and lied."));
        } else if claimed_detective {
            report.confirmed_safe.insert(subject.clone());
            report
                .summaries
                .push(format!("{subject}'s detective claim checks out."));
        } else {
            report.summaries.push(format!(
                "{} investigated {subject}: {:?} tier.",
                inv.investigator, inv.finding
            ));
        }
    }

    for contradiction in report.contradictions.clone() {
        report.tactics.push(Tactic::Pressure {
            target: contradiction.player,
        });
    }
    for safe in &report.confirmed_safe {
        report.tactics.push(Tactic::Shield {
            target: safe.clone(),
        });
    }
    report
}

/// Deduction over a live game.
pub fn deduce(state: &GameState) -> DeductionReport {
    compute_deduction(&state.facts, &state.cheat_log, state.investigation.as_ref())
}

fn push_contradiction(report: &mut DeductionReport, player: &PlayerId, kind: ContradictionKind) {
    let entry = Contradiction {
        player: player.clone(),
        kind,
    };
    if !report.contradictions.contains(&entry) {
        report.contradictions.push(entry);
    }
}

fn join(ids: &[PlayerId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
