//! Card algebra: classifying combinations, comparing them, play legality
//! and enumeration of legal plays from a hand.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Suit};
use super::rules::{CUT_RANK, JOKER_STRENGTH, REVERSAL_PIVOT};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayShape {
    Single,
    Pair,
    Triple,
    Quad,
    Run,
}

/// Strength of one card under the current reversal flag. Jokers ignore reversal.
pub fn card_strength(card: Card, reversed: bool) -> u8 {
    match card.rank() {
        None => JOKER_STRENGTH,
        Some(rank) if reversed => REVERSAL_PIVOT - rank.strength(),
        Some(rank) => rank.strength(),
    }
}

/// Classify a set of cards. Jokers are wild in groups and fill gaps in runs.
pub fn classify(cards: &[Card]) -> Option<PlayShape> {
    let n = cards.len();
    match n {
        0 => return None,
        1 => return Some(PlayShape::Single),
        _ => {}
    }

    let naturals: Vec<Card> = cards.iter().copied().filter(|c| !c.is_joker()).collect();
    if naturals.is_empty() {
        return (n == 2).then_some(PlayShape::Pair);
    }

    let first_rank = naturals[0].rank();
    if naturals.iter().all(|c| c.rank() == first_rank) {
        return match n {
            2 => Some(PlayShape::Pair),
            3 => Some(PlayShape::Triple),
            4 => Some(PlayShape::Quad),
            _ => None,
        };
    }

    if n >= 3 && is_run(&naturals, n) {
        return Some(PlayShape::Run);
    }
    None
}

// Same suit over naturals, distinct strengths, span coverable by `total` cards.
fn is_run(naturals: &[Card], total: usize) -> bool {
    let first_suit = naturals[0].suit();
    if naturals.iter().any(|c| c.suit() != first_suit) {
        return false;
    }
    let strengths: BTreeSet<u8> = naturals.iter().map(|c| card_strength(*c, false)).collect();
    if strengths.len() != naturals.len() {
        return false;
    }
    match (strengths.first(), strengths.last()) {
        (Some(lo), Some(hi)) => usize::from(hi - lo) < total,
        _ => false,
    }
}

/// A quad reverses rank strength.
pub fn is_revolution(cards: &[Card]) -> bool {
    classify(cards) == Some(PlayShape::Quad)
}

/// A play whose natural cards are all the cut rank clears the table.
pub fn is_cut(cards: &[Card]) -> bool {
    let mut naturals = cards.iter().filter_map(|c| c.rank()).peekable();
    naturals.peek().is_some() && naturals.all(|r| r == CUT_RANK)
}

fn combo_strength(cards: &[Card], reversed: bool) -> Option<u8> {
    cards.iter().map(|c| card_strength(*c, reversed)).max()
}

// Suit-rank of the strongest natural card; ties go to the higher suit.
fn tiebreak_suit(cards: &[Card], reversed: bool) -> Option<Suit> {
    cards
        .iter()
        .filter_map(|c| c.suit().map(|s| (card_strength(*c, reversed), s)))
        .max()
        .map(|(_, s)| s)
}

/// Does `new` beat `table`? Compares the combination maxima, then the suit of
/// the strongest natural card. Two all-joker combinations never beat each other.
pub fn combo_beats(new: &[Card], table: &[Card], reversed: bool) -> bool {
    let (Some(new_str), Some(table_str)) = (
        combo_strength(new, reversed),
        combo_strength(table, reversed),
    ) else {
        return table.is_empty() && !new.is_empty();
    };
    if new_str != table_str {
        return new_str > table_str;
    }
    match (tiebreak_suit(new, reversed), tiebreak_suit(table, reversed)) {
        (Some(a), Some(b)) => a.tiebreak() > b.tiebreak(),
        _ => false,
    }
}

/// Check whether `cards` may be placed on `table`. Returns the shape played.
pub fn can_play(cards: &[Card], table: &[Card], reversed: bool) -> Result<PlayShape, DomainError> {
    if cards.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyPlay,
            "Select at least one card",
        ));
    }
    let shape = classify(cards).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::InvalidCombination,
            "Cards do not form a single, group or run",
        )
    })?;

    if table.is_empty() {
        return Ok(shape);
    }
    // Table contents are only ever placed through can_play, so they classify.
    let table_shape = classify(table).ok_or_else(|| {
        DomainError::invariant("table holds an unclassifiable combination")
    })?;

    if shape != table_shape {
        if shape == PlayShape::Quad {
            return Ok(shape);
        }
        return Err(DomainError::validation(
            ValidationKind::ShapeMismatch,
            format!("Cannot play a {shape:?} on a {table_shape:?}"),
        ));
    }
    if cards.len() != table.len() {
        return Err(DomainError::validation(
            ValidationKind::CountMismatch,
            format!("Table needs {} cards, got {}", table.len(), cards.len()),
        ));
    }
    if !combo_beats(cards, table, reversed) {
        return Err(DomainError::validation(
            ValidationKind::DoesNotBeat,
            "Play must be stronger than the table",
        ));
    }
    Ok(shape)
}

/// Every distinct legal combination drawn from `hand`, in a stable order.
pub fn get_valid_plays(hand: &[Card], table: &[Card], reversed: bool) -> Vec<Vec<Card>> {
    let jokers = hand.iter().filter(|c| c.is_joker()).count();
    let mut candidates: BTreeSet<Vec<Card>> = BTreeSet::new();

    for card in hand {
        candidates.insert(vec![*card]);
    }
    if jokers >= 2 {
        candidates.insert(vec![Card::Joker, Card::Joker]);
    }

    // Same-rank groups, jokers standing in for missing cards
    let mut by_rank: Vec<Vec<Card>> = Vec::new();
    for card in hand.iter().filter(|c| !c.is_joker()) {
        match by_rank.iter_mut().find(|g| g[0].rank() == card.rank()) {
            Some(group) => group.push(*card),
            None => by_rank.push(vec![*card]),
        }
    }
    for group in &by_rank {
        for size in 2..=4usize {
            for wild in 0..=jokers.min(size - 1) {
                for mut combo in combinations(group, size - wild) {
                    combo.extend(std::iter::repeat(Card::Joker).take(wild));
                    candidates.insert(sorted(combo));
                }
            }
        }
    }

    // Runs: every strength window per suit that the held jokers can complete
    for suit in Suit::ALL {
        let suited: Vec<Card> = hand.iter().copied().filter(|c| c.suit() == Some(suit)).collect();
        if suited.is_empty() {
            continue;
        }
        for lo in 3u8..=13 {
            for hi in (lo + 2)..=15 {
                // One card per rank within a suit, so the window has no duplicates.
                let mut combo: Vec<Card> = suited
                    .iter()
                    .copied()
                    .filter(|c| (lo..=hi).contains(&card_strength(*c, false)))
                    .collect();
                let span = usize::from(hi - lo) + 1;
                let gaps = span - combo.len();
                if combo.is_empty() || gaps > jokers {
                    continue;
                }
                combo.extend(std::iter::repeat(Card::Joker).take(gaps));
                candidates.insert(sorted(combo));
            }
        }
    }

    candidates
        .into_iter()
        .filter(|combo| can_play(combo, table, reversed).is_ok())
        .collect()
}

fn sorted(mut cards: Vec<Card>) -> Vec<Card> {
    cards.sort();
    cards
}

fn combinations(items: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (i, head) in items.iter().enumerate() {
        for mut tail in combinations(&items[i + 1..], k - 1) {
            tail.insert(0, *head);
            out.push(tail);
        }
    }
    out
}

/// True when `wanted` is a sub-multiset of `hand`.
pub fn hand_contains_all(hand: &[Card], wanted: &[Card]) -> bool {
    let mut remaining = hand.to_vec();
    wanted.iter().all(|card| match remaining.iter().position(|c| c == card) {
        Some(pos) => {
            remaining.swap_remove(pos);
            true
        }
        None => false,
    })
}
