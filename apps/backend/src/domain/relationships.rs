//! Pairwise player ledgers.
//!
//! [`RelationshipLedger`] holds the bounded -2..=3 sentiment seeded from declared
//! backstory relationships. [`ScoreLedger`] is the 0..=100 scale used twice,
//! once for trust and once for affinity. The ledgers never reference each
//! other; they are combined only when a view or oracle prompt is built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rules::{FRIEND_THRESHOLD, SCORE_MIDPOINT, SCORE_RANGE, SENTIMENT_RANGE};
use super::state::PlayerId;

/// Ordered sentiment buckets, hostile to secret ally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Enemy,
    Hostile,
    Neutral,
    Friendly,
    Trusted,
    SecretAlly,
}

impl Sentiment {
    pub fn value(self) -> i8 {
        match self {
            Sentiment::Enemy => -2,
            Sentiment::Hostile => -1,
            Sentiment::Neutral => 0,
            Sentiment::Friendly => 1,
            Sentiment::Trusted => 2,
            Sentiment::SecretAlly => 3,
        }
    }
}

// Checked in order; the first bucket with a matching keyword wins.
const KEYWORD_BUCKETS: &[(Sentiment, &[&str])] = &[
    (
        Sentiment::SecretAlly,
        &["secret", "accomplice", "conspir", "秘密", "共犯", "密約"],
    ),
    (
        Sentiment::Trusted,
        &["trust", "loyal", "family", "信頼", "家族", "忠誠"],
    ),
    (
        Sentiment::Friendly,
        &["friend", "ally", "like", "友人", "友達", "仲間", "好意"],
    ),
    (
        Sentiment::Enemy,
        &["enemy", "hate", "nemesis", "敵", "憎", "宿敵"],
    ),
    (
        Sentiment::Hostile,
        &["rival", "suspicious", "wary", "grudge", "ライバル", "警戒", "嫌い"],
    ),
];

/// Map a free-text relationship description to a sentiment bucket.
pub fn sentiment_from_description(description: &str) -> Sentiment {
    let lowered = description.to_lowercase();
    KEYWORD_BUCKETS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(bucket, _)| *bucket)
        .unwrap_or(Sentiment::Neutral)
}

/// `observer -> subject -> sentiment`, every ordered pair present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipLedger {
    values: BTreeMap<PlayerId, BTreeMap<PlayerId, i8>>,
}

impl RelationshipLedger {
    /// Neutral for every pair, then each declared description applied.
    pub fn seed<'a>(
        players: &[PlayerId],
        declared: impl IntoIterator<Item = (&'a PlayerId, &'a PlayerId, &'a str)>,
    ) -> Self {
        let mut ledger = RelationshipLedger::default();
        for a in players {
            let row = ledger.values.entry(a.clone()).or_default();
            for b in players.iter().filter(|b| *b != a) {
                row.insert(b.clone(), 0);
            }
        }
        for (observer, subject, text) in declared {
            if let Some(slot) = ledger
                .values
                .get_mut(observer)
                .and_then(|row| row.get_mut(subject))
            {
                *slot = sentiment_from_description(text).value();
            }
        }
        ledger
    }

    pub fn get(&self, observer: &PlayerId, subject: &PlayerId) -> i8 {
        self.values
            .get(observer)
            .and_then(|row| row.get(subject))
            .copied()
            .unwrap_or(0)
    }

    /// Shift `observer`'s view of `subject` by `delta`, clamped to the sentiment range.
    pub fn adjust(&mut self, observer: &PlayerId, subject: &PlayerId, delta: i8) {
        if observer == subject {
            return;
        }
        let slot = self
            .values
            .entry(observer.clone())
            .or_default()
            .entry(subject.clone())
            .or_insert(0);
        *slot = slot
            .saturating_add(delta)
            .clamp(*SENTIMENT_RANGE.start(), *SENTIMENT_RANGE.end());
    }

    pub fn is_friend(&self, a: &PlayerId, b: &PlayerId) -> bool {
        self.get(a, b) >= FRIEND_THRESHOLD
    }

    /// Every stored value, for invariant checks and debug views.
    pub fn entries(&self) -> impl Iterator<Item = (&PlayerId, &PlayerId, i8)> {
        self.values
            .iter()
            .flat_map(|(a, row)| row.iter().map(move |(b, v)| (a, b, *v)))
    }
}

/// A bounded 0..=100 pairwise score seeded at the midpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedger {
    values: BTreeMap<PlayerId, BTreeMap<PlayerId, u8>>,
}

impl ScoreLedger {
    pub fn seed(players: &[PlayerId]) -> Self {
        let values = players
            .iter()
            .map(|a| {
                let row = players
                    .iter()
                    .filter(|b| *b != a)
                    .map(|b| (b.clone(), SCORE_MIDPOINT))
                    .collect();
                (a.clone(), row)
            })
            .collect();
        ScoreLedger { values }
    }

    pub fn get(&self, observer: &PlayerId, subject: &PlayerId) -> u8 {
        self.values
            .get(observer)
            .and_then(|row| row.get(subject))
            .copied()
            .unwrap_or(SCORE_MIDPOINT)
    }

    pub fn adjust(&mut self, observer: &PlayerId, subject: &PlayerId, delta: i16) {
        if observer == subject {
            return;
        }
        let slot = self
            .values
            .entry(observer.clone())
            .or_default()
            .entry(subject.clone())
            .or_insert(SCORE_MIDPOINT);
        let next = (i16::from(*slot) + delta).clamp(
            i16::from(*SCORE_RANGE.start()),
            i16::from(*SCORE_RANGE.end()),
        );
        // Clamped into 0..=100 above.
        *slot = u8::try_from(next).unwrap_or(SCORE_MIDPOINT);
    }

    /// Candidate with the highest score from `observer`; first wins ties.
    pub fn top(&self, observer: &PlayerId, candidates: &[PlayerId]) -> Option<PlayerId> {
        candidates
            .iter()
            .filter(|c| *c != observer)
            .fold(None::<(&PlayerId, u8)>, |best, c| {
                let score = self.get(observer, c);
                match best {
                    Some((_, s)) if s >= score => best,
                    _ => Some((c, score)),
                }
            })
            .map(|(c, _)| c.clone())
    }

    /// Candidate with the lowest score from `observer`; first wins ties.
    pub fn bottom(&self, observer: &PlayerId, candidates: &[PlayerId]) -> Option<PlayerId> {
        candidates
            .iter()
            .filter(|c| *c != observer)
            .fold(None::<(&PlayerId, u8)>, |best, c| {
                let score = self.get(observer, c);
                match best {
                    Some((_, s)) if s <= score => best,
                    _ => Some((c, score)),
                }
            })
            .map(|(c, _)| c.clone())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PlayerId, &PlayerId, u8)> {
        self.values
            .iter()
            .flat_map(|(a, row)| row.iter().map(move |(b, v)| (a, b, *v)))
    }
}
