//! Core card types: Suit, Rank, Card

use std::cmp::Ordering;

/// Suits in tiebreak order: clubs weakest, spades strongest.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Suit-rank used only to break ties between equal-strength combinations.
    pub fn tiebreak(self) -> u8 {
        match self {
            Suit::Clubs => 1,
            Suit::Diamonds => 2,
            Suit::Hearts => 3,
            Suit::Spades => 4,
        }
    }
}

/// Face value 1 (Ace) through 13 (King).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Printed number, 1..=13.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Rank> {
        Rank::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// Unreversed strength: Three is 3, King 13, Ace 14, Two 15.
    pub fn strength(self) -> u8 {
        match self {
            Rank::Ace => 14,
            Rank::Two => 15,
            other => other.number(),
        }
    }

    pub fn from_strength(strength: u8) -> Option<Rank> {
        match strength {
            14 => Some(Rank::Ace),
            15 => Some(Rank::Two),
            3..=13 => Rank::from_number(strength),
            _ => None,
        }
    }
}

/// One of the 54 cards. The two jokers are indistinguishable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Card {
    Standard { suit: Suit, rank: Rank },
    Joker,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Standard { suit, rank }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, Card::Joker)
    }

    pub fn suit(&self) -> Option<Suit> {
        match self {
            Card::Standard { suit, .. } => Some(*suit),
            Card::Joker => None,
        }
    }

    pub fn rank(&self) -> Option<Rank> {
        match self {
            Card::Standard { rank, .. } => Some(*rank),
            Card::Joker => None,
        }
    }
}

// Sort order for display and set keys: natural strength, then suit, jokers last.
// Play comparisons go through cards_logic, never through Ord.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Card::Joker, Card::Joker) => Ordering::Equal,
            (Card::Joker, _) => Ordering::Greater,
            (_, Card::Joker) => Ordering::Less,
            (Card::Standard { suit: s1, rank: r1 }, Card::Standard { suit: s2, rank: r2 }) => r1
                .strength()
                .cmp(&r2.strength())
                .then_with(|| s1.cmp(s2)),
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
