//! Deterministic deck construction, shuffling and dealing.

use crate::domain::rules::{DECK_SIZE, JOKERS_IN_DECK};
use crate::domain::{Card, Rank, Suit};

/// The 54-card deck in suit-major order, jokers last.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::new(rank, suit));
        }
    }
    deck.extend(std::iter::repeat(Card::Joker).take(JOKERS_IN_DECK));
    deck
}

/// SplitMix64 stream: cheap, deterministic, well distributed.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z ^= z >> 30;
        z = z.wrapping_mul(0xBF58476D1CE4E5B9);
        z ^= z >> 27;
        z = z.wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform in `0..max` by rejection sampling; `max` must be non-zero.
    pub fn below(&mut self, max: usize) -> usize {
        let m = max as u64;
        let limit = u64::MAX - (u64::MAX % m);
        loop {
            let x = self.next_u64();
            if x < limit {
                return (x % m) as usize;
            }
        }
    }

    /// Fisher-Yates.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Shuffle the full deck with `seed` and deal it round-robin to `player_count` seats.
/// Every card is dealt; hands differ in size by at most one and come back sorted.
pub fn deal_hands(player_count: usize, seed: u64) -> Vec<Vec<Card>> {
    let mut deck = full_deck();
    SplitMix64::new(seed).shuffle(&mut deck);

    let mut hands: Vec<Vec<Card>> = vec![Vec::new(); player_count];
    if player_count == 0 {
        return hands;
    }
    for (i, card) in deck.into_iter().enumerate() {
        hands[i % player_count].push(card);
    }
    for hand in hands.iter_mut() {
        hand.sort();
    }
    hands
}
