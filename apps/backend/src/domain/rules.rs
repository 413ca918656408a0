use std::ops::RangeInclusive;

use super::cards_types::Rank;

pub const DECK_SIZE: usize = 54;
pub const JOKERS_IN_DECK: usize = 2;
pub const PLAYER_COUNT: RangeInclusive<usize> = 3..=8;

/// A play made only of this rank clears the table.
pub const CUT_RANK: Rank = Rank::Eight;
/// Table clears that end a night.
pub const NIGHT_CLEAR_LIMIT: u8 = 3;
/// Natural strength at or above which a played card is logged as strong (Ace, Two).
pub const STRONG_CARD_STRENGTH: u8 = 14;

pub const JOKER_STRENGTH: u8 = 99;
/// Reversal maps strength s to REVERSAL_PIVOT - s (3 <-> 15).
pub const REVERSAL_PIVOT: u8 = 18;

pub const SENTIMENT_RANGE: RangeInclusive<i8> = -2..=3;
pub const FRIEND_THRESHOLD: i8 = 1;
pub const SCORE_RANGE: RangeInclusive<u8> = 0..=100;
pub const SCORE_MIDPOINT: u8 = 50;

/// Lower-tier seats for a table of `players`: a third, at least one.
pub fn lower_class_count(players: usize) -> usize {
    (players / 3).max(1)
}
