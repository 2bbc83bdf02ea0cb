//! Packed u64 score.
//!
//! A score is a rank-count register after evaluation: four 16-bit planes,
//! plane k holding the ranks seen more than k times, with category flags in
//! the three spare bits above each plane's 13 rank bits.
//!
//! bits 61     : straight flush
//! bits 48..60 : quads rank
//! bit  47     : full house
//! bit  46     : flush
//! bit  45     : straight
//! bits 32..44 : trips rank
//! bit  29     : two pair
//! bits 16..28 : pair ranks
//! bits 13..15 : counter of plane 0 ranks to keep (zero in a finished score)
//! bits  0..12 : kickers / flush ranks / straight marker
//!
//! Comparing two scores as integers compares the hands.

pub const RANK1_BB: u64 = 0x1FFF;
pub const RANK2_BB: u64 = RANK1_BB << 16;
pub const RANK3_BB: u64 = RANK1_BB << 32;
pub const RANK4_BB: u64 = RANK1_BB << 48;
pub const RANKS_BB: [u64; 4] = [RANK1_BB, RANK2_BB, RANK3_BB, RANK4_BB];

pub const COUNTER_SHIFT: u32 = 13;
pub const COUNTER_BB: u64 = 7 << COUNTER_SHIFT;
pub const DOUBLE_PAIR_BB: u64 = 1 << 29;
pub const STRAIGHT_BB: u64 = 1 << 45;
pub const FLUSH_BB: u64 = 1 << 46;
pub const FULL_HOUSE_BB: u64 = 1 << 47;
pub const STRAIGHT_FLUSH_BB: u64 = 1 << 61;

/// Bits owned by the score-mask table: it decides which of them survive.
pub const FLAG_AREA: u64 = COUNTER_BB | DOUBLE_PAIR_BB | FULL_HOUSE_BB;

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Score(pub u64);

/// Hand categories (higher is better).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    Trips = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    Quads = 7,
    StraightFlush = 8,
}

impl Score {
    pub fn category(self) -> Category {
        let v = self.0;
        if v & STRAIGHT_FLUSH_BB != 0 {
            Category::StraightFlush
        } else if v & RANK4_BB != 0 {
            Category::Quads
        } else if v & FULL_HOUSE_BB != 0 {
            Category::FullHouse
        } else if v & FLUSH_BB != 0 {
            Category::Flush
        } else if v & STRAIGHT_BB != 0 {
            Category::Straight
        } else if v & RANK3_BB != 0 {
            Category::Trips
        } else if v & DOUBLE_PAIR_BB != 0 {
            Category::TwoPair
        } else if v & RANK2_BB != 0 {
            Category::OnePair
        } else {
            Category::HighCard
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::HighCard => "high card",
            Category::OnePair => "one pair",
            Category::TwoPair => "two pair",
            Category::Trips => "three of a kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full house",
            Category::Quads => "four of a kind",
            Category::StraightFlush => "straight flush",
        };
        write!(f, "{s}")
    }
}
