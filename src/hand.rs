//! Bit-packed hand: card set, rank-count planes and suit counters.

use std::fmt;

use crate::card::Card;
use crate::score::RANK1_BB;

/// Card ids whose rank nibble is 13..15. Never valid cards.
pub const INVALID_CARDS: u64 = !(RANK1_BB | RANK1_BB << 16 | RANK1_BB << 32 | RANK1_BB << 48);

const SUIT_BIAS: u32 = 0x3333;
const SUIT_FLAGS: u32 = 0x8888;
const SUIT_SATURATE: u32 = 8;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Hash)]
pub struct Hand {
    cards: u64,
    values: u64,
    suits: u32,
}

impl Hand {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            cards: 0,
            values: 0,
            suits: 0,
        }
    }

    /// Builds a hand, skipping cards that are already present.
    pub fn from_cards<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut h = Self::new();
        for c in iter {
            h.add(c.id(), 0);
        }
        h
    }

    #[inline(always)]
    pub const fn cards(&self) -> u64 {
        self.cards
    }

    /// Rank-count register: plane k (bits 16k..16k+12) has bit r when more
    /// than k cards of rank r are held.
    #[inline(always)]
    pub const fn values(&self) -> u64 {
        self.values
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.cards.count_ones() as usize
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.cards == 0
    }

    #[inline(always)]
    pub const fn contains(&self, card: Card) -> bool {
        self.cards & card.bit() != 0
    }

    /// Number of cards of `suit`, saturated at 8.
    #[inline(always)]
    pub const fn suit_count(&self, suit: usize) -> u32 {
        (self.suits >> (4 * suit)) & 0xF
    }

    /// The suit holding five or more cards, if any.
    #[inline(always)]
    pub const fn flush_suit(&self) -> Option<usize> {
        let f = (self.suits + SUIT_BIAS) & SUIT_FLAGS;
        if f == 0 {
            None
        } else {
            Some(f.trailing_zeros() as usize / 4)
        }
    }

    /// Adds card `id` unless it is invalid, already held, or in `excluded`.
    #[inline(always)]
    pub fn add(&mut self, id: u8, excluded: u64) -> bool {
        if id >= 64 || (id & 0xF) >= 13 {
            return false;
        }
        let bit = 1u64 << id;
        if (self.cards | excluded) & bit != 0 {
            return false;
        }
        self.cards |= bit;

        let shift = 4 * u32::from(id >> 4);
        if (self.suits >> shift) & 0xF < SUIT_SATURATE {
            self.suits += 1 << shift;
        }

        // at most four cards per rank, so this stays inside plane 3
        let mut n = 1u64 << (id & 0xF);
        while self.values & n != 0 {
            n <<= 16;
        }
        self.values |= n;
        true
    }

    /// Union with `other`. The caller guarantees the card sets are disjoint.
    pub fn merge(&mut self, other: &Hand) {
        debug_assert_eq!(self.cards & other.cards, 0);

        if self.values & other.values == 0 {
            self.cards |= other.cards;
            self.values |= other.values;
            let mut suits = 0;
            for s in 0..4 {
                let n = (self.suit_count(s) + other.suit_count(s)).min(SUIT_SATURATE);
                suits |= n << (4 * s);
            }
            self.suits = suits;
            return;
        }
        for card in other.iter() {
            self.add(card.id(), 0);
        }
    }

    /// Cards in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Card> {
        let mut m = self.cards;
        std::iter::from_fn(move || {
            if m == 0 {
                return None;
            }
            let id = m.trailing_zeros() as u8;
            m &= m - 1;
            Card::from_id(id)
        })
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cards: Vec<Card> = self.iter().collect();
        cards.sort_by(|a, b| b.rank().cmp(&a.rank()));
        for c in cards {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank::*, Suit::*};

    #[test]
    fn add_rejects_duplicates_and_excluded() {
        let mut h = Hand::new();
        let c = Card::new(Spades, Ace);

        assert!(h.add(c.id(), 0));
        assert!(!h.add(c.id(), 0));

        let d = Card::new(Hearts, Ace);
        assert!(!h.add(d.id(), d.bit()));
        assert!(h.add(d.id(), 0));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn add_rejects_reserved_ranks() {
        let mut h = Hand::new();
        assert!(!h.add(13, 0));
        assert!(!h.add(0x2F, 0));
        assert!(h.is_empty());
        assert_eq!(INVALID_CARDS & (1 << 13), 1 << 13);
        assert_eq!(INVALID_CARDS & 1, 0);
    }

    #[test]
    fn count_planes() {
        let h = Hand::from_cards([
            Card::new(Clubs, Two),
            Card::new(Diamonds, Two),
            Card::new(Hearts, Two),
            Card::new(Spades, Two),
            Card::new(Clubs, King),
        ]);
        let two = 1u64 << Two.idx();
        let king = 1u64 << King.idx();
        assert_eq!(h.values(), two | king | two << 16 | two << 32 | two << 48);
    }

    #[test]
    fn flush_detection() {
        let mut h = Hand::from_cards([
            Card::new(Hearts, Two),
            Card::new(Hearts, Five),
            Card::new(Hearts, Nine),
            Card::new(Hearts, Jack),
            Card::new(Spades, Ace),
        ]);
        assert_eq!(h.flush_suit(), None);
        h.add(Card::new(Hearts, King).id(), 0);
        assert_eq!(h.flush_suit(), Some(Hearts.idx()));
        assert_eq!(h.suit_count(Hearts.idx()), 5);
    }

    #[test]
    fn merge_matches_sequential_add() {
        let board = [
            Card::new(Clubs, Ace),
            Card::new(Diamonds, Seven),
            Card::new(Hearts, Seven),
        ];
        let disjoint_ranks = [Card::new(Spades, King), Card::new(Spades, Queen)];
        let shared_ranks = [Card::new(Spades, Seven), Card::new(Spades, Ace)];

        for hole in [disjoint_ranks, shared_ranks] {
            let mut merged = Hand::from_cards(board);
            merged.merge(&Hand::from_cards(hole));
            let added = Hand::from_cards(board.into_iter().chain(hole));
            assert_eq!(merged, added);
        }
    }
}
