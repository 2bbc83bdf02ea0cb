//! Card types (Suit/Rank/Card).
//!
//! A card is a single byte: `(suit << 4) | rank`. Rank values 13..15 are
//! reserved, so a raw 6-bit id is not always a card; `Card::from_id` is the
//! only way in from an untrusted integer.

use std::fmt;

use crate::error::CardError;

const RANK_CHARS: &[u8; 13] = b"23456789TJQKA";
const SUIT_CHARS: &[u8; 4] = b"cdhs";

/// A playing card suit.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub const fn from_u8(x: u8) -> Suit {
        match x & 0x3 {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            _ => Suit::Spades,
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        SUIT_CHARS
            .iter()
            .position(|&s| s as char == c)
            .map(|i| Suit::from_u8(i as u8))
    }

    pub const fn to_char(self) -> char {
        SUIT_CHARS[self as usize] as char
    }
}

/// A playing card rank, 0..12 (Two..Ace).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
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
        Rank::Ace,
    ];

    #[inline(always)]
    pub const fn idx(self) -> u8 {
        self as u8
    }

    /// Convert 0..12 to a Rank, `None` for the reserved values.
    #[inline(always)]
    pub const fn from_u8(x: u8) -> Option<Rank> {
        if x < 13 {
            Some(Rank::ALL[x as usize])
        } else {
            None
        }
    }

    pub fn from_char(c: char) -> Option<Rank> {
        RANK_CHARS
            .iter()
            .position(|&r| r as char == c)
            .and_then(|i| Rank::from_u8(i as u8))
    }

    pub const fn to_char(self) -> char {
        RANK_CHARS[self as usize] as char
    }
}

/// A card id in `[0, 64)` with a valid rank nibble.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Card(u8);

impl Card {
    #[inline(always)]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self(((suit as u8) << 4) | rank as u8)
    }

    /// Accepts only ids below 64 whose rank nibble is 0..12.
    #[inline(always)]
    pub const fn from_id(id: u8) -> Option<Self> {
        if id < 64 && (id & 0xF) < 13 {
            Some(Self(id))
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Single bit in a 64-bit card set.
    #[inline(always)]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    #[inline(always)]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 & 0xF) as usize]
    }

    #[inline(always)]
    pub const fn suit(self) -> Suit {
        Suit::from_u8(self.0 >> 4)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
    }
}

impl std::str::FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(c), None) => match (Rank::from_char(r), Suit::from_char(c)) {
                (Some(rank), Some(suit)) => Ok(Card::new(suit, rank)),
                _ => Err(CardError::Invalid(s.to_string())),
            },
            _ => Err(CardError::Invalid(s.to_string())),
        }
    }
}

/// Parse a token of consecutive cards like `AsKd` or `2c3c4c`.
///
/// Duplicates inside the token are *not* checked here; `Hand::add` owns that.
pub fn parse_cards(token: &str) -> Result<Vec<Card>, CardError> {
    let chars: Vec<char> = token.chars().collect();
    if chars.is_empty() || chars.len() % 2 != 0 {
        return Err(CardError::Invalid(token.to_string()));
    }
    chars
        .chunks(2)
        .map(|pair| match (Rank::from_char(pair[0]), Suit::from_char(pair[1])) {
            (Some(rank), Some(suit)) => Ok(Card::new(suit, rank)),
            _ => Err(CardError::Invalid(token.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_layout() {
        let c = Card::new(Suit::Spades, Rank::Ace);
        assert_eq!(c.id(), (3 << 4) | 12);
        assert_eq!(c.rank(), Rank::Ace);
        assert_eq!(c.suit(), Suit::Spades);
        assert_eq!(c.to_string(), "As");
    }

    #[test]
    fn reserved_ranks_are_rejected() {
        assert!(Card::from_id(12).is_some());
        assert!(Card::from_id(13).is_none());
        assert!(Card::from_id(15).is_none());
        assert!(Card::from_id(0x3D).is_none());
        assert!(Card::from_id(64).is_none());
    }

    #[test]
    fn parse_tokens() {
        let cards = parse_cards("AsTd2c").unwrap();
        assert_eq!(
            cards,
            vec![
                Card::new(Suit::Spades, Rank::Ace),
                Card::new(Suit::Diamonds, Rank::Ten),
                Card::new(Suit::Clubs, Rank::Two),
            ]
        );
        assert!(parse_cards("As7").is_err());
        assert!(parse_cards("1s").is_err());
        assert!(parse_cards("Ax").is_err());
        assert!(parse_cards("AK").is_err());
        assert!(parse_cards("").is_err());
    }
}
