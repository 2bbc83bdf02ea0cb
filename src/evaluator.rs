//! Bit-trick evaluator over `Hand`.
//!
//! Flushes and straights are found directly on 13-bit rank masks; every
//! pairing pattern goes through one lookup in the score-mask table, then the
//! plane 0 kickers are trimmed down to the count the table asked for.

use crate::card::parse_cards;
use crate::error::CardError;
use crate::hand::Hand;
use crate::lut::score_mask;
use crate::score::{
    Score, COUNTER_BB, COUNTER_SHIFT, FLAG_AREA, FLUSH_BB, RANK1_BB, STRAIGHT_BB,
    STRAIGHT_FLUSH_BB,
};

#[inline(always)]
fn msb(b: u64) -> u32 {
    63 - b.leading_zeros()
}

/// Drops the lowest set bits until at most `n` remain.
#[inline(always)]
fn keep_highest(mut m: u64, n: u32) -> u64 {
    while m.count_ones() > n {
        m &= m - 1;
    }
    m
}

/// Top of the best straight in a 13-bit rank mask, as a single bit
/// (bit 0 = wheel, bit 9 = broadway).
#[inline(always)]
fn straight(ranks: u64) -> Option<u64> {
    // ace duplicated below the two
    let s = (ranks << 1) | (ranks >> 12);
    let run = s & (s >> 1) & (s >> 2) & (s >> 3) & (s >> 4);
    if run == 0 {
        None
    } else {
        Some(1 << msb(run))
    }
}

/// Score of a 5 to 7 card hand. Higher is better.
#[inline(always)]
pub fn evaluate(hand: &Hand) -> Score {
    debug_assert!((5..=7).contains(&hand.len()));

    // With at most 7 cards a flush excludes full house and quads.
    if let Some(suit) = hand.flush_suit() {
        let ranks = (hand.cards() >> (16 * suit)) & RANK1_BB;
        if let Some(top) = straight(ranks) {
            return Score(STRAIGHT_FLUSH_BB | top);
        }
        return Score(FLUSH_BB | keep_highest(ranks, 5));
    }

    let values = hand.values();
    if let Some(top) = straight(values & RANK1_BB) {
        return Score(STRAIGHT_BB | top);
    }

    let keys = values & !(values >> 16);
    let hi = msb(keys);
    let lo = msb(keys ^ (1u64 << hi));

    let v = (values | FLAG_AREA) & score_mask(hi, lo);
    let kickers = keep_highest(v & RANK1_BB, ((v & COUNTER_BB) >> COUNTER_SHIFT) as u32);
    Score((v & !(RANK1_BB | COUNTER_BB)) | kickers)
}

/// Validated evaluation of a card token like `AsKsQsJsTs2c3d`.
pub fn evaluate_cards(token: &str) -> Result<Score, CardError> {
    let cards = parse_cards(token)?;
    let mut hand = Hand::new();
    for c in &cards {
        if !hand.add(c.id(), 0) {
            return Err(CardError::Invalid(token.to_string()));
        }
    }
    if !(5..=7).contains(&hand.len()) {
        return Err(CardError::Invalid(token.to_string()));
    }
    Ok(evaluate(&hand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank::*, Suit::*};
    use crate::score::Category;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn score(token: &str) -> Score {
        evaluate_cards(token).unwrap()
    }

    #[test]
    fn categories_basic() {
        let rf = Hand::from_cards([
            Card::new(Spades, Ten),
            Card::new(Spades, Jack),
            Card::new(Spades, Queen),
            Card::new(Spades, King),
            Card::new(Spades, Ace),
            Card::new(Hearts, Two),
            Card::new(Diamonds, Three),
        ]);
        assert_eq!(evaluate(&rf).category(), Category::StraightFlush);

        let quads = Hand::from_cards([
            Card::new(Clubs, Two),
            Card::new(Diamonds, Two),
            Card::new(Hearts, Two),
            Card::new(Spades, Two),
            Card::new(Clubs, Ace),
            Card::new(Hearts, King),
            Card::new(Diamonds, Queen),
        ]);
        assert_eq!(evaluate(&quads).category(), Category::Quads);

        let wheel = Hand::from_cards([
            Card::new(Clubs, Ace),
            Card::new(Diamonds, Two),
            Card::new(Hearts, Three),
            Card::new(Spades, Four),
            Card::new(Clubs, Five),
        ]);
        let s = evaluate(&wheel);
        assert_eq!(s.category(), Category::Straight);
        assert_eq!(s.0 & RANK1_BB, 1);
    }

    #[test]
    fn every_category() {
        let cases = [
            ("As9d7c5h3s2d4c", Category::Straight),
            ("AsKd9c7h5s3d2h", Category::HighCard),
            ("AsAd9c7h5s3d2h", Category::OnePair),
            ("AsAd9c9h5s3d2h", Category::TwoPair),
            ("AsAdAc9h5s3d2h", Category::Trips),
            ("6s7d8c9hTs3d2h", Category::Straight),
            ("2s7s8s9sKs3d2h", Category::Flush),
            ("AsAdAc9h9s3d2h", Category::FullHouse),
            ("AsAdAcAh9s3d2h", Category::Quads),
            ("5s6s7s8s9s3d2h", Category::StraightFlush),
        ];
        for (token, cat) in cases {
            assert_eq!(score(token).category(), cat, "{token}");
        }
    }

    #[test]
    fn categories_are_totally_ordered() {
        let ladder = [
            "AsKd9c7h5s3d2h",
            "2s2d9c7h5s3d4c",
            "AsAd9c7h5s3d2h",
            "3s3d2c2h5s7d9c",
            "AsAdKcKh5s3d2h",
            "2s2d2c9h5s3d7h",
            "As2d3c4h5s9dKh",
            "TsJdQcKhAs3d2h",
            "2s4s6s8sTs3d2h",
            "2s2d2c3h3s9dKh",
            "AsAdAcKhKs3d2h",
            "2s2d2c2h3s5d7h",
            "AsAdAcAhKs3d2h",
            "As2s3s4s5s9dKh",
            "TsJsQsKsAs3d2h",
        ];
        for pair in ladder.windows(2) {
            assert!(score(pair[0]) < score(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn kickers_break_ties_within_category() {
        // pair of aces, king kicker beats queen kicker
        assert!(score("AsAdKc7h5s3d2h") > score("AsAdQc7h5s3d2h"));
        // only the best five cards play
        assert_eq!(score("AsAdKcQhJs3d2h"), score("AsAdKcQhJs4d2h"));
        // two pair: kicker is the best remaining rank, a third pair included
        assert!(score("KsKd5c5h4s4d2h") > score("KsKd5c5h3s2d2c"));
        assert_eq!(score("KsKd5c5h4s4d2h"), score("KsKd5c5h4s3d2h"));
        // full house: higher trips wins, then higher pair
        assert!(score("KsKdKc5h5s3d2h") > score("QsQdQcAhAs3d2h"));
        assert!(score("5s5d5cKhKs3d2h") > score("5s5d5cQhQs3d2h"));
        // two trips make a full house with the lower one as pair
        assert_eq!(score("9s9d9c4h4s4d2h"), score("9s9d9c4h4sAd2h"));
        // quads kicker
        assert!(score("2s2d2c2hAs3d4h") > score("2s2d2c2hKs3d4h"));
        assert_eq!(score("2s2d2c2hKsKdQh"), score("2s2d2c2hKs3d4h"));
        // six-high straight beats the wheel
        assert!(score("2s3d4c5h6s9dKh") > score("As2d3c4h5s9dKh"));
    }

    #[test]
    fn five_card_hands() {
        assert_eq!(score("AsAdAcKhKs").category(), Category::FullHouse);
        assert_eq!(score("AsKsQsJs9s").category(), Category::Flush);
        assert!(score("AsAdKcQhJs") > score("AsAdKcQhTs"));
    }

    #[test]
    fn order_independent() {
        let mut rng = SmallRng::seed_from_u64(7);
        for token in ["AsAd9c9h5s3d2h", "2s7s8s9sKs3d2h", "9s9d9c4h4s4d2h", "As2d3c4h5s9dKh"] {
            let expected = score(token);
            let mut cards = parse_cards(token).unwrap();
            for _ in 0..20 {
                cards.shuffle(&mut rng);
                assert_eq!(evaluate(&Hand::from_cards(cards.iter().copied())), expected);
            }
        }
    }

    #[test]
    fn evaluate_cards_validates() {
        assert!(evaluate_cards("AsKs").is_err());
        assert!(evaluate_cards("2c2d2h2s2s").is_err());
        assert!(evaluate_cards("AsKsQsJsTs9s8s7s").is_err());
        assert!(evaluate_cards("AsKsQsJsXx").is_err());
    }
}
