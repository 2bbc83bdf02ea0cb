//! Range grammar and range pools.
//!
//! Terms like `T6s+`, `88+`, `52o+`, `AA`, `AK`, `QQ-99`, `T7s-T3s`, `J8-52`
//! expand into concrete two-card hands. A range is one term, or a bracketed
//! comma list `[AK,88+,76s+]`.
//!
//! The distinct hands are replicated into a pool of `RANGE_CAPACITY` slots so
//! that a uniform 9-bit index is a uniform pick from the set. Slots past the
//! last full copy are absent and make the caller draw again.

use std::collections::BTreeSet;

use crate::card::{Card, Rank, Suit};
use crate::error::RangeError;
use crate::hand::Hand;

pub const RANGE_INDEX_BITS: u32 = 9;
pub const RANGE_CAPACITY: usize = 1 << RANGE_INDEX_BITS;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum SuitFilter {
    Any,
    Suited,
    Offsuit,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Term {
    hi: u8,
    lo: u8,
    filter: SuitFilter,
    plus: bool,
    end: Option<(u8, u8)>,
}

fn rank_at(chars: &[char], i: usize) -> Option<u8> {
    chars.get(i).copied().and_then(Rank::from_char).map(Rank::idx)
}

fn filter_at(chars: &[char], i: &mut usize) -> SuitFilter {
    let f = match chars.get(*i) {
        Some('s') => SuitFilter::Suited,
        Some('o') => SuitFilter::Offsuit,
        _ => return SuitFilter::Any,
    };
    *i += 1;
    f
}

fn parse_term(token: &str) -> Result<Term, RangeError> {
    let bad = || RangeError::Malformed(token.to_string());
    let chars: Vec<char> = token.chars().collect();

    let (hi, lo) = match (rank_at(&chars, 0), rank_at(&chars, 1)) {
        (Some(hi), Some(lo)) if hi >= lo => (hi, lo),
        _ => return Err(bad()),
    };
    let mut i = 2;
    let filter = filter_at(&chars, &mut i);

    let plus = chars.get(i) == Some(&'+');
    if plus {
        i += 1;
    }
    let dash = chars.get(i) == Some(&'-');
    if dash {
        i += 1;
    }
    if (hi == lo && filter != SuitFilter::Any) || (plus && dash) {
        return Err(bad());
    }

    let mut end = None;
    if dash {
        let (ehi, elo) = match (rank_at(&chars, i), rank_at(&chars, i + 1)) {
            (Some(ehi), Some(elo)) if ehi >= elo && hi >= ehi && lo >= elo => (ehi, elo),
            _ => return Err(bad()),
        };
        i += 2;
        // same shape: both pairs, or a fixed top card, or the same gap
        if (hi == lo) != (ehi == elo) || (hi != ehi && hi - lo != ehi - elo) {
            return Err(bad());
        }
        if filter_at(&chars, &mut i) != filter {
            return Err(bad());
        }
        end = Some((ehi, elo));
    }
    if i != chars.len() {
        return Err(bad());
    }
    Ok(Term {
        hi,
        lo,
        filter,
        plus,
        end,
    })
}

/// Adds every suit combination of one rank pair.
fn insert_combos(hi: u8, lo: u8, filter: SuitFilter, out: &mut BTreeSet<u64>) {
    let (Some(r1), Some(r2)) = (Rank::from_u8(hi), Rank::from_u8(lo)) else {
        return;
    };
    for s1 in Suit::ALL {
        for s2 in Suit::ALL {
            if hi == lo && s2.idx() >= s1.idx() {
                continue;
            }
            match filter {
                SuitFilter::Suited if s1 != s2 => continue,
                SuitFilter::Offsuit if s1 == s2 => continue,
                _ => {}
            }
            out.insert(Card::new(s1, r1).bit() | Card::new(s2, r2).bit());
        }
    }
}

/// Expands one term into `out`, as card-pair masks.
fn expand(token: &str, out: &mut BTreeSet<u64>) -> Result<(), RangeError> {
    let Term {
        mut hi,
        mut lo,
        filter,
        plus,
        end,
    } = parse_term(token)?;
    let ace = Rank::Ace.idx();

    loop {
        insert_combos(hi, lo, filter, out);

        match end {
            Some((ehi, elo)) if lo > elo => {
                if hi != ehi {
                    hi -= 1;
                }
                lo -= 1;
            }
            _ if !plus => break,
            _ if hi == lo && hi != ace => {
                hi += 1;
                lo += 1;
            }
            _ if lo + 1 < hi => lo += 1,
            _ => break,
        }
    }
    Ok(())
}

/// A player's range: the distinct hands, replicated into the draw pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Range {
    pool: Vec<Hand>,
    distinct: usize,
}

impl Range {
    pub fn parse(token: &str) -> Result<Range, RangeError> {
        let bracketed = token.len() >= 2 && token.starts_with('[') && token.ends_with(']');
        let body = if bracketed {
            &token[1..token.len() - 1]
        } else {
            token
        };
        if !bracketed && body.contains(',') {
            return Err(RangeError::Malformed(token.to_string()));
        }

        let mut set = BTreeSet::new();
        for term in body.split(',') {
            expand(term.trim(), &mut set)?;
        }
        if set.is_empty() {
            return Err(RangeError::Empty);
        }
        if set.len() > RANGE_CAPACITY {
            return Err(RangeError::TooLarge(set.len()));
        }

        let hands: Vec<Hand> = set
            .iter()
            .map(|&mask| {
                let mut h = Hand::new();
                let mut m = mask;
                while m != 0 {
                    h.add(m.trailing_zeros() as u8, 0);
                    m &= m - 1;
                }
                h
            })
            .collect();

        let copies = RANGE_CAPACITY / hands.len();
        let pool = hands
            .iter()
            .copied()
            .cycle()
            .take(copies * hands.len())
            .collect();
        Ok(Range {
            pool,
            distinct: hands.len(),
        })
    }

    /// The deduplicated hands, ordered by card mask.
    #[inline(always)]
    pub fn distinct(&self) -> &[Hand] {
        &self.pool[..self.distinct]
    }

    /// Pool slot for a random index; `None` past the last full copy.
    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&Hand> {
        self.pool.get(idx)
    }

    #[inline(always)]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn len(&self) -> usize {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }
}

impl std::str::FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(token: &str) -> usize {
        Range::parse(token).unwrap().len()
    }

    #[test]
    fn single_terms() {
        assert_eq!(size("AA"), 6);
        assert_eq!(size("AKs"), 4);
        assert_eq!(size("72o"), 12);
        assert_eq!(size("AK"), 16);
    }

    #[test]
    fn plus_terms() {
        // 88 through AA
        assert_eq!(size("88+"), 7 * 6);
        // T6s T7s T8s T9s
        assert_eq!(size("T6s+"), 4 * 4);
        // 52o 53o 54o
        assert_eq!(size("52o+"), 3 * 12);
        assert_eq!(size("AA+"), 6);
        assert_eq!(size("AK+"), 16);
    }

    #[test]
    fn dash_terms() {
        assert_eq!(size("QQ-99"), 4 * 6);
        assert_eq!(size("T7s-T3s"), 5 * 4);
        // J8 T7 96 85 74 63 52
        assert_eq!(size("J8-52"), 7 * 16);
        assert_eq!(size("KQo-KQo"), 12);
    }

    #[test]
    fn lists_deduplicate() {
        assert_eq!(size("[AA,KK]"), 12);
        assert_eq!(size("[AA,QQ+]"), 18);
        assert_eq!(size("[AKs, AK]"), 16);
        assert_eq!(size("[QQ-99,AKs,T7s-T3s,AKo]"), 24 + 4 + 20 + 12);
    }

    #[test]
    fn malformed_terms() {
        for token in [
            "A", "KA", "AAs", "AAo", "88+-77", "QQ-9", "QQ-AA", "T7s-T3o", "T7s-T3",
            "AA-A2", "J8-53", "AKx", "AK++", "[AA,ZZ]", "AA,KK", "[AA,]", "[]",
        ] {
            assert!(Range::parse(token).is_err(), "{token}");
        }
    }

    #[test]
    fn capacity_is_enforced() {
        // 78 pairs + 12 + 11 + 10 * 16 offsuit/suited aces, kings, queens
        let e = Range::parse("[22+,A2+,K2+,Q2+]").unwrap_err();
        assert_eq!(e, RangeError::TooLarge(78 + (12 + 11 + 10) * 16));
    }

    #[test]
    fn pool_replicates_whole_copies() {
        let r = Range::parse("AA").unwrap();
        assert_eq!(r.pool_len(), (RANGE_CAPACITY / 6) * 6);
        assert_eq!(r.get(6), r.get(0));
        assert!(r.get(r.pool_len()).is_none());
        for h in r.distinct() {
            assert_eq!(h.len(), 2);
            assert_eq!(h.values().count_ones(), 2);
        }
    }
}
