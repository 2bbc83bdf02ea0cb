//! Score-mask table, indexed by the two most significant key bits of a
//! rank-count register.
//!
//! Key bits are the highest plane bit of each distinct rank, so the two top
//! keys always sit in different rank columns. For `(hi << 6) | lo` the entry,
//! ANDed with `values | FLAG_AREA`:
//!
//! - clears the lower planes in the columns of `hi` and `lo`
//! - keeps the full house / two pair flag when the pattern calls for it
//! - sets the counter of plane 0 ranks that still play (kickers)
//!
//! Built at compile time, so it is immutable for the whole process.

use crate::score::{
    COUNTER_SHIFT, DOUBLE_PAIR_BB, FLAG_AREA, FULL_HOUSE_BB, RANK2_BB, RANK3_BB, RANKS_BB,
};

const N: usize = 1 << 12;

const fn counter(n: u64) -> u64 {
    n << COUNTER_SHIFT
}

const fn msb(b: u64) -> u32 {
    63 - b.leading_zeros()
}

/// Clears the bits of the planes below `b`, in `b`'s column.
const fn clear_below(b: u64) -> u64 {
    !((b >> 16) | (b >> 32) | (b >> 48))
}

/// Clears the bits below `b` inside `b`'s own plane.
const fn clear_before(b: u64) -> u64 {
    let plane = (msb(b) / 16) as usize;
    !((b - 1) & RANKS_BB[plane])
}

const fn mask_for(hi: u32, lo: u32) -> u64 {
    let h = 1u64 << hi;
    let l = 1u64 << lo;
    let mut m = !FLAG_AREA & clear_below(h) & clear_below(l);

    match (hi / 16, lo / 16) {
        // high card
        (0, _) => m |= counter(5),
        // one pair
        (1, 0) => m |= counter(3),
        // two pair, a third pair only survives as a kicker candidate
        (1, _) => {
            m &= clear_before(l);
            m |= counter(1) | DOUBLE_PAIR_BB;
        }
        // trips
        (2, 0) => m |= counter(2),
        // full house, lower pairs dropped
        (2, 1) => {
            m &= clear_before(l);
            m |= FULL_HOUSE_BB;
        }
        // two trips: the lower one plays as the pair
        (2, _) => {
            m &= clear_before(h);
            m |= (l >> 16) | FULL_HOUSE_BB;
        }
        // quads: only the quad rank and the best other rank as kicker
        _ => {
            m ^= !clear_below(l);
            m &= !(RANK3_BB | RANK2_BB);
            m |= counter(1);
        }
    }
    m
}

const fn is_key(bit: u32) -> bool {
    bit % 16 < 13
}

const fn build_score_mask() -> [u64; N] {
    let mut arr = [0u64; N];
    let mut hi: u32 = 0;
    while hi < 64 {
        let mut lo: u32 = 0;
        while lo < hi {
            if is_key(hi) && is_key(lo) && hi % 16 != lo % 16 {
                arr[((hi << 6) | lo) as usize] = mask_for(hi, lo);
            }
            lo += 1;
        }
        hi += 1;
    }
    arr
}

pub static SCORE_MASK: [u64; N] = build_score_mask();

#[inline(always)]
pub fn score_mask(hi: u32, lo: u32) -> u64 {
    SCORE_MASK[((hi << 6) | lo) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{COUNTER_BB, RANK1_BB};

    fn kept(m: u64) -> u64 {
        (m & COUNTER_BB) >> COUNTER_SHIFT
    }

    #[test]
    fn counters_per_pattern() {
        // ace high, king second: high card
        assert_eq!(kept(score_mask(12, 11)), 5);
        // pair of kings (plane 1), ace kicker
        assert_eq!(kept(score_mask(16 + 11, 12)), 3);
        // two pair
        assert_eq!(kept(score_mask(16 + 11, 16 + 3)), 1);
        // trips
        assert_eq!(kept(score_mask(32 + 4, 12)), 2);
        // full house
        assert_eq!(kept(score_mask(32 + 4, 16 + 12)), 0);
        // quads
        assert_eq!(kept(score_mask(48, 12)), 1);
    }

    #[test]
    fn flags_per_pattern() {
        assert_ne!(score_mask(16 + 11, 16 + 3) & DOUBLE_PAIR_BB, 0);
        assert_eq!(score_mask(16 + 11, 12) & DOUBLE_PAIR_BB, 0);
        assert_ne!(score_mask(32 + 4, 16 + 12) & FULL_HOUSE_BB, 0);
        assert_ne!(score_mask(32 + 9, 32 + 2) & FULL_HOUSE_BB, 0);
        assert_eq!(score_mask(32 + 4, 12) & FULL_HOUSE_BB, 0);
    }

    #[test]
    fn columns_below_keys_are_cleared() {
        let m = score_mask(32 + 4, 16 + 12);
        assert_eq!(m & (1 << (16 + 4)), 0);
        assert_eq!(m & (1 << 4), 0);
        assert_eq!(m & (1 << 12), 0);
        // quads keep every plane 0 rank but their own
        let q = score_mask(48 + 5, 32 + 2);
        assert_eq!(q & RANK1_BB, RANK1_BB & !(1 << 5));
    }

    #[test]
    fn same_column_pairs_are_unused() {
        assert_eq!(score_mask(16 + 5, 5), 0);
    }
}
