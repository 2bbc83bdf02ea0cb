//! Exhaustive enumeration of every way to complete a `Spot`.
//!
//! Each complete deal becomes a handful of words that `Spot::run` consumes
//! through a replaying `Prng`, in the order it draws them: range picks,
//! then the board, then the missing hole cards. Only the root level of the
//! walk is split between workers, so the union over all workers is every
//! deal exactly once.

use crate::error::SpotError;
use crate::hand::INVALID_CARDS;
use crate::range::RANGE_INDEX_BITS;
use crate::spot::Spot;

/// Positions missing more cards than this are refused.
pub const MAX_MISSING: usize = 5;

const CARD_BITS: u32 = 6;

/// Replay buffer for one worker's share of the deals.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Enumeration {
    pub words: Vec<u64>,
    pub games: u64,
}

#[derive(Copy, Clone, Debug)]
enum Slot {
    Range(usize),
    Hole(usize),
    Board(usize),
}

#[derive(Copy, Clone, Debug)]
struct Level {
    slot: Slot,
    /// First card of a group; otherwise cards go below the previous pick.
    restart: bool,
}

#[derive(Copy, Clone, Debug, Default)]
struct Deal {
    ranges: u64,
    board: u64,
    holes: u64,
}

impl Deal {
    fn with(mut self, slot: Slot, value: u64) -> Deal {
        match slot {
            Slot::Range(k) => self.ranges |= value << (RANGE_INDEX_BITS as usize * k),
            Slot::Hole(i) => self.holes |= value << (CARD_BITS as usize * i),
            Slot::Board(i) => self.board |= value << (CARD_BITS as usize * i),
        }
        self
    }
}

struct Walk<'a> {
    spot: &'a Spot,
    levels: Vec<Level>,
    worker: usize,
    workers: usize,
    out: Enumeration,
}

impl Walk<'_> {
    fn descend(&mut self, depth: usize, used: u64, below: u64, deal: Deal) {
        let Some(level) = self.levels.get(depth).copied() else {
            self.leaf(deal);
            return;
        };
        let root = depth == 0;
        let spot = self.spot;

        match level.slot {
            Slot::Range(k) => {
                for (idx, hand) in spot.ranges[k].1.distinct().iter().enumerate() {
                    if root && idx % self.workers != self.worker {
                        continue;
                    }
                    if hand.cards() & used != 0 {
                        continue;
                    }
                    let deal = deal.with(level.slot, idx as u64);
                    self.descend(depth + 1, used | hand.cards(), 64, deal);
                }
            }
            Slot::Hole(_) | Slot::Board(_) => {
                let end = if level.restart { 64 } else { below };
                for c in 0..end {
                    if root && c as usize % self.workers != self.worker {
                        continue;
                    }
                    let bit = 1u64 << c;
                    if used & bit != 0 {
                        continue;
                    }
                    self.descend(depth + 1, used | bit, c, deal.with(level.slot, c));
                }
            }
        }
    }

    fn leaf(&mut self, deal: Deal) {
        if !self.spot.ranges.is_empty() {
            self.out.words.push(deal.ranges);
        }
        if self.spot.missing_commons > 0 {
            self.out.words.push(deal.board);
        }
        if !self.spot.missing_holes.is_empty() {
            self.out.words.push(deal.holes);
        }
        self.out.games += 1;
    }
}

impl Spot {
    fn levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = (0..self.ranges.len())
            .map(|k| Level {
                slot: Slot::Range(k),
                restart: true,
            })
            .collect();
        let holes = self.missing_holes.len();
        let draws = (0..holes)
            .map(Slot::Hole)
            .chain((0..self.missing_commons).map(Slot::Board));
        for (i, slot) in draws.enumerate() {
            levels.push(Level {
                slot,
                restart: self.boundaries & (1 << i) != 0,
            });
        }
        levels
    }

    /// Every completion of this position owned by `worker` out of
    /// `workers`, as a replay buffer.
    pub fn enumerate(&self, worker: usize, workers: usize) -> Result<Enumeration, SpotError> {
        let missing = self.missing_cards();
        if missing > MAX_MISSING {
            return Err(SpotError::TooManyMissing {
                missing,
                max: MAX_MISSING,
            });
        }

        let mut walk = Walk {
            spot: self,
            levels: self.levels(),
            worker,
            workers: workers.max(1),
            out: Enumeration::default(),
        };
        // a complete position is a single deal, owned by worker 0
        if !walk.levels.is_empty() || worker == 0 {
            walk.descend(0, self.given | INVALID_CARDS, 64, Deal::default());
        }
        log::info!(
            "worker {}: evaluating {} combinations",
            worker,
            walk.out.games
        );
        Ok(walk.out)
    }
}
