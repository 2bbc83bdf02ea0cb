//! Position model and the Monte Carlo fill.
//!
//! A `Spot` is built once from a normalized position like
//!
//!   4P AcTc TdTh - 5h 6h 9c
//!   3P [AA,QQ-99,AKs,T7s-T3s,AKo] [88+,T6s+,52o+] TT+
//!
//! and then `run` plays one trial per call: range holes first, then the
//! board, then the missing hole cards, then showdown.

use crate::card::{parse_cards, Card};
use crate::equity::{EquityCounts, TIE_UNIT};
use crate::error::{RangeError, SpotError};
use crate::evaluator::evaluate;
use crate::hand::Hand;
use crate::prng::Prng;
use crate::range::{Range, RANGE_INDEX_BITS};
use crate::score::Score;

pub const MAX_PLAYERS: usize = 9;
pub const MAX_COMMONS: usize = 5;

const CARD_BITS: u32 = 6;
const CARD_MASK: u64 = (1 << CARD_BITS) - 1;
const RANGE_MASK: u64 = (1 << RANGE_INDEX_BITS) - 1;

/// Words drawn for one range pick before the whole range deal restarts.
const RANGE_ATTEMPTS: usize = 64;

#[derive(Clone, Debug)]
pub struct Spot {
    players: usize,
    holes: [Hand; MAX_PLAYERS],
    common: Hand,
    /// Range-backed players, in seat order.
    pub(crate) ranges: Vec<(usize, Range)>,
    /// One entry per missing hole card: the seat it goes to.
    pub(crate) missing_holes: Vec<usize>,
    pub(crate) missing_commons: usize,
    /// Bit i set when card draw i (hole draws, then board draws) opens a
    /// new deal group.
    pub(crate) boundaries: u64,
    pub(crate) given: u64,
    hands: [Hand; MAX_PLAYERS],
}

fn parse_players(token: &str) -> Result<usize, SpotError> {
    let bad = || SpotError::PlayerCount(token.to_string());
    let mut chars = token.chars();
    let (Some(n), Some(p), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(bad());
    };
    if !p.eq_ignore_ascii_case(&'p') {
        return Err(bad());
    }
    match n.to_digit(10) {
        Some(n) if (2..=MAX_PLAYERS as u32).contains(&n) => Ok(n as usize),
        _ => Err(bad()),
    }
}

/// Adds `cards` to `hand`, claiming each one in `seen`.
fn claim(cards: &[Card], hand: &mut Hand, seen: &mut Hand) -> Result<(), SpotError> {
    for &c in cards {
        if !seen.add(c.id(), 0) {
            return Err(SpotError::DuplicateCard(c));
        }
        hand.add(c.id(), 0);
    }
    Ok(())
}

fn ranges_satisfiable(ranges: &[(usize, Range)], used: u64) -> bool {
    match ranges.split_first() {
        None => true,
        Some(((_, range), rest)) => range
            .distinct()
            .iter()
            .any(|h| h.cards() & used == 0 && ranges_satisfiable(rest, used | h.cards())),
    }
}

impl Spot {
    pub fn new(position: &str) -> Result<Spot, SpotError> {
        let mut tokens = position.split_whitespace();
        let players = parse_players(tokens.next().unwrap_or(""))?;

        let mut spot = Spot {
            players,
            holes: [Hand::new(); MAX_PLAYERS],
            common: Hand::new(),
            ranges: Vec::new(),
            missing_holes: Vec::new(),
            missing_commons: 0,
            boundaries: 0,
            given: 0,
            hands: [Hand::new(); MAX_PLAYERS],
        };
        let mut seen = Hand::new();
        let mut listed = 0;
        let mut in_common = false;

        for token in tokens {
            if in_common {
                let cards =
                    parse_cards(token).map_err(|_| SpotError::InvalidCommon(token.to_string()))?;
                if spot.common.len() + cards.len() > MAX_COMMONS {
                    return Err(SpotError::TooManyCommons(spot.common.len() + cards.len()));
                }
                claim(&cards, &mut spot.common, &mut seen)?;
            } else if token == "-" {
                in_common = true;
            } else {
                if listed == players {
                    return Err(SpotError::TooManyHoles {
                        given: listed + 1,
                        players,
                    });
                }
                spot.parse_hole(token, listed, &mut seen)?;
                listed += 1;
            }
        }
        spot.given = seen.cards();

        let mut draws = 0;
        for p in 0..players {
            if spot.ranges.iter().any(|(seat, _)| *seat == p) {
                continue;
            }
            let need = 2 - spot.holes[p].len();
            if need > 0 {
                spot.boundaries |= 1 << draws;
                draws += need;
                spot.missing_holes.extend(std::iter::repeat(p).take(need));
            }
        }
        spot.missing_commons = MAX_COMMONS - spot.common.len();
        if spot.missing_commons > 0 {
            spot.boundaries |= 1 << draws;
        }

        if !ranges_satisfiable(&spot.ranges, spot.given) {
            return Err(SpotError::UnsatisfiableRanges);
        }
        Ok(spot)
    }

    /// One hole token: exact cards (one or two), else a range.
    fn parse_hole(&mut self, token: &str, seat: usize, seen: &mut Hand) -> Result<(), SpotError> {
        if let Ok(cards) = parse_cards(token) {
            if cards.len() > 2 {
                return Err(SpotError::InvalidHole(token.to_string()));
            }
            return claim(&cards, &mut self.holes[seat], seen);
        }
        let range = Range::parse(token).map_err(|e| match e {
            RangeError::Malformed(_) => SpotError::InvalidHole(token.to_string()),
            other => SpotError::Range(other),
        })?;
        log::info!(
            "set range {} for player {} of size: {}",
            token,
            seat + 1,
            range.len()
        );
        self.ranges.push((seat, range));
        Ok(())
    }

    #[inline(always)]
    pub fn players(&self) -> usize {
        self.players
    }

    /// Known hole cards of `seat` (empty for range and unknown players),
    /// `None` past the last player.
    pub fn hole(&self, seat: usize) -> Option<Hand> {
        self.holes[..self.players].get(seat).copied()
    }

    pub fn common(&self) -> Hand {
        self.common
    }

    pub fn missing_holes(&self) -> &[usize] {
        &self.missing_holes
    }

    pub fn missing_commons(&self) -> usize {
        self.missing_commons
    }

    pub fn boundaries(&self) -> u64 {
        self.boundaries
    }

    /// Seats that draw their holes from a range.
    pub fn range_seats(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().map(|(seat, _)| *seat)
    }

    /// Every card the position fixes.
    pub fn given(&self) -> u64 {
        self.given
    }

    /// Cards to complete per deal; a range pick counts as two.
    pub fn missing_cards(&self) -> usize {
        self.missing_holes.len() + self.missing_commons + 2 * self.ranges.len()
    }

    /// Picks one hand per range player, returning the updated used mask.
    ///
    /// A pick that hits a known card is redrawn on its own. A pick that hits
    /// another range player's hand restarts the whole deal, so every set of
    /// disjoint picks is equally likely.
    fn deal_ranges(&self, prng: &mut Prng, holes: &mut [Hand; MAX_PLAYERS], given: u64) -> u64 {
        'deal: loop {
            let mut used = given;
            let mut k = 0;
            let mut stalled = 0;
            while k < self.ranges.len() {
                if stalled == RANGE_ATTEMPTS {
                    continue 'deal;
                }
                stalled += 1;
                let n = prng.draw();
                for i in (0..=64 - RANGE_INDEX_BITS).step_by(RANGE_INDEX_BITS as usize) {
                    let (seat, range) = &self.ranges[k];
                    let Some(h) = range.get(((n >> i) & RANGE_MASK) as usize) else {
                        continue;
                    };
                    if h.cards() & given != 0 {
                        continue;
                    }
                    if h.cards() & used != 0 {
                        continue 'deal;
                    }
                    used |= h.cards();
                    holes[*seat] = *h;
                    stalled = 0;
                    k += 1;
                    if k == self.ranges.len() {
                        break;
                    }
                }
            }
            return used;
        }
    }

    /// Plays one trial and credits the winner(s) in `results`.
    pub fn run(&mut self, prng: &mut Prng, results: &mut [EquityCounts]) {
        let mut holes = self.holes;
        let mut used = self.given;
        if !self.ranges.is_empty() {
            used = self.deal_ranges(prng, &mut holes, used);
        }

        let mut common = self.common;
        let mut cnt = self.missing_commons;
        while cnt > 0 {
            let n = prng.draw();
            for i in (0..=64 - CARD_BITS).step_by(CARD_BITS as usize) {
                let id = ((n >> i) & CARD_MASK) as u8;
                if common.add(id, used) {
                    used |= 1 << id;
                    cnt -= 1;
                    if cnt == 0 {
                        break;
                    }
                }
            }
        }

        for p in 0..self.players {
            self.hands[p] = common;
            self.hands[p].merge(&holes[p]);
        }

        let mut k = 0;
        while k < self.missing_holes.len() {
            let n = prng.draw();
            for i in (0..=64 - CARD_BITS).step_by(CARD_BITS as usize) {
                let id = ((n >> i) & CARD_MASK) as u8;
                if self.hands[self.missing_holes[k]].add(id, used) {
                    used |= 1 << id;
                    k += 1;
                    if k == self.missing_holes.len() {
                        break;
                    }
                }
            }
        }

        let mut scores = [Score::default(); MAX_PLAYERS];
        let mut best = Score::default();
        let mut winner = 0;
        let mut ties = 0u64;
        for p in 0..self.players {
            scores[p] = evaluate(&self.hands[p]);
            if scores[p] > best {
                best = scores[p];
                winner = p;
                ties = 1;
            } else if scores[p] == best {
                ties += 1;
            }
        }

        if ties == 1 {
            results[winner].win += 1;
        } else {
            for p in 0..self.players {
                if scores[p] == best {
                    results[p].tie += TIE_UNIT / ties;
                }
            }
        }
    }
}

impl std::str::FromStr for Spot {
    type Err = SpotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Spot::new(s)
    }
}
