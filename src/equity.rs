//! Equity calculation: the worker engine for Monte Carlo simulation and
//! exact enumeration.
//!
//! Every worker owns a copy of the `Spot`, its own `Prng` and its own
//! counters; nothing is shared while workers run, and the counters are summed
//! once all of them have joined.

use crate::config::Settings;
use crate::enumerate::MAX_MISSING;
use crate::error::{EquityError, SpotError};
use crate::prng::Prng;
use crate::spot::{Spot, MAX_PLAYERS};

/// Tie credit for one trial, split evenly between the tied players.
/// Divisible by every tie size from 1 to `MAX_PLAYERS`.
pub const TIE_UNIT: u64 = 2520;

/// Per-player counters. `tie` is in units of `1 / TIE_UNIT` of a pot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct EquityCounts {
    pub win: u64,
    pub tie: u64,
}

impl EquityCounts {
    /// Pots won, in tie units.
    #[inline(always)]
    pub fn pots(&self) -> u64 {
        self.win * TIE_UNIT + self.tie
    }

    /// Share of the pot won over `games` trials, in [0, 1].
    pub fn equity(&self, games: u64) -> f64 {
        if games == 0 {
            return 0.0;
        }
        self.pots() as f64 / (games * TIE_UNIT) as f64
    }

    pub fn win_rate(&self, games: u64) -> f64 {
        if games == 0 {
            return 0.0;
        }
        self.win as f64 / games as f64
    }

    /// Tie share, in pots per trial.
    pub fn tie_rate(&self, games: u64) -> f64 {
        if games == 0 {
            return 0.0;
        }
        self.tie as f64 / (games * TIE_UNIT) as f64
    }
}

impl std::ops::AddAssign for EquityCounts {
    fn add_assign(&mut self, rhs: EquityCounts) {
        self.win += rhs.win;
        self.tie += rhs.tie;
    }
}

/// Trials accounted for by a result set: every trial credits exactly one pot.
pub fn total_games(results: &[EquityCounts]) -> u64 {
    results.iter().map(EquityCounts::pots).sum::<u64>() / TIE_UNIT
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Random trials.
    Sample,
    /// Every completion of the position exactly once.
    Enumerate,
}

struct Worker {
    idx: usize,
    spot: Spot,
    prng: Prng,
    games: u64,
    results: [EquityCounts; MAX_PLAYERS],
}

impl Worker {
    fn new(idx: usize, spot: &Spot, games: u64) -> Self {
        Self {
            idx,
            spot: spot.clone(),
            prng: Prng::new(idx as u64),
            games,
            results: [EquityCounts::default(); MAX_PLAYERS],
        }
    }

    fn run(&mut self, mode: Mode, workers: usize) -> Result<u64, SpotError> {
        if mode == Mode::Enumerate {
            let e = self.spot.enumerate(self.idx, workers)?;
            self.games = e.games;
            self.prng = Prng::replay(e.words);
        }
        log::debug!(
            "worker {}: {} games ({})",
            self.idx,
            self.games,
            if self.prng.is_replay() { "replay" } else { "sampled" }
        );
        for _ in 0..self.games {
            self.spot.run(&mut self.prng, &mut self.results);
        }
        Ok(self.games)
    }
}

/// A fixed set of worker threads.
pub struct Engine {
    threads: usize,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

#[cfg(feature = "parallel")]
fn build_pool(threads: usize) -> Result<rayon::ThreadPool, EquityError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("spot-worker-{i}"))
        .build()
        .map_err(|e| EquityError::ThreadPool(e.to_string()))
}

impl Engine {
    pub fn new(threads: usize) -> Result<Engine, EquityError> {
        if threads == 0 {
            return Err(EquityError::NoThreads);
        }
        Ok(Engine {
            threads,
            #[cfg(feature = "parallel")]
            pool: build_pool(threads)?,
        })
    }

    /// Replaces the worker threads; a no-op when the count is unchanged.
    pub fn resize(&mut self, threads: usize) -> Result<(), EquityError> {
        if threads == 0 {
            return Err(EquityError::NoThreads);
        }
        if threads != self.threads {
            #[cfg(feature = "parallel")]
            {
                self.pool = build_pool(threads)?;
            }
            self.threads = threads;
        }
        Ok(())
    }

    #[inline(always)]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Plays `spot` and adds each player's counters into `results`.
    ///
    /// In `Mode::Sample`, `games` trials are split evenly across workers,
    /// the first workers taking one extra for the remainder. In
    /// `Mode::Enumerate`, `games` is ignored. Returns the trials played;
    /// on error `results` is left untouched.
    pub fn run(
        &self,
        spot: &Spot,
        games: u64,
        mode: Mode,
        results: &mut [EquityCounts],
    ) -> Result<u64, EquityError> {
        if mode == Mode::Enumerate && spot.missing_cards() > MAX_MISSING {
            log::warn!(
                "too many cards to enumerate: {} missing, at most {} supported",
                spot.missing_cards(),
                MAX_MISSING
            );
            return Err(SpotError::TooManyMissing {
                missing: spot.missing_cards(),
                max: MAX_MISSING,
            }
            .into());
        }

        let workers = match mode {
            Mode::Sample if games < self.threads as u64 => 1,
            _ => self.threads,
        };
        let base = games / workers as u64;
        let extra = (games % workers as u64) as usize;
        let mut pool: Vec<Worker> = (0..workers)
            .map(|i| Worker::new(i, spot, base + u64::from(i < extra)))
            .collect();

        log::debug!("dispatching {} workers ({:?})", workers, mode);
        let outcomes = self.dispatch(&mut pool, mode, workers);
        log::debug!("joined {} workers", workers);

        let mut played = 0;
        for outcome in outcomes {
            played += outcome?;
        }
        for worker in &pool {
            for (dst, src) in results.iter_mut().zip(&worker.results).take(spot.players()) {
                *dst += *src;
            }
        }
        Ok(played)
    }

    #[cfg(feature = "parallel")]
    fn dispatch(
        &self,
        pool: &mut [Worker],
        mode: Mode,
        workers: usize,
    ) -> Vec<Result<u64, SpotError>> {
        use rayon::prelude::*;

        self.pool
            .install(|| pool.par_iter_mut().map(|w| w.run(mode, workers)).collect())
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch(
        &self,
        pool: &mut [Worker],
        mode: Mode,
        workers: usize,
    ) -> Vec<Result<u64, SpotError>> {
        pool.iter_mut().map(|w| w.run(mode, workers)).collect()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("threads", &self.threads).finish()
    }
}

/// One-shot calculation for a parsed command line.
pub fn simulate(settings: &Settings) -> Result<Vec<EquityCounts>, EquityError> {
    let spot = Spot::new(&settings.position())?;
    let engine = Engine::new(settings.threads)?;
    let mut results = vec![EquityCounts::default(); spot.players()];
    engine.run(&spot, settings.games, settings.mode, &mut results)?;
    Ok(results)
}
