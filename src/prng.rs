//! Per-worker random source.
//!
//! xorshift64* for sampling (fine for simulation; not crypto). The same type
//! can instead replay a buffer of enumerated deals, so `Spot::run` has one
//! code path for both modes.

use rand::RngCore;

#[derive(Clone, Debug)]
enum Source {
    Xorshift(u64),
    Replay { words: Vec<u64>, pos: usize },
}

#[derive(Clone, Debug)]
pub struct Prng {
    source: Source,
}

/// splitmix64 step, spreads small seeds (worker 0, 1, 2...) over the state.
#[inline(always)]
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Prng {
    /// Deterministic generator for worker `seed`.
    pub fn new(seed: u64) -> Self {
        let state = match splitmix64(seed) {
            0 => 0x2545_F491_4F6C_DD1D,
            s => s,
        };
        Self {
            source: Source::Xorshift(state),
        }
    }

    /// Yields `words` in order instead of random numbers.
    pub fn replay(words: Vec<u64>) -> Self {
        Self {
            source: Source::Replay { words, pos: 0 },
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self.source, Source::Replay { .. })
    }

    /// Next word.
    ///
    /// # Panics
    ///
    /// A replaying generator panics once its buffer is used up: the buffer
    /// must hold every word the replayed games consume.
    #[inline(always)]
    pub fn draw(&mut self) -> u64 {
        match &mut self.source {
            Source::Xorshift(state) => {
                let mut x = *state;
                x ^= x >> 12;
                x ^= x << 25;
                x ^= x >> 27;
                *state = x;
                x.wrapping_mul(0x2545_F491_4F6C_DD1D)
            }
            Source::Replay { words, pos } => {
                let Some(&w) = words.get(*pos) else {
                    panic!("replay buffer exhausted after {} words", words.len());
                };
                *pos += 1;
                w
            }
        }
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        (self.draw() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.draw()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        rand::rand_core::impls::fill_bytes_via_next(self, dst)
    }
}
