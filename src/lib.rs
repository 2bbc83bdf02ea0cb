//! Multi-way Hold'em equity core: bit-packed evaluation, hand ranges,
//! Monte Carlo sampling and exhaustive enumeration over a worker pool.

pub mod card;
pub mod config;
pub mod enumerate;
pub mod equity;
pub mod error;
pub mod evaluator;
pub mod hand;
pub mod lut;
pub mod prng;
pub mod range;
pub mod score;
pub mod spot;

pub use card::{parse_cards, Card, Rank, Suit};
pub use config::Settings;
pub use enumerate::{Enumeration, MAX_MISSING};
pub use equity::{simulate, total_games, Engine, EquityCounts, Mode, TIE_UNIT};
pub use error::{CardError, ConfigError, EquityError, RangeError, SpotError};
pub use evaluator::{evaluate, evaluate_cards};
pub use hand::Hand;
pub use prng::Prng;
pub use range::Range;
pub use score::{Category, Score};
pub use spot::{Spot, MAX_PLAYERS};
