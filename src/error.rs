//! Error types.
//!
//! Every failure here is recoverable at the call boundary: a bad position or
//! range is reported and nothing runs. Card collisions while filling a trial
//! are not errors and never show up here.

use std::fmt;

use crate::card::Card;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CardError {
    Invalid(String),
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardError::Invalid(token) => write!(f, "invalid card token '{token}'"),
        }
    }
}

impl std::error::Error for CardError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RangeError {
    Malformed(String),
    Empty,
    TooLarge(usize),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Malformed(token) => write!(f, "malformed range term '{token}'"),
            RangeError::Empty => write!(f, "range expands to no hands"),
            RangeError::TooLarge(n) => write!(
                f,
                "range expands to {n} hands, max is {}",
                crate::range::RANGE_CAPACITY
            ),
        }
    }
}

impl std::error::Error for RangeError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SpotError {
    PlayerCount(String),
    InvalidHole(String),
    InvalidCommon(String),
    DuplicateCard(Card),
    TooManyHoles { given: usize, players: usize },
    TooManyCommons(usize),
    Range(RangeError),
    UnsatisfiableRanges,
    TooManyMissing { missing: usize, max: usize },
}

impl fmt::Display for SpotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotError::PlayerCount(token) => {
                write!(f, "invalid player count '{token}', expected 2P..9P")
            }
            SpotError::InvalidHole(token) => write!(f, "invalid hole token '{token}'"),
            SpotError::InvalidCommon(token) => write!(f, "invalid common token '{token}'"),
            SpotError::DuplicateCard(card) => write!(f, "card {card} is given twice"),
            SpotError::TooManyHoles { given, players } => {
                write!(f, "{given} holes given for {players} players")
            }
            SpotError::TooManyCommons(n) => write!(f, "{n} common cards given, max is 5"),
            SpotError::Range(e) => write!(f, "{e}"),
            SpotError::UnsatisfiableRanges => {
                write!(f, "ranges cannot be dealt together with the given cards")
            }
            SpotError::TooManyMissing { missing, max } => {
                write!(f, "missing too many cards ({missing}), max is {max}")
            }
        }
    }
}

impl std::error::Error for SpotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotError::Range(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RangeError> for SpotError {
    fn from(e: RangeError) -> Self {
        SpotError::Range(e)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    MissingValue(String),
    InvalidValue { option: String, value: String },
    UnclosedRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingValue(option) => write!(f, "option {option} needs a value"),
            ConfigError::InvalidValue { option, value } => {
                write!(f, "invalid value '{value}' for option {option}")
            }
            ConfigError::UnclosedRange(token) => write!(f, "unclosed range '{token}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EquityError {
    Config(ConfigError),
    Spot(SpotError),
    NoThreads,
    ThreadPool(String),
}

impl fmt::Display for EquityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquityError::Config(e) => write!(f, "{e}"),
            EquityError::Spot(e) => write!(f, "{e}"),
            EquityError::NoThreads => write!(f, "at least one worker thread is required"),
            EquityError::ThreadPool(msg) => write!(f, "thread pool: {msg}"),
        }
    }
}

impl std::error::Error for EquityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EquityError::Config(e) => Some(e),
            EquityError::Spot(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EquityError {
    fn from(e: ConfigError) -> Self {
        EquityError::Config(e)
    }
}

impl From<SpotError> for EquityError {
    fn from(e: SpotError) -> Self {
        EquityError::Spot(e)
    }
}
