//! Command-line style settings.
//!
//! ```text
//! [-p players] [-t threads] [-g games[k|m]] [-e] holes... [- commons...]
//! ```
//!
//! Options come first. The first token that is not an option starts the
//! holes, and a lone `-` switches to the common cards. A bracketed range may
//! contain spaces: `[AA, KK]` is one hole token.

use crate::equity::Mode;
use crate::error::ConfigError;

pub const DEFAULT_GAMES: u64 = 1_000_000;
pub const DEFAULT_THREADS: usize = 1;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub players: usize,
    pub games: u64,
    pub threads: usize,
    pub mode: Mode,
    pub holes: Vec<String>,
    pub commons: Vec<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Option,
    Hole,
    Common,
}

fn invalid(option: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    }
}

/// Game count with an optional `k` or `m` multiplier.
fn parse_games(value: &str) -> Option<u64> {
    let (digits, mult) = match value.char_indices().last()? {
        (i, 'k' | 'K') => (&value[..i], 1_000),
        (i, 'm' | 'M') => (&value[..i], 1_000_000),
        _ => (value, 1),
    };
    digits.parse::<u64>().ok()?.checked_mul(mult)
}

/// Joins a bracketed range split by spaces back into one token.
fn read_hole<'a, I>(first: &'a str, rest: &mut I) -> Result<String, ConfigError>
where
    I: Iterator<Item = &'a str>,
{
    let mut hole = first.to_string();
    if first.starts_with('[') {
        while !hole.contains(']') {
            match rest.next() {
                Some(next) => hole.push_str(next),
                None => return Err(ConfigError::UnclosedRange(hole)),
            }
        }
    }
    Ok(hole)
}

impl Settings {
    pub fn parse(input: &str) -> Result<Settings, ConfigError> {
        let mut players = None;
        let mut games = DEFAULT_GAMES;
        let mut threads = DEFAULT_THREADS;
        let mut mode = Mode::Sample;
        let mut holes = Vec::new();
        let mut commons = Vec::new();

        let mut state = State::Option;
        let mut tokens = input.split_whitespace();
        while let Some(token) = tokens.next() {
            match state {
                State::Option => match token {
                    "-p" | "-t" | "-g" => {
                        let value = tokens
                            .next()
                            .ok_or_else(|| ConfigError::MissingValue(token.to_string()))?;
                        match token {
                            "-p" => {
                                players =
                                    Some(value.parse::<usize>().map_err(|_| invalid(token, value))?);
                            }
                            "-t" => {
                                threads = value
                                    .parse::<usize>()
                                    .ok()
                                    .filter(|&t| t > 0)
                                    .ok_or_else(|| invalid(token, value))?;
                            }
                            _ => games = parse_games(value).ok_or_else(|| invalid(token, value))?,
                        }
                    }
                    "-e" => mode = Mode::Enumerate,
                    "-" => state = State::Common,
                    _ => {
                        state = State::Hole;
                        holes.push(read_hole(token, &mut tokens)?);
                    }
                },
                State::Hole if token == "-" => state = State::Common,
                State::Hole => holes.push(read_hole(token, &mut tokens)?),
                State::Common => commons.push(token.to_string()),
            }
        }

        Ok(Settings {
            players: players.unwrap_or(holes.len()),
            games,
            threads,
            mode,
            holes,
            commons,
        })
    }

    /// The position in the form `Spot::new` takes.
    pub fn position(&self) -> String {
        let mut pos = format!("{}P", self.players);
        for hole in &self.holes {
            pos.push(' ');
            pos.push_str(hole);
        }
        if !self.commons.is_empty() {
            pos.push_str(" -");
            for common in &self.commons {
                pos.push(' ');
                pos.push_str(common);
            }
        }
        pos
    }
}

impl std::str::FromStr for Settings {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Settings::parse(s)
    }
}
