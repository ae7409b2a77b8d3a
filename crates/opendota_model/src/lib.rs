use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod error;

pub use error::RequestError;

/// Selects how a request interacts with the API cooldown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Block until the cooldown has elapsed, retry generic API errors.
    #[default]
    Wait,
    /// Give up right away when the cooldown has not elapsed yet.
    Skip,
    /// Send without waiting for the cooldown.
    Immediate,
}

impl From<i32> for Mode {
    fn from(value: i32) -> Self {
        match value {
            0 => Mode::Wait,
            -1 => Mode::Skip,
            _ => Mode::Immediate,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Wait => "wait",
            Mode::Skip => "skip",
            Mode::Immediate => "immediate",
        })
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct HeroId(u32);

impl From<u32> for HeroId {
    fn from(value: u32) -> Self {
        HeroId(value)
    }
}

impl Display for HeroId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct MatchId(u64);

impl From<u64> for MatchId {
    fn from(value: u64) -> Self {
        MatchId(value)
    }
}

impl Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
