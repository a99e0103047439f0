//! CLI verb selecting what a run does

use crate::error::BenchError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Cross-check every strategy's digest
    Test,
    /// Time every strategy
    Bench,
}

impl Mode {
    /// Parse the positional verb; absence is as fatal as a typo
    pub fn from_arg(arg: Option<&str>) -> Result<Self, BenchError> {
        match arg {
            Some(arg) => arg.parse(),
            None => Err(BenchError::UnrecognizedMode(None)),
        }
    }
}

impl FromStr for Mode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(Mode::Test),
            "bench" => Ok(Mode::Bench),
            other => Err(BenchError::UnrecognizedMode(Some(other.to_string()))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Test => write!(f, "test"),
            Mode::Bench => write!(f, "bench"),
        }
    }
}
