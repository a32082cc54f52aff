use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::core::error::InputError;

/// Whole percentage in `0..=100`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Percent(u8);

impl Percent {
    /// Target state of charge assumed when none is given.
    pub const DEFAULT_TARGET: Self = Self(80);

    pub fn new(value: u8) -> Result<Self, InputError> {
        if value <= 100 {
            Ok(Self(value))
        } else {
            Err(InputError::invalid(format!("{value}% is out of the 0–100 range")))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Percentage points to add to reach `target`, or [`None`] if already there.
    pub fn points_to(self, target: Self) -> Option<Self> {
        target.0.checked_sub(self.0).filter(|points| *points != 0).map(Self)
    }
}

impl TryFrom<u8> for Percent {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Percent {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_suffix('%').unwrap_or(s);
        s.parse::<u8>()
            .map_err(|_| InputError::invalid(format!("`{s}` is not a whole percentage")))
            .and_then(Self::new)
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
