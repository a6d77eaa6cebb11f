use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Minutes since the start of the roster period.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Serialize, Deserialize, PartialOrd)]
pub struct Time(pub u64);

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days = self.0 / 1440;
        let remaining = self.0 % 1440;
        let hours = remaining / 60;
        let mins = remaining % 60;
        write!(f, "DAY{} {:02}:{:02}", days + 1, hours, mins)
    }
}

impl Add<u64> for Time {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Time(self.0 + rhs)
    }
}
