use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const MIN_ROW: u8 = 1;
pub const MAX_ROW: u8 = 10;
pub const MIN_COL: char = 'A';
pub const MAX_COL: char = 'D';

/// Total seats per flight across the row/column grid.
pub const CABIN_CAPACITY: usize =
    (MAX_ROW - MIN_ROW + 1) as usize * (MAX_COL as usize - MIN_COL as usize + 1);

/// One seat in the cabin grid, canonically written `row:column` (e.g. `3:B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Seat {
    row: u8,
    col: char,
}

impl Seat {
    pub fn new(row: u8, col: char) -> Option<Seat> {
        let col = col.to_ascii_uppercase();
        if (MIN_ROW..=MAX_ROW).contains(&row) && (MIN_COL..=MAX_COL).contains(&col) {
            Some(Seat { row, col })
        } else {
            None
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> char {
        self.col
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl FromStr for Seat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(':')
            .ok_or_else(|| format!("seat '{}' is not in row:column form", s))?;
        let row = row
            .parse::<u8>()
            .map_err(|_| format!("seat row '{}' is not a number", row))?;
        let mut cols = col.chars();
        let col = match (cols.next(), cols.next()) {
            (Some(c), None) => c,
            _ => return Err(format!("seat column '{}' is not a single letter", col)),
        };
        Seat::new(row, col).ok_or_else(|| format!("seat '{}' is outside the cabin grid", s))
    }
}

impl TryFrom<String> for Seat {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Seat> for String {
    fn from(seat: Seat) -> String {
        seat.to_string()
    }
}

/// Finds the first free seat for a request against an occupancy snapshot.
///
/// The search prefers staying near the requested seat before falling back to a
/// full sweep:
/// 1. same row, next column;
/// 2. each later row, first column;
/// 3. each earlier row, first column;
/// 4. row-major scan of the whole cabin.
///
/// Returns `None` only when every seat is occupied.
pub fn next_available(occupied: &HashSet<Seat>, requested: Seat) -> Option<Seat> {
    if requested.col < MAX_COL {
        let next_col = (requested.col as u8 + 1) as char;
        let seat = Seat::new(requested.row, next_col)?;
        if !occupied.contains(&seat) {
            return Some(seat);
        }
    }

    for row in requested.row + 1..=MAX_ROW {
        let seat = Seat::new(row, MIN_COL)?;
        if !occupied.contains(&seat) {
            return Some(seat);
        }
    }

    for row in MIN_ROW..requested.row {
        let seat = Seat::new(row, MIN_COL)?;
        if !occupied.contains(&seat) {
            return Some(seat);
        }
    }

    for row in MIN_ROW..=MAX_ROW {
        for col in MIN_COL..=MAX_COL {
            let seat = Seat::new(row, col)?;
            if !occupied.contains(&seat) {
                return Some(seat);
            }
        }
    }

    None
}
