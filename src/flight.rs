use crate::airline::Airline;
use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MIN_FLIGHT_ID: u16 = 100;
pub const MAX_FLIGHT_ID: u16 = 900;
pub const MIN_PLANE_ID: u8 = 0;
pub const MAX_PLANE_ID: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Arrival,
    Departure,
}

impl Direction {
    /// Suffix appended to the plane code, scoping aircraft identity per leg.
    pub fn suffix(&self) -> char {
        match self {
            Direction::Arrival => 'A',
            Direction::Departure => 'D',
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Arrival => write!(f, "arrival"),
            Direction::Departure => write!(f, "departure"),
        }
    }
}

/// One scheduled flight. Entries are immutable; a delay replaces the entry
/// with a time-shifted copy rather than mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEntry {
    pub airline: Airline,
    pub city: Arc<str>,
    pub flight_id: u16,
    pub plane_id: u8,
    pub when: Time,
    pub direction: Direction,
}

impl FlightEntry {
    /// Flight code in the form `{airline}{flight_id}`, e.g. `QFA450`.
    pub fn flight_code(&self) -> String {
        format!("{}{}", self.airline.code(), self.flight_id)
    }

    /// Plane code in the form `{airline}{plane_id}{A|D}`, e.g. `QFA3A`.
    /// Unique across the whole roster; the suffix makes an arrival-leg
    /// aircraft distinct from a departure-leg aircraft with the same id.
    pub fn plane_code(&self) -> String {
        format!(
            "{}{}{}",
            self.airline.code(),
            self.plane_id,
            self.direction.suffix()
        )
    }

    /// Copy of this entry pushed out by `minutes`.
    pub fn delayed_by(&self, minutes: u64) -> FlightEntry {
        FlightEntry {
            when: self.when + minutes,
            ..self.clone()
        }
    }
}
