use crate::flight::{Direction, FlightEntry};
use crate::seat::Seat;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The plane code is already assigned to a registered flight.
    PlaneAssigned(String),
    FlightNotFound(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::PlaneAssigned(code) => {
                write!(f, "plane {} is already assigned to a flight", code)
            }
            RegistryError::FlightNotFound(code) => write!(f, "no flight with code {}", code),
        }
    }
}

/// What a delay touched: the triggering flight and every flight in the
/// opposite direction list flown by the same (airline, plane id).
#[derive(Debug, Clone, PartialEq)]
pub struct DelayReport {
    pub flight: String,
    pub minutes: u64,
    pub propagated: Vec<String>,
}

/// Owns the arrival and departure rosters plus the seat-occupancy table.
///
/// Both flight lists keep insertion order; display layers sort for
/// themselves. `add_arrival`/`add_departure` do not re-check plane-code
/// uniqueness, callers confirm via `is_plane_assigned` first.
#[derive(Debug, Default)]
pub struct FlightRegistry {
    arrivals: Vec<FlightEntry>,
    departures: Vec<FlightEntry>,
    occupied: HashMap<String, HashSet<Seat>>,
}

impl FlightRegistry {
    pub fn is_plane_assigned(&self, plane_code: &str) -> bool {
        self.arrivals
            .iter()
            .chain(&self.departures)
            .any(|f| f.plane_code() == plane_code)
    }

    pub fn add_arrival(&mut self, entry: FlightEntry) {
        self.arrivals.push(entry);
    }

    pub fn add_departure(&mut self, entry: FlightEntry) {
        self.departures.push(entry);
    }

    pub fn arrivals(&self) -> &[FlightEntry] {
        &self.arrivals
    }

    pub fn departures(&self) -> &[FlightEntry] {
        &self.departures
    }

    pub fn flights(&self, direction: Direction) -> &[FlightEntry] {
        match direction {
            Direction::Arrival => &self.arrivals,
            Direction::Departure => &self.departures,
        }
    }

    /// Linear scan, arrivals first.
    pub fn find_by_flight_code(&self, flight_code: &str) -> Option<&FlightEntry> {
        self.arrivals
            .iter()
            .chain(&self.departures)
            .find(|f| f.flight_code() == flight_code)
    }

    pub fn is_seat_occupied(&self, flight_code: &str, seat: Seat) -> bool {
        self.occupied
            .get(flight_code)
            .is_some_and(|seats| seats.contains(&seat))
    }

    /// Seats currently occupied on a flight. Empty set if none are.
    pub fn occupied_seats(&self, flight_code: &str) -> HashSet<Seat> {
        self.occupied.get(flight_code).cloned().unwrap_or_default()
    }

    pub fn occupy_seat(&mut self, flight_code: &str, seat: Seat) {
        self.occupied
            .entry(flight_code.to_string())
            .or_default()
            .insert(seat);
    }

    pub fn free_seat(&mut self, flight_code: &str, seat: Seat) {
        if let Some(seats) = self.occupied.get_mut(flight_code) {
            seats.remove(&seat);
        }
    }

    /// Pushes a flight out by `minutes` and cascades the same shift to every
    /// flight in the opposite list sharing the aircraft's (airline, plane id).
    ///
    /// Propagation is one level only and keys on (airline, plane id) without
    /// the direction suffix, even though registration-time uniqueness includes
    /// it; the two flights of a turnaround are distinct plane codes but one
    /// physical aircraft.
    pub fn apply_delay(
        &mut self,
        flight_code: &str,
        minutes: u64,
    ) -> Result<DelayReport, RegistryError> {
        let mut report = DelayReport {
            flight: flight_code.to_string(),
            minutes,
            propagated: vec![],
        };

        let (list, opposite) = if self.arrivals.iter().any(|f| f.flight_code() == flight_code) {
            (&mut self.arrivals, &mut self.departures)
        } else if self.departures.iter().any(|f| f.flight_code() == flight_code) {
            (&mut self.departures, &mut self.arrivals)
        } else {
            return Err(RegistryError::FlightNotFound(flight_code.to_string()));
        };

        if minutes == 0 {
            return Ok(report);
        }

        let mut aircraft = None;
        for entry in list.iter_mut() {
            if entry.flight_code() == flight_code {
                aircraft = Some((entry.airline, entry.plane_id));
                *entry = entry.delayed_by(minutes);
                break;
            }
        }

        // aircraft is always found at this point; the earlier scan proved it
        if let Some((airline, plane_id)) = aircraft {
            for entry in opposite.iter_mut() {
                if entry.airline == airline && entry.plane_id == plane_id {
                    *entry = entry.delayed_by(minutes);
                    report.propagated.push(entry.flight_code());
                }
            }
        }

        self.assert_invariants();
        Ok(report)
    }

    pub(crate) fn assert_invariants(&self) {
        debug_assert!(
            {
                let codes: Vec<String> = self
                    .arrivals
                    .iter()
                    .chain(&self.departures)
                    .map(|f| f.plane_code())
                    .collect();
                let unique: HashSet<&String> = codes.iter().collect();
                unique.len() == codes.len()
            },
            "plane code uniqueness violated"
        );

        debug_assert!(
            self.occupied
                .values()
                .all(|seats| seats.len() <= crate::seat::CABIN_CAPACITY),
            "occupancy exceeds cabin capacity"
        );
    }
}
