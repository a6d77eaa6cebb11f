use crate::engine::registry::{DelayReport, FlightRegistry, RegistryError};
use crate::flight::{Direction, FlightEntry};
use crate::seat::{self, Seat};
use crate::traveller::{Role, Roster, Traveller};
use serde::Deserialize;
use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    UnknownTraveller(String),
    /// The traveller already holds this leg.
    AlreadyBooked(Direction),
    NoFlights(Direction),
    BadFlightIndex(usize),
    /// Arrival would not be strictly before the held departure, or the
    /// departure not strictly after the held arrival.
    TimingConflict,
    /// Requested seat is occupied and the traveller cannot displace.
    SeatTaken(Seat),
    /// Every seat on the flight is occupied.
    CabinFull,
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::UnknownTraveller(email) => write!(f, "no traveller with email {}", email),
            BookingError::AlreadyBooked(direction) => {
                write!(f, "you already have a {} flight booked", direction)
            }
            BookingError::NoFlights(direction) => {
                write!(f, "there are no {} flights available", direction)
            }
            BookingError::BadFlightIndex(index) => write!(f, "no flight at position {}", index),
            BookingError::TimingConflict => {
                write!(f, "the arrival time must be before the departure time")
            }
            BookingError::SeatTaken(seat) => write!(f, "seat {} is already occupied", seat),
            BookingError::CabinFull => write!(f, "the flight has no free seats"),
        }
    }
}

/// How seat conflicts resolve for a traveller, derived from their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatPolicy {
    /// An occupied seat fails the booking; the traveller picks again.
    Standard,
    /// An occupied seat displaces its holder to the next available seat.
    Priority,
}

impl SeatPolicy {
    pub fn for_role(role: &Role) -> SeatPolicy {
        match role {
            Role::FrequentFlyer { .. } => SeatPolicy::Priority,
            Role::Standard | Role::Staff { .. } => SeatPolicy::Standard,
        }
    }
}

/// Single entry point the session layer calls to register, query, delay and
/// book flights. Owns the registry and the traveller roster; nothing in here
/// does I/O or retries.
#[derive(Debug, Default)]
pub struct BookingEngine {
    pub registry: FlightRegistry,
    pub roster: Roster,
}

impl BookingEngine {
    /// Loads a scenario: flights plus pre-registered travellers. Occupancy is
    /// rebuilt from any bookings the travellers already hold.
    pub fn load_from_file(path: &str) -> io::Result<BookingEngine> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawData {
            flights: Vec<FlightEntry>,
            #[serde(default)]
            travellers: Vec<Traveller>,
        }
        let raw: RawData = serde_json::from_str(&data)?;

        let mut engine = BookingEngine::default();
        for flight in raw.flights {
            engine.register_flight(flight).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, e.to_string())
            })?;
        }
        for traveller in raw.travellers {
            for booking in [&traveller.arrival, &traveller.departure].into_iter().flatten() {
                engine
                    .registry
                    .occupy_seat(&booking.flight.flight_code(), booking.seat);
            }
            engine.roster.sign_up(traveller).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, e.to_string())
            })?;
        }
        Ok(engine)
    }

    /// Registers a flight on its direction's roster, enforcing plane-code
    /// uniqueness across both.
    pub fn register_flight(&mut self, entry: FlightEntry) -> Result<&FlightEntry, RegistryError> {
        let plane_code = entry.plane_code();
        if self.registry.is_plane_assigned(&plane_code) {
            return Err(RegistryError::PlaneAssigned(plane_code));
        }
        let list = match entry.direction {
            Direction::Arrival => {
                self.registry.add_arrival(entry);
                self.registry.arrivals()
            }
            Direction::Departure => {
                self.registry.add_departure(entry);
                self.registry.departures()
            }
        };
        Ok(list.last().unwrap())
    }

    /// Leg-availability check: fails if the traveller already holds this leg
    /// or no flights exist for it.
    pub fn can_book(&self, email: &str, direction: Direction) -> Result<(), BookingError> {
        let traveller = self
            .roster
            .find(email)
            .ok_or_else(|| BookingError::UnknownTraveller(email.to_string()))?;
        if traveller.has_leg(direction) {
            return Err(BookingError::AlreadyBooked(direction));
        }
        if self.registry.flights(direction).is_empty() {
            return Err(BookingError::NoFlights(direction));
        }
        Ok(())
    }

    /// Arrival strictly before any held departure; departure strictly after
    /// any held arrival. Equal times conflict.
    pub fn timing_ok(traveller: &Traveller, candidate: &FlightEntry) -> bool {
        match candidate.direction {
            Direction::Arrival => traveller
                .booking(Direction::Departure)
                .is_none_or(|held| candidate.when < held.flight.when),
            Direction::Departure => traveller
                .booking(Direction::Arrival)
                .is_none_or(|held| candidate.when > held.flight.when),
        }
    }

    /// Books the flight at `flight_index` of the direction's list for the
    /// traveller, resolving seat conflicts per their role's policy. On
    /// success the seat is committed to both the traveller and the occupancy
    /// table.
    pub fn book(
        &mut self,
        email: &str,
        direction: Direction,
        flight_index: usize,
        seat: Seat,
    ) -> Result<Seat, BookingError> {
        self.can_book(email, direction)?;

        let flight = self
            .registry
            .flights(direction)
            .get(flight_index)
            .cloned()
            .ok_or(BookingError::BadFlightIndex(flight_index))?;

        // can_book proved the traveller exists
        let traveller = self.roster.find(email).unwrap();
        if !Self::timing_ok(traveller, &flight) {
            return Err(BookingError::TimingConflict);
        }
        let policy = SeatPolicy::for_role(&traveller.role);

        let flight_code = flight.flight_code();
        self.resolve_seat(&flight_code, seat, policy)?;

        let traveller = self.roster.find_mut(email).unwrap();
        traveller.commit_booking(flight, seat);
        self.registry.occupy_seat(&flight_code, seat);

        self.assert_invariants();
        Ok(seat)
    }

    /// Conflict resolution for the requested seat. A full cabin fails
    /// regardless of policy. Otherwise an occupied seat either fails the
    /// booking (standard) or displaces its holder to the next available seat
    /// (priority), leaving the requested seat free for the caller to commit.
    fn resolve_seat(
        &mut self,
        flight_code: &str,
        requested: Seat,
        policy: SeatPolicy,
    ) -> Result<(), BookingError> {
        if !self.registry.is_seat_occupied(flight_code, requested) {
            return Ok(());
        }
        if self.registry.occupied_seats(flight_code).len() >= seat::CABIN_CAPACITY {
            return Err(BookingError::CabinFull);
        }

        match policy {
            SeatPolicy::Standard => Err(BookingError::SeatTaken(requested)),
            SeatPolicy::Priority => {
                // snapshot before freeing: the requested seat stays occupied
                // in the search, so the displaced holder can never land back
                // on the seat being handed over
                let occupied = self.registry.occupied_seats(flight_code);
                self.registry.free_seat(flight_code, requested);
                match self.roster.find_by_seat_mut(flight_code, requested) {
                    Some(occupant) => {
                        // at most 39 seats in the snapshot, so a replacement
                        // always exists
                        let replacement = seat::next_available(&occupied, requested)
                            .ok_or(BookingError::CabinFull)?;
                        occupant.reseat(flight_code, replacement);
                        self.registry.occupy_seat(flight_code, replacement);
                    }
                    // orphaned occupancy entry: nobody holds the seat, just
                    // hand it over
                    None => {}
                }
                Ok(())
            }
        }
    }

    pub fn delay_flight(
        &mut self,
        flight_code: &str,
        minutes: u64,
    ) -> Result<DelayReport, RegistryError> {
        self.registry.apply_delay(flight_code, minutes)
    }

    /// Who currently holds a seat on a flight, if anyone.
    pub fn occupant(&self, flight_code: &str, seat: Seat) -> Option<&Traveller> {
        self.roster.find_by_seat(flight_code, seat)
    }

    pub(crate) fn assert_invariants(&self) {
        debug_assert!(
            self.roster.travellers().iter().all(|t| {
                [&t.arrival, &t.departure].into_iter().flatten().all(|b| {
                    self.registry
                        .is_seat_occupied(&b.flight.flight_code(), b.seat)
                })
            }),
            "booking without a matching occupancy entry"
        );

        debug_assert!(
            {
                let mut held: Vec<(String, Seat)> = self
                    .roster
                    .travellers()
                    .iter()
                    .flat_map(|t| [&t.arrival, &t.departure])
                    .flatten()
                    .map(|b| (b.flight.flight_code(), b.seat))
                    .collect();
                let before = held.len();
                held.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.to_string().cmp(&b.1.to_string())));
                held.dedup();
                before == held.len()
            },
            "two travellers hold the same seat"
        );

        self.registry.assert_invariants();
    }
}
