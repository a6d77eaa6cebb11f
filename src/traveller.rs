use crate::airline::city_points;
use crate::flight::{Direction, FlightEntry};
use crate::seat::Seat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type Email = Arc<str>;

/// Account kind. Staff register flights and apply delays; frequent flyers
/// earn points and displace other travellers on seat conflicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Standard,
    FrequentFlyer { number: u32, points: u64 },
    Staff { staff_id: u16 },
}

/// One booked leg: the flight snapshot at booking time plus the held seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub flight: FlightEntry,
    pub seat: Seat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traveller {
    pub name: String,
    pub age: u8,
    pub mobile: String,
    pub email: Email,
    password: String,
    pub role: Role,
    pub arrival: Option<Booking>,
    pub departure: Option<Booking>,
}

impl Traveller {
    pub fn new(name: &str, age: u8, mobile: &str, email: &str, password: &str, role: Role) -> Traveller {
        Traveller {
            name: name.to_string(),
            age,
            mobile: mobile.to_string(),
            email: Arc::from(email),
            password: password.to_string(),
            role,
            arrival: None,
            departure: None,
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    pub fn booking(&self, direction: Direction) -> Option<&Booking> {
        match direction {
            Direction::Arrival => self.arrival.as_ref(),
            Direction::Departure => self.departure.as_ref(),
        }
    }

    pub fn has_leg(&self, direction: Direction) -> bool {
        self.booking(direction).is_some()
    }

    /// Stores the booking on whichever leg matches the flight's direction.
    pub fn commit_booking(&mut self, flight: FlightEntry, seat: Seat) {
        let slot = match flight.direction {
            Direction::Arrival => &mut self.arrival,
            Direction::Departure => &mut self.departure,
        };
        *slot = Some(Booking { flight, seat });
    }

    /// Moves the held seat on whichever leg uses `flight_code`. Used when a
    /// frequent flyer displaces this traveller.
    pub fn reseat(&mut self, flight_code: &str, seat: Seat) {
        for booking in [&mut self.arrival, &mut self.departure].into_iter().flatten() {
            if booking.flight.flight_code() == flight_code {
                booking.seat = seat;
                return;
            }
        }
    }

    fn holds_seat(&self, flight_code: &str, seat: Seat) -> bool {
        [&self.arrival, &self.departure]
            .into_iter()
            .flatten()
            .any(|b| b.seat == seat && b.flight.flight_code() == flight_code)
    }

    /// Current balance plus what each booked leg is worth, for frequent
    /// flyers only. Leg values are display figures, not credited balance.
    pub fn points_breakdown(&self) -> Option<(u64, u64, u64)> {
        match &self.role {
            Role::FrequentFlyer { points, .. } => {
                let leg = |b: &Option<Booking>| {
                    b.as_ref().map_or(0, |b| city_points(&b.flight.city))
                };
                Some((*points, leg(&self.arrival), leg(&self.departure)))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpError {
    EmailTaken,
}

impl std::fmt::Display for SignUpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignUpError::EmailTaken => write!(f, "that email is already registered"),
        }
    }
}

/// In-memory traveller store, keyed by email (case-insensitive).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    travellers: Vec<Traveller>,
}

impl Roster {
    pub fn email_exists(&self, email: &str) -> bool {
        self.travellers
            .iter()
            .any(|t| t.email.eq_ignore_ascii_case(email))
    }

    pub fn sign_up(&mut self, traveller: Traveller) -> Result<(), SignUpError> {
        if self.email_exists(&traveller.email) {
            return Err(SignUpError::EmailTaken);
        }
        self.travellers.push(traveller);
        Ok(())
    }

    pub fn find(&self, email: &str) -> Option<&Traveller> {
        self.travellers
            .iter()
            .find(|t| t.email.eq_ignore_ascii_case(email))
    }

    pub fn find_mut(&mut self, email: &str) -> Option<&mut Traveller> {
        self.travellers
            .iter_mut()
            .find(|t| t.email.eq_ignore_ascii_case(email))
    }

    pub fn authenticate(&self, email: &str, password: &str) -> bool {
        self.find(email).is_some_and(|t| t.verify_password(password))
    }

    /// The traveller currently holding a seat on a flight, if any. Scans both
    /// legs of every traveller; an occupied seat with no holder here is an
    /// orphaned occupancy entry.
    pub fn find_by_seat(&self, flight_code: &str, seat: Seat) -> Option<&Traveller> {
        self.travellers
            .iter()
            .find(|t| t.holds_seat(flight_code, seat))
    }

    pub fn find_by_seat_mut(&mut self, flight_code: &str, seat: Seat) -> Option<&mut Traveller> {
        self.travellers
            .iter_mut()
            .find(|t| t.holds_seat(flight_code, seat))
    }

    pub fn travellers(&self) -> &[Traveller] {
        &self.travellers
    }
}
