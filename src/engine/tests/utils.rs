use crate::airline::Airline;
use crate::engine::booking::BookingEngine;
use crate::flight::{Direction, FlightEntry};
use crate::seat::{self, Seat};
use crate::time::Time;
use crate::traveller::{Role, Traveller};
use proptest::prelude::Strategy;
use std::sync::Arc;

pub fn entry(
    airline: Airline,
    city: &str,
    flight_id: u16,
    plane_id: u8,
    when: u64,
    direction: Direction,
) -> FlightEntry {
    FlightEntry {
        airline,
        city: Arc::from(city),
        flight_id,
        plane_id,
        when: Time(when),
        direction,
    }
}

pub fn arrival(flight_id: u16, plane_id: u8, when: u64) -> FlightEntry {
    entry(Airline::Qantas, "Sydney", flight_id, plane_id, when, Direction::Arrival)
}

pub fn departure(flight_id: u16, plane_id: u8, when: u64) -> FlightEntry {
    entry(Airline::Qantas, "Melbourne", flight_id, plane_id, when, Direction::Departure)
}

pub fn standard(name: &str, email: &str) -> Traveller {
    Traveller::new(name, 30, "0400000000", email, "Passw0rd1", Role::Standard)
}

pub fn flyer(name: &str, email: &str) -> Traveller {
    Traveller::new(
        name,
        30,
        "0400000001",
        email,
        "Passw0rd1",
        Role::FrequentFlyer {
            number: 123_456,
            points: 500,
        },
    )
}

pub fn staff(name: &str, email: &str) -> Traveller {
    Traveller::new(name, 30, "0400000002", email, "Passw0rd1", Role::Staff { staff_id: 4021 })
}

pub fn engine_with(flights: Vec<FlightEntry>, travellers: Vec<Traveller>) -> BookingEngine {
    let mut engine = BookingEngine::default();
    for flight in flights {
        engine.register_flight(flight).unwrap();
    }
    for traveller in travellers {
        engine.roster.sign_up(traveller).unwrap();
    }
    engine
}

pub fn seat(s: &str) -> Seat {
    s.parse().unwrap()
}

pub fn every_seat() -> impl Iterator<Item = Seat> {
    (seat::MIN_ROW..=seat::MAX_ROW).flat_map(|row| {
        (seat::MIN_COL..=seat::MAX_COL).map(move |col| Seat::new(row, col).unwrap())
    })
}

pub fn arb_seat() -> impl Strategy<Value = Seat> {
    (seat::MIN_ROW..=seat::MAX_ROW, 0u8..4).prop_map(|(row, col)| {
        Seat::new(row, (seat::MIN_COL as u8 + col) as char).unwrap()
    })
}
