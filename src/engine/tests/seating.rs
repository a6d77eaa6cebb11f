use crate::engine::booking::BookingError;
use crate::engine::tests::utils::{arrival, engine_with, every_seat, flyer, seat, staff, standard};
use crate::flight::Direction;

#[test]
fn test_standard_traveller_is_rejected_on_occupied_seat() {
    let mut engine = engine_with(
        vec![arrival(100, 1, 600)],
        vec![standard("Ada", "ada@example.com"), standard("Ben", "ben@example.com")],
    );

    engine
        .book("ada@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();

    // Ben is not silently reseated; the conflict surfaces and Ada keeps 1:A.
    assert_eq!(
        Err(BookingError::SeatTaken(seat("1:A"))),
        engine.book("ben@example.com", Direction::Arrival, 0, seat("1:A"))
    );
    assert_eq!("Ada", engine.occupant("QFA100", seat("1:A")).unwrap().name);
    assert!(engine
        .roster
        .find("ben@example.com")
        .unwrap()
        .booking(Direction::Arrival)
        .is_none());

    // a different seat goes through
    assert!(engine
        .book("ben@example.com", Direction::Arrival, 0, seat("1:B"))
        .is_ok());
}

#[test]
fn test_frequent_flyer_displaces_the_occupant() {
    let mut engine = engine_with(
        vec![arrival(100, 1, 600)],
        vec![standard("Ada", "ada@example.com"), flyer("Fay", "fay@example.com")],
    );

    engine
        .book("ada@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();
    let booked = engine
        .book("fay@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();

    assert_eq!(seat("1:A"), booked);
    assert_eq!("Fay", engine.occupant("QFA100", seat("1:A")).unwrap().name);
    // Ada lands on the allocator's pick anchored at the vacated seat
    let ada = engine.roster.find("ada@example.com").unwrap();
    assert_eq!(seat("1:B"), ada.booking(Direction::Arrival).unwrap().seat);
    assert!(engine.registry.is_seat_occupied("QFA100", seat("1:B")));
}

#[test]
fn test_displacement_updates_the_leg_matching_the_flight_code() {
    use crate::engine::tests::utils::departure;

    let mut engine = engine_with(
        vec![arrival(100, 1, 600), departure(200, 2, 900)],
        vec![standard("Ada", "ada@example.com"), flyer("Fay", "fay@example.com")],
    );

    engine
        .book("ada@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();
    engine
        .book("ada@example.com", Direction::Departure, 0, seat("1:A"))
        .unwrap();

    engine
        .book("fay@example.com", Direction::Departure, 0, seat("1:A"))
        .unwrap();

    let ada = engine.roster.find("ada@example.com").unwrap();
    // only the departure leg moved; the arrival seat on QFA100 is untouched
    assert_eq!(seat("1:A"), ada.booking(Direction::Arrival).unwrap().seat);
    assert_eq!(seat("1:B"), ada.booking(Direction::Departure).unwrap().seat);
}

#[test]
fn test_displaced_traveller_never_lands_on_the_vacated_seat() {
    // Only 1:A and 1:C start free, so the replacement search falls through
    // to the row-major sweep, which must not revisit the seat being handed
    // over.
    let mut engine = engine_with(
        vec![arrival(100, 1, 600)],
        vec![standard("Ada", "ada@example.com"), flyer("Fay", "fay@example.com")],
    );
    for s in every_seat() {
        if s != seat("1:A") && s != seat("1:C") {
            engine.registry.occupy_seat("QFA100", s);
        }
    }

    engine
        .book("ada@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();
    let booked = engine
        .book("fay@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();

    assert_eq!(seat("1:A"), booked);
    assert_eq!("Fay", engine.occupant("QFA100", seat("1:A")).unwrap().name);
    let ada = engine.roster.find("ada@example.com").unwrap();
    assert_eq!(seat("1:C"), ada.booking(Direction::Arrival).unwrap().seat);
    assert!(engine.registry.is_seat_occupied("QFA100", seat("1:C")));
}

#[test]
fn test_orphaned_occupancy_is_freed_and_taken() {
    let mut engine = engine_with(
        vec![arrival(100, 1, 600)],
        vec![flyer("Fay", "fay@example.com")],
    );

    // an occupancy entry with no traveller behind it
    engine.registry.occupy_seat("QFA100", seat("3:C"));

    let booked = engine
        .book("fay@example.com", Direction::Arrival, 0, seat("3:C"))
        .unwrap();
    assert_eq!(seat("3:C"), booked);
    assert_eq!("Fay", engine.occupant("QFA100", seat("3:C")).unwrap().name);
}

#[test]
fn test_full_cabin_rejects_standard_traveller() {
    let mut engine = engine_with(
        vec![arrival(100, 1, 600)],
        vec![standard("Ben", "ben@example.com")],
    );
    for s in every_seat() {
        engine.registry.occupy_seat("QFA100", s);
    }

    assert_eq!(
        Err(BookingError::CabinFull),
        engine.book("ben@example.com", Direction::Arrival, 0, seat("5:B"))
    );
}

#[test]
fn test_full_cabin_rejects_frequent_flyer_too() {
    let mut engine = engine_with(
        vec![arrival(100, 1, 600)],
        vec![flyer("Fay", "fay@example.com")],
    );
    for s in every_seat() {
        engine.registry.occupy_seat("QFA100", s);
    }

    assert_eq!(
        Err(BookingError::CabinFull),
        engine.book("fay@example.com", Direction::Arrival, 0, seat("5:B"))
    );
}

#[test]
fn test_staff_book_under_the_non_displacing_policy() {
    let mut engine = engine_with(
        vec![arrival(100, 1, 600)],
        vec![standard("Ada", "ada@example.com"), staff("Sam", "sam@example.com")],
    );

    engine
        .book("ada@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();

    // staff accounts may book, but they do not displace anyone
    assert_eq!(
        Err(BookingError::SeatTaken(seat("1:A"))),
        engine.book("sam@example.com", Direction::Arrival, 0, seat("1:A"))
    );
    assert!(engine
        .book("sam@example.com", Direction::Arrival, 0, seat("1:B"))
        .is_ok());
}

#[test]
fn test_seats_are_per_flight() {
    let mut engine = engine_with(
        vec![arrival(100, 1, 600), arrival(101, 2, 700)],
        vec![standard("Ada", "ada@example.com"), standard("Ben", "ben@example.com")],
    );

    engine
        .book("ada@example.com", Direction::Arrival, 0, seat("1:A"))
        .unwrap();
    // same seat coordinates on a different flight are free
    assert!(engine
        .book("ben@example.com", Direction::Arrival, 1, seat("1:A"))
        .is_ok());
}
