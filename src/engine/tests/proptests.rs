use crate::engine::tests::utils::{arb_seat, arrival, departure, engine_with, flyer, standard};
use crate::flight::Direction;
use crate::seat::{self, CABIN_CAPACITY};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn test_allocator_complete_and_deterministic(
        occupied in prop::collection::hash_set(arb_seat(), 0..CABIN_CAPACITY),
        requested in arb_seat(),
    ) {
        // fewer than 40 occupied seats: a free seat always exists
        let found = seat::next_available(&occupied, requested);
        prop_assert!(found.is_some());
        let found = found.unwrap();
        prop_assert!(!occupied.contains(&found));

        // same snapshot, same answer
        prop_assert_eq!(Some(found), seat::next_available(&occupied, requested));
    }

    #[test]
    fn test_booking_invariants_hold_under_random_sequences(
        ops in prop::collection::vec(
            (0..6usize, any::<bool>(), 0..2usize, arb_seat()),
            1..40,
        )
    ) {
        let mut engine = engine_with(
            vec![
                arrival(100, 1, 600),
                arrival(101, 2, 700),
                departure(200, 3, 900),
                departure(201, 4, 1000),
            ],
            vec![
                standard("T1", "t1@example.com"),
                standard("T2", "t2@example.com"),
                standard("T3", "t3@example.com"),
                flyer("F1", "f1@example.com"),
                flyer("F2", "f2@example.com"),
                flyer("F3", "f3@example.com"),
            ],
        );
        let emails = ["t1", "t2", "t3", "f1", "f2", "f3"]
            .map(|t| format!("{}@example.com", t));

        for (who, is_arrival, index, requested) in ops {
            let direction = if is_arrival { Direction::Arrival } else { Direction::Departure };
            // rejected attempts must leave no state behind, accepted ones
            // must keep every invariant below
            let _ = engine.book(&emails[who], direction, index, requested);
        }

        let mut held = HashSet::new();
        for traveller in engine.roster.travellers() {
            for booking in [&traveller.arrival, &traveller.departure].into_iter().flatten() {
                let key = (booking.flight.flight_code(), booking.seat);

                // seat exclusivity across travellers
                prop_assert!(
                    held.insert(key.clone()),
                    "seat {} on {} held twice", key.1, key.0
                );

                // every booking is backed by an occupancy entry
                prop_assert!(
                    engine.registry.is_seat_occupied(&key.0, key.1),
                    "booking for {} seat {} missing from occupancy", key.0, key.1
                );
            }

            // strict arrival-before-departure ordering
            if let (Some(arr), Some(dep)) = (&traveller.arrival, &traveller.departure) {
                prop_assert!(
                    arr.flight.when < dep.flight.when,
                    "{} arrives {} but departs {}",
                    traveller.name, arr.flight.when, dep.flight.when
                );
            }
        }
    }
}
