//! Capacity ledger: remaining tickets and the confirmed bookings.

use crate::types::Booking;
use serde::{Deserialize, Serialize};

/// Remaining capacity and the bookings that consumed it
///
/// Invariant: `remaining + sum(bookings.tickets) == total`. The ledger is
/// only written through [`CapacityLedger::commit`], after the request has
/// been validated against [`CapacityLedger::remaining`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLedger {
    total: u32,
    remaining: u32,
    bookings: Vec<Booking>,
}

impl CapacityLedger {
    /// Create a ledger with the full capacity available
    #[must_use]
    pub const fn new(total: u32) -> Self {
        Self {
            total,
            remaining: total,
            bookings: Vec::new(),
        }
    }

    /// Capacity the ledger started with
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Tickets still available
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether no tickets are left
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.remaining == 0
    }

    /// Confirmed bookings in commit order
    #[must_use]
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Record a booking and take its tickets out of the remaining capacity
    ///
    /// # Panics
    ///
    /// Panics if the booking asks for more tickets than remain. Callers
    /// validate against [`CapacityLedger::remaining`] first, so this is a
    /// programming error rather than a user error.
    pub fn commit(&mut self, booking: Booking) {
        assert!(
            booking.tickets <= self.remaining,
            "commit of {} tickets exceeds remaining capacity {}",
            booking.tickets,
            self.remaining
        );

        self.remaining -= booking.tickets;
        self.bookings.push(booking);
    }

    /// First names of all bookings, in commit order
    #[must_use]
    pub fn first_names(&self) -> Vec<&str> {
        self.bookings
            .iter()
            .map(|booking| booking.first_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookingRequest;
    use booking_core::environment::Clock;
    use booking_testing::test_clock;
    use proptest::prelude::*;

    fn booking(first: &str, tickets: u32) -> Booking {
        Booking::from_request(
            BookingRequest::new(first, "Smith", "someone@x.com", tickets),
            test_clock().now(),
        )
    }

    #[test]
    fn test_new_ledger() {
        let ledger = CapacityLedger::new(50);

        assert_eq!(ledger.total(), 50);
        assert_eq!(ledger.remaining(), 50);
        assert!(ledger.bookings().is_empty());
        assert!(ledger.first_names().is_empty());
        assert!(!ledger.is_sold_out());
    }

    #[test]
    fn test_commit_decrements_and_appends() {
        let mut ledger = CapacityLedger::new(50);
        let anna = booking("Anna", 2);

        ledger.commit(anna.clone());

        assert_eq!(ledger.remaining(), 48);
        assert_eq!(ledger.bookings().len(), 1);
        assert_eq!(ledger.bookings().last(), Some(&anna));
    }

    #[test]
    fn test_first_names_preserve_order() {
        let mut ledger = CapacityLedger::new(50);
        ledger.commit(booking("Anna", 2));
        assert_eq!(ledger.first_names(), vec!["Anna"]);

        ledger.commit(booking("Ben", 1));
        ledger.commit(booking("Cleo", 3));

        assert_eq!(ledger.first_names(), vec!["Anna", "Ben", "Cleo"]);
    }

    #[test]
    fn test_commit_exact_remaining_sells_out() {
        let mut ledger = CapacityLedger::new(3);

        ledger.commit(booking("Anna", 3));

        assert_eq!(ledger.remaining(), 0);
        assert!(ledger.is_sold_out());
    }

    #[test]
    #[should_panic(expected = "exceeds remaining capacity")]
    fn test_overcommit_panics() {
        let mut ledger = CapacityLedger::new(1);
        ledger.commit(booking("Anna", 2));
    }

    proptest! {
        #[test]
        fn prop_commit_preserves_capacity(requests in proptest::collection::vec(1u32..10, 0..20)) {
            let mut ledger = CapacityLedger::new(50);

            for tickets in requests {
                if tickets > ledger.remaining() {
                    continue;
                }
                let before = ledger.remaining();
                let count = ledger.bookings().len();

                ledger.commit(booking("Anna", tickets));

                prop_assert_eq!(ledger.remaining(), before - tickets);
                prop_assert_eq!(ledger.bookings().len(), count + 1);
            }

            let booked: u32 = ledger.bookings().iter().map(|b| b.tickets).sum();
            prop_assert_eq!(ledger.remaining() + booked, ledger.total());
        }
    }
}
