//! Domain types for conference booking.
//!
//! Value objects that flow through the coordinator: the raw request read
//! from the console and the confirmed booking held by the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// A booking request as entered by the user
///
/// Not validated. Consumed by [`crate::validation::validate`] and, if
/// admissible, turned into a [`Booking`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Destination for the confirmation
    pub email: String,
    /// Number of tickets requested
    pub tickets: u32,
}

impl BookingRequest {
    /// Creates a new booking request
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        tickets: u32,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            tickets,
        }
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// A confirmed booking
///
/// Only created from a request that passed validation. Never mutated after
/// it is committed to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Destination for the confirmation
    pub email: String,
    /// Number of tickets booked
    pub tickets: u32,
    /// When the booking was committed
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    /// Confirm an admissible request at the given time
    #[must_use]
    pub fn from_request(request: BookingRequest, booked_at: DateTime<Utc>) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            tickets: request.tickets,
            booked_at,
        }
    }

    /// Ticket description used in confirmations, e.g. `2 tickets for Anna Smith`
    #[must_use]
    pub fn ticket_summary(&self) -> String {
        format!(
            "{} tickets for {} {}",
            self.tickets, self.first_name, self.last_name
        )
    }
}
