//! Admissibility rules for booking requests.
//!
//! Validation never fails: it produces a [`ValidationVerdict`] with one flag
//! per rule. Rejection is an expected outcome, so it is modelled as data
//! rather than as an error.

use crate::types::BookingRequest;
use booking_core::SmallVec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length of each name field, in UTF-8 bytes
pub const MIN_NAME_LEN: usize = 2;

/// A violated admissibility rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// First or last name is too short
    InvalidName,
    /// Email does not look like an address
    InvalidEmail,
    /// Ticket count is zero or exceeds the remaining capacity
    InvalidTicketCount,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => write!(f, "The name you entered is too short."),
            Self::InvalidEmail => write!(f, "The email you entered is in an incorrect format."),
            Self::InvalidTicketCount => {
                write!(f, "The number of tickets you entered is invalid.")
            },
        }
    }
}

/// Outcome of validating one request
///
/// The three flags are independent; a request is admissible only when all
/// of them hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // One flag per independent rule
pub struct ValidationVerdict {
    /// Both names are at least [`MIN_NAME_LEN`] bytes long
    pub name_valid: bool,
    /// Email contains `@` and `.com`
    pub email_valid: bool,
    /// `1 <= tickets <= remaining`
    pub tickets_valid: bool,
}

impl ValidationVerdict {
    /// Whether every rule holds
    #[must_use]
    pub const fn is_admissible(&self) -> bool {
        self.name_valid && self.email_valid && self.tickets_valid
    }

    /// Violated rules, in name / email / tickets order
    #[must_use]
    pub fn rejections(&self) -> SmallVec<[Rejection; 3]> {
        let mut rejections = SmallVec::new();
        if !self.name_valid {
            rejections.push(Rejection::InvalidName);
        }
        if !self.email_valid {
            rejections.push(Rejection::InvalidEmail);
        }
        if !self.tickets_valid {
            rejections.push(Rejection::InvalidTicketCount);
        }
        rejections
    }
}

/// Validate a request against the remaining capacity
///
/// Pure: the same inputs always give the same verdict.
///
/// The email rule is a loose heuristic (an `@` and a `.com` anywhere in the
/// text), not address validation.
#[must_use]
pub fn validate(request: &BookingRequest, remaining: u32) -> ValidationVerdict {
    ValidationVerdict {
        name_valid: name_is_valid(&request.first_name) && name_is_valid(&request.last_name),
        email_valid: request.email.contains('@') && request.email.contains(".com"),
        tickets_valid: request.tickets >= 1 && request.tickets <= remaining,
    }
}

fn name_is_valid(name: &str) -> bool {
    name.len() >= MIN_NAME_LEN
}
