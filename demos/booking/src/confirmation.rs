//! Delayed confirmation dispatch.
//!
//! Each accepted booking is handed to the store as an effect that waits for
//! the configured delay, then passes a [`Confirmation`] to the
//! [`ConfirmationSender`] and reports back with
//! [`BookingAction::ConfirmationSent`].

use crate::coordinator::BookingAction;
use crate::types::Booking;
use booking_core::effect::Effect;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// A confirmation ready to be delivered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Destination address
    pub email: String,
    /// Ticket text, e.g. `2 tickets for Anna Smith`
    pub ticket: String,
}

/// A booking captured at dispatch time, waiting for its confirmation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingConfirmation {
    booking: Booking,
}

impl PendingConfirmation {
    /// Capture a committed booking
    #[must_use]
    pub const fn new(booking: Booking) -> Self {
        Self { booking }
    }

    /// The captured booking
    #[must_use]
    pub const fn booking(&self) -> &Booking {
        &self.booking
    }

    /// Build the message to deliver
    #[must_use]
    pub fn into_confirmation(self) -> Confirmation {
        Confirmation {
            ticket: self.booking.ticket_summary(),
            email: self.booking.email,
        }
    }
}

/// Output sink for confirmations
///
/// Delivery cannot fail. A real transport would need retry handling here.
pub trait ConfirmationSender: Send + Sync {
    /// Deliver a confirmation
    fn send_confirmation(&self, confirmation: &Confirmation) -> impl Future<Output = ()> + Send;
}

/// Console confirmation sender.
///
/// Prints confirmations to stdout instead of emailing them.
#[derive(Clone, Debug, Default)]
pub struct ConsoleConfirmationSender;

impl ConsoleConfirmationSender {
    /// Create a new console confirmation sender.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConfirmationSender for ConsoleConfirmationSender {
    async fn send_confirmation(&self, confirmation: &Confirmation) {
        info!(
            to = %confirmation.email,
            ticket = %confirmation.ticket,
            "Confirmation sent"
        );
        println!("#######################");
        println!(
            "Sending ticket {} to the email address {}",
            confirmation.ticket, confirmation.email
        );
        println!("#######################");
    }
}

/// Describe the delayed send of one confirmation as an effect
///
/// The store registers the effect with its completion barrier before
/// spawning it, so a process that waits on the barrier cannot exit before
/// the confirmation is out.
pub fn dispatch<S>(
    pending: PendingConfirmation,
    sender: &S,
    delay: Duration,
) -> Effect<BookingAction>
where
    S: ConfirmationSender + Clone + 'static,
{
    let sender = sender.clone();
    debug!(
        email = %pending.booking().email,
        delay_ms = delay.as_millis(),
        "Dispatching confirmation"
    );

    Effect::future(async move {
        tokio::time::sleep(delay).await;

        let confirmation = pending.into_confirmation();
        sender.send_confirmation(&confirmation).await;
        metrics::counter!("confirmations.sent").increment(1);

        Some(BookingAction::ConfirmationSent { confirmation })
    })
}
