//! Booking coordinator.
//!
//! The reducer that ties the pieces together: validate a request against the
//! ledger, commit it, and hand the booking to the confirmation dispatcher.
//!
//! ## Flow
//!
//! ```text
//! Submit(request)
//!   ├─ verdict admissible → ledger.commit → Accepted → dispatch effect
//!   │                                                   └─ ConfirmationSent
//!   └─ otherwise          → Rejected (ledger untouched, no effect)
//! ```

use crate::confirmation::{self, Confirmation, ConfirmationSender, PendingConfirmation};
use crate::ledger::CapacityLedger;
use crate::types::{Booking, BookingRequest};
use crate::validation::{self, ValidationVerdict};
use booking_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, info};

// ============================================================================
// State
// ============================================================================

/// How the last request was resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    /// All rules held and the booking was committed
    Accepted {
        /// The committed booking
        booking: Booking,
        /// Capacity left after the commit
        remaining: u32,
        /// This commit took the last ticket
        fully_booked: bool,
    },
    /// At least one rule failed; nothing was committed
    Rejected {
        /// Which rules failed
        verdict: ValidationVerdict,
    },
}

impl BookingOutcome {
    /// Whether the request was accepted
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Coordinator state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingState {
    /// Remaining capacity and confirmed bookings
    pub ledger: CapacityLedger,
    /// Resolution of the most recent request
    pub last_outcome: Option<BookingOutcome>,
    /// Confirmations delivered so far
    pub confirmations: Vec<Confirmation>,
}

impl BookingState {
    /// Fresh state for a conference with `total_tickets` tickets
    #[must_use]
    pub const fn new(total_tickets: u32) -> Self {
        Self {
            ledger: CapacityLedger::new(total_tickets),
            last_outcome: None,
            confirmations: Vec::new(),
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Coordinator actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    /// A request entered by the user
    Submit(BookingRequest),
    /// A dispatched confirmation was delivered
    ConfirmationSent {
        /// What was delivered
        confirmation: Confirmation,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Coordinator dependencies
#[derive(Debug, Clone)]
pub struct BookingEnvironment<C: Clock, S: ConfirmationSender> {
    /// Timestamps committed bookings
    pub clock: C,
    /// Delivers confirmations
    pub sender: S,
    /// Wait before a confirmation is sent
    pub confirmation_delay: Duration,
}

impl<C: Clock, S: ConfirmationSender> BookingEnvironment<C, S> {
    /// Create a new booking environment
    #[must_use]
    pub const fn new(clock: C, sender: S, confirmation_delay: Duration) -> Self {
        Self {
            clock,
            sender,
            confirmation_delay,
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Booking coordinator reducer
///
/// Generic over the clock and sender so tests can inject fixed time and a
/// recording sink.
#[derive(Debug, Clone, Copy)]
pub struct BookingReducer<C, S> {
    _phantom: PhantomData<fn() -> (C, S)>,
}

impl<C, S> BookingReducer<C, S> {
    /// Create a new booking reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<C, S> Default for BookingReducer<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> BookingReducer<C, S>
where
    C: Clock,
    S: ConfirmationSender + Clone + 'static,
{
    fn submit(
        state: &mut BookingState,
        request: BookingRequest,
        env: &BookingEnvironment<C, S>,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        let verdict = validation::validate(&request, state.ledger.remaining());

        if !verdict.is_admissible() {
            info!(
                rejections = ?verdict.rejections(),
                remaining = state.ledger.remaining(),
                "Booking rejected"
            );
            metrics::counter!("bookings.rejected").increment(1);
            state.last_outcome = Some(BookingOutcome::Rejected { verdict });
            return smallvec![Effect::None];
        }

        let booking = Booking::from_request(request, env.clock.now());
        let tickets = booking.tickets;
        state.ledger.commit(booking.clone());

        let remaining = state.ledger.remaining();
        let fully_booked = state.ledger.is_sold_out();
        info!(
            first_name = %booking.first_name,
            tickets,
            remaining,
            fully_booked,
            "Booking accepted"
        );
        metrics::counter!("bookings.accepted").increment(1);
        metrics::counter!("bookings.tickets_sold").increment(u64::from(tickets));

        let effect = confirmation::dispatch(
            PendingConfirmation::new(booking.clone()),
            &env.sender,
            env.confirmation_delay,
        );
        state.last_outcome = Some(BookingOutcome::Accepted {
            booking,
            remaining,
            fully_booked,
        });

        smallvec![effect]
    }
}

impl<C, S> Reducer for BookingReducer<C, S>
where
    C: Clock,
    S: ConfirmationSender + Clone + 'static,
{
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment<C, S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            BookingAction::Submit(request) => Self::submit(state, request, env),
            BookingAction::ConfirmationSent { confirmation } => {
                debug!(email = %confirmation.email, "Confirmation recorded");
                state.confirmations.push(confirmation);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::RecordingConfirmationSender;
    use crate::validation::Rejection;
    use booking_testing::{FixedClock, ReducerTest, assertions, test_clock};

    type TestReducer = BookingReducer<FixedClock, RecordingConfirmationSender>;

    fn test_env() -> BookingEnvironment<FixedClock, RecordingConfirmationSender> {
        BookingEnvironment::new(
            test_clock(),
            RecordingConfirmationSender::new(),
            Duration::from_millis(1),
        )
    }

    fn anna(tickets: u32) -> BookingRequest {
        BookingRequest::new("Anna", "Smith", "anna@x.com", tickets)
    }

    #[test]
    fn test_accepted_request_commits_and_dispatches() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new(50))
            .when_action(BookingAction::Submit(anna(2)))
            .then_state(|state| {
                assert_eq!(state.ledger.remaining(), 48);
                assert_eq!(state.ledger.first_names(), vec!["Anna"]);
                assert_eq!(state.ledger.bookings()[0].booked_at, test_clock().now());

                let Some(BookingOutcome::Accepted {
                    booking,
                    remaining,
                    fully_booked,
                }) = &state.last_outcome
                else {
                    unreachable!("expected an accepted outcome");
                };
                assert_eq!(booking.ticket_summary(), "2 tickets for Anna Smith");
                assert_eq!(*remaining, 48);
                assert!(!fully_booked);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_short_name_is_rejected_without_mutation() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new(50))
            .when_action(BookingAction::Submit(BookingRequest::new(
                "A",
                "Smith",
                "anna@x.com",
                2,
            )))
            .then_state(|state| {
                assert_eq!(state.ledger, CapacityLedger::new(50));
                let Some(BookingOutcome::Rejected { verdict }) = &state.last_outcome else {
                    unreachable!("expected a rejected outcome");
                };
                assert_eq!(verdict.rejections().as_slice(), &[Rejection::InvalidName]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_request_above_capacity_is_rejected() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new(1))
            .when_action(BookingAction::Submit(anna(2)))
            .then_state(|state| {
                assert_eq!(state.ledger.remaining(), 1);
                assert!(state.ledger.bookings().is_empty());
                let Some(BookingOutcome::Rejected { verdict }) = &state.last_outcome else {
                    unreachable!("expected a rejected outcome");
                };
                assert!(!verdict.tickets_valid);
                assert!(verdict.name_valid && verdict.email_valid);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_last_ticket_reports_fully_booked_once() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new(3))
            .when_action(BookingAction::Submit(anna(3)))
            .then_state(|state| {
                assert!(state.ledger.is_sold_out());
                assert!(matches!(
                    state.last_outcome,
                    Some(BookingOutcome::Accepted {
                        remaining: 0,
                        fully_booked: true,
                        ..
                    })
                ));
            })
            .run();

        // A sold-out ledger rejects any further request, so the notice
        // cannot repeat
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new(3))
            .when_action(BookingAction::Submit(anna(3)))
            .when_action(BookingAction::Submit(anna(1)))
            .then_state(|state| {
                assert_eq!(state.ledger.bookings().len(), 1);
                assert!(matches!(
                    state.last_outcome,
                    Some(BookingOutcome::Rejected { .. })
                ));
            })
            .run();
    }

    #[test]
    fn test_confirmation_sent_is_recorded() {
        let confirmation = Confirmation {
            email: "anna@x.com".to_string(),
            ticket: "2 tickets for Anna Smith".to_string(),
        };
        let expected = confirmation.clone();

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new(50))
            .when_action(BookingAction::ConfirmationSent { confirmation })
            .then_state(move |state| {
                assert_eq!(state.confirmations, vec![expected]);
                assert_eq!(state.ledger.remaining(), 50);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_outcome_is_accepted() {
        let rejected = BookingOutcome::Rejected {
            verdict: validation::validate(&anna(0), 50),
        };
        assert!(!rejected.is_accepted());
    }
}
