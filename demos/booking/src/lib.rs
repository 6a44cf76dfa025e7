//! # Conference Booking
//!
//! A console booking desk for a single conference, built on the reducer
//! architecture.
//!
//! This crate showcases:
//! - Pure validation with independent, co-occurring rejection reasons
//! - A capacity ledger written only by the reducer (single writer)
//! - Delayed confirmations dispatched as effects
//! - A completion barrier that keeps the process alive until every
//!   confirmation is out
//!
//! ## Architecture
//!
//! ```text
//! console ──Submit──▶ Store ──▶ BookingReducer ──▶ validate
//!                                   │                 │
//!                                   │◀── verdict ─────┘
//!                                   ├─ ledger.commit
//!                                   └─ dispatch ──▶ (delay) ──▶ ConfirmationSender
//!                                                        └─ ConfirmationSent ──▶ Store
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use booking_core::environment::SystemClock;
//! use conference_booking::{
//!     BookingAction, BookingEnvironment, BookingReducer, BookingRequest, BookingState,
//!     ConsoleConfirmationSender,
//! };
//! use booking_runtime::Store;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), booking_runtime::StoreError> {
//! let env = BookingEnvironment::new(
//!     SystemClock,
//!     ConsoleConfirmationSender::new(),
//!     Duration::from_secs(5),
//! );
//! let store = Store::new(BookingState::new(50), BookingReducer::new(), env);
//!
//! store
//!     .send(BookingAction::Submit(BookingRequest::new("Anna", "Smith", "anna@x.com", 2)))
//!     .await?;
//! assert_eq!(store.state(|s| s.ledger.remaining()).await, 48);
//!
//! store.wait_for_effects().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod confirmation;
pub mod console;
pub mod coordinator;
pub mod ledger;
pub mod mocks;
pub mod session;
pub mod types;
pub mod validation;

pub use config::Config;
pub use confirmation::{Confirmation, ConfirmationSender, ConsoleConfirmationSender, PendingConfirmation};
pub use console::{ConsoleError, TokenReader};
pub use coordinator::{BookingAction, BookingEnvironment, BookingOutcome, BookingReducer, BookingState};
pub use ledger::CapacityLedger;
pub use session::{BookingStore, SessionError, run_cycle, run_session};
pub use types::{Booking, BookingRequest};
pub use validation::{Rejection, ValidationVerdict, validate};
