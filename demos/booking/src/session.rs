//! Booking session: the console dialogue driven through the store.
//!
//! [`run_cycle`] handles exactly one request. [`run_session`] greets the
//! user, runs one cycle (or keeps cycling until sold out or out of input
//! when configured), and only returns once every dispatched confirmation
//! has been delivered.

use crate::config::Config;
use crate::confirmation::ConfirmationSender;
use crate::console::{self, ConsoleError, TokenReader};
use crate::coordinator::{BookingAction, BookingEnvironment, BookingOutcome, BookingReducer, BookingState};
use booking_core::environment::Clock;
use booking_runtime::{Store, StoreError};
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::info;

/// Store specialised to the booking coordinator
pub type BookingStore<C, S> =
    Store<BookingState, BookingAction, BookingEnvironment<C, S>, BookingReducer<C, S>>;

/// Errors that end a booking session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Console input or output failed
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// The store refused the request or the shutdown wait expired
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The reducer handled `Submit` without recording an outcome
    ///
    /// `BookingReducer` always records one, so this only surfaces if that
    /// contract is broken.
    #[error("Reducer recorded no outcome for the submitted request")]
    Unresolved,
}

/// Read one request, resolve it and print the result
///
/// Answers missing from exhausted input read as empty and are rejected by
/// the validator. The confirmation for an accepted booking keeps running in
/// the background; callers wait for it through the store.
///
/// # Errors
///
/// Returns [`SessionError`] if the console fails or the store is shutting
/// down.
pub async fn run_cycle<C, S, R, W>(
    store: &BookingStore<C, S>,
    input: &mut TokenReader<R>,
    out: &mut W,
    conference_name: &str,
) -> Result<BookingOutcome, SessionError>
where
    C: Clock + Clone + 'static,
    S: ConfirmationSender + Clone + 'static,
    R: BufRead,
    W: Write,
{
    let request = console::read_request(input, out)?;
    store.send(BookingAction::Submit(request)).await?;

    let (outcome, first_names) = store
        .state(|s| {
            let first_names: Vec<String> = s
                .ledger
                .first_names()
                .into_iter()
                .map(str::to_owned)
                .collect();
            (s.last_outcome.clone(), first_names)
        })
        .await;
    let outcome = outcome.ok_or(SessionError::Unresolved)?;

    console::render_outcome(out, &outcome, &first_names, conference_name)?;
    Ok(outcome)
}

/// Run a whole booking session and wait for outstanding confirmations
///
/// Returns the number of requests resolved.
///
/// # Errors
///
/// Returns [`SessionError`] if the console fails, or if a configured
/// shutdown timeout expires with confirmations still pending.
pub async fn run_session<C, S, R, W>(
    store: &BookingStore<C, S>,
    input: &mut TokenReader<R>,
    out: &mut W,
    config: &Config,
) -> Result<usize, SessionError>
where
    C: Clock + Clone + 'static,
    S: ConfirmationSender + Clone + 'static,
    R: BufRead,
    W: Write,
{
    let remaining = store.state(|s| s.ledger.remaining()).await;
    console::greet(out, &config.conference_name, config.total_tickets, remaining)?;

    let mut resolved = 0;
    loop {
        run_cycle(store, input, out, &config.conference_name).await?;
        resolved += 1;

        if !config.repeat_until_sold_out
            || input.is_exhausted()
            || store.state(|s| s.ledger.is_sold_out()).await
        {
            break;
        }
    }

    info!(
        resolved,
        pending_confirmations = store.pending_effects(),
        "Waiting for outstanding confirmations"
    );
    store.shutdown(config.shutdown_timeout).await?;

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_names_the_reducer_contract() {
        assert_eq!(
            SessionError::Unresolved.to_string(),
            "Reducer recorded no outcome for the submitted request"
        );
    }
}
