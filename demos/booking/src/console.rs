//! Console dialogue: prompts, token input and human-readable output.
//!
//! Everything here is generic over `BufRead` / `Write` so sessions can be
//! scripted in tests.

use crate::coordinator::BookingOutcome;
use crate::types::BookingRequest;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// Errors from the console dialogue
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Reading input or writing output failed
    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Whitespace-delimited token reader
///
/// Each prompt consumes one token, wherever the line breaks fall.
#[derive(Debug)]
pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl<R: BufRead> TokenReader<R> {
    /// Wrap a buffered reader
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Whether a read has hit the end of the input
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Next token, or `None` once the input is exhausted
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if reading fails.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            let mut line = String::new();
            if self.exhausted || self.reader.read_line(&mut line)? == 0 {
                self.exhausted = true;
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

/// Print the welcome banner
///
/// # Errors
///
/// Returns [`ConsoleError::Io`] if writing fails.
pub fn greet<W: Write>(
    out: &mut W,
    conference_name: &str,
    total_tickets: u32,
    remaining: u32,
) -> Result<(), ConsoleError> {
    writeln!(out, "Welcome to the {conference_name} booking application")?;
    writeln!(
        out,
        "We have a total of {total_tickets} tickets of which {remaining} remain"
    )?;
    writeln!(out, "Get your tickets here to attend")?;
    Ok(())
}

/// Prompt for and read one booking request
///
/// An answer missing because the input ended reads as empty, and a ticket
/// count that is not a number reads as zero. Both are left for the
/// validator to reject.
///
/// # Errors
///
/// Returns [`ConsoleError::Io`] on I/O failure.
pub fn read_request<R: BufRead, W: Write>(
    input: &mut TokenReader<R>,
    out: &mut W,
) -> Result<BookingRequest, ConsoleError> {
    let first_name = answer(input, out, "Enter your first name: ")?;
    let last_name = answer(input, out, "Enter your last name: ")?;
    let email = answer(input, out, "Enter your email address: ")?;
    let tickets = answer(input, out, "Enter the number of tickets you want: ")?;

    Ok(BookingRequest {
        first_name,
        last_name,
        email,
        tickets: parse_tickets(&tickets),
    })
}

/// Print how a request was resolved
///
/// `first_names` is the ledger's first-name listing after the request.
///
/// # Errors
///
/// Returns [`ConsoleError::Io`] if writing fails.
pub fn render_outcome<W: Write>(
    out: &mut W,
    outcome: &BookingOutcome,
    first_names: &[String],
    conference_name: &str,
) -> Result<(), ConsoleError> {
    match outcome {
        BookingOutcome::Accepted {
            booking,
            remaining,
            fully_booked,
        } => {
            writeln!(
                out,
                "Thank you {} {} for booking {} ticket(s). You will receive a confirmation email at {}",
                booking.first_name, booking.last_name, booking.tickets, booking.email
            )?;
            writeln!(out, "{remaining} tickets are remaining for {conference_name}")?;
            writeln!(
                out,
                "These are all our bookings (first names only): [{}]",
                first_names.join(" ")
            )?;
            if *fully_booked {
                writeln!(out, "Our conference is fully booked. Come back next year.")?;
            }
        },
        BookingOutcome::Rejected { verdict } => {
            for rejection in verdict.rejections() {
                writeln!(out, "{rejection}")?;
            }
        },
    }
    Ok(())
}

fn prompt<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out, "{text}")?;
    out.flush()
}

fn answer<R: BufRead, W: Write>(
    input: &mut TokenReader<R>,
    out: &mut W,
    text: &str,
) -> io::Result<String> {
    prompt(out, text)?;
    Ok(input.next_token()?.unwrap_or_else(|| {
        debug!(prompt = text.trim_end(), "Input exhausted, answer left empty");
        String::new()
    }))
}

fn parse_tickets(raw: &str) -> u32 {
    raw.parse().unwrap_or_else(|_| {
        debug!(input = %raw, "Ticket count is not a number");
        0
    })
}
