//! Conference booking binary
//!
//! Greets the user, takes one booking (or keeps going until sold out with
//! `BOOKING_REPEAT=true`) and exits once every confirmation has been sent.

use booking_core::environment::SystemClock;
use booking_runtime::Store;
use conference_booking::{
    BookingEnvironment, BookingReducer, BookingState, Config, ConsoleConfirmationSender,
    TokenReader, run_session,
};
use std::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr so the dialogue on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conference_booking=info,booking_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        conference = %config.conference_name,
        total_tickets = config.total_tickets,
        confirmation_delay_secs = config.confirmation_delay.as_secs(),
        repeat = config.repeat_until_sold_out,
        "Configuration loaded"
    );

    let env = BookingEnvironment::new(
        SystemClock,
        ConsoleConfirmationSender::new(),
        config.confirmation_delay,
    );
    let store = Store::new(
        BookingState::new(config.total_tickets),
        BookingReducer::new(),
        env,
    );

    let mut input = TokenReader::new(io::stdin().lock());
    let mut out = io::stdout();

    let resolved = run_session(&store, &mut input, &mut out, &config).await?;
    info!(resolved, "Booking session finished");

    Ok(())
}
