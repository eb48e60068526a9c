//! Logging setup.
//!
//! Logs go to stderr through `tracing-subscriber`; stdout is reserved for the
//! report and the prediction line. `RUST_LOG` overrides the verbosity flag.
//! Colours are only used when stderr is a terminal.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,house_price={level}")));

    let ansi = std::io::stderr().is_terminal();
    let _ = build_subscriber(filter, std::io::stderr, ansi).try_init();
}

fn build_subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(ansi))
        .with(filter)
}
