//! Log output for the batch jobs

use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber
///
/// Progress lines go to stdout. `RUST_LOG` overrides the default `info` level
/// (e.g. `RUST_LOG=debug` also lists every refreshed image).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stdout)
                .with_target(false)
                .compact(),
        )
        .init();
}
