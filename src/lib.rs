//! Cloud complexity evaluator: assigns each technology category a tier,
//! prices the requested quantities and rolls them up into a report that can
//! be printed or exported.
pub mod calculator;
pub mod catalog;
pub mod error;
pub mod export;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging on stderr. `RUST_LOG` overrides the default `warn`
/// level so the interactive output stays readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
