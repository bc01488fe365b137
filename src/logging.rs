//! Logging setup
//!
//! The crate logs through the `log` facade: emitted SQL and row counts at
//! debug level, bound parameter values at trace level. Binaries and tests
//! pick a backend; these helpers install `env_logger`.

use log::{LevelFilter, SetLoggerError};

/// Initialize logging from `RUST_LOG`
pub fn init_logging() -> Result<(), SetLoggerError> {
    env_logger::try_init()
}

/// Initialize logging with a fixed level, ignoring `RUST_LOG`
pub fn init_logging_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new().filter_level(level).try_init()
}
