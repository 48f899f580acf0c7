// SPDX-License-Identifier: MPL-2.0
//! Tracing setup for the overlay daemon.
//!
//! Verbosity maps to a level filter (0=error .. 4+=trace); `RUST_LOG`
//! overrides it when set.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Initialize the global tracing subscriber.
pub fn init(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("glowtoast={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent_enough_for_tests() {
        // The first call may win or lose the race with other tests; either
        // way a second call must report the conflict instead of panicking.
        let _ = init(2);
        assert!(init(2).is_err());
    }
}
