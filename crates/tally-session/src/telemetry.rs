//! # Telemetry
//!
//! Installs the global `tracing` subscriber.
//!
//! The core crate only emits events; nothing is printed until a binary or
//! test harness calls [`init_tracing`].
//!
//! ## Log Levels
//! ```text
//! RUST_LOG unset ──► info,tally=debug
//!                    (cart edits, stock updates and discount picks at
//!                     debug; checkouts at info; clamps and failed
//!                     saves at warn)
//! RUST_LOG=warn  ──► only warnings
//! ```

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,tally=debug";

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (or [`DEFAULT_FILTER`]).
///
/// Returns `false` if a global subscriber was already installed, which
/// makes repeated calls harmless.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }
}
