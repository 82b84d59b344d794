//=========================================================================
// Logging
//=========================================================================
//
// One-call `env_logger` setup for binaries built on the engine.
//
// The engine only emits through the `log` facade. Targets in use:
//   engine, game, scene, platform, platform::input, render, resources
//
// `RUST_LOG` overrides the default filter, e.g.
//   RUST_LOG=info,game=debug,platform::input=trace
//
//=========================================================================

//=== External Dependencies ===============================================

use log::SetLoggerError;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global logger. Later calls are ignored.
pub fn init() {
    // Err only means a logger is already installed.
    let _ = try_init();
}

/// Installs the global logger, reporting whether one was already set.
pub fn try_init() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .try_init()?;

    log::debug!(target: "engine", "Logging initialized");
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================
