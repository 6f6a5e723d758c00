#![deny(missing_docs)]
//! Shared logging utilities for the docchat workspace.
//!
//! This crate provides the `docchat_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::sync::Once;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! docchat_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! docchat_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! docchat_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! docchat_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! docchat_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

static TEST_INIT: Once = Once::new();

/// Initializes a simple terminal logger for use in tests.
///
/// Safe to call from every test: only the first call installs a logger, and
/// it no-ops if another logger has already been set.
pub fn initialize_for_tests() {
    TEST_INIT.call_once(|| {
        use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

        // Use debug level in debug builds, info in release builds.
        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };

        let _ = CombinedLogger::init(vec![TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )]);
    });
}
