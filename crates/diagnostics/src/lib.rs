// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by the dfspath crates
//!
//! Usage:
//! - Set DFSPATH_LOG=off (default) - no logs
//! - Set DFSPATH_LOG=info - namespace mutations (mkdirs, rename, delete)
//! - Set DFSPATH_LOG=debug - every client call and path resolution

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the minimum log level
pub const LOG_ENV: &str = "DFSPATH_LOG";

static INIT: Once = Once::new();

/// Parse a `DFSPATH_LOG` value. `None` means logging stays off.
fn parse_level(value: &str) -> Option<Option<emit::Level>> {
    match value {
        "off" => Some(None),
        "debug" => Some(Some(emit::Level::Debug)),
        "info" => Some(Some(emit::Level::Info)),
        "warn" => Some(Some(emit::Level::Warn)),
        "error" => Some(Some(emit::Level::Error)),
        _ => None,
    }
}

/// Initialize diagnostics based on the DFSPATH_LOG environment variable
///
/// Call once at startup. Later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let level = match parse_level(&value) {
            Some(None) => return,
            Some(Some(level)) => level,
            None => {
                // Bootstrap warning - the emitter isn't running yet
                #[allow(clippy::print_stderr)]
                {
                    eprintln!("Warning: Unknown {LOG_ENV} value '{value}', using 'info'");
                }
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime lives for the rest of the process
        std::mem::forget(rt);
    });
}

/// Log namespace mutations and other operations a user may want to see.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log client calls, path resolution and other internal steps.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log swallowed failures and fallbacks.
///
/// Examples: "exists() check failed, reporting absent", "cleanup stopped early"
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that abort an operation.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("off"), Some(None));
        assert_eq!(parse_level("debug"), Some(Some(emit::Level::Debug)));
        assert_eq!(parse_level("warn"), Some(Some(emit::Level::Warn)));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_init_twice() {
        init_diagnostics();
        init_diagnostics();
    }
}
