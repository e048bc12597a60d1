//! Logging for paramguard
//!
//! A small stderr logger controlled by `PARAMGUARD_*` environment variables,
//! used by the validation engine to report per-field verdicts and by the
//! configuration loaders.
//!
//! # Usage
//!
//! ```rust
//! use paramguard_log::{debug, event, info, Level};
//!
//! debug!("validating {} fields", 3);
//! info!(target: "paramguard::config", "loaded rules from {}", "rules.toml");
//!
//! // Structured fields end up as key=value pairs (or a JSON object).
//! let field = "email";
//! event!(Level::Debug, "field rejected", field = field, kind = "PARAM_HAS_INVALID_EMAIL");
//! ```
//!
//! # Environment Variables
//!
//! - `PARAMGUARD_DEBUG=1` - enable debug logging
//! - `PARAMGUARD_LOG_LEVEL=trace|debug|info|warn|error|off`
//! - `PARAMGUARD_LOG_FORMAT=pretty|compact|json`
//! - `PARAMGUARD_LOG_COLOR=1|0`
//! - `PARAMGUARD_LOG_TIMESTAMPS=1|0`

mod config;
mod level;
mod output;

pub use config::{
    LogConfig, config, current_level, init, is_debug_enabled, is_level_enabled, set_debug,
    set_level,
};
pub use level::{Format, Level};
pub use output::{Fields, log, log_fields};

// ============================================================================
// Macros
// ============================================================================

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log a debug message.
///
/// Written when `PARAMGUARD_DEBUG=1` or the level is `debug` or lower.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log a message with structured `key = value` fields.
///
/// Values only need to implement `Display`; they are not formatted unless
/// the level is enabled.
#[macro_export]
macro_rules! event {
    ($level:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {
        if $crate::is_level_enabled($level) {
            $crate::log_fields(
                $level,
                module_path!(),
                $message,
                &[$((stringify!($key), ($value).to_string())),*],
            );
        }
    };
}

// ============================================================================
// Tracing Integration
// ============================================================================

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! Subscriber that follows the `PARAMGUARD_*` settings.

    use super::*;

    /// Build a `tracing` subscriber filtered at the configured level.
    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let config = config();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_lowercase()));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(config.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macros_compile() {
        trace!("trace message");
        debug!("debug message");
        info!("info message");
        warn!("warn message");
        error!("error message");

        debug!(target: "test", "with target {}", 1);

        let field = "age";
        event!(Level::Debug, "field passed", field = field, checks = 3);
        event!(Level::Trace, "no fields");
    }
}
