//! Environment-driven logging configuration.

use crate::{Format, Level};
use once_cell::sync::Lazy;
use std::env;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `PARAMGUARD_DEBUG`
    pub debug: bool,
    /// `PARAMGUARD_LOG_LEVEL`
    pub level: Level,
    /// `PARAMGUARD_LOG_FORMAT`
    pub format: Format,
    /// `PARAMGUARD_LOG_COLOR`
    pub color: bool,
    /// `PARAMGUARD_LOG_TIMESTAMPS`
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Warn,
            format: Format::Json,
            color: false,
            timestamps: true,
        }
    }
}

fn flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Build the configuration from `PARAMGUARD_*` variables.
    ///
    /// Validation is a library concern, so the default level is `warn`:
    /// per-field verdicts only show up when `PARAMGUARD_DEBUG=1` or an
    /// explicit level is set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = flag("PARAMGUARD_DEBUG").unwrap_or(defaults.debug);

        let level = env::var("PARAMGUARD_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::from_str(&s))
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("PARAMGUARD_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::from_str(&s))
            .unwrap_or(defaults.format);

        let color = flag("PARAMGUARD_LOG_COLOR")
            .unwrap_or_else(|| env::var("NO_COLOR").is_err() && env::var("TERM").is_ok());

        let timestamps = flag("PARAMGUARD_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps);

        DEBUG_ENABLED.store(debug, Ordering::SeqCst);
        LOG_LEVEL.store(level as u8, Ordering::SeqCst);

        Self {
            debug,
            level,
            format,
            color,
            timestamps,
        }
    }
}

/// Force the environment to be read now instead of on first log call.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// The process-wide configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

/// Whether `PARAMGUARD_DEBUG` (or [`set_debug`]) turned debug output on.
#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether records at `level` would be written.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    Lazy::force(&CONFIG);
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Current minimum level.
pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    Lazy::force(&CONFIG);
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode at runtime. Enabling it lowers the level to `debug`.
pub fn set_debug(enabled: bool) {
    Lazy::force(&CONFIG);
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        LOG_LEVEL.store(Level::Debug as u8, Ordering::SeqCst);
    }
}
