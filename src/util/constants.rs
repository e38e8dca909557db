// LogSieve - util/constants.rs
//
// Single source of truth for named constants, formats, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogSieve";

/// Application identifier used for the platform config directory.
pub const APP_ID: &str = "LogSieve";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Line grammar
// =============================================================================

/// chrono format of the timestamp column, also used when formatting records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// chrono format of each half of a `date_range` filter value.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column labels, case-sensitive.
pub const SESSION_LABEL: &str = "SID:";
pub const BUSINESS_LABEL: &str = "BID:";
pub const REQUEST_LABEL: &str = "RID:";

/// Line emitted in place of a malformed line under `MalformedPolicy::Marker`.
pub const MALFORMED_LINE_MARKER: &str = "Invalid log line";

// =============================================================================
// Filtering
// =============================================================================

/// Filter name of the special inclusive day-granularity date constraint.
pub const DATE_RANGE_FILTER: &str = "date_range";

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Kept at `warn` so diagnostics on stderr stay quiet
/// during normal filtering runs.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Maximum length of a log line included in diagnostics and error messages.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

/// Log levels accepted by `[logging] level` in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Profiling
// =============================================================================

/// Decimal places used when printing profiler timings (seconds).
pub const PROFILE_TIME_PRECISION: usize = 8;
