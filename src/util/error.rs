// LogSieve - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogSieve operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogSieveError {
    /// The line source could not be opened or read.
    Source(SourceError),

    /// A log line could not be parsed (only surfaced under the fail policy).
    Parse(ParseError),

    /// Filter construction failed.
    Filter(FilterError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context (e.g. writing output).
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogSieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Loading log entries failed: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogSieveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

/// Errors produced while opening or streaming the input log file.
#[derive(Debug)]
pub enum SourceError {
    /// The path does not exist or is not a readable file.
    FileNotFound { path: PathBuf, source: io::Error },

    /// Reading failed part-way through the file.
    Read {
        path: PathBuf,
        line_number: u64,
        source: io::Error,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path, source } => {
                write!(f, "cannot open '{}': {source}", path.display())
            }
            Self::Read {
                path,
                line_number,
                source,
            } => write!(
                f,
                "'{}' line {line_number}: read failed: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileNotFound { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
        }
    }
}

impl From<SourceError> for LogSieveError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to log line parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not match the fixed line grammar, or its timestamp
    /// is not a valid calendar date-time.
    MalformedLine {
        /// 1-based line number, 0 when parsed outside a file.
        line_number: u64,
        /// Leading part of the offending line (bounded length).
        preview: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine {
                line_number: 0,
                preview,
            } => write!(f, "malformed log line: '{preview}'"),
            Self::MalformedLine {
                line_number,
                preview,
            } => write!(f, "line {line_number}: malformed log line: '{preview}'"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for LogSieveError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to building a filter specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A constraint names a field the record type does not have.
    UnknownFilterField { field: String },

    /// A date range is not two well-formed `YYYY-MM-DD` dates.
    InvalidDateRange { value: String, reason: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFilterField { field } => write!(
                f,
                "unknown filter field '{field}'. \
                 Expected one of: loglevel, session_id, business_id, request_id, date_range"
            ),
            Self::InvalidDateRange { value, reason } => write!(
                f,
                "invalid date range '{value}': {reason}. Expected \"YYYY-MM-DD YYYY-MM-DD\""
            ),
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for LogSieveError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is not one of the accepted values.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is not recognised. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogSieveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogSieve results.
pub type Result<T> = std::result::Result<T, LogSieveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_source_error_chain_preserved() {
        let err: LogSieveError = SourceError::FileNotFound {
            path: PathBuf::from("missing.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        }
        .into();

        let msg = err.to_string();
        assert!(msg.starts_with("Loading log entries failed"), "{msg}");
        assert!(msg.contains("missing.log"), "{msg}");

        let inner = err.source().expect("top-level error should chain");
        assert!(inner.source().is_some(), "io::Error should be reachable");
    }

    #[test]
    fn test_malformed_line_display_omits_zero_line_number() {
        let err = ParseError::MalformedLine {
            line_number: 0,
            preview: "garbage".to_string(),
        };
        assert_eq!(err.to_string(), "malformed log line: 'garbage'");

        let err = ParseError::MalformedLine {
            line_number: 4,
            preview: "garbage".to_string(),
        };
        assert_eq!(err.to_string(), "line 4: malformed log line: 'garbage'");
    }
}
