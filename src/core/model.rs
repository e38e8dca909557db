// LogSieve - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::FilterError;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Log Record (output of parsing)
// =============================================================================

/// A single parsed log line.
///
/// Created fresh for each line that matches the line grammar and discarded
/// once it has been filtered and formatted. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Calendar date-time, second precision, no timezone.
    pub timestamp: NaiveDateTime,

    /// Level token as written (e.g. `DEBUG`). Not validated against a set.
    pub level: String,

    /// Digits following `SID:`. Kept as text; never used arithmetically.
    pub session_id: String,

    /// Digits following `BID:`.
    pub business_id: String,

    /// Word characters following `RID:`.
    pub request_id: String,

    /// Text between the structural single quotes.
    pub message: String,
}

impl LogRecord {
    /// Look up a string-valued field by its closed name.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LogLevel => &self.level,
            Field::SessionId => &self.session_id,
            Field::BusinessId => &self.business_id,
            Field::RequestId => &self.request_id,
            Field::Message => &self.message,
        }
    }
}

// =============================================================================
// Field names
// =============================================================================

/// The string-valued fields of a `LogRecord` that can be addressed by name.
///
/// `timestamp` is absent: it is only reachable through the
/// `date_range` filter, which compares date-times rather than text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    LogLevel,
    SessionId,
    BusinessId,
    RequestId,
    Message,
}

impl Field {
    /// Returns all variants in column order.
    pub fn all() -> &'static [Field] {
        &[
            Field::LogLevel,
            Field::SessionId,
            Field::BusinessId,
            Field::RequestId,
            Field::Message,
        ]
    }

    /// Canonical snake_case name, as accepted by `from_str`.
    pub fn name(&self) -> &'static str {
        match self {
            Field::LogLevel => "loglevel",
            Field::SessionId => "session_id",
            Field::BusinessId => "business_id",
            Field::RequestId => "request_id",
            Field::Message => "message",
        }
    }

    /// Whether the field may carry an equality filter constraint.
    pub fn is_filterable(&self) -> bool {
        !matches!(self, Field::Message)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FilterError;

    /// Names are case-sensitive; `-` is accepted in place of `_` so that
    /// CLI-style spellings (`business-id`) resolve too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.replace('-', "_");
        Field::all()
            .iter()
            .copied()
            .find(|field| field.name() == normalised)
            .ok_or_else(|| FilterError::UnknownFilterField {
                field: s.to_string(),
            })
    }
}

// =============================================================================
// Malformed line policy
// =============================================================================

/// How the pipeline treats a line that does not match the line grammar.
///
/// Applied uniformly for a whole run. Only consulted when a filter is active;
/// unfiltered runs pass raw lines through without parsing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Drop the line and continue.
    #[default]
    Skip,

    /// Emit the `Invalid log line` sentinel in place of the line and continue.
    Marker,

    /// Abort the run with a `MalformedLine` error.
    Fail,
}

impl MalformedPolicy {
    /// Lowercase name used in config.toml and on the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            MalformedPolicy::Skip => "skip",
            MalformedPolicy::Marker => "marker",
            MalformedPolicy::Fail => "fail",
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(MalformedPolicy::Skip),
            "marker" => Ok(MalformedPolicy::Marker),
            "fail" => Ok(MalformedPolicy::Fail),
            other => Err(format!(
                "unknown malformed-line policy '{other}' (expected skip, marker or fail)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_record() -> LogRecord {
        LogRecord {
            timestamp: NaiveDate::from_ymd_opt(2012, 9, 13)
                .unwrap()
                .and_hms_opt(16, 4, 22)
                .unwrap(),
            level: "DEBUG".to_string(),
            session_id: "34523".to_string(),
            business_id: "1329".to_string(),
            request_id: "65d33".to_string(),
            message: "Starting new session".to_string(),
        }
    }

    #[test]
    fn test_field_lookup_by_name() {
        let record = make_record();
        let field: Field = "business_id".parse().unwrap();
        assert_eq!(record.get(field), "1329");
        assert_eq!(record.get("request-id".parse().unwrap()), "65d33");
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::all() {
            assert_eq!(field.name().parse::<Field>().unwrap(), *field);
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = "hostname".parse::<Field>().unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownFilterField {
                field: "hostname".to_string()
            }
        );
        // Names are case-sensitive.
        assert!("LogLevel".parse::<Field>().is_err());
    }

    #[test]
    fn test_message_is_not_filterable() {
        assert!(!Field::Message.is_filterable());
        assert!(Field::SessionId.is_filterable());
    }

    #[test]
    fn test_malformed_policy_parse() {
        assert_eq!("skip".parse::<MalformedPolicy>(), Ok(MalformedPolicy::Skip));
        assert_eq!("MARKER".parse::<MalformedPolicy>(), Ok(MalformedPolicy::Marker));
        assert_eq!("fail".parse::<MalformedPolicy>(), Ok(MalformedPolicy::Fail));
        assert!("ignore".parse::<MalformedPolicy>().is_err());
        assert_eq!(MalformedPolicy::default(), MalformedPolicy::Skip);
    }
}
