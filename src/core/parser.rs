// LogSieve - core/parser.rs
//
// Line grammar: turns one raw log line into a LogRecord.
// Core layer: operates on &str only, never touches the filesystem.
//
// Grammar (single-space separated, case-sensitive labels):
//
//   <YYYY-MM-DD HH:MM:SS> <LEVEL> SID:<digits> BID:<digits> RID:<word> '<message>'
//
// The message runs from the first quote after the RID column to the last
// quote on the line. Quotes in between belong to the message verbatim.

use crate::core::model::LogRecord;
use crate::util::constants;
use crate::util::error::ParseError;
use chrono::{NaiveDateTime, Timelike};
use regex::Regex;
use std::sync::OnceLock;

/// Compiled line grammar, built on first use.
fn line_pattern() -> &'static Regex {
    static LINE_PATTERN: OnceLock<Regex> = OnceLock::new();
    LINE_PATTERN.get_or_init(|| {
        // Pattern is covered by the unit tests below, so a mistake here shows
        // up as a failing test rather than a runtime panic.
        Regex::new(concat!(
            r"^(?P<timestamp>[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2})",
            r" (?P<level>\w+)",
            r" SID:(?P<session_id>[0-9]+)",
            r" BID:(?P<business_id>[0-9]+)",
            r" RID:(?P<request_id>\w+)",
            r" '(?P<message>.+)'$",
        ))
        .expect("line grammar: invalid regex")
    })
}

/// Parse a single log line that did not come from a numbered source.
///
/// Equivalent to `parse_numbered_line(line, 0)`.
pub fn parse_line(line: &str) -> Result<LogRecord, ParseError> {
    parse_numbered_line(line, 0)
}

/// Parse a single log line, attaching `line_number` (1-based) to any error.
///
/// Trailing whitespace, including a `\r\n` or `\n` terminator, is ignored.
/// A line either matches completely or is rejected; there are no partial
/// records. A line whose timestamp matches the column shape but is not a
/// real calendar date-time (e.g. month 13) is also rejected.
pub fn parse_numbered_line(line: &str, line_number: u64) -> Result<LogRecord, ParseError> {
    let trimmed = line.trim_end();

    let caps = line_pattern()
        .captures(trimmed)
        .ok_or_else(|| malformed(trimmed, line_number))?;

    // All groups are mandatory in the pattern, so a successful match always
    // carries every one of them.
    let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

    let timestamp = NaiveDateTime::parse_from_str(group("timestamp"), constants::TIMESTAMP_FORMAT)
        .map_err(|_| malformed(trimmed, line_number))?;
    // chrono reads second 60 as a leap second; the log format has none.
    if timestamp.nanosecond() >= 1_000_000_000 {
        return Err(malformed(trimmed, line_number));
    }

    Ok(LogRecord {
        timestamp,
        level: group("level").to_string(),
        session_id: group("session_id").to_string(),
        business_id: group("business_id").to_string(),
        request_id: group("request_id").to_string(),
        message: group("message").to_string(),
    })
}

/// Build a `MalformedLine` error with a bounded preview of the line.
fn malformed(line: &str, line_number: u64) -> ParseError {
    ParseError::MalformedLine {
        line_number,
        preview: line
            .chars()
            .take(constants::DEBUG_MAX_LINE_PREVIEW)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str =
        "2012-09-13 16:04:22 DEBUG SID:34523 BID:1329 RID:65d33 'Starting new session'";

    #[test]
    fn test_parse_all_fields() {
        let record = parse_line(SAMPLE).unwrap();
        assert_eq!(
            record.timestamp,
            NaiveDate::from_ymd_opt(2012, 9, 13)
                .unwrap()
                .and_hms_opt(16, 4, 22)
                .unwrap()
        );
        assert_eq!(record.level, "DEBUG");
        assert_eq!(record.session_id, "34523");
        assert_eq!(record.business_id, "1329");
        assert_eq!(record.request_id, "65d33");
        assert_eq!(record.message, "Starting new session");
    }

    #[test]
    fn test_trailing_newline_not_in_message() {
        let record = parse_line(&format!("{SAMPLE}\n")).unwrap();
        assert_eq!(record.message, "Starting new session");

        let record = parse_line(&format!("{SAMPLE}\r\n")).unwrap();
        assert_eq!(record.message, "Starting new session");
    }

    #[test]
    fn test_level_is_not_validated() {
        let line = "2012-09-13 16:04:22 TRACE_2 SID:1 BID:2 RID:x 'm'";
        assert_eq!(parse_line(line).unwrap().level, "TRACE_2");
    }

    #[test]
    fn test_embedded_quotes_last_quote_closes() {
        let line = "2012-09-13 16:04:22 INFO SID:1 BID:2 RID:r1 'user 'bob' logged in'";
        assert_eq!(parse_line(line).unwrap().message, "user 'bob' logged in");
    }

    #[test]
    fn test_swapped_date_format_is_malformed() {
        let line = "13-09-2012 16:04:22 DEBUG SID:34523 BID:1329 RID:65d33 'Starting'";
        assert!(matches!(
            parse_line(line),
            Err(ParseError::MalformedLine { .. })
        ));
    }

    #[test]
    fn test_impossible_calendar_date_is_malformed() {
        let line = "2012-13-40 16:04:22 DEBUG SID:34523 BID:1329 RID:65d33 'Starting'";
        assert!(parse_line(line).is_err());
    }

    #[test]
    fn test_leap_second_is_malformed() {
        let line = "2012-09-16 23:59:60 INFO SID:1 BID:1 RID:a 'leap'";
        assert!(matches!(
            parse_line(line),
            Err(ParseError::MalformedLine { .. })
        ));
        let last = "2012-09-16 23:59:59 INFO SID:1 BID:1 RID:a 'last'";
        assert!(parse_line(last).is_ok());
    }

    #[test]
    fn test_lowercase_label_is_malformed() {
        let line = "2012-09-13 16:04:22 DEBUG sid:34523 BID:1329 RID:65d33 'Starting'";
        assert!(parse_line(line).is_err());
    }

    #[test]
    fn test_non_numeric_session_id_is_malformed() {
        let line = "2012-09-13 16:04:22 DEBUG SID:3452a BID:1329 RID:65d33 'Starting'";
        assert!(parse_line(line).is_err());
    }

    #[test]
    fn test_missing_or_empty_message_is_malformed() {
        assert!(parse_line("2012-09-13 16:04:22 DEBUG SID:1 BID:2 RID:3").is_err());
        assert!(parse_line("2012-09-13 16:04:22 DEBUG SID:1 BID:2 RID:3 ''").is_err());
        assert!(parse_line("2012-09-13 16:04:22 DEBUG SID:1 BID:2 RID:3 'unterminated").is_err());
    }

    #[test]
    fn test_trailing_content_after_message_is_malformed() {
        let line = format!("{SAMPLE} extra");
        assert!(parse_line(&line).is_err());
    }

    #[test]
    fn test_error_carries_line_number_and_bounded_preview() {
        let long = "x".repeat(constants::DEBUG_MAX_LINE_PREVIEW * 2);
        match parse_numbered_line(&long, 7) {
            Err(ParseError::MalformedLine {
                line_number,
                preview,
            }) => {
                assert_eq!(line_number, 7);
                assert_eq!(preview.len(), constants::DEBUG_MAX_LINE_PREVIEW);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_line_is_malformed() {
        assert!(parse_line("").is_err());
    }
}
