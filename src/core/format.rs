// LogSieve - core/format.rs
//
// Renders a LogRecord back into the canonical one-line form.
// The inverse of core::parser for well-formed lines.

use crate::core::model::LogRecord;
use crate::util::constants;
use std::fmt;

/// Render a record as
/// `YYYY-MM-DD HH:MM:SS LEVEL SID:<sid> BID:<bid> RID:<rid> 'message'`.
pub fn format_record(record: &LogRecord) -> String {
    record.to_string()
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}{} {}{} {}{} '{}'",
            self.timestamp.format(constants::TIMESTAMP_FORMAT),
            self.level,
            constants::SESSION_LABEL,
            self.session_id,
            constants::BUSINESS_LABEL,
            self.business_id,
            constants::REQUEST_LABEL,
            self.request_id,
            self.message,
        )
    }
}
