// LogSieve - core/filter.rs
//
// Field-equality and date-range filtering of parsed log records.
// All constraints are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::model::{Field, LogRecord};
use crate::util::constants;
use crate::util::error::FilterError;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Inclusive timestamp bounds expanded from two calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// `00:00:00` on the first day.
    pub from: NaiveDateTime,
    /// `23:59:59` on the last day.
    pub to: NaiveDateTime,
}

impl DateRange {
    /// Parse `"YYYY-MM-DD YYYY-MM-DD"` into full-day bounds.
    ///
    /// A reversed range is accepted; it simply matches nothing.
    pub fn parse(value: &str) -> Result<Self, FilterError> {
        let invalid = |reason: String| FilterError::InvalidDateRange {
            value: value.to_string(),
            reason,
        };

        let parts: Vec<&str> = value.split_whitespace().collect();
        let [from_raw, to_raw] = parts.as_slice() else {
            return Err(invalid(format!("expected 2 dates, found {}", parts.len())));
        };

        let parse_day = |raw: &str| {
            NaiveDate::parse_from_str(raw, constants::DATE_FORMAT)
                .map_err(|e| invalid(format!("'{raw}' is not a YYYY-MM-DD date ({e})")))
        };
        let from_day = parse_day(*from_raw)?;
        let to_day = parse_day(*to_raw)?;

        let from = from_day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| invalid(format!("cannot expand '{from_raw}' to start of day")))?;
        let to = to_day
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| invalid(format!("cannot expand '{to_raw}' to end of day")))?;

        if from > to {
            tracing::warn!(
                from = %from_day,
                to = %to_day,
                "Date range is reversed; no records will match"
            );
        }

        Ok(Self { from, to })
    }

    /// Whether `timestamp` lies within the bounds, both ends inclusive.
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.from <= *timestamp && *timestamp <= self.to
    }
}

/// Complete set of constraints for one run. Built once, then read-only.
///
/// String constraints are stored already normalised (label prefix stripped,
/// lowercased) so matching each record is a plain comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    fields: BTreeMap<Field, String>,
    date_range: Option<DateRange>,
}

impl FilterSpec {
    /// Build a spec from `(name, value)` pairs.
    ///
    /// Fails on the first unknown field name or invalid date range, before
    /// any record is looked at. A later pair for the same field replaces an
    /// earlier one.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = Self::default();
        for (name, value) in pairs {
            spec.insert(name.as_ref(), value.as_ref())?;
        }
        Ok(spec)
    }

    /// Add one constraint by field name.
    ///
    /// `date_range` takes `"YYYY-MM-DD YYYY-MM-DD"`. Any other name must be a
    /// filterable field: `loglevel`, `session_id`, `business_id` or
    /// `request_id`. A `-` in the name is read as `_`.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), FilterError> {
        // CLI spellings use `-` where field names use `_`.
        let canonical = name.replace('-', "_");
        if canonical == constants::DATE_RANGE_FILTER {
            self.date_range = Some(DateRange::parse(value)?);
            return Ok(());
        }

        let field: Field = name.parse()?;
        if !field.is_filterable() {
            return Err(FilterError::UnknownFilterField {
                field: name.to_string(),
            });
        }

        self.fields.insert(field, normalise_value(value));
        Ok(())
    }

    /// Returns true if no constraints are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.date_range.is_none()
    }

    /// Number of constraints, counting the date range as one.
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.date_range.is_some())
    }

    /// Check whether a record satisfies every constraint.
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(ref range) = self.date_range {
            if !range.contains(&record.timestamp) {
                return false;
            }
        }

        self.fields
            .iter()
            .all(|(field, expected)| record.get(*field).to_lowercase() == *expected)
    }
}

/// Strip a `LABEL:` prefix (everything up to and including the first `:`)
/// and lowercase the remainder.
fn normalise_value(raw: &str) -> String {
    let value = match raw.split_once(':') {
        Some((_, rest)) => rest,
        None => raw,
    };
    value.to_lowercase()
}
