//! Date parsing for `Date` typed properties
//!
//! Values are tried as RFC 3339 first, then against each configured chrono
//! format. A format is tried as offset-aware, then as a naive date-time, then as
//! a bare date; naive values are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

#[derive(Debug, Clone)]
pub struct DateParser {
    formats: Vec<String>,
}

impl DateParser {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    /// Parse `value`, or `None` if no format matches
    pub fn parse(&self, value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.with_timezone(&Utc));
        }

        for format in &self.formats {
            if let Ok(parsed) = DateTime::parse_from_str(value, format) {
                return Some(parsed.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                    return Some(Utc.from_utc_datetime(&midnight));
                }
            }
        }
        None
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(crate::config::PostConfig::default().date_formats)
    }
}
