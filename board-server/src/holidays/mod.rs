//! National holiday calendar.
//!
//! The published calendar is a CSV whose first field per line is a date
//! in `YYYY/M/D` form, month and day not zero-padded. Only the dates
//! matter here; they are normalized into a set used for weekday/holiday
//! schedule selection.

mod client;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

pub use client::{HolidayClient, HolidayClientConfig};

/// Errors raised while obtaining the holiday calendar.
#[derive(Debug, thiserror::Error)]
pub enum HolidayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("calendar fetch failed with status {status}")]
    Api { status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The set of national holidays.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    dates: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    /// An empty calendar: only weekends classify as holidays.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse calendar text line by line.
    ///
    /// Each line's first comma-separated field is expected to be a
    /// `YYYY/M/D` date. Lines that do not parse (headers, trailing
    /// garbage, encoding remnants) are skipped, not errors.
    pub fn parse(text: &str) -> Self {
        let mut dates = HashSet::new();

        for line in text.lines() {
            let raw = line.trim();
            if raw.is_empty() {
                continue;
            }

            let Some(date_field) = raw.split(',').next() else {
                continue;
            };

            let mut parts = date_field.split('/');
            let (Some(y), Some(m), Some(d), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                continue;
            };

            let (Ok(y), Ok(m), Ok(d)) = (y.parse(), m.parse(), d.parse()) else {
                continue;
            };

            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                dates.insert(date);
            }
        }

        debug!(count = dates.len(), "parsed holiday calendar");
        Self { dates }
    }

    /// Load and parse a local calendar file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HolidayError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Whether a date is a national holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
