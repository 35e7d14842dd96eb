//! Weekday / holiday schedule selection.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};

use crate::holidays::HolidayCalendar;

/// Which of the two timetables a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Holiday,
}

impl DayType {
    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Holiday => "holiday",
        }
    }

    /// Parse a day-type label, as submitted in a query parameter.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekday" => Some(DayType::Weekday),
            "holiday" => Some(DayType::Holiday),
            _ => None,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the current moment into a schedule day.
///
/// The service day runs until 02:00 of the following calendar day, so
/// the clock is shifted back two hours before classification: at 01:30
/// on a Saturday the Friday weekday schedule is still in force. National
/// holidays take precedence over the weekday rule; Saturdays and Sundays
/// count as holidays.
pub fn classify_day(now: NaiveDateTime, holidays: &HolidayCalendar) -> DayType {
    let shifted = now - Duration::hours(2);
    let date = shifted.date();

    if holidays.contains(date) {
        return DayType::Holiday;
    }

    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayType::Holiday,
        _ => DayType::Weekday,
    }
}
