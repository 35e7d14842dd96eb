//! Clock values for a single service day.
//!
//! The timetable records times as zero-padded "HHMM" strings measured in
//! minutes since midnight of the service day. A service day runs past
//! midnight: a through arrival can land at "2403", and a reference time
//! taken just after midnight may be compared as hour 24 or 25. These are
//! not calendar-aware datetimes; `chrono` enters only at the boundary
//! where the wall clock is read.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Highest hour a serialized time cell may carry.
///
/// Covers through arrivals just past 24:00 and next-day-shifted reference
/// times up to 25:59, with headroom. Anything at or beyond this is treated
/// as malformed data.
const MAX_HOUR: u16 = 30;

/// Error returned when parsing an invalid time value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A scheduled time, in minutes since midnight of the service day.
///
/// Supports hours beyond 23 for service that runs past midnight.
///
/// # Examples
///
/// ```
/// use board_server::domain::ServiceTime;
///
/// let t = ServiceTime::parse_hhmm("0805").unwrap();
/// assert_eq!(t.minutes(), 8 * 60 + 5);
/// assert_eq!(t.hhmm(), "0805");
/// assert_eq!(t.to_string(), "08:05");
///
/// // Past-midnight arrivals are valid
/// let late = ServiceTime::parse_hhmm("2403").unwrap();
/// assert_eq!(late.minutes(), 24 * 60 + 3);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime {
    minutes: u16,
}

impl ServiceTime {
    /// Create a time from minutes since midnight.
    ///
    /// Returns an error if the value is at or beyond hour 30.
    pub fn from_minutes(minutes: u16) -> Result<Self, TimeError> {
        if minutes >= MAX_HOUR * 60 {
            return Err(TimeError::new("beyond the service day"));
        }
        Ok(Self { minutes })
    }

    /// Create a time from hour and minute components.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, TimeError> {
        if hour >= MAX_HOUR {
            return Err(TimeError::new("hour beyond the service day"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Parse a zero-padded "HHMM" wire value.
    ///
    /// # Examples
    ///
    /// ```
    /// use board_server::domain::ServiceTime;
    ///
    /// assert!(ServiceTime::parse_hhmm("0000").is_ok());
    /// assert!(ServiceTime::parse_hhmm("2359").is_ok());
    /// assert!(ServiceTime::parse_hhmm("2505").is_ok());
    ///
    /// assert!(ServiceTime::parse_hhmm("805").is_err());
    /// assert!(ServiceTime::parse_hhmm("08:05").is_err());
    /// assert!(ServiceTime::parse_hhmm("0860").is_err());
    /// assert!(ServiceTime::parse_hhmm("3000").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        if bytes.len() != 4 {
            return Err(TimeError::new("expected HHMM format"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[2..4])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute)
    }

    /// Minutes since midnight of the service day.
    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    /// The hour component (may exceed 23).
    pub fn hour(&self) -> u16 {
        self.minutes / 60
    }

    /// The minute component (0-59).
    pub fn minute(&self) -> u16 {
        self.minutes % 60
    }

    /// The zero-padded "HHMM" wire form.
    pub fn hhmm(&self) -> String {
        format!("{:02}{:02}", self.hour(), self.minute())
    }

    /// Add minutes, failing past the end of the representable day.
    pub fn checked_add_minutes(self, minutes: u16) -> Option<Self> {
        Self::from_minutes(self.minutes.checked_add(minutes)?).ok()
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A caller-supplied reference time for a departure query.
///
/// This is a plain wall-clock hour and minute. How it compares against
/// timetable entries depends on the early-morning rollover mode: with
/// rollover on, hours below 2 belong to the *previous* service day for
/// comparison purposes (01:30 compares as 25:30), so a query just after
/// midnight still matches late trains recorded past hour 24. Display is
/// unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefTime {
    hour: u8,
    minute: u8,
}

impl RefTime {
    /// Create a reference time from wall-clock components.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Take the reference time from a wall clock reading.
    pub fn from_clock(time: NaiveTime) -> Self {
        // NaiveTime components are always in range
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Parse a "HH:MM" string, as submitted by a time input.
    ///
    /// # Examples
    ///
    /// ```
    /// use board_server::domain::RefTime;
    ///
    /// let t = RefTime::parse("08:00").unwrap();
    /// assert_eq!(t.to_string(), "08:00");
    ///
    /// assert!(RefTime::parse("0800").is_err());
    /// assert!(RefTime::parse("24:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::new(hour as u32, minute as u32)
    }

    /// Minutes since midnight on the comparison epoch.
    ///
    /// With `rollover` set, hours below 2 are shifted by 24 hours so that
    /// early-morning queries compare against the tail of the previous
    /// service day.
    pub fn epoch_minutes(&self, rollover: bool) -> u16 {
        let hour = if rollover && self.hour < 2 {
            self.hour as u16 + 24
        } else {
            self.hour as u16
        };
        hour * 60 + self.minute as u16
    }
}

impl fmt::Display for RefTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl PartialOrd for RefTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RefTime {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.hour, self.minute).cmp(&(other.hour, other.minute))
    }
}

/// Parse two ASCII digit bytes into a u16.
fn parse_two_digits(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)? as u16;
    let d2 = (bytes[1] as char).to_digit(10)? as u16;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = ServiceTime::parse_hhmm("0000").unwrap();
        assert_eq!(t.minutes(), 0);

        let t = ServiceTime::parse_hhmm("2359").unwrap();
        assert_eq!(t.minutes(), 23 * 60 + 59);

        let t = ServiceTime::parse_hhmm("0805").unwrap();
        assert_eq!(t.hour(), 8);
        assert_eq!(t.minute(), 5);
    }

    #[test]
    fn parse_past_midnight() {
        let t = ServiceTime::parse_hhmm("2403").unwrap();
        assert_eq!(t.minutes(), 1443);
        assert_eq!(t.hhmm(), "2403");

        assert!(ServiceTime::parse_hhmm("2959").is_ok());
        assert!(ServiceTime::parse_hhmm("3000").is_err());
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ServiceTime::parse_hhmm("805").is_err());
        assert!(ServiceTime::parse_hhmm("08050").is_err());
        assert!(ServiceTime::parse_hhmm("08:05").is_err());
        assert!(ServiceTime::parse_hhmm("ab05").is_err());
        assert!(ServiceTime::parse_hhmm("08a5").is_err());
        assert!(ServiceTime::parse_hhmm("").is_err());
        assert!(ServiceTime::parse_hhmm("-").is_err());
        assert!(ServiceTime::parse_hhmm("->").is_err());
    }

    #[test]
    fn parse_invalid_minute() {
        assert!(ServiceTime::parse_hhmm("0860").is_err());
        assert!(ServiceTime::parse_hhmm("0899").is_err());
    }

    #[test]
    fn display_and_wire_forms() {
        let t = ServiceTime::from_hm(9, 5).unwrap();
        assert_eq!(t.to_string(), "09:05");
        assert_eq!(t.hhmm(), "0905");

        let late = ServiceTime::from_hm(24, 3).unwrap();
        assert_eq!(late.to_string(), "24:03");
        assert_eq!(late.hhmm(), "2403");
    }

    #[test]
    fn ordering_by_minutes() {
        let a = ServiceTime::from_hm(8, 0).unwrap();
        let b = ServiceTime::from_hm(8, 5).unwrap();
        let c = ServiceTime::from_hm(24, 0).unwrap();

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn checked_add() {
        let t = ServiceTime::from_hm(23, 58).unwrap();
        let t2 = t.checked_add_minutes(5).unwrap();
        assert_eq!(t2.hhmm(), "2403");

        let end = ServiceTime::from_hm(29, 59).unwrap();
        assert!(end.checked_add_minutes(1).is_none());
    }

    #[test]
    fn ref_time_parse() {
        let t = RefTime::parse("08:30").unwrap();
        assert_eq!(t.to_string(), "08:30");

        assert!(RefTime::parse("0830").is_err());
        assert!(RefTime::parse("8:30").is_err());
        assert!(RefTime::parse("24:00").is_err());
        assert!(RefTime::parse("12:60").is_err());
    }

    #[test]
    fn ref_time_epoch_without_rollover() {
        let t = RefTime::new(1, 30).unwrap();
        assert_eq!(t.epoch_minutes(false), 90);
    }

    #[test]
    fn ref_time_epoch_with_rollover() {
        // Hours below 2 shift by a day
        let t = RefTime::new(0, 30).unwrap();
        assert_eq!(t.epoch_minutes(true), 24 * 60 + 30);

        let t = RefTime::new(1, 59).unwrap();
        assert_eq!(t.epoch_minutes(true), 25 * 60 + 59);

        // Hour 2 is the first unshifted hour
        let t = RefTime::new(2, 0).unwrap();
        assert_eq!(t.epoch_minutes(true), 120);
    }

    #[test]
    fn ref_time_display_unaffected_by_rollover() {
        let t = RefTime::new(1, 15).unwrap();
        assert_eq!(t.to_string(), "01:15");
    }

    #[test]
    fn ref_time_from_clock() {
        let clock = NaiveTime::from_hms_opt(14, 42, 31).unwrap();
        let t = RefTime::from_clock(clock);
        assert_eq!(t.to_string(), "14:42");
    }
}
