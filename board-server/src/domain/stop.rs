//! Per-station timetable cells.

use std::fmt;

use super::time::{ServiceTime, TimeError};

/// Wire marker for a station the train has not yet reached.
pub const MARKER_NOT_REACHED: &str = "-";

/// Wire marker for a station a rapid service passes without stopping.
pub const MARKER_PASSES: &str = "->";

/// The value a train's row holds for one station.
///
/// A cell is either a concrete departure time or one of two sentinels:
/// the station lies before the train's origin, or a rapid service runs
/// through it without stopping. The sentinels exist as enum variants;
/// their textual markers (`-` and `->`) appear only in the CSV form.
///
/// # Examples
///
/// ```
/// use board_server::domain::StopTime;
///
/// let cell = StopTime::parse_field("0805").unwrap();
/// assert_eq!(cell.time().unwrap().hhmm(), "0805");
///
/// assert_eq!(StopTime::parse_field("-").unwrap(), StopTime::NotReached);
/// assert_eq!(StopTime::parse_field("->").unwrap(), StopTime::Passes);
/// assert_eq!(StopTime::Passes.to_field(), "->");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopTime {
    /// The train departs this station at the given time.
    At(ServiceTime),
    /// The station is before the train's origin.
    NotReached,
    /// A rapid service passes through without stopping.
    Passes,
}

impl StopTime {
    /// The concrete time, if the train actually stops here.
    pub fn time(&self) -> Option<ServiceTime> {
        match self {
            StopTime::At(t) => Some(*t),
            StopTime::NotReached | StopTime::Passes => None,
        }
    }

    /// Serialize to the CSV cell form.
    pub fn to_field(&self) -> String {
        match self {
            StopTime::At(t) => t.hhmm(),
            StopTime::NotReached => MARKER_NOT_REACHED.to_string(),
            StopTime::Passes => MARKER_PASSES.to_string(),
        }
    }

    /// Parse a CSV cell: a marker or a zero-padded HHMM time.
    pub fn parse_field(s: &str) -> Result<Self, TimeError> {
        match s {
            MARKER_NOT_REACHED => Ok(StopTime::NotReached),
            MARKER_PASSES => Ok(StopTime::Passes),
            other => ServiceTime::parse_hhmm(other).map(StopTime::At),
        }
    }
}

impl fmt::Display for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopTime::At(t) => t.fmt(f),
            StopTime::NotReached => f.write_str(MARKER_NOT_REACHED),
            StopTime::Passes => f.write_str(MARKER_PASSES),
        }
    }
}
