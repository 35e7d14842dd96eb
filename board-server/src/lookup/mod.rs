//! Departure lookup.
//!
//! Given a loaded timetable, a query station, and a reference time,
//! produce the next departures ordered by arrival at the end of the
//! line. This is the read side of the system; the timetable itself never
//! changes under it.

mod config;
mod day_type;
mod engine;
mod watch;

pub use config::LookupConfig;
pub use day_type::{DayType, classify_day};
pub use engine::{Departure, LookupError, next_departures};
pub use watch::DepartureWatch;
