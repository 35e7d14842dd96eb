//! Departure board server for a single commuter rail line.
//!
//! Answers: "from this station, at this time, which are the next trains
//! to the end of the line, and on which platform do they arrive?"
//!
//! The timetable itself is produced offline by the `generate-timetable`
//! binary and loaded from CSV at startup.

pub mod domain;
pub mod generator;
pub mod holidays;
pub mod line;
pub mod lookup;
pub mod session;
pub mod timetable;
pub mod web;
