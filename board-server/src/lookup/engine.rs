//! The departure lookup itself.

use crate::domain::{RefTime, ServiceTime, Tier};
use crate::line::LineConfig;
use crate::timetable::Timetable;

use super::config::LookupConfig;

/// Error returned for a query the engine cannot answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("station {0} is not in the timetable")]
    UnknownStation(String),
}

/// One upcoming departure, fully resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Train sequence number.
    pub number: u16,
    /// Service tier.
    pub tier: Tier,
    /// Destination display name.
    pub destination: String,
    /// Departure at the query station.
    pub departure: ServiceTime,
    /// Arrival at the convergence station.
    pub arrival: ServiceTime,
    /// Arrival platform at the convergence station.
    pub platform: u8,
    /// Whether the train continues past the line's own terminus.
    pub through: bool,
    /// Arrival past the terminus, for through trains.
    pub through_arrival: Option<ServiceTime>,
}

/// The next departures from a station, ordered by convergence arrival.
///
/// Querying the convergence station itself is not an error; it simply
/// has no onward departures, so the result is empty. Trains are eligible
/// when they actually stop at the query station (no marker cell) at or
/// after the reference time, and their convergence arrival resolves; a
/// train failing any of these is skipped, never an error.
///
/// The result is a pure function of (timetable, station, reference
/// time, config): querying twice yields identical output.
pub fn next_departures(
    table: &Timetable,
    line: &LineConfig,
    station: &str,
    at: RefTime,
    config: &LookupConfig,
) -> Result<Vec<Departure>, LookupError> {
    if station == line.convergence().name {
        return Ok(Vec::new());
    }

    let station_col = table
        .station_column(station)
        .ok_or_else(|| LookupError::UnknownStation(station.to_string()))?;
    let convergence_col = table.station_column(&line.convergence().name);

    let reference = at.epoch_minutes(config.early_morning_rollover);

    let mut candidates: Vec<Departure> = table
        .trains()
        .iter()
        .filter_map(|train| {
            let departure = train.departure_at(station_col)?;
            // Inclusive lower bound: a train departing exactly at the
            // reference time is still catchable
            if departure.minutes() < reference {
                return None;
            }

            let arrival = train.departure_at(convergence_col?)?;

            Some(Departure {
                number: train.number,
                tier: train.tier,
                destination: if train.destination.is_through() {
                    line.through().destination.clone()
                } else {
                    line.convergence().name.clone()
                },
                departure,
                arrival,
                platform: train.platform,
                through: train.destination.is_through(),
                through_arrival: train.through_arrival,
            })
        })
        .collect();

    candidates.sort_by_key(|d| d.arrival.minutes());
    candidates.truncate(config.max_results);

    Ok(candidates)
}
