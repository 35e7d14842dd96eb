//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::lookup::Departure;

/// Query parameters for a departure lookup.
#[derive(Debug, Deserialize)]
pub struct DeparturesRequest {
    /// Query station name.
    pub station: String,

    /// Reference time in HH:MM (defaults to now).
    pub time: Option<String>,

    /// Schedule day, "weekday" or "holiday" (defaults to auto-detection).
    pub day: Option<String>,
}

/// Query parameters for the current-time departure stream.
#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    /// Query station name.
    pub station: String,
}

/// One departure, formatted for display.
#[derive(Debug, Serialize)]
pub struct DepartureDto {
    /// Zero-padded train sequence number.
    pub number: String,

    /// Tier label.
    pub tier: String,

    /// Destination label.
    pub destination: String,

    /// Departure at the query station, HH:MM.
    pub departure: String,

    /// Arrival at the end of the line, HH:MM.
    pub arrival: String,

    /// Arrival platform.
    pub platform: u8,

    /// Whether the train continues past the end of the line.
    pub through: bool,

    /// Connection arrival for through trains, HH:MM.
    pub through_arrival: Option<String>,
}

impl From<&Departure> for DepartureDto {
    fn from(d: &Departure) -> Self {
        Self {
            number: format!("{:04}", d.number),
            tier: d.tier.as_str().to_string(),
            destination: d.destination.clone(),
            departure: d.departure.to_string(),
            arrival: d.arrival.to_string(),
            platform: d.platform,
            through: d.through,
            through_arrival: d.through_arrival.map(|t| t.to_string()),
        }
    }
}

/// Response for a departure lookup.
#[derive(Debug, Serialize)]
pub struct DeparturesResponse {
    /// The query station.
    pub station: String,

    /// Which schedule answered the query.
    pub day_type: String,

    /// The reference time the lookup ran against, HH:MM.
    pub reference_time: String,

    /// The next departures, ordered by arrival at the end of the line.
    pub departures: Vec<DepartureDto>,
}

/// One station in the stations listing.
#[derive(Debug, Serialize)]
pub struct StationDto {
    pub name: String,

    /// Rapid services stop here.
    pub rapid_stop: bool,

    /// Shown as a shortcut button.
    pub major: bool,

    /// Valid as a query station (everything but the final station).
    pub selectable: bool,
}

/// Response for the stations listing.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationDto>,

    /// The end-of-line station departures are sorted against.
    pub convergence: String,

    /// Where through trains connect onward.
    pub through_destination: String,

    /// The station recorded from the previous session, if still valid.
    pub last_selected: Option<String>,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
