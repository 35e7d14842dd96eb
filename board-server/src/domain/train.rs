//! A single scheduled service.

use super::stop::StopTime;
use super::tier::{Destination, Tier};
use super::time::ServiceTime;

/// One scheduled train.
///
/// The `stops` vector is parallel to the line's station sequence: entry
/// `i` is the cell for station `i`. Trains are immutable once generated,
/// except for the single renumbering pass that runs after the full set is
/// sorted by arrival at the convergence station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    /// Sequence number, 1-based in convergence-arrival order.
    pub number: u16,
    /// Service pattern.
    pub tier: Tier,
    /// Line terminus or through destination.
    pub destination: Destination,
    /// Per-station cells, parallel to the line's station sequence.
    pub stops: Vec<StopTime>,
    /// Arrival platform at the convergence station.
    pub platform: u8,
    /// Arrival past the terminus, for through services only.
    pub through_arrival: Option<ServiceTime>,
}

impl Train {
    /// The sequence number in its zero-padded wire form.
    pub fn number_padded(&self) -> String {
        format!("{:04}", self.number)
    }

    /// The departure time at a station index, if the train stops there.
    pub fn departure_at(&self, index: usize) -> Option<ServiceTime> {
        self.stops.get(index).and_then(StopTime::time)
    }
}
