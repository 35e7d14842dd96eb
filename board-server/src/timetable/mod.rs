//! The timetable wire format.
//!
//! One CSV file per service-day kind. The header names the fixed columns
//! and one column per station in line order:
//!
//! ```text
//! sequence,tier,destination,<station1>,...,<stationN>,platform,through_arrival
//! ```
//!
//! Time cells are zero-padded HHMM; `-` marks a station not yet reached
//! (and an absent through arrival), `->` a station passed without
//! stopping.
//!
//! Structural problems (wrong column count, unknown tier or destination,
//! bad platform) fail the load. A malformed *time* cell does not: the
//! cell degrades to the not-reached marker with a warning, which makes
//! the affected train ineligible at that station instead of poisoning
//! the whole table.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::warn;

use crate::domain::{Destination, MARKER_NOT_REACHED, ServiceTime, StopTime, Tier, Train};
use crate::line::LineConfig;

/// Fixed columns before the station block.
const HEAD_COLUMNS: [&str; 3] = ["sequence", "tier", "destination"];

/// Fixed columns after the station block.
const TAIL_COLUMNS: [&str; 2] = ["platform", "through_arrival"];

/// Errors raised while reading or writing a timetable file.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header: {reason}")]
    Header { reason: String },

    #[error("invalid row {row}: {reason}")]
    Row { row: usize, reason: String },
}

/// A parsed timetable: the station columns and every train row.
#[derive(Debug, Clone)]
pub struct Timetable {
    stations: Vec<String>,
    trains: Vec<Train>,
}

impl Timetable {
    pub fn new(stations: Vec<String>, trains: Vec<Train>) -> Self {
        Self { stations, trains }
    }

    /// The station column names, in line order.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// All trains, in file order.
    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// The column index of a station name.
    pub fn station_column(&self, name: &str) -> Option<usize> {
        self.stations.iter().position(|s| s == name)
    }

    /// Parse a timetable from CSV text.
    ///
    /// The line configuration resolves destination names; station columns
    /// are taken from the header as-is.
    pub fn parse(text: &str, line: &LineConfig) -> Result<Self, TimetableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let total = headers.len();
        if total < HEAD_COLUMNS.len() + TAIL_COLUMNS.len() + 1 {
            return Err(TimetableError::Header {
                reason: format!("too few columns ({total})"),
            });
        }

        for (i, expected) in HEAD_COLUMNS.iter().enumerate() {
            if &headers[i] != *expected {
                return Err(TimetableError::Header {
                    reason: format!("column {i} is {:?}, expected {expected:?}", &headers[i]),
                });
            }
        }
        for (i, expected) in TAIL_COLUMNS.iter().enumerate() {
            let at = total - TAIL_COLUMNS.len() + i;
            if &headers[at] != *expected {
                return Err(TimetableError::Header {
                    reason: format!("column {at} is {:?}, expected {expected:?}", &headers[at]),
                });
            }
        }

        let stations: Vec<String> = headers
            .iter()
            .skip(HEAD_COLUMNS.len())
            .take(total - HEAD_COLUMNS.len() - TAIL_COLUMNS.len())
            .map(str::to_string)
            .collect();

        let mut trains = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // Header is row 1 in the file
            let row = row + 2;

            if record.len() != total {
                return Err(TimetableError::Row {
                    row,
                    reason: format!("expected {total} fields, found {}", record.len()),
                });
            }

            let number: u16 = record[0].parse().map_err(|_| TimetableError::Row {
                row,
                reason: format!("invalid sequence number {:?}", &record[0]),
            })?;

            let tier = Tier::parse(&record[1]).map_err(|e| TimetableError::Row {
                row,
                reason: e.to_string(),
            })?;

            let destination = if record[2] == *line.through().destination {
                Destination::Through
            } else if record[2] == *line.convergence().name {
                Destination::Terminus
            } else {
                return Err(TimetableError::Row {
                    row,
                    reason: format!("unknown destination {:?}", &record[2]),
                });
            };

            let stops = (0..stations.len())
                .map(|i| {
                    let cell = &record[HEAD_COLUMNS.len() + i];
                    StopTime::parse_field(cell).unwrap_or_else(|e| {
                        warn!(row, station = %stations[i], cell, %e, "bad time cell; train ineligible here");
                        StopTime::NotReached
                    })
                })
                .collect();

            let platform_col = total - 2;
            let platform: u8 = record[platform_col].parse().map_err(|_| TimetableError::Row {
                row,
                reason: format!("invalid platform {:?}", &record[platform_col]),
            })?;

            let through_cell = &record[total - 1];
            let through_arrival = if through_cell == MARKER_NOT_REACHED {
                None
            } else {
                match ServiceTime::parse_hhmm(through_cell) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        warn!(row, cell = through_cell, %e, "bad through-arrival cell; dropped");
                        None
                    }
                }
            };

            trains.push(Train {
                number,
                tier,
                destination,
                stops,
                platform,
                through_arrival,
            });
        }

        Ok(Self { stations, trains })
    }

    /// Load a timetable from a CSV file.
    pub fn load(path: impl AsRef<Path>, line: &LineConfig) -> Result<Self, TimetableError> {
        let mut text = String::new();
        File::open(path)?.read_to_string(&mut text)?;
        Self::parse(&text, line)
    }
}

/// Serialize a train set to CSV.
pub fn write_csv<W: Write>(
    writer: W,
    line: &LineConfig,
    trains: &[Train],
) -> Result<(), TimetableError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = HEAD_COLUMNS.to_vec();
    for station in line.stations() {
        header.push(&station.name);
    }
    header.extend(TAIL_COLUMNS);
    out.write_record(&header)?;

    for train in trains {
        let mut record = Vec::with_capacity(header.len());
        record.push(train.number_padded());
        record.push(train.tier.as_str().to_string());
        record.push(match train.destination {
            Destination::Through => line.through().destination.clone(),
            Destination::Terminus => line.convergence().name.clone(),
        });
        for stop in &train.stops {
            record.push(stop.to_field());
        }
        record.push(train.platform.to_string());
        record.push(
            train
                .through_arrival
                .map_or_else(|| MARKER_NOT_REACHED.to_string(), |t| t.hhmm()),
        );
        out.write_record(&record)?;
    }

    out.flush()?;
    Ok(())
}

/// Serialize a train set to a CSV string.
pub fn to_csv_string(line: &LineConfig, trains: &[Train]) -> Result<String, TimetableError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, line, trains)?;
    // The writer emits UTF-8 only
    Ok(String::from_utf8(buf).expect("CSV output is UTF-8"))
}

/// Write a train set to a CSV file.
pub fn write_csv_file(
    path: impl AsRef<Path>,
    line: &LineConfig,
    trains: &[Train],
) -> Result<(), TimetableError> {
    write_csv(File::create(path)?, line, trains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, generate};
    use crate::line::yokohama_line;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_set_roundtrips() {
        let line = yokohama_line();
        let trains =
            generate(&line, &GeneratorConfig::default(), &mut StdRng::seed_from_u64(21)).unwrap();

        let text = to_csv_string(&line, &trains).unwrap();
        let table = Timetable::parse(&text, &line).unwrap();

        assert_eq!(table.trains(), &trains[..]);
        assert_eq!(table.stations().len(), line.stations().len());
    }

    #[test]
    fn sort_key_survives_the_roundtrip() {
        let line = yokohama_line();
        let conv = line.convergence_index();
        let trains =
            generate(&line, &GeneratorConfig::default(), &mut StdRng::seed_from_u64(22)).unwrap();

        let text = to_csv_string(&line, &trains).unwrap();
        let table = Timetable::parse(&text, &line).unwrap();

        let conv_col = table.station_column(&line.convergence().name).unwrap();
        for (original, parsed) in trains.iter().zip(table.trains()) {
            assert_eq!(
                original.stops[conv].time(),
                parsed.stops[conv_col].time(),
                "convergence arrival changed across the roundtrip"
            );
            assert_eq!(original.platform, parsed.platform);
        }
    }

    fn small_csv() -> String {
        [
            "sequence,tier,destination,A,B,C,platform,through_arrival",
            "0001,Local,Higashi-Kanagawa,0500,0503,0506,2,-",
            "0002,Rapid,Sakuragicho,0510,->,0520,1,0525",
        ]
        .join("\n")
    }

    #[test]
    fn parses_markers_and_through_fields() {
        let line = yokohama_line();
        let table = Timetable::parse(&small_csv(), &line).unwrap();

        assert_eq!(table.stations(), &["A", "B", "C"]);
        assert_eq!(table.trains().len(), 2);

        let local = &table.trains()[0];
        assert_eq!(local.number, 1);
        assert_eq!(local.tier, Tier::Local);
        assert_eq!(local.destination, Destination::Terminus);
        assert_eq!(local.through_arrival, None);

        let rapid = &table.trains()[1];
        assert_eq!(rapid.destination, Destination::Through);
        assert_eq!(rapid.stops[1], StopTime::Passes);
        assert_eq!(rapid.through_arrival.unwrap().hhmm(), "0525");
    }

    #[test]
    fn rejects_bad_header() {
        let line = yokohama_line();

        let text = "id,tier,destination,A,platform,through_arrival\n";
        assert!(matches!(
            Timetable::parse(text, &line),
            Err(TimetableError::Header { .. })
        ));

        let text = "sequence,tier\n";
        assert!(matches!(
            Timetable::parse(text, &line),
            Err(TimetableError::Header { .. })
        ));
    }

    #[test]
    fn rejects_structural_row_problems() {
        let line = yokohama_line();
        let header = "sequence,tier,destination,A,platform,through_arrival";

        for bad in [
            "xx,Local,Higashi-Kanagawa,0500,2,-",
            "0001,Express,Higashi-Kanagawa,0500,2,-",
            "0001,Local,Nowhere,0500,2,-",
            "0001,Local,Higashi-Kanagawa,0500,two,-",
        ] {
            let text = format!("{header}\n{bad}");
            assert!(
                matches!(Timetable::parse(&text, &line), Err(TimetableError::Row { .. })),
                "accepted: {bad}"
            );
        }
    }

    #[test]
    fn bad_time_cell_degrades_to_not_reached() {
        let line = yokohama_line();
        let text = "sequence,tier,destination,A,B,platform,through_arrival\n\
                    0001,Local,Higashi-Kanagawa,garbage,0503,2,nonsense";

        let table = Timetable::parse(text, &line).unwrap();
        let train = &table.trains()[0];

        assert_eq!(train.stops[0], StopTime::NotReached);
        assert_eq!(train.stops[1].time().unwrap().hhmm(), "0503");
        assert_eq!(train.through_arrival, None);
    }

    #[test]
    fn load_from_file() {
        let line = yokohama_line();
        let trains =
            generate(&line, &GeneratorConfig::default(), &mut StdRng::seed_from_u64(23)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable.csv");
        write_csv_file(&path, &line, &trains).unwrap();

        let table = Timetable::load(&path, &line).unwrap();
        assert_eq!(table.trains(), &trains[..]);
    }
}
