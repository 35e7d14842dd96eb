//! Line topology and fixed schedule configuration.
//!
//! A line is an ordered station sequence with two interval tables (one
//! per service tier), weighted origin candidates, and a through-service
//! extension past the final station. The configuration is an explicit
//! immutable value handed to both the generator and the lookup engine,
//! so alternative topologies can coexist in tests.

use std::collections::HashMap;

use crate::domain::Tier;

/// One station on the line.
#[derive(Debug, Clone)]
pub struct Station {
    /// Unique display name.
    pub name: String,
    /// Rapid services stop here.
    pub rapid_stop: bool,
    /// Shown as a shortcut button in the UI.
    pub major: bool,
}

impl Station {
    pub fn new(name: impl Into<String>, rapid_stop: bool, major: bool) -> Self {
        Self {
            name: name.into(),
            rapid_stop,
            major,
        }
    }
}

/// An origin candidate with its draw weight.
#[derive(Debug, Clone)]
pub struct OriginWeight {
    pub station: String,
    pub weight: u32,
}

/// Continuation of the line past its own terminus.
#[derive(Debug, Clone)]
pub struct ThroughService {
    /// Destination label shown for through trains.
    pub destination: String,
    /// Station whose arrival time is recorded for through trains.
    pub arrival_at: String,
    /// Fixed travel time from the convergence station, in minutes.
    pub travel_mins: u16,
}

/// An interval-table gap found by the validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInterval {
    pub tier: Tier,
    pub from: String,
    pub to: String,
}

/// Immutable configuration for one line.
#[derive(Debug, Clone)]
pub struct LineConfig {
    stations: Vec<Station>,
    index: HashMap<String, usize>,
    origins: Vec<OriginWeight>,
    local_intervals: HashMap<(String, String), u16>,
    rapid_intervals: HashMap<(String, String), u16>,
    through: ThroughService,
}

impl LineConfig {
    /// Create a line from its station sequence and through extension.
    ///
    /// The last station in the sequence is the convergence station.
    /// Intervals and origin candidates are added afterwards.
    pub fn new(stations: Vec<Station>, through: ThroughService) -> Self {
        let index = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();

        Self {
            stations,
            index,
            origins: Vec::new(),
            local_intervals: HashMap::new(),
            rapid_intervals: HashMap::new(),
            through,
        }
    }

    /// Register an origin candidate with its draw weight.
    pub fn add_origin(&mut self, station: impl Into<String>, weight: u32) {
        self.origins.push(OriginWeight {
            station: station.into(),
            weight,
        });
    }

    /// Register the travel time between an ordered station pair for a tier.
    pub fn add_interval(
        &mut self,
        tier: Tier,
        from: impl Into<String>,
        to: impl Into<String>,
        minutes: u16,
    ) {
        self.table_mut(tier)
            .insert((from.into(), to.into()), minutes);
    }

    fn table(&self, tier: Tier) -> &HashMap<(String, String), u16> {
        match tier {
            Tier::Local => &self.local_intervals,
            Tier::Rapid => &self.rapid_intervals,
        }
    }

    fn table_mut(&mut self, tier: Tier) -> &mut HashMap<(String, String), u16> {
        match tier {
            Tier::Local => &mut self.local_intervals,
            Tier::Rapid => &mut self.rapid_intervals,
        }
    }

    /// The ordered station sequence.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// A station by ordinal index.
    pub fn station(&self, index: usize) -> &Station {
        &self.stations[index]
    }

    /// The ordinal index of a station name.
    pub fn station_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The convergence station: the line's own terminus.
    pub fn convergence(&self) -> &Station {
        self.stations.last().expect("line has no stations")
    }

    /// Index of the convergence station.
    pub fn convergence_index(&self) -> usize {
        self.stations.len() - 1
    }

    /// The through-service extension.
    pub fn through(&self) -> &ThroughService {
        &self.through
    }

    /// The weighted origin candidates.
    pub fn origins(&self) -> &[OriginWeight] {
        &self.origins
    }

    /// The next rapid-stop station strictly after `index`, if any.
    pub fn next_rapid_stop_after(&self, index: usize) -> Option<usize> {
        (index + 1..self.stations.len()).find(|&i| self.stations[i].rapid_stop)
    }

    /// Travel minutes between two stations for a tier.
    ///
    /// `None` when the table has no entry for the pair. Callers that walk
    /// the schedule treat a missing entry as zero added minutes; use
    /// [`missing_intervals`](Self::missing_intervals) to surface gaps.
    pub fn interval(&self, tier: Tier, from: usize, to: usize) -> Option<u16> {
        let key = (
            self.stations[from].name.clone(),
            self.stations[to].name.clone(),
        );
        self.table(tier).get(&key).copied()
    }

    /// Report every adjacent-for-tier pair with no interval entry.
    ///
    /// Local services need an entry for each consecutive station pair;
    /// rapid services for each consecutive rapid-stop pair. The schedule
    /// walk absorbs gaps as zero minutes, so this pass exists to make
    /// them visible at generation time.
    pub fn missing_intervals(&self) -> Vec<MissingInterval> {
        let mut missing = Vec::new();

        for i in 0..self.stations.len().saturating_sub(1) {
            if self.interval(Tier::Local, i, i + 1).is_none() {
                missing.push(MissingInterval {
                    tier: Tier::Local,
                    from: self.stations[i].name.clone(),
                    to: self.stations[i + 1].name.clone(),
                });
            }
        }

        for i in 0..self.stations.len() {
            if !self.stations[i].rapid_stop {
                continue;
            }
            if let Some(next) = self.next_rapid_stop_after(i) {
                if self.interval(Tier::Rapid, i, next).is_none() {
                    missing.push(MissingInterval {
                        tier: Tier::Rapid,
                        from: self.stations[i].name.clone(),
                        to: self.stations[next].name.clone(),
                    });
                }
            }
        }

        missing
    }
}

/// The JR Yokohama Line, Hachioji through Higashi-Kanagawa, with through
/// service toward Sakuragicho recorded at Yokohama.
pub fn yokohama_line() -> LineConfig {
    let stations = vec![
        Station::new("Hachioji", true, true),
        Station::new("Katakura", false, false),
        Station::new("Hachioji-Minamino", false, false),
        Station::new("Aihara", false, false),
        Station::new("Hashimoto", true, true),
        Station::new("Sagamihara", false, false),
        Station::new("Yabe", false, false),
        Station::new("Fuchinobe", false, false),
        Station::new("Kobuchi", false, false),
        Station::new("Machida", true, true),
        Station::new("Naruse", false, false),
        Station::new("Nagatsuta", true, true),
        Station::new("Tokaichiba", false, false),
        Station::new("Nakayama", false, false),
        Station::new("Kamoi", false, false),
        Station::new("Kozukue", false, false),
        Station::new("Shin-Yokohama", true, true),
        Station::new("Kikuna", true, false),
        Station::new("Oguchi", false, false),
        Station::new("Higashi-Kanagawa", true, false),
    ];

    let mut line = LineConfig::new(
        stations,
        ThroughService {
            destination: "Sakuragicho".to_string(),
            arrival_at: "Yokohama".to_string(),
            travel_mins: 5,
        },
    );

    line.add_origin("Hachioji", 10);
    line.add_origin("Hashimoto", 3);
    line.add_origin("Machida", 2);
    line.add_origin("Nagatsuta", 1);

    let local = [
        ("Hachioji", "Katakura", 3),
        ("Katakura", "Hachioji-Minamino", 3),
        ("Hachioji-Minamino", "Aihara", 3),
        ("Aihara", "Hashimoto", 11),
        ("Hashimoto", "Sagamihara", 3),
        ("Sagamihara", "Yabe", 3),
        ("Yabe", "Fuchinobe", 3),
        ("Fuchinobe", "Kobuchi", 3),
        ("Kobuchi", "Machida", 2),
        ("Machida", "Naruse", 3),
        ("Naruse", "Nagatsuta", 3),
        ("Nagatsuta", "Tokaichiba", 3),
        ("Tokaichiba", "Nakayama", 3),
        ("Nakayama", "Kamoi", 3),
        ("Kamoi", "Kozukue", 3),
        ("Kozukue", "Shin-Yokohama", 12),
        ("Shin-Yokohama", "Kikuna", 18),
        ("Kikuna", "Oguchi", 3),
        ("Oguchi", "Higashi-Kanagawa", 4),
    ];
    for (from, to, mins) in local {
        line.add_interval(Tier::Local, from, to, mins);
    }

    let rapid = [
        ("Hachioji", "Hashimoto", 15),
        ("Hashimoto", "Machida", 7),
        ("Machida", "Nagatsuta", 3),
        ("Nagatsuta", "Shin-Yokohama", 3),
        ("Shin-Yokohama", "Kikuna", 18),
        ("Kikuna", "Higashi-Kanagawa", 7),
    ];
    for (from, to, mins) in rapid {
        line.add_interval(Tier::Rapid, from, to, mins);
    }

    line
}
