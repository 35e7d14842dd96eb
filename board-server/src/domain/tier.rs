//! Service tiers and destinations.

use std::fmt;

/// Error returned when parsing an unknown tier label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tier: {value}")]
pub struct InvalidTier {
    value: String,
}

/// Service pattern of a train.
///
/// Local trains stop at every station; rapid trains stop only at the
/// line's designated rapid-stop subset. The tier also fixes the arrival
/// platform at the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Local,
    Rapid,
}

impl Tier {
    /// The arrival platform at the convergence station.
    ///
    /// Rapid services take platform 1, locals platform 2.
    pub fn platform(self) -> u8 {
        match self {
            Tier::Rapid => 1,
            Tier::Local => 2,
        }
    }

    /// The tier label used on the wire and in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Local => "Local",
            Tier::Rapid => "Rapid",
        }
    }

    /// Parse a tier label.
    pub fn parse(s: &str) -> Result<Self, InvalidTier> {
        match s {
            "Local" => Ok(Tier::Local),
            "Rapid" => Ok(Tier::Rapid),
            other => Err(InvalidTier {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a train terminates.
///
/// Either the line's own terminus (the convergence station) or the
/// through-service destination beyond it. The concrete names live in the
/// line configuration; this enum records only which of the two applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The line's own terminus.
    Terminus,
    /// The through-service destination past the terminus.
    Through,
}

impl Destination {
    /// Whether the train continues past the line's own terminus.
    pub fn is_through(self) -> bool {
        matches!(self, Destination::Through)
    }
}
