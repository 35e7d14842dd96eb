//! Lookup configuration.

/// Configuration parameters for departure lookup.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Maximum number of departures to return.
    pub max_results: usize,

    /// Treat reference times before 02:00 as belonging to the previous
    /// service day (compare as hour 24/25), so queries just after
    /// midnight still match late trains recorded past hour 24.
    pub early_morning_rollover: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_results: 2,
            early_morning_rollover: true,
        }
    }
}
