//! HTTP client for the published holiday calendar.

use super::{HolidayCalendar, HolidayError};

/// Default calendar source: the Cabinet Office national holiday CSV.
const DEFAULT_URL: &str = "https://www8.cao.go.jp/chosei/shukujitsu/syukujitsu.csv";

/// Configuration for the holiday calendar client.
#[derive(Debug, Clone)]
pub struct HolidayClientConfig {
    /// Calendar URL.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl HolidayClientConfig {
    pub fn new() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom URL (for testing or mirrors).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl Default for HolidayClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client that fetches and parses the holiday calendar.
#[derive(Debug, Clone)]
pub struct HolidayClient {
    http: reqwest::Client,
    url: String,
}

impl HolidayClient {
    pub fn new(config: HolidayClientConfig) -> Result<Self, HolidayError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Fetch the calendar.
    ///
    /// The published file carries its charset in the response headers,
    /// which `text()` honors; date fields are plain ASCII either way.
    pub async fn fetch(&self) -> Result<HolidayCalendar, HolidayError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(HolidayError::Api {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        Ok(HolidayCalendar::parse(&text))
    }
}
