use crate::observations::error::ObservationError;
use crate::observations::knmi::{parse_hourly, KnmiDataset};
use crate::types::hour_range::{ceil_hour, floor_hour};
use crate::types::metric_spec::MetricSpec;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{info, warn};
use reqwest::Client;
use tokio::task;

/// The KNMI hourly data endpoint.
pub const KNMI_HOURLY_URL: &str = "https://www.daggegevens.knmi.nl/klimatologie/uurgegevens";

/// Days requested per download. Longer periods are split.
pub const CHUNK_DAYS: i64 = 28;

/// Downloads KNMI hourly observations for all stations.
#[derive(Debug, Clone)]
pub struct KnmiFetcher {
    client: Client,
    base_url: String,
}

impl Default for KnmiFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl KnmiFetcher {
    pub fn new() -> Self {
        Self::with_base_url(KNMI_HOURLY_URL)
    }

    /// A fetcher talking to another endpoint serving the same format.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Splits the inclusive date range `start..=end` into consecutive inclusive
    /// chunks of at most [`CHUNK_DAYS`] days.
    pub fn chunk_dates(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
        let mut chunks = Vec::new();
        let mut chunk_start = start;
        while chunk_start <= end {
            let chunk_end = (chunk_start + Duration::days(CHUNK_DAYS - 1)).min(end);
            chunks.push((chunk_start, chunk_end));
            chunk_start = chunk_end + Duration::days(1);
        }
        chunks
    }

    /// Query parameters requesting hours 1 through 24 of the given days.
    pub fn query_params(
        start: NaiveDate,
        end: NaiveDate,
        metrics: &MetricSpec,
    ) -> Vec<(&'static str, String)> {
        let vars: Vec<&str> = metrics.codes().iter().map(|c| c.code()).collect();
        vec![
            ("start", format!("{}01", start.format("%Y%m%d"))),
            ("end", format!("{}24", end.format("%Y%m%d"))),
            ("vars", vars.join(":")),
        ]
    }

    /// Downloads the raw text for one chunk.
    pub async fn fetch_text(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        metrics: &MetricSpec,
    ) -> Result<String, ObservationError> {
        let url = self.base_url.clone();
        info!("Downloading KNMI hourly data {} .. {} from {}", start, end, url);

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(start, end, metrics))
            .send()
            .await
            .map_err(|e| ObservationError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ObservationError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ObservationError::NetworkRequest(url, e)
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| ObservationError::NetworkRequest(url, e))
    }

    /// Downloads and parses every hour needed to interpolate over `start..end`,
    /// including the anchor at or after `end`.
    ///
    /// Chunks are fetched one after another and parsed on a blocking task.
    pub async fn fetch(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        metrics: &MetricSpec,
    ) -> Result<KnmiDataset, ObservationError> {
        let first_day = floor_hour(start).date_naive();
        let last_day = ceil_hour(end).date_naive();

        let mut dataset = KnmiDataset::default();
        for (chunk_start, chunk_end) in Self::chunk_dates(first_day, last_day) {
            let text = self.fetch_text(chunk_start, chunk_end, metrics).await?;
            let chunk = task::spawn_blocking(move || parse_hourly(&text)).await??;
            if chunk.observations.is_empty() {
                warn!("No KNMI observations for {} .. {}", chunk_start, chunk_end);
                continue;
            }
            dataset.merge(chunk);
        }

        info!(
            "Fetched {} station-hours from {} stations",
            dataset.observations.len(),
            dataset.stations.len()
        );
        Ok(dataset)
    }
}
