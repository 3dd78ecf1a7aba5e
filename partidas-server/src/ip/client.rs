//! Remote timetable HTTP client.
//!
//! Provides async methods for the three lookups the application needs:
//! station search, a station's timetable for one day, and one train's stops.
//! Every path segment is percent-encoded before interpolation.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{
    Departure, ServiceType, Station, StationId, TrainId, TrainInformation, format_date,
    join_codes,
};

use super::convert::{convert_stations, convert_timetable};
use super::error::IpError;
use super::types::{StationSearchResponse, TimetableResponse, TrainInformationResponse};

/// Default base URL of the timetable host.
pub const DEFAULT_BASE_URL: &str = "https://run.gmcabrita.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct IpConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl IpConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted proxy).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for IpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A timetable query: one station, one calendar day, some service types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRequest {
    pub station: StationId,
    pub date: NaiveDate,
    pub service_types: Vec<ServiceType>,
}

/// Path for a station search.
pub fn stations_path(query: &str) -> String {
    format!("/ip.getStations/{}", urlencoding::encode(query))
}

/// Path for a full-day timetable.
pub fn timetable_path(request: &TimetableRequest) -> String {
    let day = format_date(request.date);
    let start = format!("{day} 00:00");
    let end = format!("{day} 23:59");
    let services = join_codes(&request.service_types);

    format!(
        "/ip.getTimetables/{}/{}/{}/{}",
        urlencoding::encode(&request.station.to_string()),
        urlencoding::encode(&start),
        urlencoding::encode(&end),
        urlencoding::encode(&services),
    )
}

/// Path for a train's detail on a date.
pub fn train_information_path(train_id: TrainId, date: NaiveDate) -> String {
    format!(
        "/ip.getTrainInformation/{}/{}",
        urlencoding::encode(&train_id.to_string()),
        urlencoding::encode(&format_date(date)),
    )
}

/// Timetable host API client.
///
/// Uses a semaphore to limit concurrent requests. Cheap to clone; clones
/// share the connection pool and the semaphore.
#[derive(Debug, Clone)]
pub struct IpClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl IpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: IpConfig) -> Result<Self, IpError> {
        if config.max_concurrent == 0 {
            return Err(IpError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search stations by free-text name.
    ///
    /// Blank queries return no stations without touching the network.
    pub async fn search_stations(&self, query: &str) -> Result<Vec<Station>, IpError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response: StationSearchResponse = self.get_json(&stations_path(query)).await?;
        Ok(convert_stations(response))
    }

    /// Get a station's departures for a whole day.
    pub async fn get_timetable(
        &self,
        request: &TimetableRequest,
    ) -> Result<Vec<Departure>, IpError> {
        let response: TimetableResponse = self.get_json(&timetable_path(request)).await?;
        Ok(convert_timetable(response))
    }

    /// Get a train's stops for a date.
    ///
    /// Returns `Ok(None)` when the service has no information for the train.
    pub async fn get_train_information(
        &self,
        train_id: TrainId,
        date: NaiveDate,
    ) -> Result<Option<TrainInformation>, IpError> {
        let response: TrainInformationResponse = self
            .get_json(&train_information_path(train_id, date))
            .await?;
        Ok(response.response.map(TrainInformation::from))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, IpError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| IpError::InvalidConfig("semaphore closed".to_string()))?;

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "requesting");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IpError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| IpError::json(e, &body))
    }
}
