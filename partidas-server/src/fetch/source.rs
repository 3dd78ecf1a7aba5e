//! The seam between the session and the remote timetable service.

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{Departure, Station, TrainId, TrainInformation};
use crate::ip::{IpClient, IpError, TimetableRequest};

/// Anything that can answer the three lookups the application makes.
///
/// Implemented by the HTTP client, by the caching wrapper around it, and by
/// in-memory fakes in tests.
pub trait TimetableSource: Send + Sync {
    fn search_stations(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Station>, IpError>> + Send;

    fn timetable(
        &self,
        request: &TimetableRequest,
    ) -> impl Future<Output = Result<Vec<Departure>, IpError>> + Send;

    /// `Ok(None)` means the service knows nothing about the train.
    fn train_information(
        &self,
        train_id: TrainId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<TrainInformation>, IpError>> + Send;
}

impl TimetableSource for IpClient {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, IpError> {
        IpClient::search_stations(self, query).await
    }

    async fn timetable(&self, request: &TimetableRequest) -> Result<Vec<Departure>, IpError> {
        self.get_timetable(request).await
    }

    async fn train_information(
        &self,
        train_id: TrainId,
        date: NaiveDate,
    ) -> Result<Option<TrainInformation>, IpError> {
        self.get_train_information(train_id, date).await
    }
}
