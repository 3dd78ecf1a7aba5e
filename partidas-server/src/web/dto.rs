//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{
    ColumnVisibility, Departure, DepartureStatus, ServiceType, Station, TrainId, TrainInformation,
    format_date,
};
use crate::fetch::{DetailPhase, FetchPhase, SearchOutcome, TrainDetail};
use crate::session::Session;

/// Query for station search.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Free-text station name
    #[serde(default)]
    pub q: String,
}

/// Station search response.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    /// `too-short`, `found` or `superseded`
    pub outcome: &'static str,
    pub stations: Vec<Station>,
}

impl From<SearchOutcome> for StationSearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        let label = match &outcome {
            SearchOutcome::TooShort => "too-short",
            SearchOutcome::Found(_) => "found",
            SearchOutcome::Superseded => "superseded",
        };
        Self {
            outcome: label,
            stations: outcome.into_stations(),
        }
    }
}

/// Query string of the index page.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Station search text
    pub q: Option<String>,
}

/// Everything the session currently holds.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub filters: FiltersResult,
    pub timetable: TimetableResult,
    pub detail: Option<DetailResult>,
}

/// Current filter selection.
#[derive(Debug, Serialize)]
pub struct FiltersResult {
    pub station: Option<Station>,
    pub service_types: Vec<ServiceType>,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub selected_destinations: Vec<String>,
    pub columns: ColumnVisibility,
    pub can_search: bool,
}

/// Timetable state and the rows after the destination filter.
#[derive(Debug, Serialize)]
pub struct TimetableResult {
    /// `idle`, `loading`, `loaded` or `failed`
    pub phase: &'static str,
    pub has_searched: bool,
    pub departures: Vec<DepartureResult>,
    pub available_destinations: Vec<String>,
    /// Selected destinations present in the current result set
    pub selected_available: usize,
    pub all_destinations_selected: bool,
}

/// A departure plus its derived display fields.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    #[serde(flatten)]
    pub departure: Departure,

    /// `on-time`, `delayed`, `passed` or `cancelled`
    pub status: &'static str,
    pub status_label: String,
    pub delay_minutes: Option<u32>,
    pub service_label: String,
    pub extra_observations: Option<String>,
}

/// The open train detail panel.
#[derive(Debug, Serialize)]
pub struct DetailResult {
    pub train_id: TrainId,
    pub date: String,
    /// `loading`, `shown`, `not-found` or `error`
    pub phase: &'static str,
    pub information: Option<TrainInformation>,
    pub error: Option<&'static str>,
    pub collapsed: bool,
    pub show_earlier_stops: bool,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl SessionSnapshot {
    pub fn from_session(session: &Session) -> Self {
        Self {
            filters: FiltersResult::from_session(session),
            timetable: TimetableResult::from_session(session),
            detail: DetailResult::from_detail(session.detail()),
        }
    }
}

impl FiltersResult {
    fn from_session(session: &Session) -> Self {
        let filters = session.filters();
        Self {
            station: filters.station.clone(),
            service_types: filters.service_types.iter().copied().collect(),
            date: format_date(filters.date),
            selected_destinations: filters.selected_destinations.iter().cloned().collect(),
            columns: filters.columns.clone(),
            can_search: filters.can_search(),
        }
    }
}

impl TimetableResult {
    fn from_session(session: &Session) -> Self {
        let summary = session.destination_summary();
        Self {
            phase: phase_name(session.timetable().phase()),
            has_searched: session.timetable().has_searched(),
            departures: session
                .visible_departures()
                .iter()
                .map(DepartureResult::from_departure)
                .collect(),
            available_destinations: session.available_destinations(),
            selected_available: summary.selected_available,
            all_destinations_selected: summary.all_selected(),
        }
    }
}

fn phase_name(phase: FetchPhase) -> &'static str {
    match phase {
        FetchPhase::Idle => "idle",
        FetchPhase::Loading => "loading",
        FetchPhase::Loaded => "loaded",
        FetchPhase::Failed => "failed",
    }
}

impl DepartureResult {
    pub fn from_departure(departure: &Departure) -> Self {
        let status = departure.status();
        let (kind, delay_minutes) = match status {
            DepartureStatus::OnTime => ("on-time", None),
            DepartureStatus::Delayed(minutes) => ("delayed", Some(minutes)),
            DepartureStatus::Passed => ("passed", None),
            DepartureStatus::Cancelled => ("cancelled", None),
        };

        Self {
            departure: departure.clone(),
            status: kind,
            status_label: status.label(),
            delay_minutes,
            service_label: departure.service_label().to_string(),
            extra_observations: departure.extra_observations().map(str::to_string),
        }
    }
}

impl DetailResult {
    fn from_detail(detail: &TrainDetail) -> Option<Self> {
        let key = detail.key()?;
        let phase = match detail.phase() {
            DetailPhase::Closed => return None,
            DetailPhase::Loading => "loading",
            DetailPhase::Shown(_) => "shown",
            DetailPhase::NotFound => "not-found",
            DetailPhase::Error => "error",
        };

        Some(Self {
            train_id: key.train_id,
            date: format_date(key.date),
            phase,
            information: detail.information().cloned(),
            error: detail.error_message(),
            collapsed: detail.is_collapsed(),
            show_earlier_stops: detail.show_earlier_stops(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::domain::fixtures::{departure, train_with_stops};
    use crate::fetch::DETAIL_ERROR_MESSAGE;
    use crate::ip::IpError;
    use crate::prefs::Preferences;
    use crate::selection::FilterAction;
    use crate::session::PendingFetch;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// Answer every pending fetch successfully.
    fn settle(
        session: &mut Session,
        pending: impl IntoIterator<Item = PendingFetch>,
        rows: Vec<Departure>,
        info: Option<TrainInformation>,
    ) {
        for fetch in pending {
            match fetch {
                PendingFetch::Timetable(ticket) => {
                    session.complete_timetable(ticket, Ok(rows.clone()));
                }
                PendingFetch::Detail(ticket) => {
                    session.complete_detail(ticket, Ok(info.clone()));
                }
            }
        }
    }

    #[test]
    fn departure_result_flattens_and_derives() {
        let mut d = departure(521, "Porto - Campanhã");
        d.observations = "Circula com atraso de 13 min.".into();

        let value = serde_json::to_value(DepartureResult::from_departure(&d)).unwrap();
        assert_eq!(value["train_id"], json!(521));
        assert_eq!(value["destination_name"], json!("Porto - Campanhã"));
        assert_eq!(value["status"], json!("delayed"));
        assert_eq!(value["status_label"], json!("+13 min"));
        assert_eq!(value["delay_minutes"], json!(13));
        assert_eq!(value["service_label"], json!("IC"));
        assert_eq!(value["extra_observations"], json!(null));
    }

    #[test]
    fn cancelled_row() {
        let mut d = departure(521, "Faro");
        d.observations = "SUPRIMIDO".into();
        let result = DepartureResult::from_departure(&d);
        assert_eq!(result.status, "cancelled");
        assert_eq!(result.status_label, "Suprimido");
        assert_eq!(result.extra_observations, None);
    }

    #[test]
    fn fresh_session_snapshot() {
        let session = Session::new(Preferences::in_memory(), date());
        let value = serde_json::to_value(SessionSnapshot::from_session(&session)).unwrap();

        assert_eq!(value["filters"]["station"], json!(null));
        assert_eq!(value["filters"]["date"], json!("2024-03-15"));
        assert_eq!(value["filters"]["can_search"], json!(false));
        assert_eq!(value["filters"]["service_types"].as_array().unwrap().len(), 7);
        assert_eq!(value["filters"]["columns"]["train-number"], json!(false));
        assert_eq!(value["timetable"]["phase"], json!("idle"));
        assert_eq!(value["detail"], json!(null));
    }

    #[test]
    fn snapshot_reflects_fetch_results_and_detail() {
        let mut session = Session::new(Preferences::in_memory(), date());
        let pending = session.dispatch(FilterAction::SelectStation(Some(Station::new(
            9430007,
            "Lisboa - Oriente",
            0.0,
        ))));
        settle(
            &mut session,
            pending,
            vec![departure(1, "Faro"), departure(2, "Braga")],
            None,
        );
        session.dispatch(FilterAction::ToggleDestination("Faro".into()));

        let detail = session.open_train(1);
        settle(&mut session, [detail], vec![], Some(train_with_stops(8, 2)));

        let snapshot = SessionSnapshot::from_session(&session);
        assert_eq!(snapshot.timetable.phase, "loaded");
        assert_eq!(snapshot.timetable.departures.len(), 1);
        assert_eq!(snapshot.timetable.available_destinations, vec!["Braga", "Faro"]);
        assert_eq!(snapshot.timetable.selected_available, 1);
        assert!(!snapshot.timetable.all_destinations_selected);

        let detail = snapshot.detail.unwrap();
        assert_eq!(detail.phase, "shown");
        assert!(detail.collapsed);
        assert_eq!(detail.error, None);
    }

    #[test]
    fn failed_detail_carries_fixed_message() {
        let mut session = Session::new(Preferences::in_memory(), date());
        let PendingFetch::Detail(ticket) = session.open_train(9) else {
            panic!("opening a train must fetch its detail");
        };
        session.complete_detail(
            ticket,
            Err(IpError::Api {
                status: 500,
                message: "boom".into(),
            }),
        );

        let detail = SessionSnapshot::from_session(&session).detail.unwrap();
        assert_eq!(detail.phase, "error");
        assert_eq!(detail.error, Some(DETAIL_ERROR_MESSAGE));
    }

    #[test]
    fn search_response_labels() {
        let found = StationSearchResponse::from(SearchOutcome::Found(vec![Station::new(
            1, "Faro", 0.0,
        )]));
        assert_eq!(found.outcome, "found");
        assert_eq!(found.stations.len(), 1);

        let short = StationSearchResponse::from(SearchOutcome::TooShort);
        assert_eq!(short.outcome, "too-short");
        assert!(short.stations.is_empty());
    }
}
