//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{
    ColumnId, ColumnVisibility, Departure, ServiceType, Station, TrainStop, format_date,
};
use crate::fetch::{DetailPhase, TrainDetail};
use crate::selection::DestinationSummary;
use crate::session::Session;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// The single page: filters, departures table, and the train panel.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub station: Option<Station>,
    pub search: StationSearchView,
    pub service_types: Vec<ServiceTypeOption>,
    pub date: String,
    pub can_search: bool,
    pub timetable: TimetableView,
    pub destinations: DestinationFilterView,
    pub column_options: Vec<ColumnOption>,
    pub detail: Option<TrainDetailView>,
}

impl IndexTemplate {
    /// Build the page from the session and an optional station search.
    pub fn from_session(session: &Session, search: StationSearchView) -> Self {
        let filters = session.filters();

        let service_types = ServiceType::ALL
            .into_iter()
            .map(|t| ServiceTypeOption {
                code: t.code(),
                label: t.label(),
                short_label: t.short_label(),
                badge_class: t.badge().css_class(),
                selected: filters.service_types.contains(&t),
            })
            .collect();

        let column_options = ColumnId::ALL
            .into_iter()
            .map(|c| ColumnOption {
                id: c.as_str(),
                label: c.label(),
                visible: filters.columns.is_visible(c),
            })
            .collect();

        let available = session.available_destinations();
        let summary = session.destination_summary();
        let destinations = DestinationFilterView {
            options: available
                .iter()
                .map(|name| DestinationOption {
                    name: name.clone(),
                    selected: filters.selected_destinations.contains(name),
                })
                .collect(),
            summary: destination_summary_text(&summary),
        };

        let timetable = TimetableView {
            station_name: filters
                .station
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            loading: session.timetable().is_loading(),
            has_searched: session.timetable().has_searched(),
            columns: ColumnFlags::from(&filters.columns),
            headers: filters
                .columns
                .visible()
                .into_iter()
                .map(ColumnId::label)
                .collect(),
            rows: session
                .visible_departures()
                .iter()
                .map(DepartureRow::from_departure)
                .collect(),
        };

        Self {
            station: filters.station.clone(),
            search,
            service_types,
            date: format_date(filters.date),
            can_search: filters.can_search(),
            timetable,
            destinations,
            column_options,
            detail: TrainDetailView::from_detail(session.detail()),
        }
    }
}

/// Summary line above the destination checkboxes.
fn destination_summary_text(summary: &DestinationSummary) -> String {
    if summary.available == 0 {
        "Sem destinos disponiveis".to_string()
    } else if summary.selected_available == 0 {
        "Selecionar destinos...".to_string()
    } else if summary.all_selected() {
        "Todos os destinos".to_string()
    } else {
        format!("{} de {} destinos", summary.selected_available, summary.available)
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Station search box state.
#[derive(Debug, Clone, Default)]
pub struct StationSearchView {
    pub query: String,
    /// Whether a search was run for `query`.
    pub searched: bool,
    pub results: Vec<Station>,
}

/// A service type checkbox.
#[derive(Debug, Clone)]
pub struct ServiceTypeOption {
    pub code: &'static str,
    pub label: &'static str,
    pub short_label: &'static str,
    pub badge_class: &'static str,
    pub selected: bool,
}

/// A column visibility checkbox.
#[derive(Debug, Clone)]
pub struct ColumnOption {
    pub id: &'static str,
    pub label: &'static str,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct DestinationOption {
    pub name: String,
    pub selected: bool,
}

/// Destination filter checkboxes and their summary line.
#[derive(Debug, Clone)]
pub struct DestinationFilterView {
    pub options: Vec<DestinationOption>,
    pub summary: String,
}

/// Which cells each row draws.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFlags {
    pub time: bool,
    pub status: bool,
    pub number: bool,
    pub service: bool,
    pub origin: bool,
    pub arrow: bool,
    pub destination: bool,
    pub operator: bool,
}

impl From<&ColumnVisibility> for ColumnFlags {
    fn from(columns: &ColumnVisibility) -> Self {
        Self {
            time: columns.is_visible(ColumnId::Time),
            status: columns.is_visible(ColumnId::TrainStatus),
            number: columns.is_visible(ColumnId::TrainNumber),
            service: columns.is_visible(ColumnId::Service),
            origin: columns.is_visible(ColumnId::Origin),
            arrow: columns.show_arrow(),
            destination: columns.is_visible(ColumnId::Destination),
            operator: columns.is_visible(ColumnId::Operator),
        }
    }
}

/// Departures table.
#[derive(Debug, Clone)]
pub struct TimetableView {
    pub station_name: String,
    pub loading: bool,
    pub has_searched: bool,
    pub columns: ColumnFlags,
    pub headers: Vec<&'static str>,
    pub rows: Vec<DepartureRow>,
}

/// One row of the departures table.
#[derive(Debug, Clone)]
pub struct DepartureRow {
    pub train_id: i64,
    pub time: String,
    pub status_label: String,
    pub status_class: &'static str,
    pub extra_observations: Option<String>,
    pub service_label: String,
    pub service_badge_class: &'static str,
    pub origin: String,
    pub destination: String,
    pub operator: String,
    pub passed: bool,
    pub cancelled: bool,
}

impl DepartureRow {
    pub fn from_departure(departure: &Departure) -> Self {
        let status = departure.status();
        Self {
            train_id: departure.train_id,
            time: departure.scheduled_time.clone(),
            status_label: status.label(),
            status_class: status.css_class(),
            extra_observations: departure.extra_observations().map(str::to_string),
            service_label: departure.service_label().to_string(),
            service_badge_class: departure
                .service_type()
                .map(|t| t.badge().css_class())
                .unwrap_or("badge-outline"),
            origin: departure.origin_name.clone(),
            destination: departure.destination_name.clone(),
            operator: departure.operator.clone(),
            passed: departure.has_passed,
            cancelled: status.is_cancelled(),
        }
    }

    /// CSS classes for the `<tr>`.
    pub fn row_class(&self) -> &'static str {
        match (self.cancelled, self.passed) {
            (true, _) => "row-cancelled",
            (false, true) => "row-passed",
            (false, false) => "",
        }
    }
}

/// Train detail panel.
#[derive(Debug, Clone)]
pub struct TrainDetailView {
    pub train_id: i64,
    pub date: String,
    pub loading: bool,
    pub not_found: bool,
    pub error: Option<&'static str>,
    pub info: Option<TrainSummaryView>,
    /// Passed stops are long enough to sit behind a toggle.
    pub collapsible: bool,
    pub collapsed: bool,
    pub passed: Vec<StopView>,
    pub upcoming: Vec<StopView>,
}

/// Header facts about a train.
#[derive(Debug, Clone)]
pub struct TrainSummaryView {
    pub service_type: String,
    pub operator: String,
    pub duration: Option<String>,
    pub situation: Option<String>,
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone)]
pub struct StopView {
    pub name: String,
    pub time: String,
    pub passed: bool,
}

impl From<&TrainStop> for StopView {
    fn from(stop: &TrainStop) -> Self {
        Self {
            name: stop.station_name.clone(),
            time: stop.scheduled_time.clone(),
            passed: stop.has_passed,
        }
    }
}

impl TrainDetailView {
    pub fn from_detail(detail: &TrainDetail) -> Option<Self> {
        let key = detail.key()?;
        let info = detail.information();

        Some(Self {
            train_id: key.train_id,
            date: format_date(key.date),
            loading: matches!(detail.phase(), DetailPhase::Loading),
            not_found: matches!(detail.phase(), DetailPhase::NotFound),
            error: detail.error_message(),
            info: info.map(|i| TrainSummaryView {
                service_type: i.service_type.clone(),
                operator: i.operator.clone(),
                duration: i.duration.clone(),
                situation: i.situation.clone(),
                origin: i.origin.clone(),
                destination: i.destination.clone(),
            }),
            collapsible: info.is_some_and(|i| i.collapses_passed_stops()),
            collapsed: detail.is_collapsed(),
            passed: detail
                .visible_passed_stops()
                .into_iter()
                .map(StopView::from)
                .collect(),
            upcoming: info
                .map(|i| i.upcoming_stops().map(StopView::from).collect())
                .unwrap_or_default(),
        })
    }
}
