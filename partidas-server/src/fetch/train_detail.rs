//! Train detail fetch state machine.
//!
//! Same shape as the timetable machine: begin hands out a ticket, complete
//! accepts the result only if the ticket still matches the latest key.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{TrainId, TrainInformation, TrainStop};
use crate::ip::IpError;

/// Shown in place of the stops when the detail lookup fails.
pub const DETAIL_ERROR_MESSAGE: &str = "Não foi possível carregar a informação do comboio.";

/// Which train, on which day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetailKey {
    pub train_id: TrainId,
    pub date: NaiveDate,
}

/// Permission to run one detail request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    generation: u64,
    pub key: DetailKey,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPhase {
    Closed,
    Loading,
    Shown(TrainInformation),
    /// The service answered, but had nothing for this train.
    NotFound,
    Error,
}

/// The train detail panel.
#[derive(Debug, Clone)]
pub struct TrainDetail {
    key: Option<DetailKey>,
    generation: u64,
    phase: DetailPhase,
    show_earlier_stops: bool,
}

impl TrainDetail {
    pub fn new() -> Self {
        Self {
            key: None,
            generation: 0,
            phase: DetailPhase::Closed,
            show_earlier_stops: false,
        }
    }

    pub fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    pub fn key(&self) -> Option<DetailKey> {
        self.key
    }

    pub fn is_open(&self) -> bool {
        self.key.is_some()
    }

    pub fn information(&self) -> Option<&TrainInformation> {
        match &self.phase {
            DetailPhase::Shown(info) => Some(info),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        matches!(self.phase, DetailPhase::Error).then_some(DETAIL_ERROR_MESSAGE)
    }

    pub fn show_earlier_stops(&self) -> bool {
        self.show_earlier_stops
    }

    /// Open the panel for a train, dropping whatever was shown before.
    pub fn open(&mut self, train_id: TrainId, date: NaiveDate) -> DetailTicket {
        self.start(DetailKey { train_id, date })
    }

    /// Follow a date change. An open panel is re-keyed to the new date and
    /// must be fetched again; a closed one stays closed.
    pub fn set_date(&mut self, date: NaiveDate) -> Option<DetailTicket> {
        let key = self.key?;
        if key.date == date {
            return None;
        }
        Some(self.start(DetailKey { date, ..key }))
    }

    /// Close the panel. A response still in flight will be discarded.
    pub fn close(&mut self) {
        self.generation += 1;
        self.key = None;
        self.phase = DetailPhase::Closed;
        self.show_earlier_stops = false;
    }

    fn start(&mut self, key: DetailKey) -> DetailTicket {
        self.generation += 1;
        self.key = Some(key);
        self.phase = DetailPhase::Loading;
        self.show_earlier_stops = false;
        debug!(train = key.train_id, date = %key.date, "train detail fetch started");

        DetailTicket {
            generation: self.generation,
            key,
        }
    }

    /// Accept a detail result. Returns `false` when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: DetailTicket,
        result: Result<Option<TrainInformation>, IpError>,
    ) -> bool {
        if ticket.generation != self.generation || self.key != Some(ticket.key) {
            debug!(train = ticket.key.train_id, "discarding superseded train detail");
            return false;
        }

        self.phase = match result {
            Ok(Some(info)) => DetailPhase::Shown(info),
            Ok(None) => DetailPhase::NotFound,
            Err(e) => {
                warn!(train = ticket.key.train_id, error = %e, "train detail fetch failed");
                DetailPhase::Error
            }
        };
        true
    }

    /// Flip the earlier-stops toggle. No refetch.
    pub fn toggle_earlier_stops(&mut self) {
        self.show_earlier_stops = !self.show_earlier_stops;
    }

    /// Whether passed stops are currently hidden behind the toggle.
    pub fn is_collapsed(&self) -> bool {
        self.information()
            .is_some_and(|info| info.collapses_passed_stops() && !self.show_earlier_stops)
    }

    /// Passed stops to draw right now: none while collapsed.
    pub fn visible_passed_stops(&self) -> Vec<&TrainStop> {
        match self.information() {
            Some(info) if !self.is_collapsed() => info.passed_stops().collect(),
            _ => Vec::new(),
        }
    }
}

impl Default for TrainDetail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::train_with_stops;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn next_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()
    }

    #[test]
    fn open_then_shown() {
        let mut detail = TrainDetail::new();
        assert!(!detail.is_open());

        let ticket = detail.open(521, date());
        assert_eq!(detail.phase(), &DetailPhase::Loading);
        assert!(detail.complete(ticket, Ok(Some(train_with_stops(4, 1)))));
        assert_eq!(detail.information().map(|i| i.stops.len()), Some(4));
        assert_eq!(detail.error_message(), None);
    }

    #[test]
    fn null_payload_is_not_found() {
        let mut detail = TrainDetail::new();
        let ticket = detail.open(521, date());
        detail.complete(ticket, Ok(None));
        assert_eq!(detail.phase(), &DetailPhase::NotFound);
    }

    #[test]
    fn failure_shows_fixed_message() {
        let mut detail = TrainDetail::new();
        let ticket = detail.open(521, date());
        detail.complete(
            ticket,
            Err(IpError::Api {
                status: 502,
                message: "upstream exploded".into(),
            }),
        );
        assert_eq!(detail.phase(), &DetailPhase::Error);
        assert_eq!(detail.error_message(), Some(DETAIL_ERROR_MESSAGE));
    }

    #[test]
    fn switching_trains_discards_first_response() {
        let mut detail = TrainDetail::new();
        let first = detail.open(521, date());
        let second = detail.open(4412, date());

        assert!(!detail.complete(first, Ok(Some(train_with_stops(3, 0)))));
        assert_eq!(detail.phase(), &DetailPhase::Loading);

        assert!(detail.complete(second, Ok(Some(train_with_stops(8, 2)))));
        assert_eq!(detail.key().map(|k| k.train_id), Some(4412));
    }

    #[test]
    fn reopening_same_train_discards_first_response() {
        let mut detail = TrainDetail::new();
        let first = detail.open(521, date());
        let second = detail.open(521, date());
        assert_eq!(first.key, second.key);
        assert!(!detail.complete(first, Ok(None)));
        assert!(detail.complete(second, Ok(None)));
    }

    #[test]
    fn date_change_rekeys_open_panel() {
        let mut detail = TrainDetail::new();
        let first = detail.open(521, date());

        let second = detail.set_date(next_day()).unwrap();
        assert_eq!(second.key.date, next_day());
        assert_eq!(second.key.train_id, 521);

        assert!(!detail.complete(first, Ok(Some(train_with_stops(3, 0)))));
        assert!(detail.complete(second, Ok(Some(train_with_stops(3, 1)))));
    }

    #[test]
    fn date_change_on_closed_or_same_date_is_noop() {
        let mut detail = TrainDetail::new();
        assert!(detail.set_date(next_day()).is_none());

        detail.open(521, date());
        assert!(detail.set_date(date()).is_none());
    }

    #[test]
    fn close_discards_in_flight() {
        let mut detail = TrainDetail::new();
        let ticket = detail.open(521, date());
        detail.close();
        assert!(!detail.complete(ticket, Ok(Some(train_with_stops(3, 0)))));
        assert_eq!(detail.phase(), &DetailPhase::Closed);
    }

    #[test]
    fn long_run_collapses_until_toggled() {
        let mut detail = TrainDetail::new();
        let ticket = detail.open(521, date());
        detail.complete(ticket, Ok(Some(train_with_stops(7, 2))));

        assert!(detail.is_collapsed());
        assert!(detail.visible_passed_stops().is_empty());

        detail.toggle_earlier_stops();
        assert!(!detail.is_collapsed());
        assert_eq!(detail.visible_passed_stops().len(), 2);
    }

    #[test]
    fn short_run_never_collapses() {
        let mut detail = TrainDetail::new();
        let ticket = detail.open(521, date());
        detail.complete(ticket, Ok(Some(train_with_stops(5, 2))));
        assert!(!detail.is_collapsed());
        assert_eq!(detail.visible_passed_stops().len(), 2);
    }

    #[test]
    fn opening_resets_toggle() {
        let mut detail = TrainDetail::new();
        let ticket = detail.open(521, date());
        detail.complete(ticket, Ok(Some(train_with_stops(7, 2))));
        detail.toggle_earlier_stops();
        assert!(detail.show_earlier_stops());

        detail.open(4412, date());
        assert!(!detail.show_earlier_stops());
        assert_eq!(detail.information(), None);
    }
}
