//! The single user session.
//!
//! [`Session`] is synchronous: it applies filter actions, persists what
//! changed, and hands back the fetches that should now run.
//! [`SessionHandle`] puts it behind an async mutex and performs those fetches
//! against a [`TimetableSource`], never holding the lock across a request.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::domain::{Departure, TrainId, TrainInformation};
use crate::fetch::{DetailTicket, FetchTicket, TimetableFetch, TimetableSource, TrainDetail};
use crate::ip::IpError;
use crate::prefs::Preferences;
use crate::selection::{
    DestinationSummary, FilterAction, FilterState, available_destinations, filtered_departures,
};

/// A request the session wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingFetch {
    Timetable(FetchTicket),
    Detail(DetailTicket),
}

/// Filters, fetched data, and saved preferences for one user.
pub struct Session {
    filters: FilterState,
    timetable: TimetableFetch,
    detail: TrainDetail,
    prefs: Preferences,
}

impl Session {
    /// Start a session from saved preferences, dated `today`.
    pub fn new(prefs: Preferences, today: NaiveDate) -> Self {
        let filters = prefs.load_filters(today);
        Self {
            filters,
            timetable: TimetableFetch::new(),
            detail: TrainDetail::new(),
            prefs,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn timetable(&self) -> &TimetableFetch {
        &self.timetable
    }

    pub fn detail(&self) -> &TrainDetail {
        &self.detail
    }

    /// Initial fetch, if the restored filters are ready.
    pub fn mount(&mut self) -> Option<PendingFetch> {
        self.timetable
            .begin(&self.filters)
            .map(PendingFetch::Timetable)
    }

    /// Re-issue the timetable fetch for the current filters.
    pub fn refresh(&mut self) -> Option<PendingFetch> {
        self.mount()
    }

    /// Apply a filter action: update state, save the touched slots, and
    /// return the fetches the change calls for.
    pub fn dispatch(&mut self, action: FilterAction) -> Vec<PendingFetch> {
        let (next, effects) = self.filters.apply(action);
        let date_changed = next.date != self.filters.date;
        self.filters = next;

        if effects.persist.any() {
            self.prefs.persist(&self.filters, effects.persist);
        }

        let mut pending = Vec::new();
        if effects.refetch {
            pending.extend(self.mount());
        }
        if date_changed {
            pending.extend(self.detail.set_date(self.filters.date).map(PendingFetch::Detail));
        }
        pending
    }

    /// Open the detail panel for a train on the selected date.
    pub fn open_train(&mut self, train_id: TrainId) -> PendingFetch {
        PendingFetch::Detail(self.detail.open(train_id, self.filters.date))
    }

    pub fn close_train(&mut self) {
        self.detail.close();
    }

    pub fn toggle_earlier_stops(&mut self) {
        self.detail.toggle_earlier_stops();
    }

    /// Hand back a timetable result. Returns `false` if it was stale.
    pub fn complete_timetable(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Departure>, IpError>,
    ) -> bool {
        self.timetable.complete(ticket, result)
    }

    /// Hand back a train detail result. Returns `false` if it was stale.
    pub fn complete_detail(
        &mut self,
        ticket: DetailTicket,
        result: Result<Option<TrainInformation>, IpError>,
    ) -> bool {
        self.detail.complete(ticket, result)
    }

    /// Departures after the destination filter.
    pub fn visible_departures(&self) -> Cow<'_, [Departure]> {
        filtered_departures(
            self.timetable.departures(),
            &self.filters.selected_destinations,
        )
    }

    /// Destinations present in the current result set.
    pub fn available_destinations(&self) -> Vec<String> {
        available_destinations(self.timetable.departures())
    }

    pub fn destination_summary(&self) -> DestinationSummary {
        DestinationSummary::new(
            &self.filters.selected_destinations,
            &self.available_destinations(),
        )
    }
}

/// Shared handle to the session plus the source it fetches from.
pub struct SessionHandle<S> {
    session: Arc<Mutex<Session>>,
    source: Arc<S>,
}

impl<S> Clone for SessionHandle<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: TimetableSource> SessionHandle<S> {
    pub fn new(session: Session, source: Arc<S>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            source,
        }
    }

    /// Lock the session for reading or for a synchronous change.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().await
    }

    /// Run the initial fetch for restored filters.
    pub async fn mount(&self) {
        let pending = self.lock().await.mount();
        if pending.is_none() {
            info!("no saved station and service types; waiting for a selection");
        }
        self.run(pending).await;
    }

    pub async fn refresh(&self) {
        let pending = self.lock().await.refresh();
        self.run(pending).await;
    }

    pub async fn dispatch(&self, action: FilterAction) {
        let pending = self.lock().await.dispatch(action);
        self.run(pending).await;
    }

    pub async fn open_train(&self, train_id: TrainId) {
        let pending = self.lock().await.open_train(train_id);
        self.run([pending]).await;
    }

    pub async fn close_train(&self) {
        self.lock().await.close_train();
    }

    pub async fn toggle_earlier_stops(&self) {
        self.lock().await.toggle_earlier_stops();
    }

    /// Perform fetches with the lock released, then hand each result back.
    pub async fn run(&self, pending: impl IntoIterator<Item = PendingFetch>) {
        for fetch in pending {
            match fetch {
                PendingFetch::Timetable(ticket) => {
                    let result = self.source.timetable(&ticket.request).await;
                    let accepted = self.lock().await.complete_timetable(ticket, result);
                    debug!(accepted, "timetable response handled");
                }
                PendingFetch::Detail(ticket) => {
                    let key = ticket.key;
                    let result = self.source.train_information(key.train_id, key.date).await;
                    let accepted = self.lock().await.complete_detail(ticket, result);
                    debug!(accepted, "train detail response handled");
                }
            }
        }
    }
}
