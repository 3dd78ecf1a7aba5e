//! Timetable fetch state machine.
//!
//! The machine never performs I/O. A caller asks it to [`begin`] a fetch,
//! performs the request itself, and hands the result back with
//! [`complete`]. Each begin bumps a generation counter; a completion whose
//! ticket is not from the latest generation is stale and is dropped.
//!
//! [`begin`]: TimetableFetch::begin
//! [`complete`]: TimetableFetch::complete

use tracing::{debug, warn};

use crate::domain::Departure;
use crate::ip::{IpError, TimetableRequest};
use crate::selection::FilterState;

/// Where the timetable is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing fetched yet.
    Idle,
    Loading,
    /// Last fetch succeeded. Its result may be empty.
    Loaded,
    /// Last fetch failed. Shown the same way as an empty `Loaded`.
    Failed,
}

/// Permission to run one timetable request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub request: TimetableRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The departures currently on display and the fetch that produced them.
#[derive(Debug, Clone)]
pub struct TimetableFetch {
    phase: FetchPhase,
    generation: u64,
    has_searched: bool,
    departures: Vec<Departure>,
}

impl TimetableFetch {
    pub fn new() -> Self {
        Self {
            phase: FetchPhase::Idle,
            generation: 0,
            has_searched: false,
            departures: Vec::new(),
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Whether any fetch has ever been started. Never reverts.
    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Departures from the latest accepted fetch.
    ///
    /// While a new fetch is loading, the previous result stays visible.
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    /// Start a fetch for `filters`, superseding any fetch in flight.
    ///
    /// Returns `None`, leaving everything untouched, when the filters are not
    /// ready to search.
    pub fn begin(&mut self, filters: &FilterState) -> Option<FetchTicket> {
        if !filters.can_search() {
            return None;
        }
        let station = filters.station.as_ref()?;

        self.generation += 1;
        self.phase = FetchPhase::Loading;
        self.has_searched = true;

        let request = TimetableRequest {
            station: station.id,
            date: filters.date,
            service_types: filters.service_types.iter().copied().collect(),
        };
        debug!(
            generation = self.generation,
            station = %request.station,
            date = %request.date,
            "timetable fetch started"
        );

        Some(FetchTicket {
            generation: self.generation,
            request,
        })
    }

    /// Accept the result of a fetch. Returns `false` when the ticket is stale
    /// and the result was discarded.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Departure>, IpError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded timetable response"
            );
            return false;
        }

        match result {
            Ok(departures) => {
                debug!(count = departures.len(), "timetable loaded");
                self.departures = departures;
                self.phase = FetchPhase::Loaded;
            }
            Err(e) => {
                warn!(station = %ticket.request.station, error = %e, "timetable fetch failed");
                self.departures.clear();
                self.phase = FetchPhase::Failed;
            }
        }
        true
    }
}

impl Default for TimetableFetch {
    fn default() -> Self {
        Self::new()
    }
}
