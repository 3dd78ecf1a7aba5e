//! Debounced station search.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::Station;

use super::debounce::Debouncer;
use super::source::TimetableSource;

/// Default quiet period before a query is sent.
const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default minimum query length, in characters.
const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Tuning for the station search box.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Quiet period before a query is sent.
    pub debounce: Duration,
    /// Shorter queries are never sent.
    pub min_query_chars: usize,
}

impl SearchSettings {
    pub fn new() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_min_query_chars(mut self, n: usize) -> Self {
        self.min_query_chars = n;
        self
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// What a search call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Query too short to send; the result list should be cleared.
    TooShort,
    /// Stations found. Empty on no match and on failure.
    Found(Vec<Station>),
    /// A newer query replaced this one before it was sent.
    Superseded,
}

impl SearchOutcome {
    /// The stations to display, treating every non-result as empty.
    pub fn into_stations(self) -> Vec<Station> {
        match self {
            SearchOutcome::Found(stations) => stations,
            SearchOutcome::TooShort | SearchOutcome::Superseded => Vec::new(),
        }
    }
}

/// Station search box behaviour over a [`TimetableSource`].
pub struct StationSearch<S> {
    source: Arc<S>,
    debouncer: Debouncer,
    min_query_chars: usize,
}

impl<S: TimetableSource + 'static> StationSearch<S> {
    pub fn new(source: Arc<S>, settings: &SearchSettings) -> Self {
        Self {
            source,
            debouncer: Debouncer::new(settings.debounce),
            min_query_chars: settings.min_query_chars,
        }
    }

    /// Search for `query` once the user has stopped typing.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        if query.chars().count() < self.min_query_chars {
            self.debouncer.cancel();
            return SearchOutcome::TooShort;
        }

        let source = Arc::clone(&self.source);
        let owned = query.to_string();
        let result = self
            .debouncer
            .run(async move { source.search_stations(&owned).await })
            .await;

        match result {
            None => {
                debug!(query, "station search superseded");
                SearchOutcome::Superseded
            }
            Some(Ok(stations)) => SearchOutcome::Found(stations),
            Some(Err(e)) => {
                warn!(query, error = %e, "station search failed");
                SearchOutcome::Found(Vec::new())
            }
        }
    }
}
