//! Persisted user preferences.
//!
//! Four independent JSON slots: the selected station, the selected service
//! types, column visibility, and the selected destinations. The date is not
//! persisted; a fresh session always starts on today.
//!
//! Loading is infallible. A missing slot means "no saved preference"; a
//! malformed one is logged and treated the same way.

mod error;
mod store;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{ColumnVisibility, ServiceType, Station};
use crate::selection::{FilterState, PersistSlots};

pub use error::PrefsError;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Storage keys for the four slots.
pub mod keys {
    pub const STATION: &str = "ip-partidas-station";
    pub const SERVICE_TYPES: &str = "ip-partidas-service-types";
    pub const COLUMN_VISIBILITY: &str = "ip-partidas-column-visibility";
    pub const DESTINATIONS: &str = "ip-partidas-destinations";
}

/// Typed access to the preference slots over any key/value backend.
pub struct Preferences {
    store: Box<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Preferences that live only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn load_station(&self) -> Option<Station> {
        self.load_slot(keys::STATION)
    }

    /// Save the station, or remove the slot when there is none.
    pub fn save_station(&self, station: Option<&Station>) -> Result<(), PrefsError> {
        match station {
            Some(station) => self.save_slot(keys::STATION, station),
            None => self.store.remove(keys::STATION),
        }
    }

    /// Saved service types. Codes no longer in the catalogue are dropped.
    pub fn load_service_types(&self) -> Option<BTreeSet<ServiceType>> {
        let codes: Vec<String> = self.load_slot(keys::SERVICE_TYPES)?;
        let types = codes
            .iter()
            .filter_map(|code| {
                let parsed = ServiceType::from_code(code);
                if parsed.is_none() {
                    warn!(code = %code, "ignoring unknown saved service type");
                }
                parsed
            })
            .collect();
        Some(types)
    }

    pub fn save_service_types(&self, types: &BTreeSet<ServiceType>) -> Result<(), PrefsError> {
        let codes: Vec<&str> = types.iter().map(|t| t.code()).collect();
        self.save_slot(keys::SERVICE_TYPES, &codes)
    }

    pub fn load_columns(&self) -> Option<ColumnVisibility> {
        self.load_slot(keys::COLUMN_VISIBILITY)
    }

    pub fn save_columns(&self, columns: &ColumnVisibility) -> Result<(), PrefsError> {
        self.save_slot(keys::COLUMN_VISIBILITY, columns)
    }

    pub fn load_destinations(&self) -> Option<BTreeSet<String>> {
        let names: Vec<String> = self.load_slot(keys::DESTINATIONS)?;
        Some(names.into_iter().collect())
    }

    pub fn save_destinations(&self, destinations: &BTreeSet<String>) -> Result<(), PrefsError> {
        let names: Vec<&String> = destinations.iter().collect();
        self.save_slot(keys::DESTINATIONS, &names)
    }

    /// Build the starting filters from saved slots, using defaults for
    /// anything missing or unreadable.
    pub fn load_filters(&self, today: NaiveDate) -> FilterState {
        let mut state = FilterState::new(today);
        state.station = self.load_station();
        if let Some(types) = self.load_service_types() {
            state.service_types = types;
        }
        if let Some(columns) = self.load_columns() {
            state.columns = columns;
        }
        if let Some(destinations) = self.load_destinations() {
            state.selected_destinations = destinations;
        }
        state
    }

    /// Write the slots flagged in `slots`. Failures are logged, not returned:
    /// losing a preference must never break the session.
    pub fn persist(&self, state: &FilterState, slots: PersistSlots) {
        if slots.station {
            log_failure(keys::STATION, self.save_station(state.station.as_ref()));
        }
        if slots.service_types {
            log_failure(keys::SERVICE_TYPES, self.save_service_types(&state.service_types));
        }
        if slots.columns {
            log_failure(keys::COLUMN_VISIBILITY, self.save_columns(&state.columns));
        }
        if slots.destinations {
            log_failure(
                keys::DESTINATIONS,
                self.save_destinations(&state.selected_destinations),
            );
        }
    }

    fn load_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed saved preference");
                None
            }
        }
    }

    fn save_slot<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PrefsError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }
}

fn log_failure(key: &str, result: Result<(), PrefsError>) {
    if let Err(e) = result {
        warn!(key, error = %e, "failed to save preference");
    }
}
