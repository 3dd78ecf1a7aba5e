//! Filter/selection state and its transitions.
//!
//! `FilterState` is an immutable value. User input is expressed as a
//! [`FilterAction`] and applied with [`FilterState::apply`], which returns
//! the next state together with the side effects the caller must perform
//! (refetching the timetable, persisting changed preference slots).

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{ColumnId, ColumnVisibility, ServiceType, Station};

use super::derive::can_search;

/// Everything the user has chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub station: Option<Station>,
    pub service_types: BTreeSet<ServiceType>,
    pub date: NaiveDate,
    /// Empty means "show every destination".
    pub selected_destinations: BTreeSet<String>,
    pub columns: ColumnVisibility,
}

/// A user-initiated change to the filters.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Select a station, or clear it with `None`.
    SelectStation(Option<Station>),
    SetServiceTypes(BTreeSet<ServiceType>),
    ToggleServiceType(ServiceType),
    SelectAllServiceTypes,
    ClearServiceTypes,
    SetDate(NaiveDate),
    SetDestinations(BTreeSet<String>),
    ToggleDestination(String),
    ClearDestinations,
    SetColumns(ColumnVisibility),
    ToggleColumn(ColumnId),
}

/// Preference slots touched by a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSlots {
    pub station: bool,
    pub service_types: bool,
    pub columns: bool,
    pub destinations: bool,
}

impl PersistSlots {
    pub fn any(&self) -> bool {
        self.station || self.service_types || self.columns || self.destinations
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// A fetch-relevant input (station, service types, date) changed.
    pub refetch: bool,
    pub persist: PersistSlots,
}

impl FilterState {
    /// Initial state with the application defaults: no station, every
    /// service type, no destination filter, default columns.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            station: None,
            service_types: ServiceType::all(),
            date,
            selected_destinations: BTreeSet::new(),
            columns: ColumnVisibility::default(),
        }
    }

    /// Whether a timetable fetch may be issued for these filters.
    pub fn can_search(&self) -> bool {
        can_search(self.station.as_ref(), &self.service_types)
    }

    /// Apply an action, returning the next state and the effects to run.
    pub fn apply(&self, action: FilterAction) -> (FilterState, Effects) {
        let mut next = self.clone();
        let mut effects = Effects::default();

        match action {
            FilterAction::SelectStation(station) => {
                // Destinations are station-scoped, so a station change always
                // drops them, even if the same station is picked again.
                next.station = station;
                next.selected_destinations.clear();
                effects.refetch = true;
                effects.persist.station = true;
                effects.persist.destinations = true;
            }
            FilterAction::SetServiceTypes(types) => next.service_types = types,
            FilterAction::ToggleServiceType(t) => {
                if !next.service_types.remove(&t) {
                    next.service_types.insert(t);
                }
            }
            FilterAction::SelectAllServiceTypes => next.service_types = ServiceType::all(),
            FilterAction::ClearServiceTypes => next.service_types.clear(),
            FilterAction::SetDate(date) => next.date = date,
            FilterAction::SetDestinations(destinations) => {
                next.selected_destinations = destinations;
                effects.persist.destinations = true;
            }
            FilterAction::ToggleDestination(name) => {
                if !next.selected_destinations.remove(&name) {
                    next.selected_destinations.insert(name);
                }
                effects.persist.destinations = true;
            }
            FilterAction::ClearDestinations => {
                next.selected_destinations.clear();
                effects.persist.destinations = true;
            }
            FilterAction::SetColumns(columns) => {
                next.columns = columns;
                effects.persist.columns = true;
            }
            FilterAction::ToggleColumn(column) => {
                next.columns = next.columns.toggled(column);
                effects.persist.columns = true;
            }
        }

        if next.service_types != self.service_types {
            effects.refetch = true;
            effects.persist.service_types = true;
        }
        if next.date != self.date {
            effects.refetch = true;
        }

        (next, effects)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_station() -> impl Strategy<Value = Option<Station>> {
        prop::option::of(
            (1i64..10_000, "[A-Z][a-z]{2,10}").prop_map(|(id, name)| Station::new(id, name, 0.0)),
        )
    }

    fn arb_destinations() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[A-Z][a-z]{2,8}", 0..6)
    }

    proptest! {
        /// Selected destinations are always empty right after a station change.
        #[test]
        fn station_change_always_resets(
            first in arb_station(),
            second in arb_station(),
            destinations in arb_destinations(),
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
            let state = FilterState::new(date).apply(FilterAction::SelectStation(first)).0;
            let state = state.apply(FilterAction::SetDestinations(destinations)).0;
            let (next, _) = state.apply(FilterAction::SelectStation(second));
            prop_assert!(next.selected_destinations.is_empty());
        }
    }
}
