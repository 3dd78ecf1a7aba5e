//! Filter and selection state.
//!
//! Holds what the user has chosen (station, service types, date,
//! destinations, visible columns) and derives what to show from it.

mod derive;
mod state;

pub use derive::{DestinationSummary, available_destinations, can_search, filtered_departures};
pub use state::{Effects, FilterAction, FilterState, PersistSlots};
