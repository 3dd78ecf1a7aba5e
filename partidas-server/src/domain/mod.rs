//! Domain types for the departures lookup.
//!
//! These are the validated, display-ready forms of what the remote
//! timetable service returns, plus the small closed vocabularies the user
//! filters by (service types, table columns).

mod column;
mod date;
mod departure;
mod error;
mod service_type;
mod station;
mod status;
mod train;

pub use column::{ColumnId, ColumnVisibility};
pub use date::{format_date, parse_date};
pub use departure::{Departure, TrainId};
pub use error::DomainError;
pub use service_type::{BadgeStyle, ServiceType, join_codes};
pub use station::{Station, StationId};
pub use status::{DepartureStatus, is_cancelled, parse_delay};
pub use train::{COLLAPSE_THRESHOLD, TrainInformation, TrainStop, should_collapse};
