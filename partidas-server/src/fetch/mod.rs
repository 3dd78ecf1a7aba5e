//! Fetch orchestration.
//!
//! The timetable and train detail machines are pure: they decide when a
//! request is needed and whether its answer is still wanted, while the
//! session performs the actual I/O through a [`TimetableSource`]. Station
//! search is debounced with a cancellable task.

mod debounce;
pub(crate) mod source;
mod station_search;
mod timetable;
mod train_detail;

pub use debounce::Debouncer;
pub use source::TimetableSource;
pub use station_search::{SearchOutcome, SearchSettings, StationSearch};
pub use timetable::{FetchPhase, FetchTicket, TimetableFetch};
pub use train_detail::{DETAIL_ERROR_MESSAGE, DetailKey, DetailPhase, DetailTicket, TrainDetail};
