//! Web layer for the departures lookup.
//!
//! Serves the single page and a JSON API over the same session.

mod dto;
mod form;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use form::FormFields;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
