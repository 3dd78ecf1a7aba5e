//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedIpClient;
use crate::fetch::{SearchSettings, StationSearch};
use crate::session::{Session, SessionHandle};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The user's session and the client it fetches through
    pub session: SessionHandle<CachedIpClient>,

    /// Debounced station search over the same client
    pub search: Arc<StationSearch<CachedIpClient>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(session: Session, client: CachedIpClient, search: &SearchSettings) -> Self {
        let client = Arc::new(client);
        Self {
            search: Arc::new(StationSearch::new(Arc::clone(&client), search)),
            session: SessionHandle::new(session, client),
        }
    }
}
