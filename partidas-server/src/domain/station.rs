//! Station types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upstream node identifier of a station.
///
/// The remote service calls these `NodeID`. They are opaque integers; the
/// only operations we need are equality and formatting into request paths.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub i64);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A station as returned by a search, or restored from preferences.
///
/// Immutable once created. Selecting a different station invalidates any
/// destination filter, since destinations only make sense relative to the
/// station whose board they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// Search relevance distance reported upstream. Not a geographic distance.
    #[serde(default)]
    pub distance: f64,
}

impl Station {
    pub fn new(id: i64, name: impl Into<String>, distance: f64) -> Self {
        Self {
            id: StationId(id),
            name: name.into(),
            distance,
        }
    }
}
