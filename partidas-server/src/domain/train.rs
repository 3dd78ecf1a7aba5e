//! Train detail: the stop-by-stop view of a single train.

use serde::Serialize;

use super::StationId;

/// Stop lists longer than this collapse their passed stops by default.
pub const COLLAPSE_THRESHOLD: usize = 6;

/// One stop of a train's run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainStop {
    pub station_id: StationId,
    pub station_name: String,
    /// Scheduled time as formatted upstream.
    pub scheduled_time: String,
    pub has_passed: bool,
}

/// Detailed information about one train on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainInformation {
    pub service_type: String,
    pub operator: String,
    /// Journey duration as formatted upstream, e.g. "02:48".
    pub duration: Option<String>,
    /// Service situation notice, e.g. a disruption message.
    pub situation: Option<String>,
    pub origin: String,
    pub destination: String,
    pub stops: Vec<TrainStop>,
}

impl TrainInformation {
    /// Whether the passed stops should be hidden until the user asks for them.
    pub fn collapses_passed_stops(&self) -> bool {
        should_collapse(&self.stops)
    }

    /// Stops already served, in run order.
    pub fn passed_stops(&self) -> impl Iterator<Item = &TrainStop> {
        self.stops.iter().filter(|s| s.has_passed)
    }

    /// Stops still to come, in run order.
    pub fn upcoming_stops(&self) -> impl Iterator<Item = &TrainStop> {
        self.stops.iter().filter(|s| !s.has_passed)
    }
}

/// Collapsing rule: long runs with at least one passed stop.
pub fn should_collapse(stops: &[TrainStop]) -> bool {
    stops.len() > COLLAPSE_THRESHOLD && stops.iter().any(|s| s.has_passed)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A train with `total` stops, the first `passed` of which are passed.
    pub fn train_with_stops(total: usize, passed: usize) -> TrainInformation {
        let stops = (0..total)
            .map(|i| TrainStop {
                station_id: StationId(9400000 + i as i64),
                station_name: format!("Estação {i}"),
                scheduled_time: format!("{:02}:00", 6 + i),
                has_passed: i < passed,
            })
            .collect();

        TrainInformation {
            service_type: "REGIONAL".to_string(),
            operator: "CP".to_string(),
            duration: Some("01:30".to_string()),
            situation: None,
            origin: "Estação 0".to_string(),
            destination: format!("Estação {}", total.saturating_sub(1)),
            stops,
        }
    }
}
