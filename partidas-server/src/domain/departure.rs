//! Departure records.

use serde::Serialize;

use super::status::{DepartureStatus, parse_delay};
use super::{ServiceType, StationId};

/// Upstream train number.
pub type TrainId = i64;

/// One scheduled train event at the queried station.
///
/// Produced fresh on every timetable fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    /// Primary train number, used to open the train detail view.
    pub train_id: TrainId,
    /// Secondary train number (0 when the upstream has none).
    pub secondary_train_id: TrainId,
    /// Scheduled time, already formatted for display by the upstream ("14:32").
    pub scheduled_time: String,
    pub has_passed: bool,
    pub origin_id: StationId,
    pub origin_name: String,
    pub destination_id: StationId,
    pub destination_name: String,
    /// Raw upstream service code; may be outside the known catalogue.
    pub service_code: String,
    pub operator: String,
    /// Free-text annotation; empty when the upstream sends none.
    pub observations: String,
    /// Date the service runs on, as sent upstream.
    pub service_date: Option<String>,
}

impl Departure {
    /// Derived display status.
    pub fn status(&self) -> DepartureStatus {
        DepartureStatus::classify(self.has_passed, &self.observations)
    }

    /// Known service type, if the code is in the catalogue.
    pub fn service_type(&self) -> Option<ServiceType> {
        ServiceType::from_code(&self.service_code)
    }

    /// Short label for the service column. Unknown codes are shown raw.
    pub fn service_label(&self) -> &str {
        self.service_type()
            .map(|t| t.short_label())
            .unwrap_or(self.service_code.as_str())
    }

    /// Observations worth showing beside the status badge.
    ///
    /// Hidden when blank, when the row is cancelled, or when the text is
    /// just a positive delay (already shown by the badge).
    pub fn extra_observations(&self) -> Option<&str> {
        if self.observations.trim().is_empty() || self.status().is_cancelled() {
            return None;
        }

        match parse_delay(&self.observations) {
            Some(minutes) if minutes > 0 => None,
            _ => Some(self.observations.as_str()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::departure;
    use super::*;

    #[test]
    fn status_uses_classifier() {
        let mut d = departure(521, "Porto - Campanhã");
        assert_eq!(d.status(), DepartureStatus::OnTime);

        d.observations = "Circula com atraso de 4 min.".into();
        assert_eq!(d.status(), DepartureStatus::Delayed(4));

        d.has_passed = true;
        assert_eq!(d.status(), DepartureStatus::Passed);
    }

    #[test]
    fn service_label_falls_back_to_code() {
        let mut d = departure(521, "Porto - Campanhã");
        d.service_code = "URB|SUBUR".into();
        assert_eq!(d.service_label(), "Urbano");

        d.service_code = "MERCADORIAS".into();
        assert_eq!(d.service_label(), "MERCADORIAS");
        assert!(d.service_type().is_none());
    }

    #[test]
    fn extra_observations_rules() {
        let mut d = departure(521, "Porto - Campanhã");
        assert_eq!(d.extra_observations(), None);

        d.observations = "   ".into();
        assert_eq!(d.extra_observations(), None);

        d.observations = "Circula com atraso de 13 min.".into();
        assert_eq!(d.extra_observations(), None);

        d.observations = "atraso de 0 min".into();
        assert_eq!(d.extra_observations(), Some("atraso de 0 min"));

        d.observations = "Alteração de via".into();
        assert_eq!(d.extra_observations(), Some("Alteração de via"));

        d.observations = "SUPRIMIDO".into();
        assert_eq!(d.extra_observations(), None);
    }
}
