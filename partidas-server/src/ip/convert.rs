//! Conversion from upstream DTOs to domain types.
//!
//! The conversions are infallible: missing optional fields get neutral
//! defaults (empty strings, `false`), matching how the service's own web
//! front end treats them.

use crate::domain::{Departure, Station, StationId, TrainInformation, TrainStop};

use super::types::{
    DepartureDto, StationDto, StationSearchResponse, TimetableResponse, TrainInformationDto,
    TrainStopDto,
};

impl From<StationDto> for Station {
    fn from(dto: StationDto) -> Self {
        Station::new(dto.node_id, dto.name, dto.distance.unwrap_or(0.0))
    }
}

impl From<DepartureDto> for Departure {
    fn from(dto: DepartureDto) -> Self {
        Departure {
            train_id: dto.train_id,
            secondary_train_id: dto.secondary_train_id.unwrap_or(0),
            scheduled_time: dto.scheduled_time,
            has_passed: dto.has_passed.unwrap_or(false),
            origin_id: StationId(dto.origin_id),
            origin_name: dto.origin_name,
            destination_id: StationId(dto.destination_id),
            destination_name: dto.destination_name,
            service_code: dto.service_type.unwrap_or_default(),
            operator: dto.operator.unwrap_or_default(),
            observations: dto.observations.unwrap_or_default(),
            service_date: dto.service_date,
        }
    }
}

impl From<TrainStopDto> for TrainStop {
    fn from(dto: TrainStopDto) -> Self {
        TrainStop {
            station_id: StationId(dto.node_id),
            station_name: dto.station_name,
            scheduled_time: dto.scheduled_time.unwrap_or_default(),
            has_passed: dto.has_passed.unwrap_or(false),
        }
    }
}

impl From<TrainInformationDto> for TrainInformation {
    fn from(dto: TrainInformationDto) -> Self {
        TrainInformation {
            service_type: dto.service_type.unwrap_or_default(),
            operator: dto.operator.unwrap_or_default(),
            duration: dto.duration.filter(|d| !d.trim().is_empty()),
            situation: dto.situation.filter(|s| !s.trim().is_empty()),
            origin: dto.origin.unwrap_or_default(),
            destination: dto.destination.unwrap_or_default(),
            stops: dto
                .stops
                .unwrap_or_default()
                .into_iter()
                .map(TrainStop::from)
                .collect(),
        }
    }
}

/// Extract the stations from a search response.
pub fn convert_stations(response: StationSearchResponse) -> Vec<Station> {
    response
        .response
        .unwrap_or_default()
        .into_iter()
        .map(Station::from)
        .collect()
}

/// Extract the departures of the first node of a timetable response.
///
/// A missing or empty node list yields no departures.
pub fn convert_timetable(response: TimetableResponse) -> Vec<Departure> {
    response
        .response
        .and_then(|nodes| nodes.into_iter().next())
        .and_then(|node| node.departures)
        .unwrap_or_default()
        .into_iter()
        .map(Departure::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::types::TimetableNode;

    fn departure_dto(train_id: i64) -> DepartureDto {
        DepartureDto {
            has_passed: None,
            scheduled_time: "09:45".to_string(),
            order_by: None,
            service_date: None,
            destination_id: 9402006,
            origin_id: 9431039,
            train_id,
            secondary_train_id: None,
            destination_name: "Porto - Campanhã".to_string(),
            origin_name: "Lisboa - Santa Apolónia".to_string(),
            observations: None,
            operator: None,
            service_type: Some("ALFA".to_string()),
        }
    }

    #[test]
    fn departure_defaults() {
        let d = Departure::from(departure_dto(131));
        assert_eq!(d.train_id, 131);
        assert_eq!(d.secondary_train_id, 0);
        assert!(!d.has_passed);
        assert_eq!(d.observations, "");
        assert_eq!(d.operator, "");
        assert_eq!(d.service_code, "ALFA");
        assert_eq!(d.destination_id, StationId(9402006));
    }

    #[test]
    fn only_first_node_is_used() {
        let response = TimetableResponse {
            response: Some(vec![
                TimetableNode {
                    node_id: Some(1),
                    departures: Some(vec![departure_dto(1), departure_dto(2)]),
                },
                TimetableNode {
                    node_id: Some(2),
                    departures: Some(vec![departure_dto(3)]),
                },
            ]),
        };
        let departures = convert_timetable(response);
        let ids: Vec<_> = departures.iter().map(|d| d.train_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn missing_nodes_yield_nothing() {
        assert!(convert_timetable(TimetableResponse { response: None }).is_empty());
        assert!(convert_timetable(TimetableResponse { response: Some(vec![]) }).is_empty());
        let no_list = TimetableResponse {
            response: Some(vec![TimetableNode {
                node_id: Some(1),
                departures: None,
            }]),
        };
        assert!(convert_timetable(no_list).is_empty());
    }

    #[test]
    fn blank_detail_notices_are_dropped() {
        let dto = TrainInformationDto {
            service_type: Some("IC".into()),
            operator: Some("CP".into()),
            duration: Some("".into()),
            situation: Some("  ".into()),
            origin: Some("Lisboa".into()),
            destination: Some("Faro".into()),
            stops: None,
        };
        let info = TrainInformation::from(dto);
        assert_eq!(info.duration, None);
        assert_eq!(info.situation, None);
        assert!(info.stops.is_empty());
    }

    #[test]
    fn stations_convert() {
        let response = StationSearchResponse {
            response: Some(vec![StationDto {
                node_id: 9430007,
                name: "Lisboa - Oriente".into(),
                distance: None,
            }]),
        };
        let stations = convert_stations(response);
        assert_eq!(stations, vec![Station::new(9430007, "Lisboa - Oriente", 0.0)]);
    }
}
