//! Client for the remote timetable service.
//!
//! The service is a JSON proxy in front of Infraestruturas de Portugal's
//! departure boards. It is treated as unreliable and uncontrolled:
//! - No authentication, plain HTTP GET with every argument in the path
//! - Station ids are the upstream `NodeID` integers
//! - Times arrive pre-formatted for display ("14:32"); we never parse them
//! - Delay and cancellation only appear as free text in `Observacoes`

mod client;
mod convert;
mod error;
mod types;

pub use client::{
    DEFAULT_BASE_URL, IpClient, IpConfig, TimetableRequest, stations_path, timetable_path,
    train_information_path,
};
pub use error::IpError;
pub use types::{
    DepartureDto, StationDto, StationSearchResponse, TimetableNode, TimetableResponse,
    TrainInformationDto, TrainInformationResponse, TrainStopDto,
};
