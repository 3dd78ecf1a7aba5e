//! Remote service response DTOs.
//!
//! These map directly onto the JSON the timetable host returns. Field names
//! are the upstream's Portuguese ones. `Option` is used liberally because the
//! service sends `null` for many fields rather than omitting them.

use serde::Deserialize;

/// Response from `ip.getStations`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationSearchResponse {
    #[serde(default)]
    pub response: Option<Vec<StationDto>>,
}

/// A station search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    #[serde(rename = "NodeID")]
    pub node_id: i64,

    #[serde(rename = "Nome")]
    pub name: String,

    /// Relevance distance of the match.
    #[serde(rename = "Distancia", default)]
    pub distance: Option<f64>,
}

/// Response from `ip.getTimetables`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableResponse {
    #[serde(default)]
    pub response: Option<Vec<TimetableNode>>,
}

/// Departures for one station node. Only the first node is ever used.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableNode {
    #[serde(rename = "NodeID")]
    pub node_id: Option<i64>,

    #[serde(rename = "NodesComboioTabelsPartidasChegadas", default)]
    pub departures: Option<Vec<DepartureDto>>,
}

/// A departure row as sent upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartureDto {
    /// Whether the train has already called at the station.
    #[serde(rename = "ComboioPassou", default)]
    pub has_passed: Option<bool>,

    /// Display time ("14:32").
    #[serde(rename = "DataHoraPartidaChegada")]
    pub scheduled_time: String,

    /// Sortable timestamp variant of the scheduled time.
    #[serde(rename = "DataHoraPartidaChegada_ToOrderBy", default)]
    pub order_by: Option<String>,

    /// Date the service runs on.
    #[serde(rename = "DataRealizacao", default)]
    pub service_date: Option<String>,

    #[serde(rename = "EstacaoDestino")]
    pub destination_id: i64,

    #[serde(rename = "EstacaoOrigem")]
    pub origin_id: i64,

    #[serde(rename = "NComboio1")]
    pub train_id: i64,

    #[serde(rename = "NComboio2", default)]
    pub secondary_train_id: Option<i64>,

    #[serde(rename = "NomeEstacaoDestino")]
    pub destination_name: String,

    #[serde(rename = "NomeEstacaoOrigem")]
    pub origin_name: String,

    /// Free-text notes: delays, cancellations, platform changes.
    #[serde(rename = "Observacoes", default)]
    pub observations: Option<String>,

    #[serde(rename = "Operador", default)]
    pub operator: Option<String>,

    #[serde(rename = "TipoServico", default)]
    pub service_type: Option<String>,
}

/// Response from `ip.getTrainInformation`. `response` is `null` for
/// unknown trains.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainInformationResponse {
    #[serde(default)]
    pub response: Option<TrainInformationDto>,
}

/// Train detail as sent upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainInformationDto {
    #[serde(rename = "TipoServico", default)]
    pub service_type: Option<String>,

    #[serde(rename = "Operador", default)]
    pub operator: Option<String>,

    #[serde(rename = "DuracaoViagem", default)]
    pub duration: Option<String>,

    #[serde(rename = "SituacaoComboio", default)]
    pub situation: Option<String>,

    #[serde(rename = "Origem", default)]
    pub origin: Option<String>,

    #[serde(rename = "Destino", default)]
    pub destination: Option<String>,

    #[serde(rename = "NodesPassagemComboio", default)]
    pub stops: Option<Vec<TrainStopDto>>,
}

/// A stop in a train's run.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainStopDto {
    #[serde(rename = "NodeID")]
    pub node_id: i64,

    #[serde(rename = "NomeEstacao")]
    pub station_name: String,

    #[serde(rename = "HoraProgramada", default)]
    pub scheduled_time: Option<String>,

    #[serde(rename = "ComboioPassou", default)]
    pub has_passed: Option<bool>,
}
