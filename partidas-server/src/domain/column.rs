//! Timetable column visibility.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A column of the departures table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnId {
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "train-status")]
    TrainStatus,
    #[serde(rename = "train-number")]
    TrainNumber,
    #[serde(rename = "service")]
    Service,
    #[serde(rename = "origin")]
    Origin,
    #[serde(rename = "destination")]
    Destination,
    #[serde(rename = "operator")]
    Operator,
}

impl ColumnId {
    /// All columns, in table order.
    pub const ALL: [ColumnId; 7] = [
        ColumnId::Time,
        ColumnId::TrainStatus,
        ColumnId::TrainNumber,
        ColumnId::Service,
        ColumnId::Origin,
        ColumnId::Destination,
        ColumnId::Operator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::Time => "time",
            ColumnId::TrainStatus => "train-status",
            ColumnId::TrainNumber => "train-number",
            ColumnId::Service => "service",
            ColumnId::Origin => "origin",
            ColumnId::Destination => "destination",
            ColumnId::Operator => "operator",
        }
    }

    /// Table header label.
    pub fn label(self) -> &'static str {
        match self {
            ColumnId::Time => "Hora",
            ColumnId::TrainStatus => "Estado",
            ColumnId::TrainNumber => "Comboio",
            ColumnId::Service => "Serviço",
            ColumnId::Origin => "Origem",
            ColumnId::Destination => "Destino",
            ColumnId::Operator => "Operador",
        }
    }

    fn visible_by_default(self) -> bool {
        !matches!(self, ColumnId::TrainNumber | ColumnId::Service)
    }
}

impl FromStr for ColumnId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::UnknownColumn(s.to_string()))
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which columns of the departures table are shown.
///
/// Always holds an entry for every [`ColumnId`]. When deserializing, missing
/// ids take their default value; unknown ids are an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<ColumnId, bool>", into = "BTreeMap<ColumnId, bool>")]
pub struct ColumnVisibility {
    columns: BTreeMap<ColumnId, bool>,
}

impl ColumnVisibility {
    /// Visibility with exactly the given columns shown.
    pub fn only(visible: impl IntoIterator<Item = ColumnId>) -> Self {
        let visible: Vec<ColumnId> = visible.into_iter().collect();
        let columns = ColumnId::ALL
            .into_iter()
            .map(|c| (c, visible.contains(&c)))
            .collect();
        Self { columns }
    }

    pub fn is_visible(&self, column: ColumnId) -> bool {
        self.columns.get(&column).copied().unwrap_or(false)
    }

    pub fn set(&mut self, column: ColumnId, visible: bool) {
        self.columns.insert(column, visible);
    }

    /// Flip one column, returning the new visibility.
    pub fn toggled(&self, column: ColumnId) -> Self {
        let mut next = self.clone();
        next.set(column, !self.is_visible(column));
        next
    }

    /// The origin → destination arrow is drawn only when both ends are shown.
    pub fn show_arrow(&self) -> bool {
        self.is_visible(ColumnId::Origin) && self.is_visible(ColumnId::Destination)
    }

    pub fn visible_count(&self) -> usize {
        self.columns.values().filter(|v| **v).count()
    }

    /// Visible columns in table order.
    pub fn visible(&self) -> Vec<ColumnId> {
        ColumnId::ALL
            .into_iter()
            .filter(|c| self.is_visible(*c))
            .collect()
    }
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self::only(ColumnId::ALL.into_iter().filter(|c| c.visible_by_default()))
    }
}

impl From<BTreeMap<ColumnId, bool>> for ColumnVisibility {
    fn from(stored: BTreeMap<ColumnId, bool>) -> Self {
        let mut visibility = Self::default();
        for (column, visible) in stored {
            visibility.set(column, visible);
        }
        visibility
    }
}

impl From<ColumnVisibility> for BTreeMap<ColumnId, bool> {
    fn from(value: ColumnVisibility) -> Self {
        value.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let v = ColumnVisibility::default();
        assert!(v.is_visible(ColumnId::Time));
        assert!(v.is_visible(ColumnId::TrainStatus));
        assert!(!v.is_visible(ColumnId::TrainNumber));
        assert!(!v.is_visible(ColumnId::Service));
        assert!(v.is_visible(ColumnId::Origin));
        assert!(v.is_visible(ColumnId::Destination));
        assert!(v.is_visible(ColumnId::Operator));
        assert_eq!(v.visible_count(), 5);
        assert!(v.show_arrow());
    }

    #[test]
    fn arrow_needs_both_ends() {
        let v = ColumnVisibility::default().toggled(ColumnId::Origin);
        assert!(!v.show_arrow());

        let v = ColumnVisibility::default().toggled(ColumnId::Destination);
        assert!(!v.show_arrow());

        let v = ColumnVisibility::only([ColumnId::Origin, ColumnId::Destination]);
        assert!(v.show_arrow());
    }

    #[test]
    fn toggle_flips_one_column() {
        let v = ColumnVisibility::default();
        let t = v.toggled(ColumnId::TrainNumber);
        assert!(t.is_visible(ColumnId::TrainNumber));
        assert_eq!(t.visible_count(), 6);
        assert_eq!(t.toggled(ColumnId::TrainNumber), v);
    }

    #[test]
    fn visible_in_table_order() {
        let v = ColumnVisibility::only([ColumnId::Operator, ColumnId::Time]);
        assert_eq!(v.visible(), vec![ColumnId::Time, ColumnId::Operator]);
    }

    #[test]
    fn parse_ids() {
        assert_eq!("train-status".parse::<ColumnId>(), Ok(ColumnId::TrainStatus));
        assert!("platform".parse::<ColumnId>().is_err());
    }

    #[test]
    fn json_roundtrip_and_partial_maps() {
        let v = ColumnVisibility::default().toggled(ColumnId::Service);
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains(r#""service":true"#));
        let back: ColumnVisibility = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        // Missing entries keep their defaults
        let partial: ColumnVisibility = serde_json::from_str(r#"{"time":false}"#).unwrap();
        assert!(!partial.is_visible(ColumnId::Time));
        assert!(partial.is_visible(ColumnId::Operator));
        assert!(!partial.is_visible(ColumnId::Service));

        // Unknown ids are a shape mismatch
        assert!(serde_json::from_str::<ColumnVisibility>(r#"{"platform":true}"#).is_err());
    }
}
