//! Service type catalogue.
//!
//! The upstream service classifies trains with short codes such as `IC` or
//! `URB|SUBUR`. The set is closed for filtering purposes, but departures may
//! still carry codes we don't know about; those are displayed raw.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A category of passenger train service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ServiceType {
    Internacional,
    Alfa,
    Intercidades,
    InterRegional,
    Regional,
    UrbanSuburban,
    Especial,
}

/// Badge styling for a service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Primary,
    Secondary,
    Outline,
}

impl BadgeStyle {
    /// CSS class used by the templates.
    pub fn css_class(self) -> &'static str {
        match self {
            BadgeStyle::Primary => "badge-primary",
            BadgeStyle::Secondary => "badge-secondary",
            BadgeStyle::Outline => "badge-outline",
        }
    }
}

impl ServiceType {
    /// All service types, in display order.
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Internacional,
        ServiceType::Alfa,
        ServiceType::Intercidades,
        ServiceType::InterRegional,
        ServiceType::Regional,
        ServiceType::UrbanSuburban,
        ServiceType::Especial,
    ];

    /// The full set, used as the default selection.
    pub fn all() -> BTreeSet<ServiceType> {
        Self::ALL.into_iter().collect()
    }

    /// Upstream code, as sent in timetable requests.
    pub fn code(self) -> &'static str {
        match self {
            ServiceType::Internacional => "INTERNACIONAL",
            ServiceType::Alfa => "ALFA",
            ServiceType::Intercidades => "IC",
            ServiceType::InterRegional => "IR",
            ServiceType::Regional => "REGIONAL",
            ServiceType::UrbanSuburban => "URB|SUBUR",
            ServiceType::Especial => "ESPECIAL",
        }
    }

    /// Long label for the filter selector.
    pub fn label(self) -> &'static str {
        match self {
            ServiceType::Internacional => "Internacional",
            ServiceType::Alfa => "Alfa Pendular",
            ServiceType::Intercidades => "Intercidades",
            ServiceType::InterRegional => "Inter-Regional",
            ServiceType::Regional => "Regional",
            ServiceType::UrbanSuburban => "Urbano/Suburbano",
            ServiceType::Especial => "Especial",
        }
    }

    /// Short label for the timetable's service column.
    pub fn short_label(self) -> &'static str {
        match self {
            ServiceType::Internacional => "Internacional",
            ServiceType::Alfa => "Alfa",
            ServiceType::Intercidades => "IC",
            ServiceType::InterRegional => "IR",
            ServiceType::Regional => "Regional",
            ServiceType::UrbanSuburban => "Urbano",
            ServiceType::Especial => "Especial",
        }
    }

    pub fn badge(self) -> BadgeStyle {
        match self {
            ServiceType::Alfa | ServiceType::Intercidades => BadgeStyle::Primary,
            ServiceType::UrbanSuburban => BadgeStyle::Secondary,
            _ => BadgeStyle::Outline,
        }
    }

    /// Look up a code, returning `None` for codes outside the catalogue.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl FromStr for ServiceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| DomainError::UnknownServiceType(s.to_string()))
    }
}

impl TryFrom<String> for ServiceType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Join service codes the way the timetable endpoint expects ("IC, IR").
pub fn join_codes<'a>(types: impl IntoIterator<Item = &'a ServiceType>) -> String {
    types
        .into_iter()
        .map(|t| t.code())
        .collect::<Vec<_>>()
        .join(", ")
}
