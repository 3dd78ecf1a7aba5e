//! Derived views over fetched departures.
//!
//! Pure functions, recomputed whenever their inputs change. Result sets are
//! a few hundred rows at most, so nothing here is cached or incremental.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::domain::{Departure, ServiceType, Station};

/// Whether the filters are complete enough to query the timetable.
///
/// This is the only gate for issuing a timetable fetch.
pub fn can_search(station: Option<&Station>, service_types: &BTreeSet<ServiceType>) -> bool {
    station.is_some() && !service_types.is_empty()
}

/// Distinct destination names, in Portuguese collation order.
pub fn available_destinations(departures: &[Departure]) -> Vec<String> {
    let mut names: Vec<String> = departures
        .iter()
        .map(|d| d.destination_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    names.sort_by_cached_key(|name| collation_key(name));
    names
}

/// Departures heading to one of the selected destinations.
///
/// An empty selection means "no filter": the input is returned as-is,
/// borrowed, in its original order. Otherwise this is a stable filter.
pub fn filtered_departures<'a>(
    departures: &'a [Departure],
    selected: &BTreeSet<String>,
) -> Cow<'a, [Departure]> {
    if selected.is_empty() {
        return Cow::Borrowed(departures);
    }

    Cow::Owned(
        departures
            .iter()
            .filter(|d| selected.contains(&d.destination_name))
            .cloned()
            .collect(),
    )
}

/// How a destination selection relates to what's currently available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationSummary {
    /// Selected destinations present in the current departures.
    pub selected_available: usize,
    /// Number of available destinations.
    pub available: usize,
}

impl DestinationSummary {
    pub fn new(selected: &BTreeSet<String>, available: &[String]) -> Self {
        Self {
            selected_available: available.iter().filter(|a| selected.contains(*a)).count(),
            available: available.len(),
        }
    }

    pub fn all_selected(&self) -> bool {
        self.available > 0 && self.selected_available == self.available
    }
}

/// Sort key giving accent- and case-insensitive ordering, with the raw
/// string as tiebreak so the order stays total.
fn collation_key(name: &str) -> (String, String) {
    let folded = name
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect();
    (folded, name.to_string())
}

/// Strip the diacritics used in Portuguese (and the odd Spanish/French
/// station name across the border).
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::fixtures::departure;
    use proptest::prelude::*;

    fn arb_departures() -> impl Strategy<Value = Vec<Departure>> {
        prop::collection::vec(
            prop::sample::select(vec!["Braga", "Faro", "Évora", "Tomar", "Entroncamento"]),
            0..30,
        )
        .prop_map(|names| {
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| departure(i as i64, name))
                .collect()
        })
    }

    fn arb_selection() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set(
            prop::sample::select(vec!["Braga", "Faro", "Évora", "Lagos"]).prop_map(String::from),
            0..4,
        )
    }

    proptest! {
        /// Filtering twice by the same selection changes nothing.
        #[test]
        fn filter_is_idempotent(departures in arb_departures(), selected in arb_selection()) {
            let once = filtered_departures(&departures, &selected).into_owned();
            let twice = filtered_departures(&once, &selected).into_owned();
            prop_assert_eq!(once, twice);
        }

        /// Filtered rows keep their relative order.
        #[test]
        fn filter_preserves_order(departures in arb_departures(), selected in arb_selection()) {
            let filtered = filtered_departures(&departures, &selected);
            let ids: Vec<_> = filtered.iter().map(|d| d.train_id).collect();
            let mut sorted = ids.clone();
            sorted.sort();
            prop_assert_eq!(ids, sorted);
        }

        /// Available destinations are duplicate-free and ordered.
        #[test]
        fn destinations_sorted_unique(departures in arb_departures()) {
            let names = available_destinations(&departures);
            let unique: BTreeSet<_> = names.iter().collect();
            prop_assert_eq!(unique.len(), names.len());
            for pair in names.windows(2) {
                prop_assert!(collation_key(&pair[0]) < collation_key(&pair[1]));
            }
            for d in &departures {
                prop_assert!(names.contains(&d.destination_name));
            }
        }
    }
}
