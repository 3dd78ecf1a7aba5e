//! Departure status classification.
//!
//! The upstream service has no structured delay or cancellation fields.
//! Everything we know comes from the free-text `Observacoes` annotation,
//! e.g. "Circula com atraso de 13 min." or "SUPRIMIDO".

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Matches the upstream delay phrase, e.g. "atraso de 5 min".
///
/// All knowledge of the phrase format lives here and in [`parse_delay`].
static DELAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)atraso\s+de\s+([0-9]+)\s*min").expect("delay pattern is valid")
});

/// Token marking a cancelled train.
const CANCELLED_TOKEN: &str = "SUPRIMIDO";

/// Display status of a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepartureStatus {
    /// Train runs on schedule (or we have no reason to think otherwise).
    OnTime,
    /// Train is running late by a positive number of minutes.
    Delayed(u32),
    /// Train has already called at the station.
    Passed,
    /// Train has been cancelled.
    Cancelled,
}

impl DepartureStatus {
    /// Classify a departure from its passed flag and observation text.
    ///
    /// Rules are applied in a fixed order and the first match wins:
    /// cancellation, then passed, then a positive delay, then on time.
    /// A train that is both cancelled and delayed is `Cancelled`.
    ///
    /// # Examples
    ///
    /// ```
    /// use partidas_server::domain::DepartureStatus;
    ///
    /// assert_eq!(
    ///     DepartureStatus::classify(false, "Circula com atraso de 13 min."),
    ///     DepartureStatus::Delayed(13)
    /// );
    /// assert_eq!(
    ///     DepartureStatus::classify(true, "Circula suprimido"),
    ///     DepartureStatus::Cancelled
    /// );
    /// assert_eq!(DepartureStatus::classify(false, ""), DepartureStatus::OnTime);
    /// ```
    pub fn classify(has_passed: bool, observations: &str) -> Self {
        if is_cancelled(observations) {
            return DepartureStatus::Cancelled;
        }

        if has_passed {
            return DepartureStatus::Passed;
        }

        match parse_delay(observations) {
            Some(minutes) if minutes > 0 => DepartureStatus::Delayed(minutes),
            _ => DepartureStatus::OnTime,
        }
    }

    /// Short Portuguese label shown in the status column.
    pub fn label(&self) -> String {
        match self {
            DepartureStatus::OnTime => "A tempo".to_string(),
            DepartureStatus::Delayed(minutes) => format!("+{minutes} min"),
            DepartureStatus::Passed => "Passou".to_string(),
            DepartureStatus::Cancelled => "Suprimido".to_string(),
        }
    }

    /// CSS class for the status badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            DepartureStatus::OnTime => "status-on-time",
            DepartureStatus::Delayed(_) => "status-delayed",
            DepartureStatus::Passed => "status-passed",
            DepartureStatus::Cancelled => "status-cancelled",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DepartureStatus::Cancelled)
    }
}

impl fmt::Display for DepartureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Whether the observation text marks the train as cancelled.
pub fn is_cancelled(observations: &str) -> bool {
    !observations.is_empty() && observations.to_uppercase().contains(CANCELLED_TOKEN)
}

/// Extract the delay in minutes from the observation text.
///
/// Returns `None` if there is no delay phrase, or if the number doesn't fit
/// in a `u32`. A delay of zero is returned as `Some(0)`; deciding what that
/// means is left to the caller.
pub fn parse_delay(observations: &str) -> Option<u32> {
    if observations.is_empty() {
        return None;
    }

    let captures = DELAY_PATTERN.captures(observations)?;
    captures.get(1)?.as_str().parse().ok()
}
