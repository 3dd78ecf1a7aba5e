//! Preference store error types.

/// Errors from saving preferences.
///
/// Loading never fails: missing or malformed slots fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    /// Reading or writing the backing store failed
    #[error("preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized
    #[error("failed to serialize preference: {0}")]
    Serialize(#[from] serde_json::Error),
}
