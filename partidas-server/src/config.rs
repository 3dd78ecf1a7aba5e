//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::CacheConfig;
use crate::fetch::SearchSettings;
use crate::ip::IpConfig;

/// Default listen address. The server holds a single user's session, so it
/// only listens locally.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default directory for saved preferences.
pub const DEFAULT_PREFS_DIR: &str = ".partidas";

/// Default static assets directory.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub ip: IpConfig,
    pub cache: CacheConfig,
    pub search: SearchSettings,
    pub prefs_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Read `PARTIDAS_*` variables, using defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Unparsable values are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = parsed(&lookup, "PARTIDAS_ADDR") {
            config.addr = addr;
        }
        if let Some(url) = lookup("PARTIDAS_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.ip = config.ip.with_base_url(url.trim());
        }
        if let Some(secs) = parsed::<u64>(&lookup, "PARTIDAS_TIMEOUT_SECS") {
            config.ip = config.ip.with_timeout(secs);
        }
        if let Some(ms) = parsed::<u64>(&lookup, "PARTIDAS_SEARCH_DEBOUNCE_MS") {
            config.search = config.search.with_debounce(Duration::from_millis(ms));
        }
        if let Some(n) = parsed::<usize>(&lookup, "PARTIDAS_SEARCH_MIN_CHARS") {
            config.search = config.search.with_min_query_chars(n);
        }
        if let Some(dir) = lookup("PARTIDAS_PREFS_DIR").filter(|d| !d.is_empty()) {
            config.prefs_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PARTIDAS_STATIC_DIR").filter(|d| !d.is_empty()) {
            config.static_dir = PathBuf::from(dir);
        }

        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            ip: IpConfig::default(),
            cache: CacheConfig::default(),
            search: SearchSettings::default(),
            prefs_dir: PathBuf::from(DEFAULT_PREFS_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "ignoring invalid setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ip::DEFAULT_BASE_URL;

    fn from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from(&[]);
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.ip.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ip.timeout_secs, 20);
        assert_eq!(config.prefs_dir, PathBuf::from(".partidas"));
        assert_eq!(config.search.debounce, Duration::from_millis(300));
        assert_eq!(config.search.min_query_chars, 2);
    }

    #[test]
    fn overrides() {
        let config = from(&[
            ("PARTIDAS_ADDR", "127.0.0.1:8123"),
            ("PARTIDAS_BASE_URL", "http://localhost:9000/"),
            ("PARTIDAS_TIMEOUT_SECS", "5"),
            ("PARTIDAS_PREFS_DIR", "/tmp/prefs"),
            ("PARTIDAS_STATIC_DIR", "/srv/static"),
            ("PARTIDAS_SEARCH_DEBOUNCE_MS", "150"),
            ("PARTIDAS_SEARCH_MIN_CHARS", "3"),
        ]);
        assert_eq!(config.addr.port(), 8123);
        assert_eq!(config.ip.base_url, "http://localhost:9000");
        assert_eq!(config.ip.timeout_secs, 5);
        assert_eq!(config.prefs_dir, PathBuf::from("/tmp/prefs"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.search.debounce, Duration::from_millis(150));
        assert_eq!(config.search.min_query_chars, 3);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = from(&[
            ("PARTIDAS_ADDR", "not an address"),
            ("PARTIDAS_TIMEOUT_SECS", "soon"),
            ("PARTIDAS_BASE_URL", "   "),
            ("PARTIDAS_SEARCH_DEBOUNCE_MS", "-1"),
        ]);
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.ip.timeout_secs, 20);
        assert_eq!(config.ip.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.search.debounce, Duration::from_millis(300));
    }
}
