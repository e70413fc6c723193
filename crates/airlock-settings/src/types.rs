//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the console's
//! JSON settings file. Each type implements [`Default`] with production
//! default values, and `#[serde(default)]` allows partial JSON — missing
//! fields get their default during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the Airlock console.
///
/// Loaded from `~/.airlock/settings.json` with defaults applied for missing
/// fields. `AIRLOCK_*` environment variables can override specific values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Appliance endpoint settings.
    pub console: EndpointSettings,
    /// Status feed settings.
    pub feed: FeedSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "airlock".to_string(),
            console: EndpointSettings::default(),
            feed: FeedSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Where the appliance console is reachable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointSettings {
    /// Host (and optional port) of the appliance, e.g. `10.0.0.1:8443`.
    pub host: String,
    /// Whether the console is served over TLS. Selects `wss` vs `ws` for
    /// the feed to match the hosting page's scheme.
    pub secure: bool,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:8443".to_string(),
            secure: true,
        }
    }
}

/// Status feed connection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedSettings {
    /// Fixed path of the feed endpoint.
    pub path: String,
    /// Base reconnect delay in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum reconnect delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            path: "/api/v1/ws".to_string(),
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default tracing filter when `RUST_LOG` is unset, e.g. `info`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_values() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.version, "0.1.0");
        assert_eq!(settings.name, "airlock");
        assert_eq!(settings.console.host, "127.0.0.1:8443");
        assert!(settings.console.secure);
        assert_eq!(settings.feed.path, "/api/v1/ws");
        assert_eq!(settings.feed.base_delay_ms, 1000);
        assert_eq!(settings.feed.max_delay_ms, 30_000);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn partial_json_gets_defaults() {
        let settings: ConsoleSettings =
            serde_json::from_str(r#"{"console":{"host":"10.1.2.3"}}"#).unwrap();
        assert_eq!(settings.console.host, "10.1.2.3");
        // Sibling field and other sections keep their defaults
        assert!(settings.console.secure);
        assert_eq!(settings.feed.path, "/api/v1/ws");
    }

    #[test]
    fn serde_roundtrip() {
        let mut settings = ConsoleSettings::default();
        settings.console.secure = false;
        settings.feed.base_delay_ms = 250;
        let json = serde_json::to_string(&settings).unwrap();
        let back: ConsoleSettings = serde_json::from_str(&json).unwrap();
        assert!(!back.console.secure);
        assert_eq!(back.feed.base_delay_ms, 250);
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let val = serde_json::to_value(ConsoleSettings::default()).unwrap();
        assert!(val["feed"].get("baseDelayMs").is_some());
        assert!(val["feed"].get("maxDelayMs").is_some());
        assert!(val["console"].get("secure").is_some());
    }
}
