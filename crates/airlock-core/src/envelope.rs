//! Feed wire format: the `{type, data}` envelope and the event catalog.
//!
//! Every feed message is a UTF-8 text frame holding one JSON object with a
//! dot-namespaced `type` and an event-specific `data` payload. The `type` is
//! kept as a raw string so frames carrying event types this build does not
//! know about still parse and can be ignored downstream.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recognized feed event types.
///
/// Each variant serializes to the exact dot-separated wire string the
/// appliance emits. The catalog is exhaustive: anything else on the wire is
/// ignored by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedEventType {
    /// A peer tunnel changed state; payload is a full status record.
    #[serde(rename = "tunnel.status_changed")]
    TunnelStatusChanged,
    /// Fresh interface counters; payload is a counter snapshot.
    #[serde(rename = "interface.stats_updated")]
    InterfaceStatsUpdated,
    /// Peer configuration changed; the peer store should re-fetch.
    #[serde(rename = "peer.config_changed")]
    PeerConfigChanged,
    /// Route configuration changed; the route store should re-fetch.
    #[serde(rename = "route.config_changed")]
    RouteConfigChanged,
    /// Interface configuration changed; the interface store should re-fetch.
    #[serde(rename = "interface.config_changed")]
    InterfaceConfigChanged,
}

/// All recognized event type variants, for exhaustive testing.
pub const ALL_FEED_EVENT_TYPES: &[FeedEventType] = &[
    FeedEventType::TunnelStatusChanged,
    FeedEventType::InterfaceStatsUpdated,
    FeedEventType::PeerConfigChanged,
    FeedEventType::RouteConfigChanged,
    FeedEventType::InterfaceConfigChanged,
];

impl FeedEventType {
    /// The exact wire string for this event type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TunnelStatusChanged => "tunnel.status_changed",
            Self::InterfaceStatsUpdated => "interface.stats_updated",
            Self::PeerConfigChanged => "peer.config_changed",
            Self::RouteConfigChanged => "route.config_changed",
            Self::InterfaceConfigChanged => "interface.config_changed",
        }
    }

    /// Parse a wire string into a recognized event type.
    ///
    /// Returns `None` for anything outside the catalog — callers treat that
    /// as "ignore the frame", never as an error.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tunnel.status_changed" => Some(Self::TunnelStatusChanged),
            "interface.stats_updated" => Some(Self::InterfaceStatsUpdated),
            "peer.config_changed" => Some(Self::PeerConfigChanged),
            "route.config_changed" => Some(Self::RouteConfigChanged),
            "interface.config_changed" => Some(Self::InterfaceConfigChanged),
            _ => None,
        }
    }
}

/// One parsed feed message.
///
/// Wire format:
/// ```json
/// { "type": "tunnel.status_changed", "data": { ... } }
/// ```
///
/// `data` stays untyped here; each handler deserializes the fields it needs
/// and drops the frame when a required field is missing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedEnvelope {
    /// Dot-namespaced event name. Raw string — may be outside the catalog.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event-specific payload.
    pub data: Value,
}

impl FeedEnvelope {
    /// Parse one text frame into an envelope.
    ///
    /// Returns `None` for non-JSON text and for JSON objects missing `type`
    /// or `data`. Malformed frames are expected under network corruption or
    /// version skew and must never surface as errors.
    #[must_use]
    pub fn parse_frame(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// The typed event, if this envelope's `type` is in the catalog.
    #[must_use]
    pub fn recognized_type(&self) -> Option<FeedEventType> {
        FeedEventType::parse(&self.event_type)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── FeedEventType ────────────────────────────────────────────────

    #[test]
    fn catalog_count() {
        assert_eq!(ALL_FEED_EVENT_TYPES.len(), 5);
    }

    #[test]
    fn event_type_exact_strings() {
        let expected = [
            (FeedEventType::TunnelStatusChanged, "tunnel.status_changed"),
            (FeedEventType::InterfaceStatsUpdated, "interface.stats_updated"),
            (FeedEventType::PeerConfigChanged, "peer.config_changed"),
            (FeedEventType::RouteConfigChanged, "route.config_changed"),
            (FeedEventType::InterfaceConfigChanged, "interface.config_changed"),
        ];
        for (variant, wire) in expected {
            assert_eq!(variant.as_str(), wire);
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{wire}\""), "wrong string for {variant:?}");
        }
    }

    #[test]
    fn parse_roundtrips_catalog() {
        for &variant in ALL_FEED_EVENT_TYPES {
            assert_eq!(FeedEventType::parse(variant.as_str()), Some(variant));
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(FeedEventType::parse("peer.deleted"), None);
        assert_eq!(FeedEventType::parse(""), None);
        assert_eq!(FeedEventType::parse("tunnel.status_changed "), None);
    }

    // ── FeedEnvelope ─────────────────────────────────────────────────

    #[test]
    fn parse_frame_valid() {
        let envelope =
            FeedEnvelope::parse_frame(r#"{"type":"peer.config_changed","data":{}}"#).unwrap();
        assert_eq!(envelope.event_type, "peer.config_changed");
        assert_eq!(
            envelope.recognized_type(),
            Some(FeedEventType::PeerConfigChanged)
        );
    }

    #[test]
    fn parse_frame_non_json() {
        assert!(FeedEnvelope::parse_frame("not json at all").is_none());
        assert!(FeedEnvelope::parse_frame("").is_none());
        assert!(FeedEnvelope::parse_frame("{truncated").is_none());
    }

    #[test]
    fn parse_frame_missing_type() {
        assert!(FeedEnvelope::parse_frame(r#"{"data":{}}"#).is_none());
    }

    #[test]
    fn parse_frame_missing_data() {
        assert!(FeedEnvelope::parse_frame(r#"{"type":"peer.config_changed"}"#).is_none());
    }

    #[test]
    fn parse_frame_type_not_a_string() {
        assert!(FeedEnvelope::parse_frame(r#"{"type":42,"data":{}}"#).is_none());
    }

    #[test]
    fn parse_frame_unknown_type_still_parses() {
        let envelope =
            FeedEnvelope::parse_frame(r#"{"type":"firmware.update_available","data":{"v":2}}"#)
                .unwrap();
        assert_eq!(envelope.event_type, "firmware.update_available");
        assert_eq!(envelope.recognized_type(), None);
    }

    #[test]
    fn parse_frame_extra_fields_ignored() {
        let envelope = FeedEnvelope::parse_frame(
            r#"{"type":"route.config_changed","data":{},"seq":7,"source":"appliance"}"#,
        )
        .unwrap();
        assert_eq!(
            envelope.recognized_type(),
            Some(FeedEventType::RouteConfigChanged)
        );
    }
}
