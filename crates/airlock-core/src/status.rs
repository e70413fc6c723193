//! Tunnel and interface status records carried by the feed.
//!
//! Field names use `#[serde(rename_all = "camelCase")]` to match the
//! appliance's JSON wire format. Telemetry fields carry `#[serde(default)]`:
//! a status frame may omit any of them and the record still materializes
//! with zeroed counters rather than absent values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tunnel state as reported per peer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TunnelState {
    /// Tunnel established and usable.
    Up,
    /// Tunnel not established.
    Down,
    /// Handshake in progress.
    Negotiating,
    /// State not reported or not recognized by this build.
    #[default]
    #[serde(other)]
    Unknown,
}

impl TunnelState {
    /// The lowercase wire string for this state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Negotiating => "negotiating",
            Self::Unknown => "unknown",
        }
    }
}

/// Per-peer tunnel status record.
///
/// Full-replace model: every `tunnel.status_changed` frame carries a complete
/// record, and the table replaces the previous one wholesale — telemetry is
/// recomputed from the incoming payload with defaults filled in, never merged
/// with a prior record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunnelStatus {
    /// Stable peer identifier.
    pub peer_id: u64,
    /// Display name of the peer.
    pub peer_name: String,
    /// Current tunnel state.
    pub status: TunnelState,
    /// When the change was observed, from the frame's `timestamp` field.
    #[serde(rename = "timestamp")]
    pub last_updated: DateTime<Utc>,
    /// Seconds since the tunnel was established.
    #[serde(default)]
    pub established_sec: u64,
    /// Bytes received over the tunnel.
    #[serde(default)]
    pub bytes_in: u64,
    /// Bytes sent over the tunnel.
    #[serde(default)]
    pub bytes_out: u64,
    /// Packets received over the tunnel.
    #[serde(default)]
    pub packets_in: u64,
    /// Packets sent over the tunnel.
    #[serde(default)]
    pub packets_out: u64,
    /// Whether traffic was observed in the last reporting window.
    #[serde(default)]
    pub is_passing_traffic: bool,
    /// When traffic was last observed, if ever.
    #[serde(default)]
    pub last_traffic_at: Option<DateTime<Utc>>,
}

/// Normalized interface counter snapshot.
///
/// Forwarded verbatim to the interface-statistics collaborator; this layer
/// never retains these values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStats {
    /// Interface name, e.g. `wg0`.
    pub interface: String,
    /// When the counters were sampled.
    pub timestamp: DateTime<Utc>,
    /// Bytes received.
    #[serde(default)]
    pub rx_bytes: u64,
    /// Bytes sent.
    #[serde(default)]
    pub tx_bytes: u64,
    /// Packets received.
    #[serde(default)]
    pub rx_packets: u64,
    /// Packets sent.
    #[serde(default)]
    pub tx_packets: u64,
    /// Receive errors.
    #[serde(default)]
    pub rx_errors: u64,
    /// Transmit errors.
    #[serde(default)]
    pub tx_errors: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    // ── TunnelState ──────────────────────────────────────────────────

    #[test]
    fn state_exact_strings() {
        for (state, wire) in [
            (TunnelState::Up, "up"),
            (TunnelState::Down, "down"),
            (TunnelState::Negotiating, "negotiating"),
            (TunnelState::Unknown, "unknown"),
        ] {
            assert_eq!(state.as_str(), wire);
            assert_eq!(serde_json::to_string(&state).unwrap(), format!("\"{wire}\""));
        }
    }

    #[test]
    fn unrecognized_state_maps_to_unknown() {
        let state: TunnelState = serde_json::from_str("\"rekeying\"").unwrap();
        assert_matches!(state, TunnelState::Unknown);
    }

    // ── TunnelStatus ─────────────────────────────────────────────────

    #[test]
    fn minimal_frame_fills_telemetry_defaults() {
        let status: TunnelStatus = serde_json::from_value(json!({
            "peerId": 3,
            "peerName": "branch-office",
            "status": "down",
            "timestamp": "2026-08-06T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(status.peer_id, 3);
        assert_eq!(status.peer_name, "branch-office");
        assert_matches!(status.status, TunnelState::Down);
        assert_eq!(status.established_sec, 0);
        assert_eq!(status.bytes_in, 0);
        assert_eq!(status.bytes_out, 0);
        assert_eq!(status.packets_in, 0);
        assert_eq!(status.packets_out, 0);
        assert!(!status.is_passing_traffic);
        assert!(status.last_traffic_at.is_none());
    }

    #[test]
    fn full_frame_deserializes() {
        let status: TunnelStatus = serde_json::from_value(json!({
            "peerId": 7,
            "peerName": "dmz-gateway",
            "status": "up",
            "timestamp": "2026-08-06T10:00:00Z",
            "establishedSec": 120,
            "bytesIn": 4096,
            "bytesOut": 1024,
            "packetsIn": 32,
            "packetsOut": 16,
            "isPassingTraffic": true,
            "lastTrafficAt": "2026-08-06T10:00:05Z",
        }))
        .unwrap();

        assert_matches!(status.status, TunnelState::Up);
        assert_eq!(status.established_sec, 120);
        assert_eq!(status.bytes_in, 4096);
        assert_eq!(status.bytes_out, 1024);
        assert_eq!(status.packets_in, 32);
        assert_eq!(status.packets_out, 16);
        assert!(status.is_passing_traffic);
        assert!(status.last_traffic_at.is_some());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        // No peerName
        let result = serde_json::from_value::<TunnelStatus>(json!({
            "peerId": 3,
            "status": "down",
            "timestamp": "2026-08-06T10:00:00Z",
        }));
        assert!(result.is_err());

        // No timestamp
        let result = serde_json::from_value::<TunnelStatus>(json!({
            "peerId": 3,
            "peerName": "branch-office",
            "status": "down",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let status = TunnelStatus {
            peer_id: 1,
            peer_name: "p".into(),
            status: TunnelState::Up,
            last_updated: Utc::now(),
            established_sec: 0,
            bytes_in: 0,
            bytes_out: 0,
            packets_in: 0,
            packets_out: 0,
            is_passing_traffic: false,
            last_traffic_at: None,
        };
        let val = serde_json::to_value(&status).unwrap();
        for key in [
            "peerId",
            "peerName",
            "status",
            "timestamp",
            "establishedSec",
            "bytesIn",
            "bytesOut",
            "packetsIn",
            "packetsOut",
            "isPassingTraffic",
            "lastTrafficAt",
        ] {
            assert!(val.get(key).is_some(), "missing wire field {key}");
        }
    }

    // ── InterfaceStats ───────────────────────────────────────────────

    #[test]
    fn stats_counters_default_to_zero() {
        let stats: InterfaceStats = serde_json::from_value(json!({
            "interface": "wg0",
            "timestamp": "2026-08-06T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(stats.interface, "wg0");
        assert_eq!(stats.rx_bytes, 0);
        assert_eq!(stats.tx_bytes, 0);
        assert_eq!(stats.rx_packets, 0);
        assert_eq!(stats.tx_packets, 0);
        assert_eq!(stats.rx_errors, 0);
        assert_eq!(stats.tx_errors, 0);
    }

    #[test]
    fn stats_require_interface_and_timestamp() {
        assert!(
            serde_json::from_value::<InterfaceStats>(json!({
                "timestamp": "2026-08-06T10:00:00Z",
            }))
            .is_err()
        );
        assert!(
            serde_json::from_value::<InterfaceStats>(json!({
                "interface": "wg0",
            }))
            .is_err()
        );
    }

    #[test]
    fn stats_partial_counters() {
        let stats: InterfaceStats = serde_json::from_value(json!({
            "interface": "eth1",
            "timestamp": "2026-08-06T10:00:00Z",
            "rxBytes": 9000,
            "txErrors": 2,
        }))
        .unwrap();

        assert_eq!(stats.rx_bytes, 9000);
        assert_eq!(stats.tx_errors, 2);
        assert_eq!(stats.tx_bytes, 0);
        assert_eq!(stats.rx_packets, 0);
    }
}
