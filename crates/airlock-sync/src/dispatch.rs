//! Frame routing.
//!
//! One parsed envelope in, exactly one routing decision out: a tunnel-table
//! mutation, a collaborator notification, or nothing. Dispatch is
//! synchronous and single-pass — frames are processed strictly in arrival
//! order, one mutation per frame.

use std::sync::Arc;

use airlock_core::{FeedEnvelope, FeedEventType, InterfaceStats, TunnelStatus};
use serde_json::Value;
use tracing::{debug, trace};

use crate::collaborators::{Collaborators, ConfigStore, InterfaceStatsSink};
use crate::table::TunnelTable;

/// Routes parsed feed envelopes to state mutations and notifications.
pub struct Dispatcher {
    tunnels: Arc<TunnelTable>,
    peers: Arc<dyn ConfigStore>,
    routes: Arc<dyn ConfigStore>,
    interfaces: Arc<dyn ConfigStore>,
    interface_stats: Arc<dyn InterfaceStatsSink>,
}

impl Dispatcher {
    /// Create a dispatcher writing to `tunnels` and notifying `collaborators`.
    #[must_use]
    pub fn new(tunnels: Arc<TunnelTable>, collaborators: &Collaborators) -> Self {
        Self {
            tunnels,
            peers: Arc::clone(&collaborators.peers),
            routes: Arc::clone(&collaborators.routes),
            interfaces: Arc::clone(&collaborators.interfaces),
            interface_stats: Arc::clone(&collaborators.interface_stats),
        }
    }

    /// Route one envelope.
    ///
    /// Unrecognized types are ignored; payloads missing a handler's required
    /// fields are dropped. Neither case raises — anomalies on the feed are
    /// absorbed here.
    pub fn dispatch(&self, envelope: &FeedEnvelope) {
        let Some(event_type) = envelope.recognized_type() else {
            trace!(event_type = %envelope.event_type, "ignoring unrecognized feed event");
            return;
        };

        match event_type {
            FeedEventType::TunnelStatusChanged => self.apply_tunnel_status(&envelope.data),
            FeedEventType::InterfaceStatsUpdated => self.forward_interface_stats(&envelope.data),
            FeedEventType::PeerConfigChanged => self.peers.refresh(),
            FeedEventType::RouteConfigChanged => self.routes.refresh(),
            FeedEventType::InterfaceConfigChanged => self.interfaces.refresh(),
        }
    }

    /// Replace the tunnel record for the peer named in `data`.
    fn apply_tunnel_status(&self, data: &Value) {
        match serde_json::from_value::<TunnelStatus>(data.clone()) {
            Ok(status) => {
                trace!(
                    peer_id = status.peer_id,
                    status = status.status.as_str(),
                    "tunnel status changed"
                );
                self.tunnels.apply(status);
            }
            Err(err) => debug!(%err, "dropping tunnel.status_changed frame"),
        }
    }

    /// Normalize and forward an interface counter snapshot.
    fn forward_interface_stats(&self, data: &Value) {
        match serde_json::from_value::<InterfaceStats>(data.clone()) {
            Ok(stats) => self.interface_stats.update(stats),
            Err(err) => debug!(%err, "dropping interface.stats_updated frame"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
