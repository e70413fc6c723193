//! Per-peer tunnel status table.

use std::collections::HashMap;

use airlock_core::TunnelStatus;
use parking_lot::RwLock;

/// The tunnel-status table, keyed by peer identifier.
///
/// Records are created on the first status frame for a peer, replaced in
/// place on every subsequent frame, and never deleted by the sync layer —
/// a peer removal is reflected through the peer CRUD store instead. The
/// only writer is the dispatcher acting on the connection's message path,
/// so readers see one mutation per processed frame.
#[derive(Debug, Default)]
pub struct TunnelTable {
    entries: RwLock<HashMap<u64, TunnelStatus>>,
}

impl TunnelTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the record for `status.peer_id`.
    pub fn apply(&self, status: TunnelStatus) {
        let _ = self.entries.write().insert(status.peer_id, status);
    }

    /// The current record for one peer, if observed.
    #[must_use]
    pub fn get(&self, peer_id: u64) -> Option<TunnelStatus> {
        self.entries.read().get(&peer_id).cloned()
    }

    /// A point-in-time copy of every record, for dashboard rendering.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TunnelStatus> {
        self.entries.read().values().cloned().collect()
    }

    /// Number of peers observed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no peer has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
