//! External collaborator contracts.
//!
//! The sync layer notifies or queries these components but owns none of
//! their internal state. All of them are injected at [`StatusFeed`]
//! construction so lifetime and ownership stay explicit.
//!
//! [`StatusFeed`]: crate::feed::StatusFeed

use std::sync::Arc;

use airlock_core::InterfaceStats;

/// Supplies the bearer credential used to open the feed.
///
/// The sync layer treats this as a plain read at connection-attempt time and
/// never mutates it. `None` means no connection attempt is made.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialSource: Send + Sync {
    /// The current access token, if the operator is authenticated.
    fn access_token(&self) -> Option<String>;
}

/// A CRUD store that can re-fetch its full list on demand.
///
/// `refresh` is a broad invalidation signal: the store is expected to
/// re-pull everything rather than apply a delta.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// Invalidate and re-fetch the store's contents.
    fn refresh(&self);
}

/// Receives normalized interface counter snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait InterfaceStatsSink: Send + Sync {
    /// Apply a fresh counter snapshot for one interface.
    fn update(&self, stats: InterfaceStats);
}

/// The full set of injected collaborator references.
#[derive(Clone)]
pub struct Collaborators {
    /// Authentication subsystem (read-only).
    pub auth: Arc<dyn CredentialSource>,
    /// Peer CRUD store.
    pub peers: Arc<dyn ConfigStore>,
    /// Route CRUD store.
    pub routes: Arc<dyn ConfigStore>,
    /// Interface CRUD store.
    pub interfaces: Arc<dyn ConfigStore>,
    /// Interface statistics sink.
    pub interface_stats: Arc<dyn InterfaceStatsSink>,
}
