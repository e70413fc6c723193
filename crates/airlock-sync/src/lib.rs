//! # airlock-sync
//!
//! Real-time status synchronization layer for the Airlock console.
//!
//! A long-lived push-update connection keeps several independent pieces of
//! console state current without polling: per-peer tunnel status (owned
//! here), interface counters and "configuration changed" notifications
//! (forwarded to collaborators). The layer survives network interruptions
//! transparently and never corrupts state on malformed or out-of-order
//! input.
//!
//! - [`StatusFeed`]: owns the single live connection and its reconnect logic
//! - [`Dispatcher`]: routes one parsed frame to exactly one state mutation
//! - [`TunnelTable`]: the per-peer tunnel status table
//! - [`Collaborators`]: injected external contracts (auth, CRUD stores,
//!   interface-stats sink)
//!
//! Nothing in this crate is ever thrown to a caller: transport failures
//! degrade to "not currently connected, will retry", malformed frames are
//! dropped, unknown event types are ignored.

#![deny(unsafe_code)]

pub mod collaborators;
pub mod dispatch;
pub mod feed;
pub mod table;

pub use collaborators::{Collaborators, ConfigStore, CredentialSource, InterfaceStatsSink};
pub use dispatch::Dispatcher;
pub use feed::{FeedConfig, StatusFeed};
pub use table::TunnelTable;
