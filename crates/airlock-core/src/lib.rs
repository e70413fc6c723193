//! # airlock-core
//!
//! Foundation types for the Airlock console's status synchronization layer.
//!
//! This crate provides the shared vocabulary the other Airlock crates depend on:
//!
//! - **Feed envelope**: the `{type, data}` wire wrapper and the typed event catalog
//! - **Status records**: `TunnelStatus` (per-peer tunnel state plus telemetry) and
//!   `InterfaceStats` (normalized interface counters)
//! - **Backoff**: the deterministic reconnection delay policy
//!
//! Everything here is pure data and math — no I/O, no runtime dependency.

#![deny(unsafe_code)]

pub mod backoff;
pub mod envelope;
pub mod status;

pub use backoff::BackoffPolicy;
pub use envelope::{ALL_FEED_EVENT_TYPES, FeedEnvelope, FeedEventType};
pub use status::{InterfaceStats, TunnelState, TunnelStatus};
