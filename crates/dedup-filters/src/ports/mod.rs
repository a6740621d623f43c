//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for transport layers
//! - Driven Ports (outbound) - Durable snapshot storage

pub mod inbound;
pub mod outbound;

pub use inbound::DeduplicationApi;
pub use outbound::SnapshotStore;
