//! Dashboard API v0 client for switch port configuration.
//!
//! Provides typed models and an asynchronous client for the handful of
//! Dashboard endpoints the portsync tools touch: organization networks
//! and inventory, switch ports, and per-device client listings.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{DashboardClient, DashboardClientBuilder, PortWriter};
pub use models::{
    InventoryDevice, Network, NetworkClient, SwitchPort, UpdateSwitchPortRequest,
};

/// Convenient result alias sharing the `portsync-core` error type.
pub type Result<T> = portsync_core::Result<T>;
