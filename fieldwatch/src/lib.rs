//! Fieldwatch - Live personnel tracking with geofence alerting
//!
//! This library tracks field personnel in real time, pairs supervisors
//! with their assigned subordinates, and raises alerts when a
//! subordinate drifts beyond the configured radius or when anyone stops
//! reporting their position.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides the assembled
//! facade:
//!
//! ```ignore
//! use std::sync::Arc;
//! use fieldwatch::directory::InMemoryDirectory;
//! use fieldwatch::notify::LogNotifier;
//! use fieldwatch::service::{TrackerConfig, TrackerService};
//!
//! let directory = Arc::new(InMemoryDirectory::new());
//! let service = TrackerService::build(
//!     directory,
//!     Arc::new(LogNotifier::new()),
//!     TrackerConfig::default(),
//! );
//!
//! tokio::spawn(service.staleness.run(shutdown.clone()));
//! tokio::spawn(service.dispatch_worker.run(shutdown));
//!
//! service.tracker.record_position("pso-1", 33.6844, 73.0479);
//! ```
//!
//! # Components
//!
//! - [`geo`] - great-circle distance math
//! - [`position`] - in-memory last-known-position store
//! - [`directory`] - supervisor/subordinate assignment seam
//! - [`monitor`] - geofence breach and staleness monitors
//! - [`notify`] - alert delivery seam and bounded dispatch
//! - [`service`] - wired facade and broadcast fan-out
//! - [`logging`] - tracing setup for the CLI

pub mod directory;
pub mod geo;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod position;
pub mod service;

/// Version of the Fieldwatch library and CLI.
///
/// Synchronized across all components in the workspace; defined in
/// `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
