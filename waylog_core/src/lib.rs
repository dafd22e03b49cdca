#![forbid(unsafe_code)]

//! Core domain model and session logic for the Waylog workout logger.
//!
//! This crate provides:
//! - Domain types (coordinates, workout variants, derived metrics)
//! - The session controller state machine
//! - Snapshot persistence and CSV export
//! - Position acquisition and the map-widget seam

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod location;
pub mod map;
pub mod export;
pub mod controller;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use location::{FixedPosition, LocationProvider, SessionLocation};
pub use map::{MapWidget, MarkerPopup, TileLayer};
pub use export::export_csv;
pub use controller::{Controller, Event, FormSubmission, Notifier, Phase};
