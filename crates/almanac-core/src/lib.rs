//! `almanac-core` — shared types for the Almanac scheduling engine.
//!
//! Home of the [`Event`] record passed between every layer, the calendar
//! bucketing helpers both storage backends derive their day/week/month
//! predicates from, and the typed configuration (`almanac.toml` +
//! `ALMANAC_*` env overrides).

pub mod buckets;
pub mod config;
pub mod event;

pub use config::{AlmanacConfig, ConfigError, StorageBackend, StorageConfig};
pub use event::Event;
