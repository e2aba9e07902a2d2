//! # liftoff-sync
//!
//! Ingestion pipeline for the liftoff launch tracker:
//!
//! - [`source`]: the raw wire schema and the [`LaunchSource`] seam with its
//!   reqwest-backed [`SpaceXClient`] implementation
//! - [`mapper`]: pure raw-record → [`liftoff_core::LaunchRecord`]
//!   normalization, including status derivation
//! - [`runner`]: the sync orchestrator (fetch, map, upsert, summarize)
//!
//! A fetch failure aborts a run outright; per-record upsert failures are
//! downgraded to a counter so one bad row cannot sink a batch.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod mapper;
pub mod runner;
pub mod source;

pub use mapper::{map_launch, resolve_status};
pub use runner::SyncRunner;
pub use source::{LaunchSource, RawLaunch, SpaceXClient};
