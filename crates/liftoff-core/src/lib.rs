//! # liftoff-core
//!
//! Core abstractions for the liftoff launch tracker.
//!
//! This crate provides the foundational types and traits used across all
//! liftoff components:
//!
//! - **Domain Model**: [`LaunchRecord`] and friends, the normalized launch
//!   schema stored in the table
//! - **Table Abstraction**: the [`LaunchTable`] trait with an in-memory
//!   backend for tests and a DynamoDB backend for production
//! - **Error Types**: shared error definitions and result types
//! - **Observability**: logging initialization helpers
//!
//! ## Crate Boundary
//!
//! `liftoff-core` is the only crate allowed to define shared primitives.
//! The store, sync, and API crates all interact through the contracts
//! defined here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod dynamo;
pub mod error;
pub mod launch;
pub mod observability;
pub mod table;

// Re-export key types at crate root for ergonomics
pub use dynamo::{DynamoTable, DynamoTableConfig};
pub use error::{Error, Result};
pub use launch::{LaunchPreview, LaunchRecord, LaunchStats, LaunchStatus, SyncSummary};
pub use observability::{LogFormat, init_logging};
pub use table::{LaunchTable, MemoryTable, ScanPage};
