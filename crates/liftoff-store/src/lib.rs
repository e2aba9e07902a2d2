//! # liftoff-store
//!
//! Storage-facing domain operations over the launch table:
//!
//! - [`LaunchRepository`]: scan-all, point and index reads, and keyed upsert
//! - [`QueryService`]: the read façade consumed by the public API
//!   (list/filter/get/stats)
//!
//! Both are thin, stateless wrappers around a shared [`liftoff_core::LaunchTable`]
//! backend and are cheap to construct per operation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod query;
pub mod repository;

pub use query::QueryService;
pub use repository::{LaunchRepository, UpsertOutcome};
