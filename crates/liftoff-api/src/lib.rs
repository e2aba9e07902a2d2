//! # liftoff-api
//!
//! HTTP API server for the liftoff launch tracker.
//!
//! Exposes the stored launch records over a small REST surface:
//!
//! - `GET /api/v1/launches` - list, with optional status filter and limit
//! - `GET /api/v1/launches/stats` - aggregate statistics
//! - `GET /api/v1/launches/{id}` - single record
//! - `POST /api/v1/trigger` - run a sync against the source API
//! - `GET /health` - service and storage reachability
//! - `GET /openapi.json` - generated API specification

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod server;
