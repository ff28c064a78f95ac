#![forbid(unsafe_code)]
//! kinship-core library.
//!
//! Owns the undirected social [`graph::Graph`] and its incremental
//! connectivity tracking. Every analyzer in `kinship-analytics` borrows the
//! graph immutably, so a graph cannot be mutated while an analysis is running.
//!
//! # Conventions
//!
//! - **Errors**: Library errors are `thiserror` enums ([`error::GraphError`]).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod error;
pub mod graph;

pub use error::GraphError;
pub use graph::Graph;
