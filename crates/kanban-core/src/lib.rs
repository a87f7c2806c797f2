//! kanban-core library.
//!
//! Turns an unordered collection of tickets into a render-ready board:
//! [`board::partition`] splits tickets into columns and [`board::order`]
//! sorts each column. [`board::assemble`] composes the two.
//!
//! # Conventions
//!
//! - **Errors**: [`error::BoardError`] for typed failures, `anyhow::Result` at I/O edges.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod board;
pub mod config;
pub mod error;
pub mod model;
pub mod source;

pub use board::{BoardOptions, GroupDimension, GroupKey, GroupedView, SortKey, assemble};
pub use error::{BoardError, ErrorCode};
pub use model::ticket::{Priority, Ticket};
