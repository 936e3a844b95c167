//! shelf-core library.
//!
//! A personal catalog of books, movies, series, anime and manga backed by a
//! single SQLite file. [`catalog::Catalog`] is the entry point; the `db`
//! module exposes the same operations as free functions over a
//! `rusqlite::Connection`.
//!
//! # Conventions
//!
//! - **Errors**: catalog operations return [`error::Result`]; open, migrate
//!   and config plumbing return `anyhow::Result` with context.
//! - **Logging**: use `tracing` macros (`info!` for writes, `debug!` for
//!   query paths, `warn!` for recoverable anomalies).

pub mod catalog;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod model;
pub mod validate;

pub use catalog::{Catalog, IndexPath, WorkFilter};
pub use error::{CatalogError, ErrorCode};
pub use model::{NewWork, Progress, Work, WorkId, WorkPatch, WorkStatus, WorkType};
