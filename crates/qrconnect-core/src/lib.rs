//! Core types and trait definitions for the QRConnect history store.
//!
//! This crate is free of database dependencies. Storage backends implement
//! the traits in [`store`]; [`history::History`] layers the async-then-blocking
//! fallback policy over a pair of them, and [`flow`] holds the scan, generate
//! and history-view flows that produce and consume records.

pub mod error;
pub mod flow;
pub mod history;
pub mod record;
pub mod store;
pub mod timestamp;

pub use error::{BoxError, Error, HistoryError, Result};
pub use history::History;
pub use record::{HistoryRecord, NewRecord, RecordKind};

#[cfg(test)]
mod tests;
