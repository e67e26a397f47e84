//! SQLite backend for the QRConnect history store.
//!
//! Two backends share one schema and one set of queries:
//!
//! - [`SqliteStore`] wraps [`tokio_rusqlite`] so database access runs on a
//!   dedicated thread without blocking the async runtime.
//! - [`BlockingSqliteStore`] holds a plain [`rusqlite::Connection`] and is the
//!   retry path used by [`qrconnect_core::History`].
//!
//! [`SharedHistory`] opens both lazily, once, on first use.

mod blocking;
mod encode;
mod location;
mod queries;
mod schema;
mod shared;
mod store;

pub mod error;

pub use blocking::BlockingSqliteStore;
pub use error::{Error, Result};
pub use location::StoreLocation;
pub use shared::{SharedHistory, SqliteHistory, open_history};
pub use store::SqliteStore;
