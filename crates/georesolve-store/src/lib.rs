//! # georesolve-store
//!
//! Durable client-side key/value storage for GeoResolve, backed by SQLite.
//!
//! The store plays the part a browser's local storage plays for a web
//! client: it survives restarts and holds the `token` and `user` keys of the
//! current session. The crate exposes a synchronous `Database` handle that
//! wraps a `rusqlite::Connection`, a string key/value API, and typed session
//! helpers on top of it.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod session;

mod error;

pub use database::Database;
pub use error::StoreError;
