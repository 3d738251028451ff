//! # georesolve-shared
//!
//! Types shared by the GeoResolve store and client crates: the domain model
//! as the backend serves it, the request/response bodies of the REST surface,
//! and the constants both sides agree on.

pub mod constants;
pub mod error;
pub mod models;
pub mod protocol;
pub mod types;

pub use error::ValidationError;
pub use models::*;
pub use types::*;
