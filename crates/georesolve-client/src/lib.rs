//! # georesolve-client
//!
//! The complaint lifecycle client: session guard, repository client, search
//! and filtering, map projection, the admin status workflow, analytics and
//! image capture, plus screen controllers and a command-line front end.

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod guard;
pub mod images;
pub mod map;
pub mod routes;
pub mod screens;
pub mod state;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

use tracing_subscriber::{fmt, EnvFilter};

pub use error::{ClientError, ErrorKind, Result};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("georesolve_client=debug,georesolve_store=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
