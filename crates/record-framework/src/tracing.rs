//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber used by binaries built on
//! this framework.
//!
//! ## Configuration
//!
//! Levels come from `RUST_LOG`; without it, `info` is used. Output is the compact
//! formatter with module paths hidden, since actor logs already carry an
//! `entity_type` field.
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle plus every successful mutation
//! RUST_LOG=debug cargo run     # also store reads/writes and request payloads
//! RUST_LOG=record_framework=debug,info cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: `Actor started`, and `Shutdown` with the number of handled requests
//! - **Mutations**: `Created`, `Replaced`, `Updated` and `Deleted` with the entity id
//! - **Failures**: `Operation failed` at `warn` with the operation name and error
//! - **Store recovery**: an unreadable store file is logged at `warn` before being treated as empty
//!
//! With `RUST_LOG=info` a create looks like:
//!
//! ```text
//! INFO Created id=3 size=3
//! ```

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
