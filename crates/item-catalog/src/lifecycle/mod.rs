//! # System Lifecycle
//!
//! Starting, wiring and stopping the catalog.
//!
//! [`CatalogSystem::new`] creates the item repository actor from a [`Config`](crate::config::Config),
//! spawns it, and wraps its client in an [`ItemService`](crate::services::ItemService).
//! Everything that needs storage gets a clone of that service; nothing is global.
//!
//! ## Graceful Shutdown
//!
//! 1. **Stop using the service** - the HTTP server drops its clone when it stops serving
//! 2. **Drop the system's clone** - [`CatalogSystem::shutdown`] does this
//! 3. **Actor drains** - once the last client is gone the actor finishes queued requests,
//!    logs `Shutdown` and exits
//! 4. **Await completion** - `shutdown` waits for the actor task
//!
//! Any write already started completes before the actor exits, so the data file is
//! never left half-written by a shutdown.

pub mod catalog_system;

pub use catalog_system::*;
