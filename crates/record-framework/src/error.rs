//! # Framework Errors
//!
//! This module defines the error types shared by every layer of the framework:
//! the record store, the repository and the actor/client pair. Domain crates wrap
//! these in their own error enums.

use std::path::PathBuf;

/// Errors raised by the [`JsonFileStore`](crate::store::JsonFileStore).
///
/// A malformed store file is *not* an error (it reads back as empty); only real
/// I/O and encoding failures end up here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Record encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by a [`Repository`](crate::repository::Repository).
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A record could not be turned into an entity (or back). Carries the
    /// entity's own error type.
    #[error("Entity error: {0}")]
    Entity(Box<dyn std::error::Error + Send + Sync>),
    /// The highest stored id is `u64::MAX`, so no further id can be assigned.
    #[error("No ids left to assign")]
    IdSpaceExhausted,
}

/// Errors that can occur when talking to a repository through the actor.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Repository task failed: {0}")]
    TaskFailed(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
