//! # EntityService Trait
//!
//! Common interface for resource-specific services built on a [`RepositoryClient`].
//! Implementors supply the client and an error mapping and get `get` and `delete` for free.

use crate::{FrameworkError, RecordEntity, RepositoryClient};
use async_trait::async_trait;

/// Trait for resource-specific services to inherit the plain lookups.
///
/// # Example
///
/// ```rust
/// use record_framework::{EntityService, FrameworkError, RecordEntity, RepositoryClient};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct Note { id: u64 }
/// #[derive(Debug, Serialize)] struct NoteCreate;
/// #[derive(Debug, Serialize)] struct NoteUpdate;
///
/// impl RecordEntity for Note {
///     type Id = u64;
///     type Create = NoteCreate;
///     type Update = NoteUpdate;
///     type Error = serde_json::Error;
///     fn id(&self) -> u64 { self.id }
///     fn from_create_params(id: u64, _: NoteCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("note service: {0}")]
/// struct NoteError(String);
///
/// struct NoteService { client: RepositoryClient<Note> }
///
/// #[async_trait::async_trait]
/// impl EntityService<Note> for NoteService {
///     type Error = NoteError;
///     fn client(&self) -> &RepositoryClient<Note> { &self.client }
///     fn map_error(e: FrameworkError) -> NoteError { NoteError(e.to_string()) }
/// }
///
/// async fn usage(service: NoteService) {
///     // get() and delete() come from the trait.
///     let _ = service.get(1).await;
///     let _ = service.delete(1).await;
/// }
/// ```
#[async_trait]
pub trait EntityService<T: RecordEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the underlying repository client.
    fn client(&self) -> &RepositoryClient<T>;

    /// Map framework errors to the resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by id. `None` when it does not exist.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.client().get(id).await.map_err(Self::map_error)
    }

    /// Delete an entity by id. Returns whether it existed.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<bool, Self::Error> {
        tracing::debug!("Sending request");
        self.client().delete(id).await.map_err(Self::map_error)
    }
}
