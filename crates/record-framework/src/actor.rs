//! # Repository Actor
//!
//! This module defines the `RepositoryActor`, the server half of the framework. It owns
//! a [`Repository`] and the receiving end of a channel, and it executes requests one at
//! a time. Because only the actor touches the repository, the read-modify-write cycle of
//! one mutation can never interleave with another: the actor is the process-wide lock
//! around the store file.

use crate::client::RepositoryClient;
use crate::error::{FrameworkError, RepositoryError};
use crate::message::RepositoryRequest;
use crate::repository::Repository;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that serializes all access to one repository.
///
/// # Concurrency Model
/// Any number of [`RepositoryClient`] clones may send requests at the same time. The
/// actor handles them strictly in arrival order and finishes each one (including the
/// file write) before taking the next.
///
/// Repository calls do blocking file I/O, so each one runs on Tokio's blocking pool
/// via `spawn_blocking` and the loop awaits it before continuing.
///
/// # Usage Pattern
///
/// 1.  **Create**: `RepositoryActor::new(repository, buffer)` returns the actor and a client.
/// 2.  **Run**: spawn `actor.run()` on the runtime.
/// 3.  **Use**: clone the client freely. Dropping every clone stops the actor.
///
/// ```rust
/// use record_framework::{FileRepository, JsonFileStore, RecordEntity, RepositoryActor};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct Note { id: u64, text: String }
/// #[derive(Debug, Serialize)]
/// struct NoteCreate { text: String }
/// #[derive(Debug, Serialize)]
/// struct NoteUpdate { #[serde(skip_serializing_if = "Option::is_none")] text: Option<String> }
///
/// impl RecordEntity for Note {
///     type Id = u64;
///     type Create = NoteCreate;
///     type Update = NoteUpdate;
///     type Error = serde_json::Error;
///
///     fn id(&self) -> u64 { self.id }
///     fn from_create_params(id: u64, params: NoteCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, text: params.text })
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let dir = tempfile::tempdir().unwrap();
///     let store = JsonFileStore::new(dir.path().join("notes.json"));
///     let (actor, client) = RepositoryActor::new(FileRepository::<Note>::new(store), 10);
///     tokio::spawn(actor.run());
///
///     let note = client.create(NoteCreate { text: "hello".into() }).await.unwrap();
///     assert_eq!(note.id, 1);
/// }
/// ```
pub struct RepositoryActor<R: Repository> {
    receiver: mpsc::Receiver<RepositoryRequest<R::Entity>>,
    repository: Arc<R>,
}

impl<R: Repository> RepositoryActor<R> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` is the channel capacity; when the channel is full, client calls wait
    /// for space. A capacity of zero is raised to one.
    pub fn new(repository: R, buffer_size: usize) -> (Self, RepositoryClient<R::Entity>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            receiver,
            repository: Arc::new(repository),
        };
        (actor, RepositoryClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        // Just the type name, e.g. "Item" rather than "item_catalog::model::item::Item".
        let entity_type = std::any::type_name::<R::Entity>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        let mut handled: u64 = 0;
        while let Some(msg) = self.receiver.recv().await {
            handled += 1;
            match msg {
                RepositoryRequest::List { ids, respond_to } => {
                    debug!(entity_type, ?ids, "List");
                    let result = self
                        .call(move |repo| repo.list_items(ids.as_deref()))
                        .await;
                    report(entity_type, "List", &result);
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Get { id, respond_to } => {
                    let result = self.call(move |repo| repo.get_item(id)).await;
                    if let Ok(item) = &result {
                        debug!(entity_type, %id, found = item.is_some(), "Get");
                    }
                    report(entity_type, "Get", &result);
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.call(move |repo| repo.create_item(params)).await;
                    report(entity_type, "Create", &result);
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Replace {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?params, "Replace");
                    let result = self.call(move |repo| repo.replace_item(id, params)).await;
                    report(entity_type, "Replace", &result);
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.call(move |repo| repo.update_item(id, update)).await;
                    report(entity_type, "Update", &result);
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.call(move |repo| repo.delete_item(id)).await;
                    report(entity_type, "Delete", &result);
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, handled, "Shutdown");
    }

    /// Runs one repository operation on the blocking pool and waits for it.
    async fn call<V, F>(&self, op: F) -> Result<V, FrameworkError>
    where
        F: FnOnce(&R) -> Result<V, RepositoryError> + Send + 'static,
        V: Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || op(&repository))
            .await
            .map_err(|e| FrameworkError::TaskFailed(e.to_string()))?
            .map_err(FrameworkError::from)
    }
}

fn report<V>(entity_type: &str, operation: &str, result: &Result<V, FrameworkError>) {
    if let Err(e) = result {
        warn!(entity_type, operation, error = %e, "Operation failed");
    }
}
