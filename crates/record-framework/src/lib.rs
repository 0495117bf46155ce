//! # Record Framework
//!
//! Building blocks for small services that keep a collection of records in one JSON
//! file. The crate pairs a **file-backed repository** with the **Actor Model**: the
//! repository knows how to read and rewrite the file, and a single actor in front of it
//! makes sure only one operation touches the file at a time.
//!
//! ## Architecture Overview
//!
//! 1. **Store Layer** ([`JsonFileStore`]) - whole-file reads and atomic whole-file writes
//! 2. **Entity Layer** ([`RecordEntity`]) - your domain type and its create/update payloads
//! 3. **Repository Layer** ([`Repository`], [`FileRepository`]) - CRUD and id assignment
//! 4. **Runtime Layer** ([`RepositoryActor`]) - sequential processing of requests
//! 5. **Interface Layer** ([`RepositoryClient`], [`EntityService`]) - async, cloneable access
//!
//! ```rust
//! use record_framework::{FileRepository, JsonFileStore, RecordEntity, RepositoryActor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct Note { id: u64, text: String }
//!
//! #[derive(Debug, Serialize)]
//! struct NoteCreate { text: String }
//!
//! #[derive(Debug, Default, Serialize)]
//! struct NoteUpdate {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     text: Option<String>,
//! }
//!
//! impl RecordEntity for Note {
//!     type Id = u64;
//!     type Create = NoteCreate;
//!     type Update = NoteUpdate;
//!     type Error = serde_json::Error;
//!
//!     fn id(&self) -> u64 { self.id }
//!     fn from_create_params(id: u64, params: NoteCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, text: params.text })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let store = JsonFileStore::new(dir.path().join("notes.json"));
//!     let (actor, client) = RepositoryActor::new(FileRepository::<Note>::new(store), 10);
//!     tokio::spawn(actor.run());
//!
//!     let note = client.create(NoteCreate { text: "first".into() }).await.unwrap();
//!     let update = NoteUpdate { text: Some("edited".into()) };
//!     let edited = client.update(note.id, update).await.unwrap().unwrap();
//!     assert_eq!(edited.text, "edited");
//!     assert!(client.delete(note.id).await.unwrap());
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - The store itself does no locking; concurrent unserialized writers lose updates
//! - The actor handles one request at a time, so mutations routed through it never interleave
//! - Blocking file I/O runs on Tokio's blocking pool, never on the async workers
//!
//! ## Testing
//!
//! [`mock`] offers a [`MockClient`](mock::MockClient) for scripting replies and
//! [`create_mock_client`](mock::create_mock_client) for inspecting raw requests.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod repository;
pub mod service;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use actor::RepositoryActor;
pub use client::RepositoryClient;
pub use entity::RecordEntity;
pub use error::{FrameworkError, RepositoryError, StoreError};
pub use message::{RepositoryRequest, Response};
pub use repository::{FileRepository, Repository};
pub use service::EntityService;
pub use store::{JsonFileStore, Record};
