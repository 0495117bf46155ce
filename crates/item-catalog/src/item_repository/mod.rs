//! # Item Repository
//!
//! Wires the [`Item`] entity into the record framework: a [`FileRepository`] over the
//! configured JSON file, fronted by a [`RepositoryActor`].
//!
//! ## Structure
//!
//! - [`entity`] - [`RecordEntity`](record_framework::RecordEntity) implementation for [`Item`]
//! - [`error`] - [`ItemError`] type for the item resource
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use item_catalog::item_repository;
//!
//! #[tokio::main]
//! async fn main() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let (actor, client) = item_repository::new(dir.path().join("items.json"), 32);
//!     tokio::spawn(actor.run());
//!
//!     assert!(client.list(None).await.unwrap().is_empty());
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Item;
use record_framework::{FileRepository, JsonFileStore, RepositoryActor, RepositoryClient};
use std::path::PathBuf;

/// The repository type backing the catalog.
pub type ItemRepository = FileRepository<Item>;

/// Creates the Item actor and its client over the given data file.
pub fn new(
    data_file: impl Into<PathBuf>,
    buffer_size: usize,
) -> (RepositoryActor<ItemRepository>, RepositoryClient<Item>) {
    let repository = ItemRepository::new(JsonFileStore::new(data_file));
    RepositoryActor::new(repository, buffer_size)
}
