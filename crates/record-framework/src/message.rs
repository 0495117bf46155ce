//! # Repository Messages
//!
//! The requests a [`RepositoryClient`](crate::client::RepositoryClient) sends to a
//! [`RepositoryActor`](crate::actor::RepositoryActor), one variant per repository
//! operation. Each carries a oneshot sender for its reply.

use crate::entity::RecordEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A request for one [`Repository`](crate::repository::Repository) operation.
///
/// Variants mirror the repository contract exactly, so the actor is a thin
/// dispatcher. A `List` with `ids: None` (or an empty list) returns everything.
#[derive(Debug)]
pub enum RepositoryRequest<T: RecordEntity> {
    List {
        ids: Option<Vec<T::Id>>,
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Replace {
        id: T::Id,
        params: T::Create,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<Option<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<bool>,
    },
}
