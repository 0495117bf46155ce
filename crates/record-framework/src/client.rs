//! # Repository Client
//!
//! The async handle used to talk to a [`RepositoryActor`](crate::actor::RepositoryActor).

use crate::entity::RecordEntity;
use crate::error::FrameworkError;
use crate::message::{RepositoryRequest, Response};
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for a `RepositoryActor`.
///
/// Holds only a channel sender, so cloning is cheap and clones can be handed to any
/// number of tasks. Every method resolves once the actor has finished the operation,
/// including its file write.
pub struct RepositoryClient<T: RecordEntity> {
    sender: mpsc::Sender<RepositoryRequest<T>>,
}

impl<T: RecordEntity> Clone for RepositoryClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: RecordEntity> RepositoryClient<T> {
    pub fn new(sender: mpsc::Sender<RepositoryRequest<T>>) -> Self {
        Self { sender }
    }

    /// Lists entities. `None` or an empty slice means all of them.
    pub async fn list(&self, ids: Option<Vec<T::Id>>) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| RepositoryRequest::List { ids, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| RepositoryRequest::Get { id, respond_to })
            .await
    }

    pub async fn create(&self, params: T::Create) -> Result<T, FrameworkError> {
        self.request(|respond_to| RepositoryRequest::Create { params, respond_to })
            .await
    }

    pub async fn replace(&self, id: T::Id, params: T::Create) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| RepositoryRequest::Replace {
            id,
            params,
            respond_to,
        })
        .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| RepositoryRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.request(|respond_to| RepositoryRequest::Delete { id, respond_to })
            .await
    }

    async fn request<V>(
        &self,
        build: impl FnOnce(Response<V>) -> RepositoryRequest<T>,
    ) -> Result<V, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
