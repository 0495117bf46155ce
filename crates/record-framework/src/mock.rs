//! # Mock Repository Clients
//!
//! Test doubles for [`RepositoryClient`]. Services written against a `RepositoryClient<T>`
//! can be unit-tested without a store file or a running actor.
//!
//! Two styles are available:
//!
//! | Style | How | Good for |
//! |-------|-----|----------|
//! | Fluent | [`MockClient`] with `expect_*().return_ok(..)` | Scripting a sequence of replies |
//! | Manual | [`create_mock_client`] plus [`expect_create`] and friends | Inspecting the exact payload a service sent |
//!
//! ```rust
//! use record_framework::mock::MockClient;
//! use record_framework::{FrameworkError, RecordEntity};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct Note { id: u64 }
//! #[derive(Debug, Serialize)] struct NoteCreate;
//! #[derive(Debug, Serialize)] struct NoteUpdate;
//!
//! impl RecordEntity for Note {
//!     type Id = u64;
//!     type Create = NoteCreate;
//!     type Update = NoteUpdate;
//!     type Error = serde_json::Error;
//!     fn id(&self) -> u64 { self.id }
//!     fn from_create_params(id: u64, _: NoteCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Note>::new();
//!     mock.expect_get(1).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get(1).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```

use crate::client::RepositoryClient;
use crate::entity::RecordEntity;
use crate::error::FrameworkError;
use crate::message::{RepositoryRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: RecordEntity> {
    List {
        ids: Option<Vec<T::Id>>,
        response: Result<Vec<T>, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T, FrameworkError>,
    },
    Replace {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<bool, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock client that answers requests from a queue of expectations.
///
/// Requests must arrive in the order the expectations were registered. A request
/// that does not match the next expectation (wrong operation or wrong id) gets no
/// reply, so the caller sees [`FrameworkError::ActorDropped`], and the mismatch is
/// reported by [`verify`](MockClient::verify).
pub struct MockClient<T: RecordEntity> {
    client: RepositoryClient<T>,
    expectations: Queue<T>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: RecordEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RecordEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<RepositoryRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));

        let queue = Arc::clone(&expectations);
        let failures = Arc::clone(&mismatches);
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();
                if let Err(mismatch) = answer(request, expectation) {
                    lock(&failures).push(mismatch);
                }
            }
        });

        Self {
            client: RepositoryClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> RepositoryClient<T> {
        self.client.clone()
    }

    pub fn expect_list(&mut self, ids: Option<Vec<T::Id>>) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(move |response| Expectation::List { ids, response })
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_replace(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Replace { id, response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, bool> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Panics if a request did not match its expectation or if expectations remain.
    pub fn verify(&self) {
        let mismatches = lock(&self.mismatches);
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {}", mismatches.join("; "));
        }
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn builder<V>(
        &self,
        make: impl FnOnce(Result<V, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, V> {
        ExpectationBuilder {
            make: Box::new(make),
            expectations: Arc::clone(&self.expectations),
        }
    }
}

/// Registers the reply for one expected request.
pub struct ExpectationBuilder<T: RecordEntity, V> {
    make: Box<dyn FnOnce(Result<V, FrameworkError>) -> Expectation<T> + Send>,
    expectations: Queue<T>,
}

impl<T: RecordEntity, V> ExpectationBuilder<T, V> {
    pub fn return_ok(self, value: V) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<V, FrameworkError>) {
        let expectation = (self.make)(response);
        lock(&self.expectations).push_back(expectation);
    }
}

fn reply<V>(respond_to: Response<V>, response: Result<V, FrameworkError>) {
    let _ = respond_to.send(response);
}

fn check_id<Id: PartialEq + std::fmt::Display>(
    operation: &str,
    expected: Id,
    actual: Id,
) -> Result<(), String> {
    if expected == actual {
        Ok(())
    } else {
        Err(format!("{operation}: expected id {expected}, got {actual}"))
    }
}

fn answer<T: RecordEntity>(
    request: RepositoryRequest<T>,
    expectation: Option<Expectation<T>>,
) -> Result<(), String> {
    match (request, expectation) {
        (
            RepositoryRequest::List { ids, respond_to },
            Some(Expectation::List {
                ids: expected,
                response,
            }),
        ) => {
            if ids != expected {
                return Err(format!("List: expected ids {expected:?}, got {ids:?}"));
            }
            reply(respond_to, response);
        }
        (RepositoryRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
            check_id("Get", want, id)?;
            reply(respond_to, response);
        }
        (RepositoryRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            reply(respond_to, response);
        }
        (
            RepositoryRequest::Replace { id, respond_to, .. },
            Some(Expectation::Replace { id: want, response }),
        ) => {
            check_id("Replace", want, id)?;
            reply(respond_to, response);
        }
        (
            RepositoryRequest::Update { id, respond_to, .. },
            Some(Expectation::Update { id: want, response }),
        ) => {
            check_id("Update", want, id)?;
            reply(respond_to, response);
        }
        (
            RepositoryRequest::Delete { id, respond_to },
            Some(Expectation::Delete { id: want, response }),
        ) => {
            check_id("Delete", want, id)?;
            reply(respond_to, response);
        }
        (request, None) => return Err(format!("no expectation left for {request:?}")),
        (request, Some(_)) => return Err(format!("out of order: {request:?}")),
    }
    Ok(())
}

// =============================================================================
// MANUAL HELPERS
// =============================================================================

/// Creates a client together with the receiving end of its channel.
///
/// The test plays the actor: it pulls requests off `receiver` with the `expect_*`
/// helpers, asserts on their payloads and answers through the returned sender.
pub fn create_mock_client<T: RecordEntity>(
    buffer_size: usize,
) -> (RepositoryClient<T>, mpsc::Receiver<RepositoryRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size.max(1));
    (RepositoryClient::new(sender), receiver)
}

/// Next message, if it is a List request.
pub async fn expect_list<T: RecordEntity>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(Option<Vec<T::Id>>, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::List { ids, respond_to }) => Some((ids, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Get request.
pub async fn expect_get<T: RecordEntity>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: RecordEntity>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(T::Create, Response<T>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Replace request.
pub async fn expect_replace<T: RecordEntity>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(T::Id, T::Create, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Replace {
            id,
            params,
            respond_to,
        }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Update request.
pub async fn expect_update<T: RecordEntity>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(T::Id, T::Update, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Delete request.
pub async fn expect_delete<T: RecordEntity>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(T::Id, Response<bool>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u64,
        text: String,
    }

    #[derive(Debug, Serialize)]
    struct NoteCreate {
        text: String,
    }

    #[derive(Debug, Serialize)]
    struct NoteUpdate {
        text: Option<String>,
    }

    impl RecordEntity for Note {
        type Id = u64;
        type Create = NoteCreate;
        type Update = NoteUpdate;
        type Error = serde_json::Error;

        fn id(&self) -> u64 {
            self.id
        }

        fn from_create_params(id: u64, params: NoteCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                text: params.text,
            })
        }
    }

    fn note(id: u64, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_manual_mock_sees_create_payload() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(NoteCreate {
                    text: "draft".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.text, "draft");
        responder.send(Ok(note(1, "draft"))).unwrap();

        let created = create_task.await.unwrap().unwrap();
        assert_eq!(created, note(1, "draft"));
    }

    #[tokio::test]
    async fn test_manual_mock_wrong_kind_yields_none() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let task = tokio::spawn(async move { client.delete(3).await });

        assert!(expect_get(&mut receiver).await.is_none());
        // The request was consumed and its responder dropped.
        assert!(matches!(
            task.await.unwrap(),
            Err(FrameworkError::ActorDropped)
        ));
    }

    #[tokio::test]
    async fn test_fluent_mock_replies_in_order() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_create().return_ok(note(1, "a"));
        mock.expect_list(Some(vec![1])).return_ok(vec![note(1, "a")]);
        mock.expect_update(1).return_ok(Some(note(1, "b")));
        mock.expect_replace(2).return_ok(None);
        mock.expect_delete(1).return_ok(true);

        let client = mock.client();
        let created = client
            .create(NoteCreate {
                text: "a".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let listed = client.list(Some(vec![1])).await.unwrap();
        assert_eq!(listed, vec![note(1, "a")]);

        let updated = client
            .update(
                1,
                NoteUpdate {
                    text: Some("b".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated, Some(note(1, "b")));

        let replaced = client
            .replace(
                2,
                NoteCreate {
                    text: "c".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(replaced.is_none());

        assert!(client.delete(1).await.unwrap());
        mock.verify();
    }

    #[tokio::test]
    async fn test_fluent_mock_injects_errors() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(7).return_err(FrameworkError::ActorClosed);

        let result = mock.client().get(7).await;
        assert!(matches!(result, Err(FrameworkError::ActorClosed)));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "expected id 1, got 2")]
    async fn test_verify_reports_id_mismatch() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "1 remaining")]
    async fn test_verify_reports_unmet_expectations() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_delete(1).return_ok(true);
        mock.verify();
    }
}
