//! # Mock Framework
//!
//! Utilities for testing the directory without a real server.
//!
//! Use [`create_mock_api`] to get a [`UserApi`] implementation and a receiver.
//! Every remote call made through the mock arrives on the receiver as an
//! [`ApiRequest`] carrying a responder; the test plays the server by
//! answering it. Helpers like [`expect_create`] pull the next request and
//! check its kind.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::clients::UserApi;
use crate::domain::{Address, User, UserId};
use crate::error::ApiError;

pub type Responder<T> = oneshot::Sender<Result<T, ApiError>>;

#[derive(Debug)]
pub enum ApiRequest {
    List {
        respond_to: Responder<Vec<User>>,
    },
    Create {
        user: User,
        respond_to: Responder<User>,
    },
    Update {
        id: UserId,
        user: User,
        respond_to: Responder<User>,
    },
    Delete {
        id: UserId,
        respond_to: Responder<()>,
    },
}

#[derive(Clone, Debug)]
pub struct MockUserApi {
    sender: mpsc::Sender<ApiRequest>,
}

/// Creates a mock API and the receiver on which its calls arrive.
pub fn create_mock_api(buffer_size: usize) -> (MockUserApi, mpsc::Receiver<ApiRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockUserApi { sender }, receiver)
}

impl MockUserApi {
    async fn call<T>(&self, request: impl FnOnce(Responder<T>) -> ApiRequest) -> Result<T, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| ApiError::Network("Mock server closed".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Network("Mock server dropped request".to_string()))?
    }
}

#[async_trait]
impl UserApi for MockUserApi {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.call(|respond_to| ApiRequest::List { respond_to }).await
    }

    async fn create_user(&self, user: &User) -> Result<User, ApiError> {
        let user = user.clone();
        self.call(|respond_to| ApiRequest::Create { user, respond_to }).await
    }

    async fn update_user(&self, id: UserId, user: &User) -> Result<User, ApiError> {
        let user = user.clone();
        self.call(|respond_to| ApiRequest::Update { id, user, respond_to })
            .await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.call(|respond_to| ApiRequest::Delete { id, respond_to }).await
    }
}

/// Helper to verify that the next request is a List
pub async fn expect_list(receiver: &mut mpsc::Receiver<ApiRequest>) -> Option<Responder<Vec<User>>> {
    match receiver.recv().await {
        Some(ApiRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next request is a Create
pub async fn expect_create(receiver: &mut mpsc::Receiver<ApiRequest>) -> Option<(User, Responder<User>)> {
    match receiver.recv().await {
        Some(ApiRequest::Create { user, respond_to }) => Some((user, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next request is an Update
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(UserId, User, Responder<User>)> {
    match receiver.recv().await {
        Some(ApiRequest::Update { id, user, respond_to }) => Some((id, user, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next request is a Delete
pub async fn expect_delete(receiver: &mut mpsc::Receiver<ApiRequest>) -> Option<(UserId, Responder<()>)> {
    match receiver.recv().await {
        Some(ApiRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// A complete, valid record for fixtures.
pub fn sample_user(id: u64, name: &str) -> User {
    let handle = name.to_lowercase().replace(' ', ".");
    User {
        id: Some(UserId(id)),
        name: name.to_string(),
        username: handle.clone(),
        email: format!("{handle}@example.com"),
        phone: format!("555-01{id:02}"),
        website: format!("{handle}.example.com"),
        address: Address {
            street: "Kulas Light".to_string(),
            suite: format!("Apt. {id}"),
            city: "Gwenborough".to_string(),
            zipcode: "92998-3874".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api() {
        let (api, mut receiver) = create_mock_api(10);

        let create_task = tokio::spawn(async move {
            let mut draft = sample_user(0, "Test");
            draft.id = None;
            api.create_user(&draft).await
        });

        let (user, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(user.name, "Test");
        assert_eq!(user.id, None);
        responder.send(Ok(user.with_id(UserId(1)))).unwrap();

        let result = create_task.await.unwrap().unwrap();
        assert_eq!(result.id, Some(UserId(1)));
    }

    #[tokio::test]
    async fn test_mock_api_reports_dropped_request() {
        let (api, mut receiver) = create_mock_api(10);

        let delete_task = tokio::spawn(async move { api.delete_user(UserId(4)).await });

        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, UserId(4));
        drop(responder);

        assert!(matches!(delete_task.await.unwrap(), Err(ApiError::Network(_))));
    }
}
