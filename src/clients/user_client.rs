//! Client for the remote user collection.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::domain::{User, UserId};
use crate::error::ApiError;

/// The remote REST collection the directory mirrors.
///
/// `list_users` is `GET {base}`, `create_user` is `POST {base}`,
/// `update_user` is `PUT {base}/{id}` and `delete_user` is `DELETE {base}/{id}`.
#[async_trait]
pub trait UserApi: Send + Sync + 'static {
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn create_user(&self, user: &User) -> Result<User, ApiError>;
    async fn update_user(&self, id: UserId, user: &User) -> Result<User, ApiError>;
    async fn delete_user(&self, id: UserId) -> Result<(), ApiError>;
}

/// [`UserApi`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpUserClient {
    /// Collection URL without trailing slash
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpUserClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.base_url
    }

    pub fn member_url(&self, id: UserId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl UserApi for HttpUserClient {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        debug!(url = %self.base_url, "Sending request");
        let response = self.send(self.http_client.get(self.collection_url())).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, user), fields(user_name = %user.name))]
    async fn create_user(&self, user: &User) -> Result<User, ApiError> {
        debug!("Sending request");
        let response = self
            .send(self.http_client.post(self.collection_url()).json(user))
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, user), fields(user_id = %id))]
    async fn update_user(&self, id: UserId, user: &User) -> Result<User, ApiError> {
        debug!("Sending request");
        let response = self
            .send(self.http_client.put(self.member_url(id)).json(user))
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        debug!("Sending request");
        self.send(self.http_client.delete(self.member_url(id)))
            .await
            .map(|_| ())
    }
}
