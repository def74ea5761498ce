//! HTTP client for the RBAC API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use rbac_auth::{AuthSession, Role, UserProfile};
use rbac_core::UserId;

use crate::error::ClientError;

#[derive(Clone, Serialize)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserPayload {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Calls the client makes. Authenticated calls take the token explicitly.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthSession, ClientError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError>;

    async fn me(&self, token: &str) -> Result<UserProfile, ClientError>;

    /// Returns the server's confirmation message.
    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ClientError>;

    async fn list_users(&self, token: &str) -> Result<Vec<UserProfile>, ClientError>;

    async fn create_user(&self, token: &str, user: &CreateUserPayload) -> Result<UserProfile, ClientError>;

    async fn update_user(
        &self,
        token: &str,
        id: UserId,
        user: &UpdateUserPayload,
    ) -> Result<UserProfile, ClientError>;

    async fn delete_user(&self, token: &str, id: UserId) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserProfile,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<UserProfile>,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Deserialize)]
struct ErrorItem {
    msg: String,
}

impl ErrorBody {
    /// `message`, else the first `errors[].msg`.
    fn into_message(self) -> Option<String> {
        self.message
            .or_else(|| self.errors.into_iter().next().map(|e| e.msg))
    }
}

/// [`AuthApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        self.client
            .get(self.url("/health"))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status();

        if !status.is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            let message = body
                .into_message()
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::debug!(status = status.as_u16(), %message, "api call failed");
            return Err(ClientError::from_status(status.as_u16(), message));
        }

        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        self.send(self.client.post(self.url("/auth/signup")).json(&body)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(self.client.post(self.url("/auth/login")).json(&body)).await
    }

    async fn me(&self, token: &str) -> Result<UserProfile, ClientError> {
        let env: UserEnvelope = self
            .send(self.client.get(self.url("/auth/me")).bearer_auth(token))
            .await?;
        Ok(env.user)
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ClientError> {
        let body = serde_json::json!({
            "currentPassword": current_password,
            "newPassword": new_password,
        });
        let env: MessageEnvelope = self
            .send(
                self.client
                    .put(self.url("/auth/change-password"))
                    .bearer_auth(token)
                    .json(&body),
            )
            .await?;
        Ok(env.message)
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserProfile>, ClientError> {
        let env: UsersEnvelope = self
            .send(self.client.get(self.url("/users")).bearer_auth(token))
            .await?;
        Ok(env.users)
    }

    async fn create_user(&self, token: &str, user: &CreateUserPayload) -> Result<UserProfile, ClientError> {
        let env: UserEnvelope = self
            .send(self.client.post(self.url("/users")).bearer_auth(token).json(user))
            .await?;
        Ok(env.user)
    }

    async fn update_user(
        &self,
        token: &str,
        id: UserId,
        user: &UpdateUserPayload,
    ) -> Result<UserProfile, ClientError> {
        let env: UserEnvelope = self
            .send(
                self.client
                    .put(self.url(&format!("/users/{id}")))
                    .bearer_auth(token)
                    .json(user),
            )
            .await?;
        Ok(env.user)
    }

    async fn delete_user(&self, token: &str, id: UserId) -> Result<(), ClientError> {
        let _: MessageEnvelope = self
            .send(self.client.delete(self.url(&format!("/users/{id}"))).bearer_auth(token))
            .await?;
        Ok(())
    }
}
