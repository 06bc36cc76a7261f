//! HTTP Auth Gateway
//!
//! Auth operations against the backend's `users` auth collection.
//!
//! - `POST /api/collections/users/auth-with-password` `{identity, password}`
//! - `POST /api/collections/users/records` `{email, password, passwordConfirm, name}`
//! - `POST /api/collections/users/auth-refresh` (token in `Authorization`)

use platform::client::{ApiClient, ApiError};
use platform::token::BearerToken;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    auth_session::AuthSession,
    credentials::{Credentials, Registration},
    user::User,
};
use crate::domain::repository::AuthGateway;
use crate::error::{AuthError, AuthResult};

const DEFAULT_COLLECTION: &str = "users";

#[derive(Serialize)]
struct PasswordAuthRequest<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    password_confirm: &'a str,
    name: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    record: User,
}

impl From<AuthResponse> for AuthSession {
    fn from(res: AuthResponse) -> Self {
        AuthSession::new(BearerToken::new(res.token), Some(res.record))
    }
}

/// Auth gateway backed by [`ApiClient`]
///
/// Installing a token writes it into the shared client, so every other
/// gateway built on a clone of the same client sends it too.
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    client: ApiClient,
    collection: String,
}

impl HttpAuthGateway {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Use another auth collection than `users`
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn path(&self, action: &str) -> String {
        format!("/api/collections/{}/{}", self.collection, action)
    }
}

impl AuthGateway for HttpAuthGateway {
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<AuthSession> {
        let body = PasswordAuthRequest {
            identity: credentials.email.as_str(),
            password: credentials.password.expose(),
        };

        let res: AuthResponse = self
            .client
            .post(&self.path("auth-with-password"), &body)
            .await
            .map_err(|e| match e.status() {
                // The backend answers a bad password with 400 "Failed to authenticate."
                Some(400) | Some(401) => AuthError::InvalidCredentials,
                _ => AuthError::Api(e),
            })?;

        Ok(res.into())
    }

    async fn sign_up(&self, registration: &Registration) -> AuthResult<User> {
        let password = registration.password.expose();
        let body = CreateUserRequest {
            email: registration.email.as_str(),
            password,
            password_confirm: password,
            name: registration.name.as_str(),
        };

        self.client
            .post(&self.path("records"), &body)
            .await
            .map_err(|e| {
                if e.status() == Some(400) && e.field_error("email").is_some() {
                    AuthError::EmailTaken
                } else {
                    AuthError::Api(e)
                }
            })
    }

    async fn refresh(&self, token: &BearerToken) -> AuthResult<AuthSession> {
        self.client.set_token(token.clone());

        let res: AuthResponse = self
            .client
            .post(&self.path("auth-refresh"), &serde_json::json!({}))
            .await
            .map_err(|e: ApiError| {
                if e.is_unauthorized() || e.is_not_found() {
                    AuthError::SessionExpired
                } else {
                    AuthError::Api(e)
                }
            })?;

        Ok(res.into())
    }

    fn install(&self, token: &BearerToken) {
        self.client.set_token(token.clone());
    }

    fn uninstall(&self) {
        self.client.clear_token();
    }
}
