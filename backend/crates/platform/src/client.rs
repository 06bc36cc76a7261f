//! Backend API client
//!
//! Thin JSON-over-HTTP wrapper around `reqwest` that owns the shared auth
//! token. Every request made while a token is installed carries it in the
//! `Authorization` header.
//!
//! No timeout, retry or request de-duplication is applied: overlapping
//! calls are all sent as-is.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::token::BearerToken;

/// Errors returned by [`ApiClient`]
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        /// Per-field validation messages (`data.<field>.message`)
        field_errors: BTreeMap<String, String>,
    },

    /// Request never produced a response
    #[error("Unable to reach the server: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Status { status, .. } => ErrorKind::from_status(*status),
            ApiError::Transport(_) => ErrorKind::ServiceUnavailable,
            ApiError::Decode(_) => ErrorKind::BadGateway,
            ApiError::InvalidUrl(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message the backend put in the error body, if any
    ///
    /// A field-level message wins over the generic top-level one, which is
    /// usually just "Failed to create record.".
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message,
                field_errors,
                ..
            } => field_errors
                .values()
                .map(String::as_str)
                .find(|m| !m.is_empty())
                .or_else(|| Some(message.as_str()).filter(|m| !m.is_empty())),
            _ => None,
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        match self {
            ApiError::Status { field_errors, .. } => field_errors.get(field).map(String::as_str),
            _ => None,
        }
    }

    /// Build from a non-2xx response body
    ///
    /// Body shape: `{"code": 400, "message": "...", "data": {"field": {"code": "...", "message": "..."}}}`
    pub fn from_error_body(status: u16, reason: Option<&str>, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct FieldError {
            #[serde(default)]
            message: String,
        }

        #[derive(serde::Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            message: String,
            #[serde(default)]
            data: BTreeMap<String, FieldError>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ApiError::Status {
                status,
                message: if parsed.message.is_empty() {
                    reason.unwrap_or_default().to_string()
                } else {
                    parsed.message
                },
                field_errors: parsed
                    .data
                    .into_iter()
                    .map(|(field, e)| (field, e.message))
                    .collect(),
            },
            Err(_) => ApiError::Status {
                status,
                message: reason.unwrap_or_default().to_string(),
                field_errors: BTreeMap::new(),
            },
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ApiError::Transport(e) => tracing::error!(error = %e, "Backend unreachable"),
            ApiError::Decode(msg) => tracing::error!(message = %msg, "Malformed backend response"),
            ApiError::InvalidUrl(url) => tracing::error!(url = %url, "Invalid API URL"),
            ApiError::Status { status, message, .. } if *status >= 500 => {
                tracing::error!(status, message = %message, "Backend error")
            }
            ApiError::Status { status, message, .. } => {
                tracing::debug!(status, message = %message, "Backend rejected request")
            }
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(e) => AppError::from(e),
            other => {
                let message = other
                    .backend_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string());
                AppError::new(other.kind(), message).with_source(other)
            }
        }
    }
}

/// Shared HTTP client for the backend
///
/// Cloning is cheap; clones share the connection pool and the auth token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Arc<RwLock<Option<BearerToken>>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("todo-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ========================================================================
    // Auth token
    // ========================================================================

    pub fn set_token(&self, token: BearerToken) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = None;
    }

    pub fn token(&self) -> Option<BearerToken> {
        self.token
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    // ========================================================================
    // Requests
    // ========================================================================

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let mut builder = self.http.request(method, self.url(path)?);
        if let Some(token) = self.token() {
            builder = builder.header(AUTHORIZATION, token.as_str());
        }
        Ok(builder)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            let err = ApiError::Transport(e);
            err.log();
            err
        })?;

        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            url = %response.url().path(),
            "API response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_error_body(status.as_u16(), status.canonical_reason(), &body);
        err.log();
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(ApiError::Transport)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            let err = ApiError::Decode(e.to_string());
            err.log();
            err
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.execute(builder).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        let response = self.execute(builder).await?;
        Self::decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PATCH, path)?.json(body);
        let response = self.execute(builder).await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path)?;
        self.execute(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/api/echo-auth",
                get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    Json(json!({ "auth": auth }))
                }),
            )
            .route(
                "/api/invalid",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "code": 400,
                            "message": "Failed to create record.",
                            "data": {
                                "email": {
                                    "code": "validation_not_unique",
                                    "message": "The email is invalid or already in use."
                                }
                            }
                        })),
                    )
                }),
            )
            .route(
                "/api/plain-error",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
            )
            .route("/api/garbage", get(|| async { "not json" }))
            .route("/api/items/{id}", delete(|| async { StatusCode::NO_CONTENT }))
    }

    #[tokio::test]
    async fn test_token_is_sent_once_installed() {
        let client = ApiClient::new(&spawn(test_router()).await).unwrap();

        let body: Value = client.get("/api/echo-auth", &[]).await.unwrap();
        assert!(body["auth"].is_null());

        client.set_token(BearerToken::new("tok123"));
        let body: Value = client.get("api/echo-auth", &[]).await.unwrap();
        assert_eq!(body["auth"], "tok123");

        client.clear_token();
        let body: Value = client.get("/api/echo-auth", &[]).await.unwrap();
        assert!(body["auth"].is_null());
    }

    #[tokio::test]
    async fn test_clones_share_token() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let other = client.clone();
        client.set_token(BearerToken::new("shared"));
        assert_eq!(other.token().unwrap().as_str(), "shared");
    }

    #[tokio::test]
    async fn test_error_body_is_decoded() {
        let client = ApiClient::new(&spawn(test_router()).await).unwrap();
        let err = client
            .post::<_, Value>("/api/invalid", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(
            err.backend_message(),
            Some("The email is invalid or already in use.")
        );
        assert_eq!(
            err.field_error("email"),
            Some("The email is invalid or already in use.")
        );
        assert_eq!(err.to_string(), "Failed to create record.");
    }

    #[tokio::test]
    async fn test_non_json_error_uses_reason_phrase() {
        let client = ApiClient::new(&spawn(test_router()).await).unwrap();
        let err = client.get::<Value>("/api/plain-error", &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.backend_message(), Some("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = ApiClient::new(&spawn(test_router()).await).unwrap();
        let err = client.get::<Value>("/api/garbage", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.kind(), ErrorKind::BadGateway);
        assert!(err.backend_message().is_none());
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let client = ApiClient::new(&spawn(test_router()).await).unwrap();
        client.delete("/api/items/abc").await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // port 9 (discard) is closed on test machines
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.get::<Value>("/api/health", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));

        let app_err: AppError = err.into();
        assert_eq!(app_err.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_status_error_to_app_error() {
        let err = ApiError::from_error_body(
            404,
            Some("Not Found"),
            r#"{"code":404,"message":"The requested resource wasn't found.","data":{}}"#,
        );
        assert!(err.is_not_found());
        let app_err: AppError = err.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);
        assert_eq!(app_err.message(), "The requested resource wasn't found.");
    }
}
