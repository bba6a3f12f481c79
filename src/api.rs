//! Client for the remote authentication API.
//!
//! The API exposes two endpoints:
//! - `POST /api/login/account` takes the credential payload plus `type`
//! - `GET /api/currentUser` returns the user bound to the cookie set by the login call

use crate::{
    form::request_body,
    models::{CredentialPayload, LoginResult, SessionUser},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Errors that keep an authentication call from producing an answer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected response from {endpoint}: HTTP {status}")]
    UnexpectedStatus { endpoint: String, status: StatusCode },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to encode request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

/// The authentication collaborator used by one submission.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Submit credentials. A decoded answer is returned whatever its status.
    async fn login(&self, payload: &CredentialPayload) -> Result<LoginResult, ApiError>;

    /// Fetch the user the previous `login` call authenticated, if any.
    async fn current_user(&self) -> Result<Option<SessionUser>, ApiError>;
}

/// Hands out a fresh `AuthApi` per submission, so cookies never leak between visitors.
pub trait AuthConnector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn AuthApi>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct CurrentUserResponse {
    #[serde(default)]
    data: Option<SessionUser>,
}

/// Connector for the HTTP authentication API rooted at `base_url`
#[derive(Debug, Clone)]
pub struct HttpAuthConnector {
    base_url: Url,
}

impl HttpAuthConnector {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl AuthConnector for HttpAuthConnector {
    fn connect(&self) -> Result<Box<dyn AuthApi>, ApiError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Box::new(HttpAuthApi {
            client,
            login_url: self.base_url.join("api/login/account")?,
            current_user_url: self.base_url.join("api/currentUser")?,
        }))
    }
}

/// One cookie jar worth of conversation with the authentication API
pub struct HttpAuthApi {
    client: reqwest::Client,
    login_url: Url,
    current_user_url: Url,
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, payload: &CredentialPayload) -> Result<LoginResult, ApiError> {
        tracing::debug!(
            "Submitting {} request for {} to {}",
            payload.mode(),
            payload.username(),
            self.login_url
        );

        let body = request_body(payload)?;
        let response = self
            .client
            .post(self.login_url.clone())
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Rejections may come back as 4xx with the regular body
        match serde_json::from_str::<LoginResult>(&body) {
            Ok(result) if result.status.is_some() => Ok(result),
            Ok(_) | Err(_) if !status.is_success() => Err(ApiError::UnexpectedStatus {
                endpoint: self.login_url.to_string(),
                status,
            }),
            Ok(_) => Err(ApiError::InvalidResponse(
                "login response has no status".to_string(),
            )),
            Err(e) => Err(ApiError::InvalidResponse(format!(
                "failed to parse login response: {}",
                e
            ))),
        }
    }

    async fn current_user(&self) -> Result<Option<SessionUser>, ApiError> {
        let response = self
            .client
            .get(self.current_user_url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                endpoint: self.current_user_url.to_string(),
                status,
            });
        }

        let parsed: CurrentUserResponse = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("failed to parse current user: {}", e))
        })?;

        Ok(parsed.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_normalizes_base_path() {
        let connector = HttpAuthConnector::new("http://auth.local/v1").unwrap();
        assert_eq!(connector.base_url().as_str(), "http://auth.local/v1/");
        assert_eq!(
            connector.base_url().join("api/currentUser").unwrap().as_str(),
            "http://auth.local/v1/api/currentUser"
        );
    }

    #[test]
    fn test_connector_rejects_garbage_url() {
        assert!(matches!(
            HttpAuthConnector::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_current_user_envelope() {
        let parsed: CurrentUserResponse =
            serde_json::from_str(r#"{"data":{"name":"Asha","access":"admin"},"success":true}"#)
                .unwrap();
        assert_eq!(parsed.data.unwrap().access.as_deref(), Some("admin"));

        let empty: CurrentUserResponse = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(empty.data.is_none());
    }
}
