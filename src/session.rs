use crate::{models::SessionUser, redirect::redirect_query};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;
use tower_sessions::Session;
use uuid::Uuid;

const CURRENT_USER_KEY: &str = "current_user";
const VISITOR_KEY: &str = "visitor_id";
const FLASH_KEY: &str = "flash";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),
}

/// Process-wide holder of "who is currently logged in".
#[async_trait]
pub trait SessionState: Send + Sync {
    /// Replace the current user. Reads issued after this resolves see the new user.
    async fn set_current_user(&self, user: SessionUser) -> Result<(), SessionError>;
}

pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Info,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
        });
    }
}

/// `SessionState` backed by the visitor's tower-sessions session
#[derive(Clone)]
pub struct SessionContainer {
    session: Session,
}

impl SessionContainer {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionState for SessionContainer {
    async fn set_current_user(&self, user: SessionUser) -> Result<(), SessionError> {
        // New privilege level, new session id
        self.session.cycle_id().await?;
        self.session.insert(CURRENT_USER_KEY, user).await?;
        Ok(())
    }
}

/// Navigator that remembers the target so the handler can answer with a redirect
#[derive(Debug, Default)]
pub struct PendingNavigation {
    target: Mutex<Option<String>>,
}

impl PendingNavigation {
    pub fn take(&self) -> Option<String> {
        self.target.lock().ok().and_then(|mut t| t.take())
    }
}

impl Navigator for PendingNavigation {
    fn push(&self, path: &str) {
        if let Ok(mut target) = self.target.lock() {
            *target = Some(path.to_string());
        }
    }
}

/// Notifier collecting toasts for the next rendered page
#[derive(Debug, Default)]
pub struct ToastBuffer {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastBuffer {
    pub fn drain(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|mut t| std::mem::take(&mut *t))
            .unwrap_or_default()
    }
}

impl Notifier for ToastBuffer {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

pub async fn current_user(session: &Session) -> Result<Option<SessionUser>, SessionError> {
    Ok(session.get(CURRENT_USER_KEY).await?)
}

pub async fn clear_current_user(session: &Session) -> Result<(), SessionError> {
    session.remove::<SessionUser>(CURRENT_USER_KEY).await?;
    Ok(())
}

/// Stable random id for this visitor, created on first use.
pub async fn visitor_id(session: &Session) -> Result<Uuid, SessionError> {
    if let Some(id) = session.get::<Uuid>(VISITOR_KEY).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(VISITOR_KEY, id).await?;
    Ok(id)
}

/// Queue toasts to be shown on the next page this visitor loads.
pub async fn push_flash(session: &Session, toasts: Vec<Toast>) -> Result<(), SessionError> {
    if toasts.is_empty() {
        return Ok(());
    }
    let mut queued: Vec<Toast> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queued.extend(toasts);
    session.insert(FLASH_KEY, queued).await?;
    Ok(())
}

pub async fn take_flash(session: &Session) -> Result<Vec<Toast>, SessionError> {
    Ok(session
        .remove::<Vec<Toast>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

async fn session_from_parts<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Result<Session, Response> {
    Session::from_request_parts(parts, state)
        .await
        .map_err(|_| {
            tracing::error!("Failed to extract session");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

/// Signed-in user; anonymous visitors are sent to the login page with a
/// `redirect` back to where they were going.
pub struct AuthUser {
    pub user: SessionUser,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).await?;

        let user = current_user(&session).await.map_err(|e| {
            tracing::error!("Failed to get user from session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?;

        match user {
            Some(user) => Ok(AuthUser { user }),
            None => {
                let back_to = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                tracing::debug!("User not authenticated, redirecting to login");
                let location = format!("/login?{}", redirect_query(Some(back_to)));
                Err(Redirect::to(&location).into_response())
            }
        }
    }
}

/// Optional authentication - doesn't redirect if not authenticated
pub struct OptionalAuthUser {
    pub user: Option<SessionUser>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).await?;

        let user = current_user(&session).await.map_err(|e| {
            tracing::error!("Failed to get user from session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?;

        Ok(OptionalAuthUser { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_navigation_keeps_last_push() {
        let nav = PendingNavigation::default();
        assert_eq!(nav.take(), None);
        nav.push("/a");
        nav.push("/b");
        assert_eq!(nav.take().as_deref(), Some("/b"));
        assert_eq!(nav.take(), None);
    }

    #[test]
    fn test_toast_buffer_drains_in_order() {
        let toasts = ToastBuffer::default();
        toasts.success("in");
        toasts.error("oops");
        let drained = toasts.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, ToastLevel::Success);
        assert_eq!(drained[1].message, "oops");
        assert!(toasts.drain().is_empty());
    }
}
