//! Login/registration page state and its submission workflow.
//!
//! The page keeps two pieces of state: the active [`FormMode`] and the result
//! of the last submission. Everything the workflow talks to (the
//! authentication API, the session container, navigation, notifications) is
//! passed in through a [`LoginContext`], so the workflow runs the same against
//! the real server plumbing and against test fakes.

use crate::{
    api::{ApiError, AuthApi},
    form::missing_fields,
    models::{CredentialPayload, FormMode, SubmissionResult, SubmissionStatus},
    redirect::resolve_redirect,
    session::{Navigator, Notifier, SessionError, SessionState},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGIN_FAILURE_MESSAGE: &str = "Login failed, please try again!";

/// Reasons a submission is refused before the authentication API is called
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{payload} form submitted while the {active} form is active")]
    ModeMismatch { active: FormMode, payload: FormMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Session established and navigation issued
    LoggedIn,
    /// The API answered with a non-ok status
    Rejected,
    /// The API could not be reached or the session could not be established
    Failed,
}

/// Collaborators used by one submission
pub struct LoginContext<'a> {
    pub api: &'a dyn AuthApi,
    pub session: &'a dyn SessionState,
    pub navigator: &'a dyn Navigator,
    pub notifier: &'a dyn Notifier,
}

#[derive(Debug, Error)]
enum EstablishError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginView {
    mode: FormMode,
    last_result: Option<SubmissionResult>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn last_result(&self) -> Option<SubmissionResult> {
        self.last_result
    }

    /// Switch tabs. A result from the previous tab is dropped.
    pub fn select_mode(&mut self, mode: FormMode) {
        if self.mode == mode {
            return;
        }
        tracing::debug!("Switching login form from {} to {}", self.mode, mode);
        self.mode = mode;
        self.last_result = None;
    }

    /// The rejection to show as a banner, if it belongs to the active tab.
    pub fn visible_error(&self) -> Option<SubmissionResult> {
        self.last_result
            .filter(|r| r.is_error() && r.mode == self.mode)
    }

    /// Run one submission attempt for the active mode.
    ///
    /// On success the current user is written to the session container and
    /// that write is awaited before the redirect target is pushed.
    pub async fn submit(
        &mut self,
        payload: CredentialPayload,
        ctx: &LoginContext<'_>,
        page_url: &Url,
    ) -> Result<SubmitOutcome, SubmitError> {
        let mode = self.mode;
        if payload.mode() != mode {
            return Err(SubmitError::ModeMismatch {
                active: mode,
                payload: payload.mode(),
            });
        }

        let missing = missing_fields(&payload);
        if !missing.is_empty() {
            return Err(SubmitError::MissingFields(missing));
        }

        let answer = match ctx.api.login(&payload).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Authentication call failed: {}", e);
                ctx.notifier.error(LOGIN_FAILURE_MESSAGE);
                return Ok(SubmitOutcome::Failed);
            }
        };

        if !answer.is_ok() {
            tracing::warn!(
                "{} rejected for {} (status {:?})",
                mode,
                payload.username(),
                answer.status
            );
            self.last_result = Some(SubmissionResult {
                status: SubmissionStatus::Error,
                mode,
            });
            return Ok(SubmitOutcome::Rejected);
        }

        ctx.notifier.success(LOGIN_SUCCESS_MESSAGE);

        if let Err(e) = establish_session(ctx).await {
            tracing::error!("Failed to establish session after {}: {}", mode, e);
            ctx.notifier.error(LOGIN_FAILURE_MESSAGE);
            return Ok(SubmitOutcome::Failed);
        }

        self.last_result = Some(SubmissionResult {
            status: SubmissionStatus::Ok,
            mode,
        });

        let target = resolve_redirect(page_url);
        tracing::info!(
            "{} succeeded for {}, navigating to {}",
            mode,
            payload.username(),
            target
        );
        ctx.navigator.push(&target);

        Ok(SubmitOutcome::LoggedIn)
    }
}

async fn establish_session(ctx: &LoginContext<'_>) -> Result<(), EstablishError> {
    match ctx.api.current_user().await? {
        Some(user) => {
            tracing::debug!("Storing current user {}", user.display_name());
            ctx.session.set_current_user(user).await?;
        }
        None => tracing::warn!("Authentication succeeded but no current user was returned"),
    }
    Ok(())
}
