use crate::{
    form::{echo_values, parse_form},
    handlers::AppState,
    login::{LoginContext, LoginView, SubmitError, SubmitOutcome, LOGIN_FAILURE_MESSAGE},
    models::FormMode,
    session::{
        clear_current_user, push_flash, take_flash, visitor_id, AuthUser, Notifier,
        OptionalAuthUser, PendingNavigation, SessionContainer, SessionError, Toast, ToastBuffer,
    },
    templates::{self, LoginPage},
};
use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tower_sessions::Session;

const LOGIN_VIEW_KEY: &str = "login_view";
const IN_FLIGHT_MESSAGE: &str = "Your previous request is still being processed";

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    tab: Option<String>,
    redirect: Option<String>,
}

fn session_failure(e: SessionError) -> StatusCode {
    tracing::error!("Session error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn load_view(session: &Session) -> Result<LoginView, StatusCode> {
    let view = session
        .get::<LoginView>(LOGIN_VIEW_KEY)
        .await
        .map_err(|e| session_failure(e.into()))?;
    Ok(view.unwrap_or_default())
}

async fn save_view(session: &Session, view: &LoginView) -> Result<(), StatusCode> {
    session
        .insert(LOGIN_VIEW_KEY, view)
        .await
        .map_err(|e| session_failure(e.into()))
}

struct Rendered<'a> {
    view: &'a LoginView,
    redirect: Option<&'a str>,
    values: &'a HashMap<&'static str, String>,
    missing: &'a [&'static str],
    username: Option<&'a str>,
    toasts: &'a [Toast],
}

fn render_login(r: Rendered<'_>) -> Html<String> {
    let content = templates::login(&LoginPage {
        view: r.view,
        redirect: r.redirect,
        values: r.values,
        missing: r.missing,
    });
    let title = match r.view.mode() {
        FormMode::Login => "Login",
        FormMode::Registration => "Register",
    };
    let page = templates::base_with_user(title, content, r.username, r.toasts);
    Html(page.into_string())
}

pub async fn home_page(auth: AuthUser, session: Session) -> Result<Html<String>, StatusCode> {
    let toasts = take_flash(&session).await.map_err(session_failure)?;

    let content = templates::home(&auth.user);
    let page = templates::base_with_user(
        "Home",
        content,
        Some(auth.user.display_name()),
        &toasts,
    );

    Ok(Html(page.into_string()))
}

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    opt_auth: OptionalAuthUser,
    Query(params): Query<LoginQuery>,
) -> Result<Html<String>, StatusCode> {
    // Seed the visitor id so every later submission shares it
    let visitor = visitor_id(&session).await.map_err(session_failure)?;
    let mut view = load_view(&session).await?;
    let notifier = ToastBuffer::default();

    if let Some(mode) = params.tab.as_deref().and_then(FormMode::parse) {
        // A running submission writes its view back when it ends
        if mode != view.mode() && state.in_flight.is_active(visitor) {
            tracing::debug!("Visitor {} switched tabs during a submission", visitor);
            notifier.info(IN_FLIGHT_MESSAGE);
        } else {
            view.select_mode(mode);
            save_view(&session, &view).await?;
        }
    }

    let mut toasts = take_flash(&session).await.map_err(session_failure)?;
    toasts.extend(notifier.drain());
    let username = opt_auth.user.as_ref().map(|u| u.display_name());

    Ok(render_login(Rendered {
        view: &view,
        redirect: params.redirect.as_deref(),
        values: &HashMap::new(),
        missing: &[],
        username,
        toasts: &toasts,
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    opt_auth: OptionalAuthUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<LoginQuery>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, StatusCode> {
    let visitor = visitor_id(&session).await.map_err(session_failure)?;
    let mut view = load_view(&session).await?;

    // The form names its tab; a stale tab is refused by the view
    let posted_mode = fields
        .get("type")
        .and_then(|t| FormMode::parse(t))
        .unwrap_or(view.mode());
    let payload = parse_form(posted_mode, &fields);
    let values = echo_values(&payload);
    let username = opt_auth.user.as_ref().map(|u| u.display_name());
    let notifier = ToastBuffer::default();

    let render = |view: &LoginView, missing: &[&'static str], toasts: Vec<Toast>| {
        render_login(Rendered {
            view,
            redirect: params.redirect.as_deref(),
            values: &values,
            missing,
            username,
            toasts: &toasts,
        })
        .into_response()
    };

    let Some(_guard) = state.in_flight.try_begin(visitor) else {
        tracing::warn!("Visitor {} submitted while another submission was running", visitor);
        notifier.info(IN_FLIGHT_MESSAGE);
        return Ok(render(&view, &[], notifier.drain()));
    };

    let page_url = state.base_url.join(&uri.to_string()).map_err(|e| {
        tracing::error!("Failed to build page URL from {}: {}", uri, e);
        StatusCode::BAD_REQUEST
    })?;

    let api = match state.auth.connect() {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("Failed to set up authentication client: {}", e);
            notifier.error(LOGIN_FAILURE_MESSAGE);
            return Ok(render(&view, &[], notifier.drain()));
        }
    };

    let session_state = SessionContainer::new(session.clone());
    let navigator = PendingNavigation::default();
    let ctx = LoginContext {
        api: api.as_ref(),
        session: &session_state,
        navigator: &navigator,
        notifier: &notifier,
    };

    let result = view.submit(payload, &ctx, &page_url).await;
    save_view(&session, &view).await?;

    match result {
        Ok(SubmitOutcome::LoggedIn) => {
            let target = navigator.take().unwrap_or_else(|| "/".to_string());
            push_flash(&session, notifier.drain())
                .await
                .map_err(session_failure)?;
            Ok(Redirect::to(&target).into_response())
        }
        Ok(SubmitOutcome::Rejected) | Ok(SubmitOutcome::Failed) => {
            Ok(render(&view, &[], notifier.drain()))
        }
        Err(SubmitError::MissingFields(missing)) => {
            tracing::debug!("Submission refused, missing fields: {:?}", missing);
            Ok(render(&view, &missing, notifier.drain()))
        }
        Err(e @ SubmitError::ModeMismatch { .. }) => {
            tracing::warn!("Submission refused: {}", e);
            notifier.info("The form changed since it was loaded, please try again");
            Ok(render(&view, &[], notifier.drain()))
        }
    }
}

pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to logout: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Redirect::to("/login").into_response()
}
