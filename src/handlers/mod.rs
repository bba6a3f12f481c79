pub mod pages;

pub use pages::*;

use crate::{api::AuthConnector, inflight::InFlight};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use url::Url;

pub struct AppState {
    pub auth: Arc<dyn AuthConnector>,
    pub in_flight: InFlight,
    /// Public origin of the site, used to rebuild full page URLs
    pub base_url: Url,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthConnector>, base_url: Url) -> Self {
        Self {
            auth,
            in_flight: InFlight::new(),
            base_url,
        }
    }
}

/// Page routes. Session and tracing layers are added by the caller.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
        .with_state(state)
}
