use anyhow::Result;
use clap::Parser;
use config::Config;
use deena::{api::HttpAuthConnector, config, db, handlers};
use handlers::AppState;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{Expiry, SessionManagerLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deena=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse configuration from CLI args and environment variables
    let config = Config::parse();

    let base_url = Url::parse(&config.get_base_url())?;
    let database_url = config.get_database_url();

    tokio::fs::create_dir_all(&config.data_dir).await?;
    tracing::info!("📁 Data directory: {}", config.data_dir.display());

    let db = db::Database::new(&database_url).await?;
    let session_store = db.session_store().await?;
    tracing::info!("💾 Session database initialized: {}", database_url);

    let auth = HttpAuthConnector::new(&config.auth_api_url)?;
    tracing::info!("🔐 Authentication API: {}", auth.base_url());

    let app_state = Arc::new(AppState::new(Arc::new(auth), base_url.clone()));

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(base_url.scheme() == "https")
        .with_expiry(Expiry::OnInactivity(time::Duration::days(config.session_days)));

    let app = handlers::router(app_state)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 Deena server listening on http://{}", addr);
    tracing::info!("📍 Base URL: {}", base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
