mod admin;
mod applications;
mod auth;
mod companies;
mod config;
mod dashboard;
mod db;
mod discussions;
mod errors;
mod matching;
mod models;
mod navigation;
mod profiles;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::admin::console::AdminConsole;
use crate::admin::store::PgAdminStore;
use crate::dashboard::service::CompanyDashboard;
use crate::dashboard::store::PgDashboardStore;
use crate::auth::events::AuthEvents;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::db::create_pool;
use crate::matching::engine::MatchEngine;
use crate::matching::store::PgMatchStore;
use crate::routes::build_router;
use crate::session::context::SessionContext;
use crate::session::directory::PgProfileDirectory;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Identity + session context. The context listens for sign-ins so the
    // profile exists before the first page that needs it.
    let auth = AuthService::new(
        db.clone(),
        AuthEvents::new(),
        config.session_ttl_hours,
        config.bcrypt_cost,
    );
    let session = Arc::new(SessionContext::new(Arc::new(PgProfileDirectory::new(
        db.clone(),
    ))));
    session.start(auth.events());
    info!(
        "Session context started (session TTL: {}h)",
        config.session_ttl_hours
    );

    let matcher = Arc::new(MatchEngine::new(Arc::new(PgMatchStore::new(db.clone()))));
    let admin = Arc::new(AdminConsole::new(
        Arc::new(PgAdminStore::new(db.clone())),
        config.bcrypt_cost,
    ));
    let dashboard = Arc::new(CompanyDashboard::new(Arc::new(PgDashboardStore::new(
        db.clone(),
    ))));

    // Build app state
    let state = AppState {
        db,
        auth,
        session: session.clone(),
        matcher,
        admin,
        dashboard,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.shutdown();
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
