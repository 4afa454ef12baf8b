use std::sync::Arc;

use sqlx::PgPool;

use crate::admin::console::AdminConsole;
use crate::auth::service::AuthService;
use crate::dashboard::service::CompanyDashboard;
use crate::matching::engine::MatchEngine;
use crate::session::context::SessionContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthService,
    /// Session/profile context; started once at boot, stopped at shutdown.
    pub session: Arc<SessionContext>,
    pub matcher: Arc<MatchEngine>,
    pub admin: Arc<AdminConsole>,
    pub dashboard: Arc<CompanyDashboard>,
}
