pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::{
    admin, applications, auth, companies, dashboard, discussions, matching, navigation, profiles,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/navigation", get(navigation::handle_navigation))
        // Identity
        .route("/api/v1/auth/sign-up", post(auth::handlers::handle_sign_up))
        .route("/api/v1/auth/sign-in", post(auth::handlers::handle_sign_in))
        .route("/api/v1/auth/sign-out", post(auth::handlers::handle_sign_out))
        .route("/api/v1/auth/session", get(auth::handlers::handle_get_session))
        // Match engine
        .route("/api/v1/jobs/deck", get(matching::handlers::handle_get_deck))
        .route("/api/v1/jobs/:id/swipe", post(matching::handlers::handle_swipe))
        // Companies
        .route(
            "/api/v1/companies",
            get(companies::handlers::handle_list_companies),
        )
        .route(
            "/api/v1/companies/:id",
            get(companies::handlers::handle_get_company),
        )
        // Job seeker
        .route(
            "/api/v1/applications",
            get(applications::handlers::handle_list_applications),
        )
        .route(
            "/api/v1/profile",
            get(profiles::handlers::handle_get_profile).put(profiles::handlers::handle_update_profile),
        )
        // Forum
        .route(
            "/api/v1/threads",
            get(discussions::handlers::handle_list_threads)
                .post(discussions::handlers::handle_create_thread),
        )
        .route(
            "/api/v1/threads/:id",
            get(discussions::handlers::handle_get_thread),
        )
        .route(
            "/api/v1/threads/:id/comments",
            post(discussions::handlers::handle_add_comment),
        )
        // Company dashboard
        .route(
            "/api/v1/company/dashboard",
            get(dashboard::handlers::handle_get_dashboard),
        )
        .route(
            "/api/v1/company",
            put(dashboard::handlers::handle_update_company),
        )
        .route(
            "/api/v1/company/jobs",
            post(dashboard::handlers::handle_post_job),
        )
        .route(
            "/api/v1/company/jobs/:id",
            patch(dashboard::handlers::handle_set_job_active),
        )
        .route(
            "/api/v1/company/applications/:id",
            patch(dashboard::handlers::handle_set_application_status),
        )
        // Platform admin
        .route("/api/v1/admin", get(admin::handlers::handle_get_overview))
        .route(
            "/api/v1/admin/companies",
            post(admin::handlers::handle_provision_company),
        )
        .route(
            "/api/v1/admin/admins",
            post(admin::handlers::handle_provision_admin),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::admin::console::AdminConsole;
    use crate::admin::store::PgAdminStore;
    use crate::auth::events::AuthEvents;
    use crate::auth::service::AuthService;
    use crate::dashboard::service::CompanyDashboard;
    use crate::dashboard::store::PgDashboardStore;
    use crate::matching::engine::MatchEngine;
    use crate::matching::store::PgMatchStore;
    use crate::session::context::SessionContext;
    use crate::session::directory::PgProfileDirectory;

    /// State over a lazy pool: routes that never reach the database can be
    /// exercised without one.
    fn offline_state() -> AppState {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/jobmatch_offline")
            .unwrap();
        AppState {
            auth: AuthService::new(db.clone(), AuthEvents::new(), 1, 4),
            session: Arc::new(SessionContext::new(Arc::new(PgProfileDirectory::new(
                db.clone(),
            )))),
            matcher: Arc::new(MatchEngine::new(Arc::new(PgMatchStore::new(db.clone())))),
            admin: Arc::new(AdminConsole::new(Arc::new(PgAdminStore::new(db.clone())), 4)),
            dashboard: Arc::new(CompanyDashboard::new(Arc::new(PgDashboardStore::new(
                db.clone(),
            )))),
            db,
        }
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = build_router(offline_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_signed_out_navigation() {
        let (status, body) = get_json("/api/v1/navigation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signed_in"], false);
        assert_eq!(body["account"][0]["href"], "/auth/login");
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        for uri in [
            "/api/v1/jobs/deck",
            "/api/v1/applications",
            "/api/v1/profile",
            "/api/v1/company/dashboard",
            "/api/v1/admin",
        ] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }
    }
}
