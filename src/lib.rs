pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod organizations;
pub mod passwords;
pub mod repository;
pub mod stats;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{Role, TokenService};
use error::method_not_allowed;
use repository::TenantRepository;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        organizations::handlers::list_organization_users,
        stats::handlers::organization_stats,
        passwords::handlers::change_user_password,
    ),
    components(
        schemas(
            Role,
            health::HealthResponse,
            organizations::OrganizationUser,
            stats::GlobalStats,
            stats::OrganizationStats,
            stats::StatsResponse,
            passwords::ChangePasswordRequest,
            passwords::ChangePasswordResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "organizations", description = "Organization-scoped endpoints"),
        (name = "stats", description = "Cross-organization statistics"),
        (name = "passwords", description = "Privileged password management")
    ),
    info(
        title = "Taskhub API",
        version = "1.0.0",
        description = "Multi-tenant task management API"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TenantRepository>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn TenantRepository>, tokens: TokenService) -> Self {
        Self {
            repository,
            tokens: Arc::new(tokens),
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates and configures the application router
/// Every route declares exactly one method; anything else gets a JSON 405
/// before authentication or data access runs.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; every OPTIONS request is answered here before routing
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route(
            "/health",
            get(health::health_check).fallback(method_not_allowed),
        )
        .route(
            "/organizations/:id/users",
            get(organizations::list_organization_users).fallback(method_not_allowed),
        )
        .route(
            "/stats/organizations",
            get(stats::organization_stats).fallback(method_not_allowed),
        )
        .route(
            "/functions/v1/change-user-password",
            post(passwords::change_user_password).fallback(method_not_allowed),
        )
        .layer(cors)
        .with_state(state)
}
