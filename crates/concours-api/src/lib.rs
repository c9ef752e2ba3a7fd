//! HTTP API for the Concours portal
//!
//! Routing, the declarative authorization gate, request handlers and the
//! OpenAPI surface. Every inbound request passes the session gate before a
//! handler runs; handlers recover all failures into typed responses.

pub mod access;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use concours_auth::SessionKeys;
use concours_media::{MediaStore, MAX_UPLOAD_BYTES};
use sea_orm::DatabaseConnection;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    pub keys: SessionKeys,
    pub media: MediaStore,
    pub allow_signup: bool,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Concours API",
        version = "0.1.0",
        description = "REST API for the Concours vehicle show portal",
        contact(
            name = "Concours Team",
            email = "team@concours.events"
        )
    ),
    paths(
        handlers::system::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::current_user,
        handlers::profile::update_profile,
        handlers::profile::change_password,
        handlers::profile::upload_avatar,
        handlers::vehicles::list_vehicles,
        handlers::vehicles::get_vehicle,
        handlers::vehicles::create_vehicle,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,
        handlers::vehicles::upload_photo,
        handlers::judging::create_score,
        handlers::judging::list_scores,
        handlers::vendor::list_products,
        handlers::vendor::create_product,
        handlers::vendor::update_product,
        handlers::vendor::delete_product,
        handlers::votes::cast_vote,
        handlers::votes::list_votes,
        handlers::classes::list_classes,
        handlers::classes::create_class,
        handlers::classes::delete_class,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::settings::get_settings,
        handlers::settings::upload_background,
    ),
    components(
        schemas(
            models::ErrorResponse,
            models::HealthResponse,
            models::User,
            models::RegisterRequest,
            models::RegisterResponse,
            models::LoginRequest,
            models::LoginResponse,
            models::UpdateProfileRequest,
            models::ChangePasswordRequest,
            models::CreateUserRequest,
            models::UpdateUserRequest,
            models::UserList,
            models::Vehicle,
            models::CreateVehicleRequest,
            models::UpdateVehicleRequest,
            models::VehicleList,
            models::Score,
            models::CreateScoreRequest,
            models::ScoreList,
            models::Product,
            models::CreateProductRequest,
            models::UpdateProductRequest,
            models::ProductList,
            models::Vote,
            models::CreateVoteRequest,
            models::VoteList,
            models::VehicleClass,
            models::CreateClassRequest,
            models::ClassList,
            models::SettingsResponse,
            models::UploadResponse,
        )
    ),
    tags(
        (name = "auth", description = "Authentication and session endpoints"),
        (name = "profile", description = "Self-service profile endpoints"),
        (name = "vehicles", description = "Show vehicle registration endpoints"),
        (name = "judging", description = "Judging score endpoints"),
        (name = "products", description = "Vendor product endpoints"),
        (name = "votes", description = "Specialty voting endpoints"),
        (name = "classes", description = "Judging class endpoints"),
        (name = "users", description = "Account administration endpoints"),
        (name = "settings", description = "Site settings endpoints"),
        (name = "system", description = "System health endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS (for development)
    pub enable_cors: bool,
    /// Current session signing secret
    pub session_secret: String,
    /// Prior signing secrets still accepted for verification
    pub previous_session_secrets: Vec<String>,
    /// Allow self-registration
    pub allow_signup: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("valid literal address"),
            enable_cors: true,
            session_secret: "development-secret-change-me".to_string(),
            previous_session_secrets: Vec::new(),
            allow_signup: true,
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, db: DatabaseConnection, media: MediaStore) -> Self {
        let keys = SessionKeys::new(
            &config.session_secret,
            &config.previous_session_secrets,
        );
        let state = Arc::new(AppState {
            db,
            keys,
            media,
            allow_signup: config.allow_signup,
        });

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        let api_router = Router::new()
            .route("/api/health", get(handlers::system::health_check))
            .route("/api/auth/register", post(handlers::auth::register))
            .route("/api/auth/login", post(handlers::auth::login))
            .route("/api/auth/logout", post(handlers::auth::logout))
            .route("/api/auth/me", get(handlers::auth::current_user))
            .route("/api/profile", put(handlers::profile::update_profile))
            .route(
                "/api/profile/password",
                put(handlers::profile::change_password),
            )
            .route("/api/profile/avatar", post(handlers::profile::upload_avatar))
            .route(
                "/api/vehicles",
                get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
            )
            .route(
                "/api/vehicles/{id}",
                get(handlers::vehicles::get_vehicle)
                    .put(handlers::vehicles::update_vehicle)
                    .delete(handlers::vehicles::delete_vehicle),
            )
            .route(
                "/api/vehicles/{id}/photo",
                post(handlers::vehicles::upload_photo),
            )
            .route(
                "/api/scores",
                get(handlers::judging::list_scores).post(handlers::judging::create_score),
            )
            .route(
                "/api/products",
                get(handlers::vendor::list_products).post(handlers::vendor::create_product),
            )
            .route(
                "/api/products/{id}",
                put(handlers::vendor::update_product).delete(handlers::vendor::delete_product),
            )
            .route(
                "/api/votes",
                get(handlers::votes::list_votes).post(handlers::votes::cast_vote),
            )
            .route(
                "/api/classes",
                get(handlers::classes::list_classes).post(handlers::classes::create_class),
            )
            .route("/api/classes/{id}", axum::routing::delete(handlers::classes::delete_class))
            .route(
                "/api/users",
                get(handlers::users::list_users).post(handlers::users::create_user),
            )
            .route(
                "/api/users/{id}",
                put(handlers::users::update_user).delete(handlers::users::delete_user),
            )
            .route("/api/settings", get(handlers::settings::get_settings))
            .route(
                "/api/settings/background",
                post(handlers::settings::upload_background),
            )
            .with_state(self.state.clone())
            // One gate for every route; public routes are simply absent
            // from the access table
            .layer(axum_middleware::from_fn_with_state(
                self.state.clone(),
                middleware::authorize,
            ));

        // Processed assets are served straight off the media root
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router)
            .nest_service("/media", ServeDir::new(self.state.media.root()));

        // The transform pipeline enforces the 5 MiB ceiling itself; the
        // transport limit just needs to sit above it plus form overhead
        let mut router = router
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            use tower_http::cors::AllowOrigin;

            // Cookie auth requires credentials, which rules out a wildcard
            // origin; development origins are matched explicitly
            let cors = CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::PATCH,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
                    let origin_str = origin.to_str().unwrap_or("");
                    origin_str.starts_with("http://localhost:")
                        || origin_str.starts_with("http://127.0.0.1:")
                        || origin_str.starts_with("https://localhost:")
                        || origin_str.starts_with("https://127.0.0.1:")
                }));

            router = router.layer(cors);
        }

        router
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let bind_addr = self.config.bind_addr;
        let router = self.build_router();

        info!("Starting API server on {}", bind_addr);
        info!("OpenAPI spec: http://{}/api/openapi.json", bind_addr);
        info!("Swagger UI: http://{}/swagger-ui", bind_addr);

        let listener = tokio::net::TcpListener::bind(bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        // Ensure OpenAPI spec can be generated without panics
        let _api_doc = ApiDoc::openapi();
    }
}
