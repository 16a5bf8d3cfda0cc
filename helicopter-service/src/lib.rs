pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::HelicopterConfig;
use crate::middleware::{auth_middleware, require_creator, CreatorGuard};
use crate::services::{
    AuthService, Database, IdentityStore, JwtService, OwnershipGate, ResourceKind,
};

#[derive(Clone)]
pub struct AppState {
    pub config: HelicopterConfig,
    pub db: Database,
    pub auth_service: AuthService,
    pub ownership: OwnershipGate,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
}

impl AppState {
    /// Wire services from configuration. Identity and creator lookups are
    /// passed in so tests can swap them for in-memory stores.
    pub fn new(
        config: HelicopterConfig,
        db: Database,
        identities: Arc<dyn IdentityStore>,
        ownership: OwnershipGate,
    ) -> Result<Self, anyhow::Error> {
        let jwt = JwtService::new(&config.jwt)?;
        let auth_service = AuthService::new(identities, jwt);

        let login_rate_limiter = create_ip_rate_limiter(
            config.rate_limit.login_attempts,
            config.rate_limit.login_window_seconds,
            config.rate_limit.trust_forwarded_for,
        );
        let register_rate_limiter = create_ip_rate_limiter(
            config.rate_limit.register_attempts,
            config.rate_limit.register_window_seconds,
            config.rate_limit.trust_forwarded_for,
        );

        Ok(Self {
            config,
            db,
            auth_service,
            ownership,
            login_rate_limiter,
            register_rate_limiter,
        })
    }

    /// Production wiring: every store is backed by PostgreSQL.
    pub fn from_database(config: HelicopterConfig, db: Database) -> Result<Self, anyhow::Error> {
        let identities: Arc<dyn IdentityStore> = Arc::new(db.clone());
        let ownership = OwnershipGate::from_database(&db);
        Self::new(config, db, identities, ownership)
    }
}

pub fn build_router(state: AppState) -> Router {
    let owned = |kind: ResourceKind| {
        from_fn_with_state(
            CreatorGuard::new(state.ownership.clone(), kind),
            require_creator,
        )
    };

    // Reads and creates need a valid token; PATCH and DELETE also need the
    // caller to be the creator of the target row.
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::user::get_me))
        .route(
            "/helicopters",
            get(handlers::helicopter::list_helicopters)
                .post(handlers::helicopter::create_helicopter),
        )
        .route("/helicopters/:id", get(handlers::helicopter::get_helicopter))
        .route(
            "/helicopters/:id",
            patch(handlers::helicopter::update_helicopter)
                .delete(handlers::helicopter::delete_helicopter)
                .route_layer(owned(ResourceKind::Helicopter)),
        )
        .route(
            "/helicopters/:id/attributes",
            get(handlers::helicopter::list_helicopter_attributes),
        )
        .route(
            "/engines",
            get(handlers::engine::list_engines).post(handlers::engine::create_engine),
        )
        .route("/engines/:id", get(handlers::engine::get_engine))
        .route(
            "/engines/:id",
            patch(handlers::engine::update_engine)
                .delete(handlers::engine::delete_engine)
                .route_layer(owned(ResourceKind::Engine)),
        )
        .route(
            "/attributes",
            get(handlers::attribute::list_attributes).post(handlers::attribute::create_attribute),
        )
        .route("/attributes/:id", get(handlers::attribute::get_attribute))
        .route(
            "/attributes/:id",
            patch(handlers::attribute::update_attribute)
                .delete(handlers::attribute::delete_attribute)
                .route_layer(owned(ResourceKind::Attribute)),
        )
        .route(
            "/attribute-values",
            get(handlers::attribute_value::list_attribute_values)
                .post(handlers::attribute_value::create_attribute_value),
        )
        .route(
            "/attribute-values/:id",
            get(handlers::attribute_value::get_attribute_value),
        )
        .route(
            "/attribute-values/:id",
            patch(handlers::attribute_value::update_attribute_value)
                .delete(handlers::attribute_value::delete_attribute_value)
                .route_layer(owned(ResourceKind::AttributeValue)),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let login_route = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route_layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let register_route = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route_layer(from_fn_with_state(
            state.register_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .merge(login_route)
        .merge(register_route)
        .merge(protected_routes)
        .with_state(state.clone())
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &Request<axum::body::Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Service health check
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "service": state.config.service_name,
                "version": state.config.service_version,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed - database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "service": state.config.service_name,
                })),
            )
        }
    }
}

/// Readiness check for load balancers
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.db.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
