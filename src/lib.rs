pub mod config;
pub mod error;
pub mod modules;
pub mod services;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method, StatusCode,
    },
    middleware, Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use config::Config;
use error::{envelope_bare_errors, handle_panic, method_not_allowed, not_found, StartupError};
use modules::auth::{
    auth_routes,
    interface::{SessionRepository, UserRepository},
    session::SessionManager,
};
use modules::metrics::metrics_routes;
use modules::placeholder::placeholder_routes;
use services::clock::Clock;
use services::hashing::PasswordHasher;
use services::jwt::TokenIssuer;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::rate_limit::{create_rate_limiter, RateLimitLayer};
use services::security::security_headers;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: SessionManager,
    pub hasher: PasswordHasher,
    pub tokens: TokenIssuer,
    pub metrics: Arc<MetricsRegistry>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        config: &Config,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StartupError> {
        let auth = &config.auth;
        let access_token_ttl = chrono::Duration::from_std(auth.access_token_ttl)?;
        let refresh_token_ttl = chrono::Duration::from_std(auth.refresh_token_ttl)?;

        Ok(Self {
            users,
            sessions: SessionManager::new(sessions, clock.clone(), refresh_token_ttl),
            hasher: PasswordHasher::new(auth.hash_cost, auth.hash_memory_kib)?,
            tokens: TokenIssuer::new(&auth.jwt_secret, access_token_ttl, clock.clone()),
            metrics: MetricsRegistry::new()?,
            clock,
        })
    }
}

/// Maximum JSON body accepted outside upload routes.
pub const MAX_BODY_BYTES: usize = 1024 * 100;

pub fn create_app(state: AppState, config: &Config) -> Router {
    let server = &config.server;
    let state = Arc::new(state);
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let rate_limiter =
        create_rate_limiter(server.rate_limit_per_second, server.rate_limit_burst);

    let api = Router::new()
        .nest("/auth", auth_routes())
        .merge(placeholder_routes(config.storage.max_upload_size));

    // nest() rejects "/" so an empty prefix mounts the API at the root.
    let prefix = format!("/{}", server.api_prefix.trim_matches('/'));
    let router = if prefix == "/" {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    router
        .merge(metrics_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RateLimitLayer::new(rate_limiter))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server.request_timeout(),
        ))
        .layer(middleware::from_fn(envelope_bare_errors))
        .layer(middleware::from_fn_with_state(state.clone(), metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
        .layer(cors_layer(request_id_header))
        .with_state(state)
}

fn cors_layer(request_id_header: HeaderName) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE, request_id_header])
}
