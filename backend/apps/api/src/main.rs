//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod health;
mod sweeper;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use access::{
    AccessAppState, AccessConfig, HmacTokenSigner, InMemoryRevocationStore, SharedSigner,
    StripeSubscriptionSource, access_router, middleware::require_access,
};
use axum::body::Body;
use axum::middleware::{self, Next};
use axum::{
    Router, http,
    http::{Method, Request, header},
};
use platform::cache::{CacheConfig, ResponseCache};
use platform::circuit_breaker::CircuitBreakerRegistry;
use platform::clock::{SharedClock, SystemClock};
use platform::config::{env_list, env_parse};
use platform::rate_limit::{RateLimitConfig, RateLimiter};
use quality::{InMemoryRunbookCatalog, QualityAppState, QualityConfig, quality_router, runbook_export_router};
use security_check::{
    HeuristicAssessor, SecurityCheckAppState, SecurityCheckConfig, security_check_router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::health::{HealthState, health_router};
use crate::sweeper::Sweeper;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,access=info,quality=info,security_check=info,platform=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let clock: SharedClock = SystemClock::shared();

    // Shared protection primitives
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default(), clock.clone()));
    let cache = Arc::new(ResponseCache::new(CacheConfig::default(), clock.clone()));
    let revocations = Arc::new(InMemoryRevocationStore::new(clock.clone()));
    let breakers = CircuitBreakerRegistry::global();

    // Access control
    let access_config = if cfg!(debug_assertions) {
        AccessConfig {
            cookie_secure: false,
            ..AccessConfig::from_env()
        }
    } else {
        AccessConfig::from_env()
    };

    let signer = HmacTokenSigner::from_env(clock.clone());
    let signer: SharedSigner = if !signer.has_secret() && cfg!(debug_assertions) {
        tracing::warn!("Using a random access token secret, tokens will not survive a restart");
        Arc::new(HmacTokenSigner::with_random_secret(clock.clone()))
    } else {
        Arc::new(signer)
    };

    let subscriptions = Arc::new(StripeSubscriptionSource::from_env()?);
    let access_state = AccessAppState::new(
        revocations.clone(),
        subscriptions,
        signer.clone(),
        access_config,
        clock.clone(),
    );

    // Quality gate
    let quality_config = QualityConfig::from_env();
    let catalog = Arc::new(InMemoryRunbookCatalog::from_config(&quality_config)?);
    let quality_state = QualityAppState::new(catalog, quality_config, clock.clone());

    // Security check
    let check_config = SecurityCheckConfig::from_env();
    let breaker = breakers.get(&check_config.breaker_name, Some(check_config.breaker.clone()));
    let check_state = SecurityCheckAppState {
        revocations: revocations.clone(),
        signer,
        assessor: Arc::new(HeuristicAssessor::new(clock.clone())),
        limiter: limiter.clone(),
        cache: cache.clone(),
        breaker,
        config: Arc::new(check_config),
    };

    // Background cleanup
    let sweep_every = Duration::from_secs(env_parse("SWEEP_INTERVAL_SECS", 60u64).max(1));
    Sweeper {
        cache: cache.clone(),
        revocations: revocations.clone(),
        limiter: limiter.clone(),
    }
    .spawn(sweep_every);

    let health_state = HealthState {
        breakers,
        cache,
        revocations,
        limiter,
        clock,
    };

    // CORS configuration
    let mut frontend_origins = env_list("FRONTEND_ORIGINS");
    if frontend_origins.is_empty() {
        frontend_origins = platform::config::split_list(DEFAULT_FRONTEND_ORIGINS);
    }

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Paid download routes sit behind the access check
    let gate_state = access_state.clone();
    let downloads = runbook_export_router(quality_state.clone()).layer(middleware::from_fn(
        move |req: Request<Body>, next: Next| {
            let state = gate_state.clone();
            async move { require_access(state, req, next).await }
        },
    ));

    // Build router
    let api = Router::new()
        .merge(security_check_router(check_state))
        .merge(quality_router(quality_state))
        .merge(health_router(health_state))
        .nest("/auth", access_router(access_state))
        .nest("/download", downloads);

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env_parse("API_PORT", 31113);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
