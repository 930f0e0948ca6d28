//! Access Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{RevocationStore, SubscriptionSource};
use crate::presentation::handlers::{self, AccessAppState};

/// Create the access router (`/status`, `/logout`, `/activate`, `/recover`)
pub fn access_router<R, S>(state: AccessAppState<R, S>) -> Router
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    Router::new()
        .route("/status", get(handlers::access_status::<R, S>))
        .route("/logout", post(handlers::logout::<R, S>))
        .route("/activate", get(handlers::activate::<R, S>))
        .route("/recover", get(handlers::recover::<R, S>))
        .with_state(state)
}
