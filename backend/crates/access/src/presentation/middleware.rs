//! Access Middleware
//!
//! Gates paid routes on a valid access cookie.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domain::repository::{RevocationStore, SubscriptionSource};
use crate::presentation::handlers::AccessAppState;

/// Middleware that requires granted access
///
/// Inserts the [`AccessGrant`](crate::domain::entity::AccessGrant) into the
/// request extensions for downstream handlers.
pub async fn require_access<R, S>(
    state: AccessAppState<R, S>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    let token = state.access_cookie(req.headers());

    let grant = match state.check_access().execute(token.as_deref()).await {
        Ok(grant) => grant,
        Err(e) => return Err(e.into_response()),
    };

    tracing::debug!(plan = %grant.plan, customer_id = %grant.customer_id, "Access granted");
    req.extensions_mut().insert(grant);

    Ok(next.run(req).await)
}
