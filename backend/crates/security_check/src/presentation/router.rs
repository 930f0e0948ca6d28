//! Security Check Router

use axum::{Router, routing::post};

use access::domain::RevocationStore;

use crate::domain::assessor::TargetAssessor;
use crate::presentation::handlers::{self, SecurityCheckAppState};

/// Router serving `POST /security-check`
pub fn security_check_router<R, A>(state: SecurityCheckAppState<R, A>) -> Router
where
    R: RevocationStore + Send + Sync + 'static,
    A: TargetAssessor + Send + Sync + 'static,
{
    Router::new()
        .route("/security-check", post(handlers::check_target::<R, A>))
        .with_state(state)
}
