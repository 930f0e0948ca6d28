//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use platform::clock::SharedClock;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};

use crate::application::config::AccessConfig;
use crate::application::token::SharedSigner;
use crate::application::{
    ActivateAccessUseCase, CheckAccessUseCase, LOGOUT_REASON, RecoverAccessUseCase, RevokeTokenUseCase,
};
use crate::domain::entity::{AccessInfo, is_valid_session_id};
use crate::domain::repository::{RevocationStore, SubscriptionSource};
use crate::error::AccessError;
use crate::presentation::dto::{ActivateQuery, RecoverQuery, redirect};

/// Shared state for access handlers
pub struct AccessAppState<R, S>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    pub revocations: Arc<R>,
    pub subscriptions: Arc<S>,
    pub signer: SharedSigner,
    pub config: Arc<AccessConfig>,
    pub clock: SharedClock,
}

impl<R, S> Clone for AccessAppState<R, S>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            revocations: self.revocations.clone(),
            subscriptions: self.subscriptions.clone(),
            signer: self.signer.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<R, S> AccessAppState<R, S>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    pub fn new(
        revocations: Arc<R>,
        subscriptions: Arc<S>,
        signer: SharedSigner,
        config: AccessConfig,
        clock: SharedClock,
    ) -> Self {
        Self {
            revocations,
            subscriptions,
            signer,
            config: Arc::new(config),
            clock,
        }
    }

    pub fn check_access(&self) -> CheckAccessUseCase<R, S> {
        CheckAccessUseCase::new(
            self.revocations.clone(),
            self.subscriptions.clone(),
            self.signer.clone(),
        )
    }

    /// Access token from the request cookies
    pub fn access_cookie(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.cookie_name)
    }
}

// ============================================================================
// Status
// ============================================================================

/// GET /api/auth/status
pub async fn access_status<R, S>(
    State(state): State<AccessAppState<R, S>>,
    headers: HeaderMap,
) -> Json<AccessInfo>
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    let token = state.access_cookie(&headers);
    Json(state.check_access().info(token.as_deref()).await)
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Revokes the presented token until its expiry and clears the cookie.
pub async fn logout<R, S>(
    State(state): State<AccessAppState<R, S>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    if let Some(token) = state.access_cookie(&headers) {
        let use_case = RevokeTokenUseCase::new(state.revocations.clone(), state.signer.clone());
        // The cookie is cleared either way
        if let Err(e) = use_case.execute(&token, Some(LOGOUT_REASON)).await {
            e.log();
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, delete_cookie_header(&state.config.cookie()))],
    )
}

// ============================================================================
// Checkout activation
// ============================================================================

/// GET /api/auth/activate?session_id=
///
/// Landing point after a purchase: sets the access cookie and sends the
/// buyer to the dashboard.
pub async fn activate<R, S>(
    State(state): State<AccessAppState<R, S>>,
    Query(query): Query<ActivateQuery>,
) -> Response
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    let session_id = query.session_id.as_deref().map(str::trim).unwrap_or_default();
    if !is_valid_session_id(session_id) {
        return Redirect::temporary(&state.config.site_path(redirect::PRICING_MISSING_SESSION))
            .into_response();
    }

    let use_case = ActivateAccessUseCase::new(
        state.subscriptions.clone(),
        state.signer.clone(),
        state.config.clone(),
        state.clock.clone(),
    );

    match use_case.execute(session_id).await {
        Ok(output) => {
            let cookie = state.config.cookie().with_max_age(output.max_age_secs);
            (
                [(header::SET_COOKIE, set_cookie_header(&cookie, &output.token))],
                Redirect::temporary(&state.config.site_path(redirect::DASHBOARD)),
            )
                .into_response()
        }
        Err(e) => {
            e.log();
            let target = match e {
                AccessError::CustomerMissing => redirect::PRICING_NO_CUSTOMER.to_string(),
                AccessError::SubscriptionIdMissing => redirect::PRICING_NO_SUBSCRIPTION.to_string(),
                _ => format!("{}?session_id={session_id}", redirect::SUCCESS),
            };
            Redirect::temporary(&state.config.site_path(&target)).into_response()
        }
    }
}

// ============================================================================
// Recovery link
// ============================================================================

/// GET /api/auth/recover?token=
pub async fn recover<R, S>(
    State(state): State<AccessAppState<R, S>>,
    Query(query): Query<RecoverQuery>,
) -> Response
where
    R: RevocationStore + Send + Sync + 'static,
    S: SubscriptionSource + Send + Sync + 'static,
{
    let token = query.token.as_deref().map(str::trim).unwrap_or_default();
    if token.is_empty() {
        return Redirect::temporary(&state.config.site_path(redirect::RECOVER)).into_response();
    }

    let use_case = RecoverAccessUseCase::new(
        state.revocations.clone(),
        state.subscriptions.clone(),
        state.signer.clone(),
        state.config.clone(),
        state.clock.clone(),
    );

    match use_case.execute(token).await {
        Ok(output) => {
            let cookie = state.config.cookie().with_max_age(output.max_age_secs);
            (
                [(header::SET_COOKIE, set_cookie_header(&cookie, token))],
                Redirect::temporary(&state.config.site_path(redirect::DASHBOARD)),
            )
                .into_response()
        }
        Err(e) => {
            e.log();
            Redirect::temporary(&state.config.site_path(recover_failure_path(&e))).into_response()
        }
    }
}

fn recover_failure_path(err: &AccessError) -> &'static str {
    match err {
        AccessError::SubscriptionInactive => redirect::PRICING_INACTIVE,
        AccessError::SubscriptionSource(_) => redirect::RECOVER_CHECK_FAILED,
        _ => redirect::RECOVER_INVALID,
    }
}
