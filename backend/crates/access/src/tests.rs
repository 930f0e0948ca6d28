//! Unit tests for Access crate

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use platform::clock::ManualClock;

    use crate::application::{
        AccessConfig, HmacTokenSigner, IssueAccessTokenInput, IssueAccessTokenUseCase,
        SharedSigner,
    };
    use crate::domain::entity::CheckoutSession;
    use crate::domain::value_object::{AccessPlan, SubscriptionStatus};
    use crate::infra::{InMemoryRevocationStore, StaticSubscriptionSource};
    use crate::presentation::AccessAppState;

    pub const NOW_SECS: i64 = 1_750_000_000;

    pub type TestState = AccessAppState<InMemoryRevocationStore, StaticSubscriptionSource>;

    pub struct Fixture {
        pub clock: Arc<ManualClock>,
        pub state: TestState,
    }

    fn checkout(
        paid: bool,
        product: Option<&str>,
        one_time: bool,
        customer_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> CheckoutSession {
        CheckoutSession {
            paid,
            product: product.map(str::to_string),
            one_time,
            customer_id: customer_id.map(str::to_string),
            subscription_id: subscription_id.map(str::to_string),
        }
    }

    impl Fixture {
        pub fn new() -> Self {
            let clock = ManualClock::shared(NOW_SECS * 1000);
            let signer: SharedSigner =
                Arc::new(HmacTokenSigner::new(b"fixture-secret".to_vec(), clock.clone()));
            let subscriptions = StaticSubscriptionSource::new()
                .with("sub_active", SubscriptionStatus::Active)
                .with("sub_trial", SubscriptionStatus::Trialing)
                .with("sub_canceled", SubscriptionStatus::Canceled)
                .with_session("cs_daypass", checkout(true, None, true, Some("cus_day"), None))
                .with_session(
                    "cs_team",
                    checkout(true, Some("team"), false, Some("cus_team"), Some("sub_active")),
                )
                .with_session("cs_unpaid", checkout(false, Some("pro"), false, Some("cus_x"), None))
                .with_session("cs_no_customer", checkout(true, None, true, None, None))
                .with_session("cs_no_sub", checkout(true, Some("pro"), false, Some("cus_y"), None));
            let state = AccessAppState::new(
                Arc::new(InMemoryRevocationStore::new(clock.clone())),
                Arc::new(subscriptions),
                signer,
                AccessConfig::default(),
                clock.clone(),
            );
            Self { clock, state }
        }

        pub fn issue(&self, plan: AccessPlan, subscription_id: Option<&str>) -> String {
            IssueAccessTokenUseCase::new(
                self.state.signer.clone(),
                self.state.config.clone(),
                self.clock.clone(),
            )
            .execute(IssueAccessTokenInput {
                plan,
                customer_id: "cus_fixture".to_string(),
                subscription_id: subscription_id.map(str::to_string),
            })
            .unwrap()
            .token
        }
    }
}

#[cfg(test)]
mod issue_tests {
    use super::fixtures::*;
    use crate::application::{IssueAccessTokenInput, IssueAccessTokenUseCase};
    use crate::domain::value_object::AccessPlan;
    use crate::error::AccessError;

    fn use_case(fx: &Fixture) -> IssueAccessTokenUseCase {
        IssueAccessTokenUseCase::new(
            fx.state.signer.clone(),
            fx.state.config.clone(),
            fx.clock.clone(),
        )
    }

    #[test]
    fn test_daypass_lifetime() {
        let fx = Fixture::new();
        let output = use_case(&fx)
            .execute(IssueAccessTokenInput {
                plan: AccessPlan::Daypass,
                customer_id: " cus_1 ".to_string(),
                subscription_id: None,
            })
            .unwrap();
        assert_eq!(output.payload.customer_id, "cus_1");
        assert_eq!(output.payload.iat, NOW_SECS);
        assert_eq!(output.payload.exp, NOW_SECS + 86_400);
        assert_eq!(output.max_age_secs, 86_400);
        assert_eq!(fx.state.signer.verify(&output.token), Some(output.payload));
    }

    #[test]
    fn test_subscription_lifetime() {
        let fx = Fixture::new();
        let output = use_case(&fx)
            .execute(IssueAccessTokenInput {
                plan: AccessPlan::Team,
                customer_id: "cus_1".to_string(),
                subscription_id: Some("sub_active".to_string()),
            })
            .unwrap();
        assert_eq!(output.payload.exp - output.payload.iat, 30 * 86_400);
    }

    #[test]
    fn test_pro_requires_subscription_id() {
        let fx = Fixture::new();
        let result = use_case(&fx).execute(IssueAccessTokenInput {
            plan: AccessPlan::Pro,
            customer_id: "cus_1".to_string(),
            subscription_id: Some("  ".to_string()),
        });
        assert!(matches!(result, Err(AccessError::SubscriptionIdMissing)));
    }

    #[test]
    fn test_blank_customer_rejected() {
        let fx = Fixture::new();
        let result = use_case(&fx).execute(IssueAccessTokenInput {
            plan: AccessPlan::Daypass,
            customer_id: String::new(),
            subscription_id: None,
        });
        assert!(matches!(result, Err(AccessError::InvalidRequest(_))));
    }
}

#[cfg(test)]
mod check_access_tests {
    use std::sync::Arc;

    use super::fixtures::*;
    use crate::application::{CheckAccessUseCase, RevokeTokenUseCase};
    use crate::domain::repository::RevocationStore;
    use crate::domain::value_object::AccessPlan;
    use crate::error::{AccessError, AccessResult};

    #[tokio::test]
    async fn test_daypass_granted() {
        let fx = Fixture::new();
        let token = fx.issue(AccessPlan::Daypass, None);
        let grant = fx.state.check_access().execute(Some(&token)).await.unwrap();
        assert_eq!(grant.plan, AccessPlan::Daypass);
        assert_eq!(grant.customer_id, "cus_fixture");
        assert_eq!(grant.exp, NOW_SECS + 86_400);
    }

    #[tokio::test]
    async fn test_subscription_plans_check_status() {
        let fx = Fixture::new();
        let check = fx.state.check_access();

        let active = fx.issue(AccessPlan::Pro, Some("sub_active"));
        assert!(check.execute(Some(&active)).await.is_ok());

        let trial = fx.issue(AccessPlan::Team, Some("sub_trial"));
        assert!(check.execute(Some(&trial)).await.is_ok());

        let canceled = fx.issue(AccessPlan::Pro, Some("sub_canceled"));
        assert!(matches!(
            check.execute(Some(&canceled)).await,
            Err(AccessError::SubscriptionInactive)
        ));

        let missing = fx.issue(AccessPlan::Pro, Some("sub_nowhere"));
        assert!(matches!(
            check.execute(Some(&missing)).await,
            Err(AccessError::SubscriptionSource(_))
        ));
    }

    #[tokio::test]
    async fn test_denial_reasons() {
        let fx = Fixture::new();
        let check = fx.state.check_access();

        assert_eq!(check.info(None).await.reason, Some("no_token"));
        assert_eq!(check.info(Some("")).await.reason, Some("no_token"));
        assert_eq!(check.info(Some("not.valid")).await.reason, Some("invalid_token"));

        let canceled = fx.issue(AccessPlan::Pro, Some("sub_canceled"));
        assert_eq!(
            check.info(Some(&canceled)).await.reason,
            Some("subscription_inactive")
        );

        let missing = fx.issue(AccessPlan::Team, Some("sub_nowhere"));
        assert_eq!(
            check.info(Some(&missing)).await.reason,
            Some("subscription_check_failed")
        );
    }

    #[tokio::test]
    async fn test_expired_token_invalid() {
        let fx = Fixture::new();
        let token = fx.issue(AccessPlan::Daypass, None);
        fx.clock.advance_ms(86_400 * 1000);
        let info = fx.state.check_access().info(Some(&token)).await;
        assert!(!info.ok);
        assert_eq!(info.reason, Some("invalid_token"));
    }

    #[tokio::test]
    async fn test_revoked_token_refused_until_exp() {
        let fx = Fixture::new();
        let token = fx.issue(AccessPlan::Daypass, None);

        RevokeTokenUseCase::new(fx.state.revocations.clone(), fx.state.signer.clone())
            .execute(&token, Some("logout"))
            .await
            .unwrap();

        let check = fx.state.check_access();
        assert!(matches!(
            check.execute(Some(&token)).await,
            Err(AccessError::TokenRevoked)
        ));
        assert_eq!(fx.state.revocations.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_revoke_requires_valid_token() {
        let fx = Fixture::new();
        let result = RevokeTokenUseCase::new(fx.state.revocations.clone(), fx.state.signer.clone())
            .execute("garbage", None)
            .await;
        assert!(matches!(result, Err(AccessError::TokenInvalid)));
        assert_eq!(fx.state.revocations.len().await.unwrap(), 0);
    }

    struct BrokenStore;

    impl RevocationStore for BrokenStore {
        async fn deny(&self, _token: &str, _exp: i64, _reason: Option<&str>) -> AccessResult<()> {
            Err(AccessError::Internal("store offline".to_string()))
        }

        async fn is_denied(&self, _token: &str) -> AccessResult<bool> {
            Err(AccessError::Internal("store offline".to_string()))
        }

        async fn prune_expired(&self) -> AccessResult<usize> {
            Ok(0)
        }

        async fn len(&self) -> AccessResult<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_store_failure_fails_closed() {
        let fx = Fixture::new();
        let token = fx.issue(AccessPlan::Daypass, None);
        let check = CheckAccessUseCase::new(
            Arc::new(BrokenStore),
            fx.state.subscriptions.clone(),
            fx.state.signer.clone(),
        );
        assert!(check.is_revoked(&token).await);
        assert!(matches!(
            check.execute(Some(&token)).await,
            Err(AccessError::TokenRevoked)
        ));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::{self, Next};
    use axum::routing::get;
    use axum::{Extension, Json};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::fixtures::*;
    use crate::domain::entity::AccessGrant;
    use crate::domain::value_object::AccessPlan;
    use crate::presentation::{access_router, require_access};

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn with_cookie(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("theme=dark; claw_access={token}"))
            .body(Body::empty())
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_status_without_cookie() {
        let fx = Fixture::new();
        let response = access_router(fx.state.clone())
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["reason"], "no_token");
    }

    #[tokio::test]
    async fn test_status_with_cookie() {
        let fx = Fixture::new();
        let token = fx.issue(AccessPlan::Pro, Some("sub_active"));
        let response = access_router(fx.state.clone())
            .oneshot(with_cookie("GET", "/status", &token))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["plan"], "pro");
        assert_eq!(body["customerId"], "cus_fixture");
        assert_eq!(body["subscriptionId"], "sub_active");
        assert!(body.get("reason").is_none());
    }

    #[tokio::test]
    async fn test_logout_revokes_and_clears_cookie() {
        let fx = Fixture::new();
        let token = fx.issue(AccessPlan::Daypass, None);
        let app = access_router(fx.state.clone());

        let response = app
            .clone()
            .oneshot(with_cookie("POST", "/logout", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("claw_access=;"));
        assert!(cookie.contains("Max-Age=0"));

        let response = app.oneshot(with_cookie("GET", "/status", &token)).await.unwrap();
        assert_eq!(json_body(response).await["reason"], "token_revoked");
    }

    #[tokio::test]
    async fn test_logout_without_cookie_still_clears() {
        let fx = Fixture::new();
        let response = access_router(fx.state.clone())
            .oneshot(Request::post("/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_recover_sets_cookie_and_redirects() {
        let fx = Fixture::new();
        let token = fx.issue(AccessPlan::Daypass, None);
        fx.clock.advance_ms(3_600 * 1000);

        let response = access_router(fx.state.clone())
            .oneshot(
                Request::get(format!("/recover?token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "http://localhost:3000/dashboard");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(&format!("claw_access={token};")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=82800"));
    }

    #[tokio::test]
    async fn test_recover_failures_redirect() {
        let fx = Fixture::new();
        let app = access_router(fx.state.clone());
        let canceled = fx.issue(AccessPlan::Pro, Some("sub_canceled"));
        let unknown = fx.issue(AccessPlan::Pro, Some("sub_nowhere"));

        let cases = [
            ("/recover".to_string(), "http://localhost:3000/recover"),
            ("/recover?token=".to_string(), "http://localhost:3000/recover"),
            (
                "/recover?token=abc.def".to_string(),
                "http://localhost:3000/recover?invalid=1",
            ),
            (
                format!("/recover?token={canceled}"),
                "http://localhost:3000/pricing?subscription_inactive=1",
            ),
            (
                format!("/recover?token={unknown}"),
                "http://localhost:3000/recover?subscription_check_failed=1",
            ),
        ];

        for (uri, expected) in cases {
            let response = app
                .clone()
                .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
            assert_eq!(location(&response), expected, "{uri}");
            assert!(!response.headers().contains_key(header::SET_COOKIE), "{uri}");
        }
    }

    fn paid_app(fx: &Fixture) -> Router {
        let state = fx.state.clone();
        Router::new()
            .route(
                "/paid",
                get(|Extension(grant): Extension<AccessGrant>| async move {
                    Json(serde_json::json!({ "customer": grant.customer_id }))
                }),
            )
            .layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
                let state = state.clone();
                async move { require_access(state, req, next).await }
            }))
    }

    #[tokio::test]
    async fn test_require_access_gates_route() {
        let fx = Fixture::new();

        let response = paid_app(&fx)
            .oneshot(Request::get("/paid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["reason"], "no_token");

        let canceled = fx.issue(AccessPlan::Pro, Some("sub_canceled"));
        let response = paid_app(&fx)
            .oneshot(with_cookie("GET", "/paid", &canceled))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let token = fx.issue(AccessPlan::Daypass, None);
        let response = paid_app(&fx)
            .oneshot(with_cookie("GET", "/paid", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["customer"], "cus_fixture");
    }

    #[tokio::test]
    async fn test_activate_daypass_sets_cookie() {
        let fx = Fixture::new();
        let response = access_router(fx.state.clone())
            .oneshot(
                Request::get("/activate?session_id=cs_daypass")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "http://localhost:3000/dashboard");

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=86400"));
        let token = cookie
            .strip_prefix("claw_access=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let grant = fx.state.check_access().execute(Some(token)).await.unwrap();
        assert_eq!(grant.plan, AccessPlan::Daypass);
        assert_eq!(grant.customer_id, "cus_day");
    }

    #[tokio::test]
    async fn test_activate_subscription_checkout() {
        let fx = Fixture::new();
        let response = access_router(fx.state.clone())
            .oneshot(
                Request::get("/activate?session_id=cs_team")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(location(&response), "http://localhost:3000/dashboard");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[tokio::test]
    async fn test_activate_failures_redirect() {
        let fx = Fixture::new();
        let app = access_router(fx.state.clone());

        let cases = [
            ("/activate", "http://localhost:3000/pricing?missing_session=1"),
            ("/activate?session_id=", "http://localhost:3000/pricing?missing_session=1"),
            (
                "/activate?session_id=cs%2F..",
                "http://localhost:3000/pricing?missing_session=1",
            ),
            (
                "/activate?session_id=cs_unpaid",
                "http://localhost:3000/success?session_id=cs_unpaid",
            ),
            (
                "/activate?session_id=cs_unknown",
                "http://localhost:3000/success?session_id=cs_unknown",
            ),
            (
                "/activate?session_id=cs_no_customer",
                "http://localhost:3000/pricing?no_customer=1",
            ),
            (
                "/activate?session_id=cs_no_sub",
                "http://localhost:3000/pricing?no_subscription=1",
            ),
        ];

        for (uri, expected) in cases {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
            assert_eq!(location(&response), expected, "{uri}");
            assert!(!response.headers().contains_key(header::SET_COOKIE), "{uri}");
        }
    }
}
