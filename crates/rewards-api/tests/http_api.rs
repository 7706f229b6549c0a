//! End-to-end tests of the REST surface over an in-memory core.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use rewards_api::{router, AppState};
use rewards_core::{
    InMemoryStore, ManualClock, Principal, RewardsConfig, RewardsService, StaticTokenIdentity,
    Timestamp,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";
const ADMIN: &str = "admin-token";

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(t0()));
        let rewards = RewardsService::with_store(
            RewardsConfig::for_testing(),
            Arc::new(InMemoryStore::new()),
        )
        .with_clock(clock.clone());
        let identity = StaticTokenIdentity::new()
            .with_token(ALICE, Principal::user("alice"))
            .with_token(BOB, Principal::user("bob"))
            .with_token(ADMIN, Principal::admin("root"));
        let router = router(AppState {
            rewards: Arc::new(rewards),
            identity: Arc::new(identity),
        });
        Self { router, clock }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    async fn sync(&self, token: &str) -> Value {
        let (status, body) = self.post("/api/users/sync", Some(token), json!({})).await;
        assert!(status.is_success(), "sync failed: {status} {body}");
        body
    }
}

#[tokio::test]
async fn test_health_and_metrics() {
    rewards_telemetry::register_metrics().unwrap();
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    app.post("/api/users/register", None, json!({})).await;
    let (status, body) = app.get("/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("rewards_users_registered_total"));
}

#[tokio::test]
async fn test_register_and_invite_lookup() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/users/register", None, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    let code = body["inviteCode"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 34);

    let (status, body) = app.get(&format!("/api/users/invite/{code}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inviteCode"], code.as_str());
    assert_eq!(body["recentAmount"], 0);

    let (status, body) = app.get("/api/users/invite/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (_, body) = app.get("/api/users/count", None).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_referral_flow() {
    let app = TestApp::new();
    let (_, body) = app.post("/api/users/register", None, json!({})).await;
    let referrer = body["inviteCode"].as_str().unwrap().to_string();

    let (status, body) = app
        .post("/api/users/referral", None, json!({ "referredBy": referrer }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recentAmount"], 50);
    assert_ne!(body["inviteCode"], referrer.as_str());

    let (_, body) = app.get(&format!("/api/users/invite/{referrer}"), None).await;
    assert_eq!(body["recentAmount"], 50);

    let (status, body) = app
        .post("/api/users/referral", None, json!({ "referredBy": "missing" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (status, body) = app
        .post("/api/users/referral", None, json!({ "wrong": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn test_authentication_tiers() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/users/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = app.get("/api/users/profile", Some("forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/users/profile", Some(ALICE)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post("/api/users/sync", Some(ALICE), json!({ "country": "Ghana" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    assert_eq!(body["user"]["country"], "Ghana");

    let (status, body) = app.post("/api/users/sync", Some(ALICE), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);
    assert_eq!(body["user"]["country"], "Ghana");

    let (status, body) = app.get("/api/users/profile", Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["externalId"], "alice");
}

#[tokio::test]
async fn test_session_cycle_over_http() {
    let app = TestApp::new();
    app.sync(ALICE).await;

    let (status, body) = app.get("/api/users/sessions", Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 4);
    assert_eq!(sessions[0]["isLocked"], false);
    assert_eq!(sessions[1]["isLocked"], true);

    let (status, body) = app
        .post("/api/users/sessions/complete", Some(ALICE), json!({ "sessionNumber": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionsReset"], false);
    assert_eq!(body["nextSession"]["sessionNumber"], 2);

    let (status, body) = app
        .post("/api/users/sessions/complete", Some(ALICE), json!({ "sessionNumber": 2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_state");

    app.clock.advance(Duration::hours(6));
    let (status, _) = app
        .post("/api/users/sessions/complete", Some(ALICE), json!({ "sessionNumber": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/users/sessions/complete", Some(ALICE), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (status, body) = app
        .post("/api/users/sessions/unlock", Some(ALICE), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["sessionNumber"], 3);

    let (status, body) = app
        .post("/api/users/sessions/reset", Some(ALICE), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessions"][0]["isLocked"], false);
    assert_eq!(body["sessions"][2]["isLocked"], true);
}

#[tokio::test]
async fn test_withdrawal_flow() {
    let app = TestApp::new();
    app.sync(ALICE).await;
    app.sync(BOB).await;
    app.sync(ADMIN).await;

    let (status, body) = app
        .put("/api/users/balance", Some(ALICE), json!({ "amount": 5000 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 5000);

    let (status, body) = app
        .post(
            "/api/withdraw",
            Some(ALICE),
            json!({ "amount": 3000, "walletAddress": "0xABC" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["withdrawal"]["status"], "pending");

    let (_, body) = app.get("/api/users/profile", Some(ALICE)).await;
    assert_eq!(body["user"]["balance"], 2000);

    let (status, body) = app
        .post(
            "/api/withdraw",
            Some(ALICE),
            json!({ "amount": 1000, "walletAddress": "0xABC" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_balance");

    let (status, body) = app
        .post(
            "/api/withdraw",
            Some(BOB),
            json!({ "amount": 0, "walletAddress": "0xB" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (_, body) = app.get("/api/withdraw", Some(ALICE)).await;
    let own = body["withdrawals"].as_array().unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["date"], "2024-05-01");
    assert_eq!(own[0]["amount"], 3000);

    let (_, body) = app.get("/api/withdraw", Some(BOB)).await;
    assert!(body["withdrawals"].as_array().unwrap().is_empty());

    let (_, body) = app.get("/api/withdraw", Some(ADMIN)).await;
    assert_eq!(body["withdrawals"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_wallet_update() {
    let app = TestApp::new();
    app.sync(ALICE).await;

    let (status, body) = app
        .put(
            "/api/users/wallet",
            Some(ALICE),
            json!({ "walletType": "metamask", "walletAddress": "0xM" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["walletAddresses"]["metamask"], "0xM");

    let (status, body) = app
        .put(
            "/api/users/wallet",
            Some(ALICE),
            json!({ "walletType": "paper", "walletAddress": "0xM" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (status, body) = app
        .post("/api/users/calculator", Some(ALICE), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculatorUsage"], 1);
}

#[tokio::test]
async fn test_notification_management_and_receipts() {
    let app = TestApp::new();
    app.sync(ALICE).await;

    let input = json!({
        "title": "Weekend boost",
        "message": "Double rewards",
        "image": "uploads/boost.png",
        "priority": "high"
    });

    let (status, _) = app.post("/api/notifications", Some(ALICE), input.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/api/notifications", Some(ADMIN), json!({ "title": "No image" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (status, body) = app.post("/api/notifications", Some(ADMIN), input).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["notification"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["notification"]["content"], "Double rewards");
    assert_eq!(body["notification"]["isSent"], false);

    app.clock.advance(Duration::minutes(1));
    let (status, body) = app
        .send(Method::PUT, &format!("/api/notifications/{id}/sent"), Some(ADMIN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["isSent"], true);

    let (status, body) = app.get("/api/notifications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notifications"].as_array().unwrap().len(), 1);

    let (_, body) = app.get("/api/notifications/me/unread", Some(ALICE)).await;
    assert_eq!(body["unreadCount"], 1);

    let (status, _) = app
        .post(&format!("/api/notifications/{id}/read"), Some(ALICE), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/notifications/me", Some(ALICE)).await;
    assert_eq!(body["notifications"][0]["isRead"], true);

    let (_, body) = app
        .post("/api/notifications/me/read-all", Some(ALICE), json!({}))
        .await;
    assert_eq!(body["marked"], 0);

    let (status, body) = app
        .post("/api/notifications/not-a-uuid/read", Some(ALICE), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let path = format!("/api/notifications/{id}");
    let (status, _) = app.send(Method::DELETE, &path, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.send(Method::DELETE, &path, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}
