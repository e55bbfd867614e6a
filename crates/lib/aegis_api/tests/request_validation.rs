//! Router tests that are answered before any query runs. The pool behind
//! the router never connects.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;
use uuid::Uuid;

use common::{lazy_app, send, send_request, session_cookie_for};

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = lazy_app();
    for (method, uri) in [
        (Method::GET, "/api/token"),
        (Method::POST, "/api/token"),
        (Method::GET, "/api/device"),
        (Method::DELETE, "/api/device/0190f3c4-0000-7000-8000-000000000000"),
        (Method::GET, "/api/dashboard/stats"),
        (Method::GET, "/api/dashboard/devices"),
        (Method::GET, "/api/auth/me"),
    ] {
        let resp = send(&app, method.clone(), uri, None, None).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert!(resp.json["message"].is_string());
    }
}

#[tokio::test]
async fn forged_session_is_rejected() {
    let app = lazy_app();
    let forged = aegis_core::auth::jwt::generate_session_token(
        &Uuid::new_v4(),
        "x@example.com",
        b"some-other-secret",
    )
    .unwrap();

    let req = Request::builder()
        .uri("/api/token")
        .header(header::AUTHORIZATION, format!("Bearer {forged}"))
        .body(Body::empty())
        .unwrap();
    let resp = send_request(&app, req).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = lazy_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let resp = send_request(&app, req).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.json["message"].is_string());
}

#[tokio::test]
async fn malformed_ids_look_like_missing_entities() {
    let app = lazy_app();
    let cookie = session_cookie_for(Uuid::new_v4());

    let resp = send(&app, Method::GET, "/api/token/not-a-uuid", Some(&cookie), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json["message"], "Token not found");

    let resp = send(&app, Method::GET, "/api/device/42/details", Some(&cookie), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json["message"], "Device not found");
}

#[tokio::test]
async fn token_expiry_must_be_positive() {
    let app = lazy_app();
    let cookie = session_cookie_for(Uuid::new_v4());

    for body in [json!({}), json!({ "expiryInDays": 0 }), json!({ "expiryInDays": -3 })] {
        let resp = send(&app, Method::POST, "/api/token", Some(&cookie), Some(body)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.json["message"], "Valid expiryInDays is required");
    }

    let resp = send(
        &app,
        Method::POST,
        "/api/token",
        Some(&cookie),
        Some(json!({ "expiryInDays": "thirty" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pairing_requires_name_type_and_token() {
    let app = lazy_app();
    let cookie = session_cookie_for(Uuid::new_v4());

    let resp = send(
        &app,
        Method::POST,
        "/api/device",
        Some(&cookie),
        Some(json!({ "name": "iPad", "tokenId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["message"], "Name, type, and tokenId are required");
}

#[tokio::test]
async fn device_patch_is_range_checked() {
    let app = lazy_app();
    let cookie = session_cookie_for(Uuid::new_v4());
    let uri = format!("/api/device/{}", Uuid::new_v4());

    for body in [
        json!({ "riskScore": 150 }),
        json!({ "batteryLevel": -1 }),
        json!({ "totalScreenTime": -10 }),
        json!({ "name": "" }),
        json!({ "connectionType": "5G" }),
    ] {
        let resp = send(&app, Method::PUT, &uri, Some(&cookie), Some(body.clone())).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = lazy_app();
    let resp = send(&app, Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["message"], "Logged out");

    let set_cookie = resp
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(set_cookie.starts_with("token=;"), "{set_cookie}");
    assert!(set_cookie.contains("Max-Age=0"), "{set_cookie}");
}

#[tokio::test]
async fn health_reports_unreachable_database() {
    let app = lazy_app();
    let resp = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["dbConnected"], false);
    assert_eq!(resp.json["status"], "degraded");
    assert_eq!(resp.json["version"], aegis_core::version());
}
