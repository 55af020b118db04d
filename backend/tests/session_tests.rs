mod common;

use common::*;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, ResponseTemplate,
};

fn create_login_request(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let context = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/v1-admin/auth/sign-in"))
        .and(body_json(create_login_request("admin@ihaven.io", "hunter2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "tok123",
            "expiresIn": 3_600_000
        })))
        .expect(1)
        .mount(&context.backend)
        .await;

    let response = context
        .send_post_request(
            "/api/session/login",
            create_login_request("admin@ihaven.io", "hunter2"),
            &[],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let access = set_cookie_for(&response, "Access").expect("Access cookie missing");
    assert!(access.starts_with("Access=tok123"));
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("SameSite=Lax"));
    assert!(access.contains("Path=/"));
    // Development never marks cookies Secure
    assert!(!access.contains("Secure"));

    let expires_in = set_cookie_for(&response, "ExpiresIn").expect("ExpiresIn cookie missing");
    assert!(expires_in.starts_with("ExpiresIn=3600000"));
    assert!(set_cookie_for(&response, "TokenSetTime").is_some());

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["expiresIn"], 3_600_000);
    assert!(body["data"]["expiresAt"].as_i64().unwrap() > 3_600_000);
    // The token itself never reaches the browser body
    assert!(!body.to_string().contains("tok123"));
}

#[tokio::test]
async fn test_login_without_expiry_uses_default_lifetime() {
    let context = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/v1-admin/auth/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok456" })))
        .mount(&context.backend)
        .await;

    let response = context
        .send_post_request(
            "/api/session/login",
            create_login_request("admin@ihaven.io", "hunter2"),
            &[],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let expires_in = set_cookie_for(&response, "ExpiresIn").unwrap();
    assert!(expires_in.starts_with("ExpiresIn=86400000"));
}

#[tokio::test]
async fn test_login_with_invalid_credentials() {
    let context = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/v1-admin/auth/sign-in"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&context.backend)
        .await;

    let response = context
        .send_post_request(
            "/api/session/login",
            create_login_request("admin@ihaven.io", "wrong"),
            &[],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());

    let body = parse_response_body(response).await;
    assert_eq!(
        body,
        json!({ "success": false, "status": 401, "message": "Invalid credentials", "data": null })
    );
}

#[tokio::test]
async fn test_login_with_invalid_email_is_rejected() {
    let context = TestContext::new().await;

    let response = context
        .send_post_request(
            "/api/session/login",
            create_login_request("not-an-email", "hunter2"),
            &[],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "invalid_email");
    assert!(context.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_does_not_send_existing_cookie_token() {
    let context = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/v1-admin/auth/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
        .mount(&context.backend)
        .await;

    let cookie = active_session_cookie("old");
    context
        .send_post_request(
            "/api/session/login",
            create_login_request("admin@ihaven.io", "hunter2"),
            &[("Cookie", &cookie)],
        )
        .await;

    let requests = context.backend.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let context = TestContext::new().await;

    let response = context
        .send(
            Request::builder()
                .uri("/api/session/logout")
                .method("POST")
                .header("Cookie", active_session_cookie("tok"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    for name in ["Access", "ExpiresIn", "TokenSetTime"] {
        let removal = set_cookie_for(&response, name).expect("cookie removal missing");
        assert!(removal.contains("Max-Age=0"), "{removal}");
    }
}

#[tokio::test]
async fn test_session_status() {
    let context = TestContext::new().await;

    let response = context.send_get_request("/api/session", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "authenticated": false }));

    let response = context
        .send_get_request("/api/session", Some(&active_session_cookie("tok")))
        .await;
    let body = parse_response_body(response).await;
    assert_eq!(body["authenticated"], true);
    assert!(body["expiresAt"].is_i64());

    let expired = session_cookie_header("tok", 1_000, 5_000);
    let response = context.send_get_request("/api/session", Some(&expired)).await;
    let body = parse_response_body(response).await;
    assert_eq!(body["authenticated"], false);
}
