mod common;

use common::*;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn test_get_forwards_query_and_authorization() {
    let context = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/v1/packages"))
        .and(query_param("page", "1"))
        .and(query_param("search", "gold"))
        .and(header("Authorization", "Bearer browser-token"))
        .and(header("Origin", TEST_ORIGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&context.backend)
        .await;

    let response = context
        .send(
            Request::builder()
                .uri("/api/proxy/packages?page=1&search=gold")
                .header("Authorization", "Bearer browser-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "results": [] }));
}

#[tokio::test]
async fn test_post_forwards_body_and_mirrors_status() {
    let context = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/v1/rate/p1"))
        .and(body_json(json!({ "rating": 5, "comment": "Great" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "r1" })))
        .expect(1)
        .mount(&context.backend)
        .await;

    let response = context
        .send_post_request(
            "/api/proxy/rate/p1",
            json!({ "rating": 5, "comment": "Great" }),
            &[],
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["id"], "r1");
}

#[tokio::test]
async fn test_backend_error_status_and_body_are_mirrored() {
    let context = TestContext::new().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/package/p1"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })),
        )
        .mount(&context.backend)
        .await;

    let response = context
        .send(
            Request::builder()
                .uri("/api/proxy/package/p1")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Forbidden");
}

#[tokio::test]
async fn test_non_get_does_not_forward_query() {
    let context = TestContext::new().await;

    Mock::given(method("PUT"))
        .and(path("/v1/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&context.backend)
        .await;

    let response = context
        .send_json_request("PUT", "/api/proxy/profile?debug=1", json!({ "name": "Ada" }), &[])
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let requests = context.backend.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_non_json_backend_body_is_generic_failure() {
    let context = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/v1/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&context.backend)
        .await;

    let response = context.send_get_request("/api/proxy/broken", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "proxy_error");
    assert_eq!(body["error"]["message"], "Failed to forward request");
}

#[tokio::test]
async fn test_non_json_request_body_is_generic_failure() {
    let context = TestContext::new().await;

    let response = context
        .send(
            Request::builder()
                .uri("/api/proxy/anything")
                .method("POST")
                .header("Content-Type", "text/plain")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(context.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_proxy_ignores_session_cookie() {
    let context = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/v1/public/faq/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&context.backend)
        .await;

    let response = context
        .send_get_request("/api/proxy/public/faq/p1", Some(&active_session_cookie("cookie-token")))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let requests = context.backend.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unreachable_backend_is_generic_failure() {
    let router = unreachable_backend_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/proxy/packages")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "proxy_error");
    assert_eq!(body["allowRetry"], true);
}

#[tokio::test]
async fn test_path_leaving_public_base_is_not_forwarded() {
    let context = TestContext::new().await;

    let response = context
        .send_get_request("/api/proxy/..%2Fv1-admin%2Fusers", None)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "proxy_error");
    assert!(context.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_content_is_mirrored_without_body() {
    let context = TestContext::new().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/rate/reviews/r1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&context.backend)
        .await;

    let response = context
        .send(
            Request::builder()
                .uri("/api/proxy/rate/reviews/r1")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}
