use axum::response::Response;
use http::header::SET_COOKIE;
use http_body_util::BodyExt;

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// All `Set-Cookie` headers of a response
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// The `Set-Cookie` header for a named cookie
pub fn set_cookie_for(response: &Response, name: &str) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|cookie| cookie.starts_with(&format!("{name}=")))
}

/// Cookie header for a session stored `age_ms` ago with the given lifetime
pub fn session_cookie_header(token: &str, expires_in_ms: i64, age_ms: i64) -> String {
    let set_at = chrono::Utc::now().timestamp_millis() - age_ms;
    format!("Access={token}; ExpiresIn={expires_in_ms}; TokenSetTime={set_at}")
}

/// Cookie header for a session that is still valid for a day
pub fn active_session_cookie(token: &str) -> String {
    session_cookie_header(token, 24 * 60 * 60 * 1000, 1_000)
}
