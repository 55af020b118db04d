//! Admin session cookies.
//!
//! The session is three cookies written at login: `Access` holds the bearer
//! token, `ExpiresIn` its lifetime in milliseconds and `TokenSetTime` the
//! epoch milliseconds at which it was stored. Expiry is computed locally and
//! is advisory only; the backend makes the real authorization decision.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookie holding the bearer token
pub const ACCESS_COOKIE: &str = "Access";
/// Cookie holding the token lifetime in milliseconds
pub const EXPIRES_IN_COOKIE: &str = "ExpiresIn";
/// Cookie holding the epoch milliseconds the token was stored
pub const TOKEN_SET_TIME_COOKIE: &str = "TokenSetTime";

/// Lifetime used when the backend does not report one (24 hours)
pub const DEFAULT_EXPIRES_IN_MS: i64 = 24 * 60 * 60 * 1000;

/// Session cookies as read from a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token
    pub token: Option<String>,
    /// Token lifetime in milliseconds
    pub expires_in_ms: Option<i64>,
    /// Epoch milliseconds the token was stored
    pub token_set_time_ms: Option<i64>,
}

/// Local view of a session's validity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No `Access` cookie
    Missing,
    /// Token present but past its lifetime, or timing cookies unusable
    Expired,
    /// Token present and within its lifetime
    Active {
        /// Epoch milliseconds at which the session expires
        expires_at_ms: i64,
    },
}

impl Session {
    /// Reads the three session cookies
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        let millis = |name: &str| {
            jar.get(name)
                .and_then(|cookie| cookie.value().trim().parse::<i64>().ok())
        };

        Self {
            token: jar
                .get(ACCESS_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .filter(|token| !token.is_empty()),
            expires_in_ms: millis(EXPIRES_IN_COOKIE),
            token_set_time_ms: millis(TOKEN_SET_TIME_COOKIE),
        }
    }

    /// `TokenSetTime + ExpiresIn`, if both are known
    #[must_use]
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.token_set_time_ms?.checked_add(self.expires_in_ms?)
    }

    /// Validity at `now_ms`
    #[must_use]
    pub fn state(&self, now_ms: i64) -> SessionState {
        if self.token.is_none() {
            return SessionState::Missing;
        }

        match self.expires_at_ms() {
            Some(expires_at_ms) if expires_at_ms > now_ms => SessionState::Active { expires_at_ms },
            _ => SessionState::Expired,
        }
    }
}

/// Stores a fresh session in the jar
#[must_use]
pub fn start(
    jar: CookieJar,
    token: String,
    expires_in_ms: i64,
    now_ms: i64,
    secure: bool,
) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, token, secure))
        .add(session_cookie(
            EXPIRES_IN_COOKIE,
            expires_in_ms.to_string(),
            secure,
        ))
        .add(session_cookie(
            TOKEN_SET_TIME_COOKIE,
            now_ms.to_string(),
            secure,
        ))
}

/// Removes all session cookies
#[must_use]
pub fn end(jar: CookieJar) -> CookieJar {
    [ACCESS_COOKIE, EXPIRES_IN_COOKIE, TOKEN_SET_TIME_COOKIE]
        .into_iter()
        .fold(jar, |jar, name| jar.remove(Cookie::build(name).path("/")))
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar_from(cookie_header: &'static str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie_header));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_reads_all_cookies() {
        let session = Session::from_jar(&jar_from(
            "Access=tok123; ExpiresIn=3600000; TokenSetTime=1700000000000",
        ));
        assert_eq!(session.token.as_deref(), Some("tok123"));
        assert_eq!(session.expires_at_ms(), Some(1_700_003_600_000));
    }

    #[test]
    fn test_active_until_expiry() {
        let session = Session::from_jar(&jar_from(
            "Access=tok; ExpiresIn=1000; TokenSetTime=5000",
        ));
        assert_eq!(
            session.state(5999),
            SessionState::Active {
                expires_at_ms: 6000
            }
        );
        assert_eq!(session.state(6000), SessionState::Expired);
    }

    #[test]
    fn test_missing_token() {
        let session = Session::from_jar(&jar_from("ExpiresIn=1000; TokenSetTime=5000"));
        assert_eq!(session.state(0), SessionState::Missing);

        let empty = Session::from_jar(&jar_from("Access="));
        assert_eq!(empty.state(0), SessionState::Missing);
    }

    #[test]
    fn test_unparsable_timing_is_expired() {
        let session = Session::from_jar(&jar_from("Access=tok; ExpiresIn=soon; TokenSetTime=5000"));
        assert_eq!(session.state(0), SessionState::Expired);

        let without_timing = Session::from_jar(&jar_from("Access=tok"));
        assert_eq!(without_timing.state(0), SessionState::Expired);
    }

    #[test]
    fn test_start_sets_http_only_cookies() {
        let jar = start(CookieJar::new(), "tok".to_string(), 1000, 5000, true);

        let access = jar.get(ACCESS_COOKIE).unwrap();
        assert_eq!(access.value(), "tok");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(jar.get(EXPIRES_IN_COOKIE).unwrap().value(), "1000");
        assert_eq!(jar.get(TOKEN_SET_TIME_COOKIE).unwrap().value(), "5000");
    }

    #[test]
    fn test_end_removes_cookies() {
        let jar = end(jar_from("Access=tok; ExpiresIn=1000; TokenSetTime=5000"));
        assert!(jar.get(ACCESS_COOKIE).is_none());
        assert!(jar.get(EXPIRES_IN_COOKIE).is_none());
        assert!(jar.get(TOKEN_SET_TIME_COOKIE).is_none());
    }
}
