//! Session cookies carrying the access and refresh tokens.
//!
//! Both cookies are `HttpOnly`, `SameSite=Strict` and scoped to `/`. The
//! `Secure` flag is set only in production so local development over plain
//! HTTP keeps working.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use agencydesk_auth::TokenPair;

/// Cookie holding the access token.
pub const ACCESS_COOKIE: &str = "auth-token";
/// Cookie holding the refresh token.
pub const REFRESH_COOKIE: &str = "refresh-token";

/// Lifetimes and flags for the session cookies.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
    pub access_max_age: i64,
    pub refresh_max_age: i64,
}

impl CookiePolicy {
    pub fn new(secure: bool, access_max_age: i64, refresh_max_age: i64) -> Self {
        Self {
            secure,
            access_max_age,
            refresh_max_age,
        }
    }

    /// Adds both token cookies to the jar.
    pub fn set_tokens(&self, jar: CookieJar, tokens: &TokenPair) -> CookieJar {
        jar.add(self.build(ACCESS_COOKIE, tokens.access_token.clone(), self.access_max_age))
            .add(self.build(
                REFRESH_COOKIE,
                tokens.refresh_token.clone(),
                self.refresh_max_age,
            ))
    }

    /// Overwrites both cookies with expired, empty values.
    pub fn clear_tokens(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.expired(ACCESS_COOKIE))
            .add(self.expired(REFRESH_COOKIE))
    }

    fn build(&self, name: &'static str, value: String, max_age: i64) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(Duration::seconds(max_age))
            .build()
    }

    fn expired(&self, name: &'static str) -> Cookie<'static> {
        Cookie::build((name, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}

/// Reads a non-empty cookie value.
pub fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access.jwt".into(),
            refresh_token: "refresh.jwt".into(),
            access_expires_at: Utc::now(),
            refresh_expires_at: Utc::now(),
        }
    }

    fn rendered(jar: &CookieJar, name: &str) -> String {
        jar.get(name).unwrap().to_string()
    }

    #[test]
    fn test_set_tokens_flags() {
        let policy = CookiePolicy::new(false, 3600, 604_800);
        let jar = policy.set_tokens(CookieJar::new(), &tokens());

        let access = rendered(&jar, ACCESS_COOKIE);
        assert!(access.starts_with("auth-token=access.jwt"));
        assert!(access.contains("HttpOnly"));
        assert!(access.contains("SameSite=Strict"));
        assert!(access.contains("Path=/"));
        assert!(access.contains("Max-Age=3600"));
        assert!(!access.contains("Secure"));

        let refresh = rendered(&jar, REFRESH_COOKIE);
        assert!(refresh.contains("Max-Age=604800"));
    }

    #[test]
    fn test_secure_in_production() {
        let policy = CookiePolicy::new(true, 3600, 604_800);
        let jar = policy.set_tokens(CookieJar::new(), &tokens());
        assert!(rendered(&jar, ACCESS_COOKIE).contains("Secure"));
    }

    #[test]
    fn test_clear_tokens() {
        let policy = CookiePolicy::new(false, 3600, 604_800);
        let jar = policy.clear_tokens(CookieJar::new());
        for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
            let cookie = rendered(&jar, name);
            assert!(cookie.starts_with(&format!("{name}=;")));
            assert!(cookie.contains("Max-Age=0"));
            assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        }
        assert_eq!(cookie_value(&jar, ACCESS_COOKIE), None);
    }
}
