//! Cookie service — set/clear the httpOnly session cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use gamefest_core::auth::token::TOKEN_LIFETIME_SECS;
use time::Duration;

/// Cookie name for the session token.
pub const SESSION_COOKIE: &str = "gamefest_session";

/// Build a httpOnly cookie carrying the session token.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::seconds(TOKEN_LIFETIME_SECS))
        .build()
}

/// Build an expired cookie to clear the session.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_for_token_lifetime() {
        let cookie = session_cookie("abc.def", true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc.def");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(TOKEN_LIFETIME_SECS)));
    }

    #[test]
    fn clearing_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
