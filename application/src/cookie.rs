//! `user_jwt` cookie carrying a [`session::Token`] on the client side.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service::domain::user::{session, Session};
use time::OffsetDateTime;

/// Name of the cookie holding a [`session::Token`].
pub const NAME: &str = "user_jwt";

/// Extracts the [`session::Token`] from the provided [`CookieJar`], if any.
#[must_use]
pub fn token(jar: &CookieJar) -> Option<session::Token> {
    let cookie = jar.get(NAME)?;
    match cookie.value().parse() {
        Ok(token) => Some(token),
        Err(e) => match e {},
    }
}

/// Creates a cookie holding the provided [`session::Token`] for the
/// [`Session::LIFETIME`].
#[must_use]
pub fn issue(token: &session::Token) -> Cookie<'static> {
    build(token.to_string(), OffsetDateTime::now_utc() + Session::LIFETIME)
}

/// Creates a cookie replacing the stored one with an empty and already
/// expired value.
#[must_use]
pub fn removal() -> Cookie<'static> {
    build(String::new(), OffsetDateTime::UNIX_EPOCH)
}

/// Builds a cookie with the provided `value` expiring at the provided time.
fn build(value: String, expires: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((NAME, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .expires(expires)
        .build()
}

#[cfg(test)]
mod spec {
    use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
    use time::OffsetDateTime;

    use super::{issue, removal, token, NAME};

    #[test]
    fn removal_is_empty_and_expired() {
        let cookie = removal();
        assert_eq!(cookie.name(), NAME);
        assert_eq!(cookie.value(), "");
        assert!(
            cookie.expires_datetime().unwrap() < OffsetDateTime::now_utc(),
        );
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn issued_lives_for_a_week() {
        let cookie = issue(&"t1".parse().unwrap());
        assert_eq!(cookie.value(), "t1");
        assert_eq!(cookie.path(), Some("/"));
        let left =
            cookie.expires_datetime().unwrap() - OffsetDateTime::now_utc();
        assert!(left > time::Duration::days(6));
        assert!(left <= time::Duration::days(7));
    }

    #[test]
    fn extracts_token() {
        assert!(token(&CookieJar::new()).is_none());

        let jar = CookieJar::new().add(Cookie::new(NAME, "t1"));
        assert_eq!(token(&jar).unwrap().to_string(), "t1");
    }
}
