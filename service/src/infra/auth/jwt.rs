//! [`Jwt`] authentication backend.

use std::fmt;

use common::operations::{Sign, Verify};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracerr::Traced;

use crate::{
    domain::user::{session, Session},
    infra::{auth, Auth},
};

pub use jsonwebtoken::errors::{Error, ErrorKind};

/// HS256 signer and verifier of [`Session`]s.
#[derive(Clone)]
pub struct Jwt {
    /// Key to sign [`Session`]s with.
    encoding: EncodingKey,

    /// Key to verify [`session::Token`]s with.
    decoding: DecodingKey,

    /// Rules of [`session::Token`]s verification.
    validation: Validation,
}

impl Jwt {
    /// Creates a new [`Jwt`] backend out of the provided shared `secret`.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl fmt::Debug for Jwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwt")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl Auth<Sign<&Session>> for Jwt {
    type Ok = session::Token;
    type Err = Traced<auth::Error>;

    async fn execute(
        &self,
        Sign(session): Sign<&Session>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            session,
            &self.encoding,
        )
        .map_err(tracerr::from_and_wrap!(=> auth::Error))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(token)
    }
}

impl Auth<Verify<&session::Token>> for Jwt {
    type Ok = Session;
    type Err = Traced<auth::Error>;

    async fn execute(
        &self,
        Verify(token): Verify<&session::Token>,
    ) -> Result<Self::Ok, Self::Err> {
        jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.decoding,
            &self.validation,
        )
        .map(|data| data.claims)
        .map_err(tracerr::from_and_wrap!(=> auth::Error))
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{Sign, Verify},
        DateTime,
    };

    use super::Jwt;
    use crate::{
        domain::user::{self, session, Session},
        infra::Auth as _,
    };

    fn session_issued_at(at: DateTime) -> Session {
        Session::new(user::Login::new("alice").unwrap(), at.coerce())
    }

    #[tokio::test]
    async fn verifies_signed_session() {
        let jwt = Jwt::new(b"secret");
        let session = session_issued_at(DateTime::now());

        let token = jwt.execute(Sign(&session)).await.unwrap();
        let verified = jwt.execute(Verify(&token)).await.unwrap();

        assert_eq!(verified.login, session.login);
        assert_eq!(verified.issued_at, session.issued_at);
        assert_eq!(verified.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn rejects_foreign_signature() {
        let session = session_issued_at(DateTime::now());
        let token =
            Jwt::new(b"other").execute(Sign(&session)).await.unwrap();

        let err = Jwt::new(b"secret")
            .execute(Verify(&token))
            .await
            .unwrap_err();

        assert!(!err.as_ref().is_expired());
    }

    #[tokio::test]
    async fn rejects_expired_session() {
        let jwt = Jwt::new(b"secret");
        let issued_at = DateTime::now()
            - Session::LIFETIME
            - Duration::from_secs(60);
        let token = jwt
            .execute(Sign(&session_issued_at(issued_at)))
            .await
            .unwrap();

        let err = jwt.execute(Verify(&token)).await.unwrap_err();

        assert!(err.as_ref().is_expired());
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let token: session::Token = "not-a-jwt".parse().unwrap();

        let err = Jwt::new(b"secret")
            .execute(Verify(&token))
            .await
            .unwrap_err();

        assert!(!err.as_ref().is_expired());
    }
}
