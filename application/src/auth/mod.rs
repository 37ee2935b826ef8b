//! REST API of the issuing service.

pub mod rpc;

use axum::{
    extract::rejection::JsonRejection, middleware, routing::post, Extension,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use http::StatusCode;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        create_user, create_user_session, delete_user, CreateUser,
        CreateUserSession, DeleteUser,
    },
    domain::user,
    infra::{auth::Jwt, Postgres},
    Command as _,
};

use crate::{cookie, define_error, AsError, Error};

pub use self::rpc::Rpc;

/// [`service::Service`] of the issuing service.
pub type Service = service::Service<Postgres, Jwt>;

/// Builds the [`Router`] serving the `/auth/*` routes.
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/delete", post(delete))
        .layer(middleware::from_fn(crate::middleware::seed))
        .layer(Extension(service))
}

define_error! {
    enum CredentialsError {
        #[code = "EMPTY_CREDENTIALS"]
        #[status = BAD_REQUEST]
        #[message = "Login and password must not be empty"]
        Empty,
    }
}

define_error! {
    enum SessionError {
        #[code = "NO_SESSION"]
        #[status = BAD_REQUEST]
        #[message = "No active session"]
        Missing,
    }
}

/// Body of a `POST /auth/register` request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegisterRequest {
    login: String,
    email: String,
    pass: String,
    name: String,
}

/// Body of a `POST /auth/login` request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginRequest {
    /// Either login or e-mail.
    credential: String,
    pass: String,
}

/// Body of a successful `POST /auth/register` or `POST /auth/login`
/// response.
#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
}

/// Registers a new user and returns its token.
///
/// Doesn't set the cookie: the client is expected to log in afterwards.
async fn register(
    Extension(service): Extension<Service>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), Error> {
    let Json(RegisterRequest {
        login,
        email,
        pass,
        name,
    }) = body.map_err(AsError::into_error)?;

    let (Some(login), Some(password)) =
        (user::Login::new(login), user::Password::new(pass))
    else {
        return Err(CredentialsError::Empty.into());
    };

    let out = service
        .execute(CreateUser {
            login,
            email: email.into(),
            password: SecretBox::new(Box::new(password)),
            name: name.into(),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: out.token.into(),
        }),
    ))
}

/// Returns the stored token of a user and sets it as the cookie.
async fn login(
    Extension(service): Extension<Service>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<TokenResponse>), Error> {
    let Json(LoginRequest { credential, pass }) =
        body.map_err(AsError::into_error)?;

    let Some(password) = user::Password::new(pass) else {
        return Err(CredentialsError::Empty.into());
    };
    if credential.is_empty() {
        return Err(CredentialsError::Empty.into());
    }

    let user = service
        .execute(CreateUserSession::ByCredentials {
            credential: credential.into(),
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)?;

    let jar = jar.add(cookie::issue(&user.token));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(TokenResponse {
            token: user.token.into(),
        }),
    ))
}

/// Clears the cookie on the client side.
///
/// The token itself stays valid.
#[expect(clippy::unused_async, reason = "`axum` handler")]
async fn logout(
    jar: CookieJar,
) -> (CookieJar, Result<StatusCode, SessionError>) {
    let res = if cookie::token(&jar).is_some() {
        Ok(StatusCode::OK)
    } else {
        Err(SessionError::Missing)
    };
    (jar.add(cookie::removal()), res)
}

/// Deletes the user owning the token of the cookie and clears the cookie.
async fn delete(
    Extension(service): Extension<Service>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), Error> {
    let Some(token) = cookie::token(&jar) else {
        return Err(SessionError::Missing.into());
    };

    service
        .execute(DeleteUser::from(token))
        .await
        .map_err(AsError::into_error)?;

    Ok((jar.add(cookie::removal()), StatusCode::OK))
}

impl AsError for create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Auth(e) => e.try_as_error(),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            // Unknown credentials are reported as an internal failure.
            Self::WrongCredentials => None,
        }
    }
}

impl AsError for delete_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

#[cfg(test)]
mod spec {
    use axum::{body::Body, Router};
    use http::{header, Request, StatusCode};
    use http_body_util::BodyExt as _;
    use secrecy::SecretBox;
    use service::{
        command::CreateUserSession,
        domain::user,
        infra::{auth::Jwt, Postgres},
        Command as _,
    };
    use tower::ServiceExt as _;

    use super::{router, Service};
    use crate::{config, cookie};

    fn assert_send<T: Send>(_: &T) {}

    /// [`Router`] whose database is never reachable: the pool connects
    /// lazily, so only requests rejected before storage succeed.
    fn app() -> Router {
        let postgres =
            Postgres::new(&config::Postgres::default().into()).unwrap();
        router(Service::new(postgres, Jwt::new(b"secret")))
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn json(resp: http::Response<Body>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(resp: &http::Response<Body>) -> String {
        resp.headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn login_lookup_is_sendable() {
        let postgres =
            Postgres::new(&config::Postgres::default().into()).unwrap();
        let service = Service::new(postgres, Jwt::new(b"secret"));

        let lookup = service.execute(CreateUserSession::ByCredentials {
            credential: "alice".into(),
            password: SecretBox::new(Box::new(
                user::Password::new("p1").unwrap(),
            )),
        });

        assert_send(&lookup);
    }

    #[tokio::test]
    async fn register_rejects_empty_credentials() {
        for body in [
            r#"{"login":"","email":"a@x.com","pass":"p1","name":"A"}"#,
            r#"{"login":"alice","email":"a@x.com","pass":"","name":"A"}"#,
            r#"{"email":"a@x.com"}"#,
        ] {
            let resp =
                app().oneshot(post("/auth/register", body)).await.unwrap();

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json(resp).await["code"], "EMPTY_CREDENTIALS");
        }
    }

    #[tokio::test]
    async fn register_rejects_malformed_body() {
        let resp = app()
            .oneshot(post("/auth/register", "not json"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(resp).await["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn login_rejects_empty_credentials() {
        let resp = app()
            .oneshot(post("/auth/login", r#"{"credential":"alice"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let req = Request::post("/auth/logout")
            .header(header::COOKIE, format!("{}=t1", cookie::NAME))
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let set = set_cookie(&resp);
        assert!(set.starts_with("user_jwt=;"), "{set}");
        assert!(set.contains("HttpOnly"), "{set}");
        assert!(set.contains("1970"), "{set}");
    }

    #[tokio::test]
    async fn logout_without_session_still_clears_cookie() {
        let req = Request::post("/auth/logout").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let set = set_cookie(&resp);
        assert!(set.starts_with("user_jwt=;"), "{set}");
        assert_eq!(json(resp).await["code"], "NO_SESSION");
    }

    #[tokio::test]
    async fn delete_requires_session() {
        let req = Request::post("/auth/delete").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }
}
