//! Authentication stage of the chat API middleware.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse as _, Response},
    Extension,
};
use axum_extra::extract::CookieJar;
use service::{command::ResolveUserSession, domain::user, Command as _};
use tracing as log;

use crate::{cookie, define_error};

use super::Service;

define_error! {
    enum AuthError {
        #[code = "UNAUTHENTICATED"]
        #[status = UNAUTHORIZED]
        #[message = "Session cookie is missing"]
        NoCookie,

        #[code = "UNAUTHENTICATED"]
        #[status = UNAUTHORIZED]
        #[message = "Session cannot be resolved"]
        Unresolved,
    }
}

/// Resolved identity of the request.
#[derive(Clone, Copy, Debug)]
pub struct Session {
    /// ID of the user the request is made by.
    pub user_id: user::Id,
}

/// Resolves the [`Session`] of the request out of its cookie and makes it
/// available to the handlers as an [`Extension`].
///
/// Every failure to resolve is answered with `401 Unauthorized`.
pub async fn authenticate(
    Extension(service): Extension<Service>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = cookie::token(&jar) else {
        log::debug!("no `{}` cookie", cookie::NAME);
        return AuthError::NoCookie.into_response();
    };

    let user_id = match service.execute(ResolveUserSession { token }).await {
        Ok(id) => id,
        Err(e) => {
            log::info!("failed to resolve `Session`: {e}");
            return AuthError::Unresolved.into_response();
        }
    };

    _ = tracing::Span::current()
        .record("user.id", tracing::field::display(user_id));
    _ = req.extensions_mut().insert(Session { user_id });

    next.run(req).await
}
