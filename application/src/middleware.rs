//! HTTP middleware shared by the services.

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{field, Instrument as _};
use uuid::Uuid;

/// Seeds the request-scoped logging context: every event of the request is
/// emitted inside a span carrying a freshly generated request ID.
///
/// The `user.id` field stays empty until the request is authenticated.
pub async fn seed(req: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        request.id = %Uuid::new_v4(),
        user.id = field::Empty,
    );
    next.run(req).instrument(span).await
}
