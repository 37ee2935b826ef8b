//! Logging and tracing setup shared by the binaries.

use std::{fmt, io, sync::OnceLock, time};

use axum::{extract::MatchedPath, Router};
use axum_client_ip::InsecureClientIp;
use tower_http::trace::TraceLayer;
use tracing as log;
use tracing_subscriber::{
    field::RecordFields,
    filter::filter_fn,
    fmt::{
        format::{DefaultFields, Writer},
        FormatFields, MakeWriter,
    },
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

/// [`log::Level`]s written to `stderr` rather than `stdout`.
const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

/// Maximum [`log::Level`] of the emitted events.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

/// Installs the global [`tracing`] subscriber.
///
/// Events are filtered by [`INFO`] level until [`set_level()`] is called.
///
/// [`INFO`]: log::Level::INFO
pub fn init() {
    subscriber(io::stdout, io::stderr).init();
}

/// Builds a subscriber writing [`STDERR_LEVELS`] events to `err` and the rest
/// to `out`.
fn subscriber<O, E>(
    out: O,
    err: E,
) -> impl log::Subscriber + Send + Sync + 'static
where
    O: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    E: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(out)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && level() >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .fmt_fields(StderrFields::default())
                .with_writer(err)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && level() >= *meta.level()
                })),
        )
}

/// [`DefaultFields`] of the `stderr` layer.
///
/// Formatted span fields are stored in span extensions keyed by the formatter
/// type, so a formatter type shared by both layers gets every recorded field
/// appended twice.
#[derive(Debug, Default)]
struct StderrFields(DefaultFields);

impl<'w> FormatFields<'w> for StderrFields {
    fn format_fields<R: RecordFields>(
        &self,
        writer: Writer<'w>,
        fields: R,
    ) -> fmt::Result {
        self.0.format_fields(writer, fields)
    }
}

/// Sets the maximum [`log::Level`] of the emitted events.
///
/// Only the first call has effect.
pub fn set_level(level: impl Into<log::Level>) {
    _ = LOG_LEVEL.set(level.into());
}

/// Returns the current maximum [`log::Level`].
fn level() -> log::Level {
    LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
}

/// Wraps the provided [`Router`] into a span per HTTP request, logging its
/// outcome and duration.
pub fn trace_http(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|r: &http::Request<_>| {
                tracing::info_span!(
                    "HTTP request",
                    http.client_ip = InsecureClientIp::from(
                        r.headers(),
                        r.extensions()
                    )
                        .map(|ip| ip.0.to_string())
                        .ok(),
                    http.flavor = ?r.version(),
                    http.host = r.uri().host(),
                    http.method = r.method().as_str(),
                    http.route = r
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str),
                    http.target = r
                        .uri()
                        .path_and_query()
                        .map(http::uri::PathAndQuery::as_str),
                    http.user_agent = r
                        .headers()
                        .get("User-Agent")
                        .and_then(|h| h.to_str().ok()),
                    http.status_code = tracing::field::Empty,
                )
            })
            .on_response(
                |r: &http::Response<_>,
                 dur: time::Duration,
                 span: &tracing::Span| {
                    _ = span.record(
                        "http.status_code",
                        tracing::field::display(r.status().as_u16()),
                    );

                    if r.status().is_server_error()
                        || r.status().is_client_error()
                    {
                        tracing::error!(
                            duration = format!("{}ms", dur.as_millis()),
                        );
                    } else {
                        tracing::info!(
                            duration = format!("{}ms", dur.as_millis()),
                        );
                    }
                },
            ),
    )
}

/// Returns a span per RPC request, to be used as [`tonic`] `trace_fn`.
pub fn rpc_span(r: &http::Request<()>) -> tracing::Span {
    tracing::info_span!(
        "RPC request",
        rpc.method = r.uri().path(),
        rpc.user_agent = r
            .headers()
            .get("User-Agent")
            .and_then(|h| h.to_str().ok()),
    )
}

#[cfg(test)]
mod spec {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;

    use super::subscriber;

    /// In-memory log output.
    #[derive(Clone, Debug, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn writes_recorded_span_field_once() {
        let (out, err) = (Buffer::default(), Buffer::default());
        let _guard = tracing::subscriber::set_default(subscriber(
            out.clone(),
            err.clone(),
        ));

        let span = tracing::info_span!(
            "HTTP request",
            http.status_code = tracing::field::Empty,
        );
        _ = span.record("http.status_code", 404);
        span.in_scope(|| {
            tracing::info!("served");
            tracing::warn!("rejected");
        });

        for buf in [out, err] {
            let text = buf.contents();
            assert_eq!(text.lines().count(), 1, "{text}");
            assert_eq!(text.matches("http.status_code").count(), 1, "{text}");
        }
    }
}
