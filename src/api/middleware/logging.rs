//! Request/response logging middleware with credential redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, info_span, warn, Span};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// How a request header is treated in the access log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderLogging {
    Skip,
    Plain,
    Redacted,
}

/// Emits one event when a request arrives and one when it completes.
///
/// Only the route template is logged, never the raw URI: confirmation
/// links carry a token in the path.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request_path(&request);
    let request_id = request_id(request.headers());

    info!(
        %method,
        %path,
        %request_id,
        headers = %loggable_headers(request.headers()),
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(%method, %path, status, duration_ms, %request_id, "Request failed");
    } else {
        info!(%method, %path, status, duration_ms, %request_id, "Request completed");
    }

    response
}

/// Span for `TraceLayer`, keyed on the route template instead of the URI
pub fn request_span(request: &Request<Body>) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = %request_path(request),
        version = ?request.version(),
    )
}

/// Route template when matched, raw path otherwise
pub fn request_path(request: &Request<Body>) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => request.uri().path().to_string(),
    }
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn header_logging(name: &str) -> HeaderLogging {
    match name {
        "authorization" | "proxy-authorization" | "cookie" => HeaderLogging::Redacted,
        "host" | "content-type" | "content-length" | "accept" | "user-agent"
        | "x-forwarded-for" | "x-real-ip" | REQUEST_ID_HEADER => HeaderLogging::Plain,
        _ => HeaderLogging::Skip,
    }
}

fn loggable_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .filter_map(|(name, value)| match header_logging(name.as_str()) {
            HeaderLogging::Skip => None,
            HeaderLogging::Redacted => Some(format!("{}=[REDACTED]", name)),
            HeaderLogging::Plain => Some(format!(
                "{}={}",
                name,
                value.to_str().unwrap_or("[invalid]")
            )),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderValue, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_header_logging() {
        assert_eq!(header_logging("authorization"), HeaderLogging::Redacted);
        assert_eq!(header_logging("cookie"), HeaderLogging::Redacted);
        assert_eq!(header_logging("content-type"), HeaderLogging::Plain);
        assert_eq!(header_logging("host"), HeaderLogging::Plain);
        assert_eq!(header_logging("etag"), HeaderLogging::Skip);
    }

    #[test]
    fn test_loggable_headers_redacts_bearer() {
        let request = Request::builder()
            .header("authorization", "Bearer abc.def.ghi")
            .header("content-type", "application/json")
            .header("etag", "xyz")
            .body(Body::empty())
            .unwrap();

        let logged = loggable_headers(request.headers());

        assert!(logged.contains("authorization=[REDACTED]"));
        assert!(logged.contains("content-type=application/json"));
        assert!(!logged.contains("abc.def.ghi"));
        assert!(!logged.contains("etag"));
    }

    #[test]
    fn test_request_id_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-42"));

        assert_eq!(request_id(&headers), "req-42");
        assert_eq!(request_id(&HeaderMap::new()).len(), 36);
    }

    #[test]
    fn test_request_path_falls_back_to_uri() {
        let request = Request::builder()
            .uri("/post/12?sorting=old")
            .body(Body::empty())
            .unwrap();

        assert_eq!(request_path(&request), "/post/12");
    }

    #[tokio::test]
    async fn test_request_path_uses_route_template() {
        let app = Router::new().route(
            "/confirm/{token}",
            get(|request: Request<Body>| async move {
                let _span = request_span(&request);
                request_path(&request)
            }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/confirm/secret.token.value")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(&bytes[..], b"/confirm/{token}");
    }
}
