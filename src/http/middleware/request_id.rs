//! Request id stamping, read from an inbound `x-request-id` header when
//! present, generated via `IdGen` otherwise. Threaded through request
//! extensions so handlers can read it back to build `ApiErrorResponse`, and
//! echoed on the response so clients can correlate retries. Shaped after
//! `auth::middleware::auth_middleware`: a `State`-extracted service, a
//! `req.extensions_mut().insert(...)`, then `next.run(req).await`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::ids::IdGen;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read a caller-supplied request id back off the request, falling back to
/// `"unknown"` for call sites reached before this middleware ran (e.g. the
/// panic-catching layer, which wraps everything else).
pub fn extract_request_id(req: &Request) -> RequestId {
    req.extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_else(|| RequestId("unknown".into()))
}

pub async fn stamp_request_id(State(ids): State<Arc<dyn IdGen>>, mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ids.new_request_id());

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    #[test]
    fn extract_request_id_falls_back_when_absent() {
        let req = HttpRequest::new(Body::empty());
        assert_eq!(extract_request_id(&req).as_str(), "unknown");
    }

    #[test]
    fn extract_request_id_reads_inserted_value() {
        let mut req = HttpRequest::new(Body::empty());
        req.extensions_mut().insert(RequestId("req_abc".into()));
        assert_eq!(extract_request_id(&req).as_str(), "req_abc");
    }
}
