//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID)
//! - Extract routing-relevant information (host, path)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Host header first, URI authority as fallback (HTTP/2)
//! - Path is taken raw, without percent-decoding

use axum::http::{header, HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::routing::router::RedirectRequest;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that assigns an `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Build the matching descriptor for `request`.
pub fn redirect_request<B>(request: &Request<B>) -> RedirectRequest {
    let authority = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default();

    RedirectRequest::new(authority, request.uri().path())
}
