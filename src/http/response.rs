//! Response construction.
//!
//! # Responsibilities
//! - Turn a resolved redirect into a `Location` response
//! - Map not-found results to 404
//! - Serialize health reports
//!
//! # Design Decisions
//! - Redirect responses carry no body
//! - A rule whose status code is not a valid HTTP status (for example the
//!   `0` written for an unparsable column) yields 500 rather than a
//!   malformed response

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::health::HealthStatus;
use crate::routing::router::{NotFound, Redirect};

pub fn redirect_response(redirect: &Redirect) -> Response {
    let Ok(status) = StatusCode::from_u16(redirect.status_code) else {
        tracing::error!(
            status_code = redirect.status_code,
            rule = %redirect.rule.match_value(),
            "Rule has an invalid status code"
        );
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let Ok(location) = HeaderValue::try_from(redirect.target.as_str()) else {
        tracing::error!(target_url = %redirect.target, "Redirect target is not a valid header value");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response.headers_mut().insert(header::LOCATION, location);
    response
}

pub fn not_found_response(reason: NotFound) -> Response {
    let body = match reason {
        NotFound::UnknownHost => "404 page not found: unknown host",
        NotFound::NoRuleMatched => "404 page not found",
    };
    (StatusCode::NOT_FOUND, body).into_response()
}

pub fn health_response(status: HealthStatus) -> Response {
    (StatusCode::OK, Json(status)).into_response()
}
