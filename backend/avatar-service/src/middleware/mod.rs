/// HTTP middleware utilities for avatar-service
use actix_web::middleware::DefaultHeaders;

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// CORS headers attached to every response.
///
/// Preflight requests are answered by the `OPTIONS` routes with an empty 204,
/// so these headers are all a browser needs.
pub fn cors_headers(allowed_origin: &str) -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", allowed_origin.to_string()))
        .add(("Access-Control-Allow-Methods", ALLOWED_METHODS))
        .add(("Access-Control-Allow-Headers", ALLOWED_HEADERS))
        .add(("Access-Control-Max-Age", "3600"))
}
