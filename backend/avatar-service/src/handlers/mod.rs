/// HTTP handlers for avatar endpoints
///
/// This module contains handlers for:
/// - Avatars: generate the styled avatar set for a trip player
/// - Styles: list the style catalogue
/// - Health: liveness and readiness probes
pub mod avatars;
pub mod health;

pub use avatars::{generate_avatars, list_styles, preflight};
pub use health::{health, live, ready};

use actix_web::web;

/// Register every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/generate_avatars")
            .route(web::post().to(generate_avatars))
            .route(web::method(actix_web::http::Method::OPTIONS).to(preflight)),
    )
    .route("/api/v1/health", web::get().to(health))
    .route("/api/v1/health/live", web::get().to(live))
    .route("/api/v1/health/ready", web::get().to(ready))
    .service(
        web::scope("/api/v1")
            .service(
                web::resource("/avatars/generate")
                    .route(web::post().to(generate_avatars))
                    .route(web::method(actix_web::http::Method::OPTIONS).to(preflight)),
            )
            .route("/avatar-styles", web::get().to(list_styles)),
    );
}
