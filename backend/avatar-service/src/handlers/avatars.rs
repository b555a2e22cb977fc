/// Avatar handlers - HTTP endpoints for avatar generation
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::error;

use crate::error::{AppError, Result};
use crate::models::{GenerateAvatarsRequest, GenerateAvatarsResponse};
use crate::services::AvatarGenerationService;
use crate::styles::AVATAR_STYLES;

pub const MISSING_IDS: &str = "tripId and playerId required";

/// CORS preflight
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Generate every avatar style for one trip player
///
/// Always 200 once the style loop has run, even if no style succeeded; the
/// body says which styles worked. Failures before or after the loop are 500.
pub async fn generate_avatars(
    service: web::Data<AvatarGenerationService>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    // A body that is not a JSON object counts as empty.
    let req: GenerateAvatarsRequest = serde_json::from_slice(&body).unwrap_or_default();

    let (trip_id, player_id) = req
        .ids()
        .ok_or_else(|| AppError::BadRequest(MISSING_IDS.to_string()))?;

    match service.run(trip_id, player_id).await {
        Ok(report) => Ok(HttpResponse::Ok().json(GenerateAvatarsResponse::from(&report))),
        Err(e) => {
            error!(
                trip_id = %trip_id,
                player_id = %player_id,
                error = %e,
                "Avatar generation aborted"
            );
            service.mark_failed(trip_id, player_id).await;
            let trace = format!("{e}\n\n{e:#?}");
            Ok(HttpResponse::InternalServerError().json(json!({ "error": trace })))
        }
    }
}

/// Style catalogue without prompts
pub async fn list_styles() -> HttpResponse {
    HttpResponse::Ok().json(AVATAR_STYLES)
}
