/// Avatar Service - HTTP Server
///
/// Serves the avatar generation endpoint for the golf trip app.
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::Context;
use avatar_service::handlers;
use avatar_service::middleware::cors_headers;
use avatar_service::services::{
    AvatarConfig, AvatarGenerationService, AvatarProcessor, FirestoreClient, GcsClient,
    GeminiClient, TokenSource,
};
use avatar_service::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        &config.gemini_base_url,
        timeout,
    )?;
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY is empty; every style will fail");
    }

    let tokens = TokenSource::from_option(config.gcp_access_token.clone());
    info!("GCP auth: {:?}", tokens);

    let gcs = GcsClient::new(&config.gcs_bucket, &config.gcs_base_url, tokens.clone(), timeout)?;
    let firestore = FirestoreClient::new(
        &config.firestore_base_url,
        &config.firestore_project_id,
        &config.firestore_database,
        tokens,
        timeout,
    )?;

    let processor = AvatarProcessor::new(AvatarConfig {
        size: config.avatar_size,
        quality: config.avatar_webp_quality,
    });

    let service = web::Data::new(AvatarGenerationService::new(
        Arc::new(gemini),
        Arc::new(gcs),
        Arc::new(firestore),
        processor,
    ));

    let bind_address = config.bind_address();
    let allowed_origin = config.cors_allowed_origin.clone();

    info!("Avatar Service starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(cors_headers(&allowed_origin))
            .wrap(actix_middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    info!("Avatar-service shutting down");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "avatar_service=debug,actix_web=info,info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
