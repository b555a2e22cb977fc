//! Avatar generation service - coordinates generation, storage, and Firestore updates
//!
//! This service handles the complete avatar workflow for one player:
//! 1. Mark the player's status as `generating`
//! 2. Download the base photo from GCS
//! 3. For each style: generate, resize/encode, upload, make public
//! 4. Record the URL map and final status in Firestore
//!
//! Styles run one at a time in catalogue order. A failing style never aborts
//! the batch; it only adds an entry to the report's error list.
//!
//! Nothing serializes concurrent runs for the same player. Two overlapping
//! requests can interleave their `generating` and final writes, and the last
//! final write wins.

use super::firestore::DocumentStore;
use super::gcs::{avatar_paths, BlobStore};
use super::gemini::ImageGenerator;
use super::processor::AvatarProcessor;
use crate::error::Result;
use crate::models::{AvatarGenerationStatus, GenerationReport, StyleOutcome};
use crate::styles::{AvatarStyle, AVATAR_STYLES};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Mime type of the reference photo the client uploads
const BASE_IMAGE_MIME: &str = "image/jpeg";
const AVATAR_CONTENT_TYPE: &str = "image/webp";

/// Avatar generation service
pub struct AvatarGenerationService {
    generator: Arc<dyn ImageGenerator>,
    blobs: Arc<dyn BlobStore>,
    documents: Arc<dyn DocumentStore>,
    processor: Arc<AvatarProcessor>,
    styles: &'static [AvatarStyle],
}

impl AvatarGenerationService {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        blobs: Arc<dyn BlobStore>,
        documents: Arc<dyn DocumentStore>,
        processor: AvatarProcessor,
    ) -> Self {
        Self {
            generator,
            blobs,
            documents,
            processor: Arc::new(processor),
            styles: AVATAR_STYLES,
        }
    }

    /// Run the whole workflow. Errors returned here are request-level;
    /// per-style failures are inside the report.
    pub async fn run(&self, trip_id: &str, player_id: &str) -> Result<GenerationReport> {
        info!(trip_id = %trip_id, player_id = %player_id, "Starting avatar generation");

        self.documents
            .set_status(trip_id, player_id, AvatarGenerationStatus::Generating)
            .await?;

        let base_image = self
            .blobs
            .download(&avatar_paths::base_image(trip_id, player_id))
            .await?;

        let mut report = GenerationReport::default();
        for style in self.styles {
            let outcome = self
                .generate_style(trip_id, player_id, &base_image, style)
                .await;
            report.push(outcome);
        }

        if report.is_success() {
            self.documents
                .record_avatars(trip_id, player_id, &report.url_map())
                .await?;
        } else {
            self.documents
                .set_status(trip_id, player_id, AvatarGenerationStatus::Error)
                .await?;
        }

        info!(
            trip_id = %trip_id,
            player_id = %player_id,
            generated = report.urls.len(),
            failed = report.errors.len(),
            status = report.final_status().as_str(),
            "Avatar generation finished"
        );

        Ok(report)
    }

    /// Generate one style. Never fails; errors become `StyleOutcome::Failed`.
    pub async fn generate_style(
        &self,
        trip_id: &str,
        player_id: &str,
        base_image: &Bytes,
        style: &AvatarStyle,
    ) -> StyleOutcome {
        match self.try_generate_style(trip_id, player_id, base_image, style).await {
            Ok(Some(url)) => {
                info!(style_id = style.id, url = %url, "Avatar style generated");
                StyleOutcome::Generated {
                    style_id: style.id.to_string(),
                    url,
                }
            }
            Ok(None) => {
                warn!(style_id = style.id, "No image in response");
                StyleOutcome::Failed {
                    style_id: style.id.to_string(),
                    message: "no image in response".to_string(),
                }
            }
            Err(e) => {
                error!(style_id = style.id, error = %e, "Avatar style failed");
                StyleOutcome::Failed {
                    style_id: style.id.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// `Ok(None)` when the model returned no image
    async fn try_generate_style(
        &self,
        trip_id: &str,
        player_id: &str,
        base_image: &Bytes,
        style: &AvatarStyle,
    ) -> Result<Option<String>> {
        let Some(image) = self
            .generator
            .generate_image(base_image, BASE_IMAGE_MIME, style.prompt)
            .await?
        else {
            return Ok(None);
        };

        let avatar = self.processor.clone().process_async(image.data).await?;

        let object_path = avatar_paths::style_image(trip_id, player_id, style.id);
        self.blobs
            .upload(&object_path, avatar.data, AVATAR_CONTENT_TYPE)
            .await?;
        self.blobs.make_public(&object_path).await?;

        Ok(Some(self.blobs.public_url(&object_path)))
    }

    /// Best-effort `error` status after a request-level failure
    pub async fn mark_failed(&self, trip_id: &str, player_id: &str) {
        if let Err(e) = self
            .documents
            .set_status(trip_id, player_id, AvatarGenerationStatus::Error)
            .await
        {
            warn!(
                trip_id = %trip_id,
                player_id = %player_id,
                error = %e,
                "Failed to record error status"
            );
        }
    }
}

