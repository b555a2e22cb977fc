//! Avatar processor - normalizes generated images
//!
//! Takes whatever image the model returned, resizes it to a fixed square
//! with a Lanczos filter, and encodes it as lossy WebP.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the async runtime.

use crate::error::{AppError, Result};
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::sync::Arc;
use tracing::debug;

/// Configuration for avatar post-processing
#[derive(Clone, Debug)]
pub struct AvatarConfig {
    /// Output edge length in pixels (output is always square)
    pub size: u32,
    /// WebP quality (0-100)
    pub quality: u8,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            size: 512,
            quality: 85,
        }
    }
}

/// Result of avatar processing
#[derive(Debug)]
pub struct ProcessedAvatar {
    /// The avatar as WebP
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Avatar processor
pub struct AvatarProcessor {
    config: AvatarConfig,
}

impl AvatarProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: AvatarConfig) -> Self {
        Self { config }
    }

    /// Create a processor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(AvatarConfig::default())
    }

    /// Decode, resize and encode (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not be called
    /// directly from async code. Use `process_async` instead.
    pub fn process(&self, original_data: &[u8]) -> Result<ProcessedAvatar> {
        let img = image::load_from_memory(original_data)
            .map_err(|e| AppError::Image(format!("Failed to decode image: {e}")))?;

        let (orig_w, orig_h) = img.dimensions();
        debug!(
            original_width = orig_w,
            original_height = orig_h,
            "Processing generated avatar"
        );

        let size = self.config.size.max(1);
        // Aspect ratio is not preserved; the model is asked for a square image.
        let resized = img.resize_exact(size, size, FilterType::Lanczos3);

        let data = self.encode_webp(&resized)?;

        debug!(
            width = size,
            height = size,
            size = data.len(),
            "Avatar encoded"
        );

        Ok(ProcessedAvatar {
            data,
            width: size,
            height: size,
        })
    }

    /// Process on the blocking thread pool
    ///
    /// # Example
    /// ```ignore
    /// let processor = Arc::new(AvatarProcessor::with_defaults());
    /// let avatar = processor.process_async(image_bytes).await?;
    /// ```
    pub async fn process_async(self: Arc<Self>, original_data: Bytes) -> Result<ProcessedAvatar> {
        let processor = self.clone();

        tokio::task::spawn_blocking(move || processor.process(&original_data))
            .await
            .map_err(|e| AppError::Internal(format!("Avatar processing task panicked: {e}")))?
    }

    /// Encode image as lossy WebP
    fn encode_webp(&self, img: &DynamicImage) -> Result<Bytes> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let encoded = webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(false, f32::from(self.config.quality))
            .map_err(|e| AppError::Image(format!("Failed to encode WebP: {e:?}")))?;

        Ok(Bytes::copy_from_slice(&encoded))
    }
}
