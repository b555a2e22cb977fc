/// Service layer for avatar generation
///
/// This module provides:
/// - Gemini client: image-to-image generation per style
/// - GCS client: base photo download, avatar upload and public ACLs
/// - Firestore client: per-player status and avatar URL map
/// - Avatar processor: resize and WebP encoding
/// - Generation service: the per-player workflow tying them together
pub mod auth;
pub mod firestore;
pub mod gcs;
pub mod gemini;
pub mod generation;
pub mod processor;

pub use auth::TokenSource;
pub use firestore::{DocumentStore, FirestoreClient};
pub use gcs::{avatar_paths, BlobStore, GcsClient};
pub use gemini::{GeminiClient, GeneratedImage, ImageGenerator};
pub use generation::AvatarGenerationService;
pub use processor::{AvatarConfig, AvatarProcessor, ProcessedAvatar};
