//! In-memory collaborators for handler and workflow tests
#![allow(dead_code)]

use async_trait::async_trait;
use avatar_service::models::AvatarGenerationStatus;
use avatar_service::services::{
    AvatarConfig, AvatarGenerationService, AvatarProcessor, BlobStore, DocumentStore,
    GeneratedImage, ImageGenerator,
};
use avatar_service::styles::AVATAR_STYLES;
use avatar_service::{AppError, Result};
use bytes::Bytes;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

pub const TRIP: &str = "trip-1";
pub const PLAYER: &str = "player-1";

pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    }));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .expect("encode png");
    Bytes::from(buf)
}

fn style_for_prompt(prompt: &str) -> &'static str {
    AVATAR_STYLES
        .iter()
        .find(|style| style.prompt == prompt)
        .map(|style| style.id)
        .expect("prompt from the style catalogue")
}

// ========================================
// Image generator
// ========================================

#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    Image,
    NoImage,
    Garbage,
    ApiError,
}

#[derive(Default)]
pub struct FakeGenerator {
    overrides: Mutex<HashMap<&'static str, Behavior>>,
    default_behavior: Mutex<Option<Behavior>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, style_id: &'static str, behavior: Behavior) {
        self.overrides.lock().unwrap().insert(style_id, behavior);
    }

    pub fn set_all(&self, behavior: Behavior) {
        self.overrides.lock().unwrap().clear();
        *self.default_behavior.lock().unwrap() = Some(behavior);
    }

    pub fn reset(&self) {
        self.overrides.lock().unwrap().clear();
        *self.default_behavior.lock().unwrap() = None;
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate_image(
        &self,
        base_image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<Option<GeneratedImage>> {
        assert_eq!(mime_type, "image/jpeg");
        assert!(!base_image.is_empty());

        let style_id = style_for_prompt(prompt);
        self.calls.lock().unwrap().push(style_id);

        let behavior = self
            .overrides
            .lock()
            .unwrap()
            .get(style_id)
            .copied()
            .or(*self.default_behavior.lock().unwrap())
            .unwrap_or(Behavior::Image);

        match behavior {
            Behavior::Image => Ok(Some(GeneratedImage {
                mime_type: "image/png".into(),
                data: png_bytes(96, 64),
            })),
            Behavior::NoImage => Ok(None),
            Behavior::Garbage => Ok(Some(GeneratedImage {
                mime_type: "image/png".into(),
                data: Bytes::from_static(b"not a png"),
            })),
            Behavior::ApiError => Err(AppError::Upstream(
                "Gemini API error (500 Internal Server Error): boom".into(),
            )),
        }
    }
}

// ========================================
// Blob store
// ========================================

#[derive(Default)]
pub struct MemoryBlobStore {
    pub objects: Mutex<HashMap<String, (Bytes, String)>>,
    pub public: Mutex<HashSet<String>>,
    pub reject_uploads: Mutex<HashSet<String>>,
}

impl MemoryBlobStore {
    pub fn with_base_image(trip_id: &str, player_id: &str) -> Self {
        let store = Self::default();
        store.objects.lock().unwrap().insert(
            format!("avatars/{trip_id}/{player_id}/base.jpg"),
            (png_bytes(64, 64), "image/jpeg".into()),
        );
        store
    }

    pub fn avatar_objects(&self) -> Vec<String> {
        let mut keys: Vec<_> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.ends_with(".webp"))
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn download(&self, object_path: &str) -> Result<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(object_path)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| AppError::NotFound(format!("gs object {object_path}")))
    }

    async fn upload(&self, object_path: &str, data: Bytes, content_type: &str) -> Result<()> {
        if self.reject_uploads.lock().unwrap().contains(object_path) {
            return Err(AppError::Upstream(format!(
                "GCS upload of {object_path} failed with status 503 Service Unavailable: try later"
            )));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(object_path.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn make_public(&self, object_path: &str) -> Result<()> {
        if !self.objects.lock().unwrap().contains_key(object_path) {
            return Err(AppError::NotFound(object_path.to_string()));
        }
        self.public.lock().unwrap().insert(object_path.to_string());
        Ok(())
    }

    fn public_url(&self, object_path: &str) -> String {
        format!("https://storage.test/bucket/{object_path}")
    }
}

// ========================================
// Document store
// ========================================

#[derive(Default)]
pub struct MemoryDocumentStore {
    pub statuses: Mutex<Vec<(String, String, AvatarGenerationStatus)>>,
    pub avatars: Mutex<HashMap<(String, String), BTreeMap<String, String>>>,
    pub fail_writes: Mutex<bool>,
}

impl MemoryDocumentStore {
    pub fn status_history(&self) -> Vec<AvatarGenerationStatus> {
        self.statuses
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, status)| *status)
            .collect()
    }

    pub fn avatars_for(&self, trip_id: &str, player_id: &str) -> Option<BTreeMap<String, String>> {
        self.avatars
            .lock()
            .unwrap()
            .get(&(trip_id.to_string(), player_id.to_string()))
            .cloned()
    }

    fn check_available(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(AppError::Upstream(
                "Firestore update failed with status 503 Service Unavailable".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn set_status(
        &self,
        trip_id: &str,
        player_id: &str,
        status: AvatarGenerationStatus,
    ) -> Result<()> {
        self.check_available()?;
        self.statuses
            .lock()
            .unwrap()
            .push((trip_id.to_string(), player_id.to_string(), status));
        Ok(())
    }

    async fn record_avatars(
        &self,
        trip_id: &str,
        player_id: &str,
        urls: &BTreeMap<String, String>,
    ) -> Result<()> {
        self.check_available()?;
        self.avatars
            .lock()
            .unwrap()
            .insert((trip_id.to_string(), player_id.to_string()), urls.clone());
        self.statuses.lock().unwrap().push((
            trip_id.to_string(),
            player_id.to_string(),
            AvatarGenerationStatus::Complete,
        ));
        Ok(())
    }
}

// ========================================
// Wiring
// ========================================

pub struct Harness {
    pub generator: Arc<FakeGenerator>,
    pub blobs: Arc<MemoryBlobStore>,
    pub documents: Arc<MemoryDocumentStore>,
    pub service: Arc<AvatarGenerationService>,
}

impl Harness {
    pub fn new(blobs: MemoryBlobStore) -> Self {
        let generator = Arc::new(FakeGenerator::new());
        let blobs = Arc::new(blobs);
        let documents = Arc::new(MemoryDocumentStore::default());
        let service = Arc::new(AvatarGenerationService::new(
            generator.clone(),
            blobs.clone(),
            documents.clone(),
            AvatarProcessor::new(AvatarConfig::default()),
        ));
        Self {
            generator,
            blobs,
            documents,
            service,
        }
    }

    pub fn with_base_image() -> Self {
        Self::new(MemoryBlobStore::with_base_image(TRIP, PLAYER))
    }
}
