//! GCS client for avatar objects
//!
//! Download/upload/ACL operations against the Cloud Storage JSON API with
//! bearer-token authentication.

use super::auth::TokenSource;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Characters that must be percent-encoded in a public URL path
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Object names are a single path segment in the JSON API, so `/` is encoded too
const OBJECT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const PUBLIC_HOST: &str = "https://storage.googleapis.com";

/// Object layout under the avatars prefix
pub mod avatar_paths {
    /// Reference photo uploaded by the client
    pub fn base_image(trip_id: &str, player_id: &str) -> String {
        format!("avatars/{trip_id}/{player_id}/base.jpg")
    }

    pub fn style_image(trip_id: &str, player_id: &str, style_id: &str) -> String {
        format!("avatars/{trip_id}/{player_id}/{style_id}.webp")
    }
}

/// Object storage used for base photos and generated avatars
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn download(&self, object_path: &str) -> Result<Bytes>;

    async fn upload(&self, object_path: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// Grant `allUsers` read access
    async fn make_public(&self, object_path: &str) -> Result<()>;

    fn public_url(&self, object_path: &str) -> String;
}

/// GCS client for downloading and uploading objects
pub struct GcsClient {
    bucket: String,
    base_url: String,
    tokens: TokenSource,
    http_client: Client,
}

impl GcsClient {
    pub fn new(bucket: &str, base_url: &str, tokens: TokenSource, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        info!(bucket = %bucket, "GCS client initialized");

        Ok(Self {
            bucket: bucket.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            http_client,
        })
    }

    fn object_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            self.bucket,
            utf8_percent_encode(object_path, OBJECT_SET)
        )
    }

    async fn error_from(response: reqwest::Response, action: &str, object_path: &str) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return AppError::NotFound(format!("gs object {object_path}: {body}"));
        }
        AppError::Upstream(format!(
            "GCS {action} of {object_path} failed with status {status}: {body}"
        ))
    }
}

#[async_trait]
impl BlobStore for GcsClient {
    async fn download(&self, object_path: &str) -> Result<Bytes> {
        let token = self.tokens.access_token().await?;

        debug!(object_path = %object_path, "Downloading from GCS");

        let response = self
            .http_client
            .get(self.object_url(object_path))
            .query(&[("alt", "media")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GCS download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "download", object_path).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to read GCS response: {e}")))?;

        debug!(object_path = %object_path, size = bytes.len(), "Downloaded from GCS");
        Ok(bytes)
    }

    async fn upload(&self, object_path: &str, data: Bytes, content_type: &str) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let size = data.len();

        debug!(object_path = %object_path, size, "Uploading to GCS");

        let url = format!("{}/upload/storage/v1/b/{}/o", self.base_url, self.bucket);
        let response = self
            .http_client
            .post(url)
            .query(&[("uploadType", "media"), ("name", object_path)])
            .bearer_auth(token)
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GCS upload failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "upload", object_path).await);
        }

        info!(object_path = %object_path, size, "Uploaded to GCS");
        Ok(())
    }

    async fn make_public(&self, object_path: &str) -> Result<()> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http_client
            .post(format!("{}/acl", self.object_url(object_path)))
            .bearer_auth(token)
            .json(&json!({ "entity": "allUsers", "role": "READER" }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GCS ACL update failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "ACL update", object_path).await);
        }

        debug!(object_path = %object_path, "Object made public");
        Ok(())
    }

    fn public_url(&self, object_path: &str) -> String {
        format!(
            "{PUBLIC_HOST}/{}/{}",
            self.bucket,
            utf8_percent_encode(object_path, PATH_SET)
        )
    }
}
