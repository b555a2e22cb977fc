//! Gemini API integration for image-to-image avatar generation
use crate::error::{AppError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Image returned inline by the model
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Bytes,
}

/// External image-generation service
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Send the base image and prompt, requesting image-only output.
    /// `Ok(None)` means the model answered without an image.
    async fn generate_image(
        &self,
        base_image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<Option<GeneratedImage>>;
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

// ============================================
// Request types
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: RequestBlob<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBlob<'a> {
    mime_type: &'a str,
    /// Base64 encoded
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

// ============================================
// Response types
// ============================================

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ResponsePart {
    inline_data: Option<ResponseBlob>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBlob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        info!(model = %model, "Gemini client initialized");

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check if an API key is configured
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(
        &self,
        base_image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<Option<GeneratedImage>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: RequestBlob {
                            mime_type,
                            data: STANDARD.encode(base_image),
                        },
                    },
                    RequestPart::Text { text: prompt },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };

        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to call Gemini API: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Gemini request failed");
            return Err(AppError::Upstream(format!(
                "Gemini API error ({status}): {error_text}"
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse Gemini response: {e}")))?;

        debug!(elapsed_ms = start.elapsed().as_millis(), "Gemini response received");

        extract_first_image(body)
    }
}

/// First inline `image/*` part of the first candidate
fn extract_first_image(response: GenerateContentResponse) -> Result<Option<GeneratedImage>> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        debug!(block_reason = %reason, "Prompt blocked");
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(None);
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let blob = parts
        .into_iter()
        .filter_map(|part| part.inline_data)
        .find(|blob| blob.mime_type.starts_with("image/"));

    match blob {
        Some(blob) => {
            let data = STANDARD
                .decode(blob.data.as_bytes())
                .map_err(|e| AppError::Upstream(format!("Invalid base64 image data: {e}")))?;
            Ok(Some(GeneratedImage {
                mime_type: blob.mime_type,
                data: Bytes::from(data),
            }))
        }
        None => {
            debug!(finish_reason = ?candidate.finish_reason, "No image part in response");
            Ok(None)
        }
    }
}
