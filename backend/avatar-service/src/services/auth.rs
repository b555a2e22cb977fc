//! Bearer tokens for the Google Cloud REST APIs (Storage, Firestore)

use crate::error::{AppError, Result};
use gcp_auth::TokenProvider;
use std::sync::Arc;
use tokio::sync::RwLock;

const CLOUD_PLATFORM_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Where access tokens come from
#[derive(Clone)]
pub enum TokenSource {
    /// Fixed token (local development, tests)
    Static(String),
    /// Application Default Credentials (service account / workload identity)
    Adc(Arc<RwLock<Option<Arc<dyn TokenProvider>>>>),
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("Static(<redacted>)"),
            TokenSource::Adc(_) => f.write_str("Adc"),
        }
    }
}

impl TokenSource {
    pub fn fixed(token: impl Into<String>) -> Self {
        TokenSource::Static(token.into())
    }

    /// ADC provider, initialized on first use
    pub fn adc() -> Self {
        TokenSource::Adc(Arc::new(RwLock::new(None)))
    }

    pub fn from_option(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.is_empty() => Self::fixed(token),
            _ => Self::adc(),
        }
    }

    pub async fn access_token(&self) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Adc(cell) => {
                let provider = {
                    let mut guard = cell.write().await;
                    match guard.as_ref() {
                        Some(provider) => provider.clone(),
                        None => {
                            let provider = gcp_auth::provider().await.map_err(|e| {
                                AppError::Config(format!(
                                    "Failed to initialize GCP authentication: {e}"
                                ))
                            })?;
                            *guard = Some(provider.clone());
                            provider
                        }
                    }
                };

                let token = provider
                    .token(CLOUD_PLATFORM_SCOPES)
                    .await
                    .map_err(|e| AppError::Config(format!("Failed to get access token: {e}")))?;

                Ok(token.as_str().to_string())
            }
        }
    }
}
