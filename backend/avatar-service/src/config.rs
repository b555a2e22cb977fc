//! Configuration for avatar-service
//!
//! Loaded from environment variables with sensible defaults.
use serde::Deserialize;

/// Main configuration struct, loaded from environment variables
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// HTTP bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Gemini API key (the single secret this service needs)
    pub gemini_api_key: String,

    /// Gemini model used for image generation
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Bucket holding `avatars/{tripId}/{playerId}/...`
    pub gcs_bucket: String,

    #[serde(default = "default_gcs_base_url")]
    pub gcs_base_url: String,

    pub firestore_project_id: String,

    #[serde(default = "default_firestore_database")]
    pub firestore_database: String,

    #[serde(default = "default_firestore_base_url")]
    pub firestore_base_url: String,

    /// Static bearer token for Storage/Firestore. Uses Application Default
    /// Credentials when unset.
    #[serde(default)]
    pub gcp_access_token: Option<String>,

    #[serde(default = "default_cors_origin")]
    pub cors_allowed_origin: String,

    /// Output avatar edge length in pixels
    #[serde(default = "default_avatar_size")]
    pub avatar_size: u32,

    /// WebP quality (0-100)
    #[serde(default = "default_avatar_webp_quality")]
    pub avatar_webp_quality: u8,

    /// Timeout for outbound HTTP calls
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-preview-image-generation".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gcs_base_url() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_firestore_database() -> String {
    "(default)".to_string()
}

fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_avatar_size() -> u32 {
    512
}

fn default_avatar_webp_quality() -> u8 {
    85
}

fn default_http_timeout_secs() -> u64 {
    300
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let vars = vec![
            ("GEMINI_API_KEY".to_string(), "key".to_string()),
            ("GCS_BUCKET".to_string(), "trip-bucket".to_string()),
            ("FIRESTORE_PROJECT_ID".to_string(), "golf-trip".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.avatar_size, 512);
        assert_eq!(config.avatar_webp_quality, 85);
        assert_eq!(config.firestore_database, "(default)");
        assert_eq!(config.gemini_model, "gemini-2.0-flash-preview-image-generation");
        assert!(config.gcp_access_token.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let vars = vec![
            ("GCS_BUCKET".to_string(), "trip-bucket".to_string()),
            ("FIRESTORE_PROJECT_ID".to_string(), "golf-trip".to_string()),
        ];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
