/// Data models for avatar-service
///
/// This module defines structures for:
/// - Requests and responses of the generate endpoint
/// - Per-player avatar generation status
/// - Per-style outcomes and the aggregated generation report
///
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ========================================
// Request / Response Models
// ========================================

/// Body of a generate request. Both ids are opaque strings owned by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAvatarsRequest {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub player_id: Option<String>,
}

impl GenerateAvatarsRequest {
    /// Both identifiers, if present and non-empty
    pub fn ids(&self) -> Option<(&str, &str)> {
        match (self.trip_id.as_deref(), self.player_id.as_deref()) {
            (Some(trip), Some(player)) if !trip.is_empty() && !player.is_empty() => {
                Some((trip, player))
            }
            _ => None,
        }
    }
}

/// 200 response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateAvatarsResponse {
    pub success: bool,
    pub generated: Vec<String>,
    pub errors: Vec<String>,
}

impl From<&GenerationReport> for GenerateAvatarsResponse {
    fn from(report: &GenerationReport) -> Self {
        Self {
            success: report.is_success(),
            generated: report.generated_ids(),
            errors: report.errors.clone(),
        }
    }
}

// ========================================
// Status Models
// ========================================

/// Value of `players.{id}.avatarGenerationStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarGenerationStatus {
    /// Written by the client before a photo is uploaded; never written here
    Idle,
    Generating,
    Complete,
    Error,
}

impl AvatarGenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "generating" => Some(Self::Generating),
            "complete" => Some(Self::Complete),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

// ========================================
// Generation Models
// ========================================

/// Result of generating one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOutcome {
    Generated { style_id: String, url: String },
    Failed { style_id: String, message: String },
}

impl StyleOutcome {
    /// `"{styleId}: {message}"` for failed styles
    pub fn error_line(&self) -> Option<String> {
        match self {
            Self::Failed { style_id, message } => Some(format!("{style_id}: {message}")),
            Self::Generated { .. } => None,
        }
    }
}

/// Aggregated outcome of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Style id -> public URL, in style order
    pub urls: Vec<(String, String)>,
    pub errors: Vec<String>,
}

impl GenerationReport {
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = StyleOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            report.push(outcome);
        }
        report
    }

    pub fn push(&mut self, outcome: StyleOutcome) {
        if let Some(line) = outcome.error_line() {
            self.errors.push(line);
        } else if let StyleOutcome::Generated { style_id, url } = outcome {
            self.urls.push((style_id, url));
        }
    }

    /// At least one style produced an avatar
    pub fn is_success(&self) -> bool {
        !self.urls.is_empty()
    }

    pub fn final_status(&self) -> AvatarGenerationStatus {
        if self.is_success() {
            AvatarGenerationStatus::Complete
        } else {
            AvatarGenerationStatus::Error
        }
    }

    pub fn generated_ids(&self) -> Vec<String> {
        self.urls.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn url_map(&self) -> BTreeMap<String, String> {
        self.urls.iter().cloned().collect()
    }
}
