//! Firestore client for per-player avatar state on trip documents
//!
//! Writes `players.{playerId}.avatarGenerationStatus` and
//! `players.{playerId}.generatedAvatars` through the Firestore REST API.
//! Every write is a masked update of an existing document; the rest of the
//! trip document is owned by the client app and never touched.

use super::auth::TokenSource;
use crate::error::{AppError, Result};
use crate::models::AvatarGenerationStatus;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

const TRIPS_COLLECTION: &str = "trips";

const DOC_ID_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Document store holding trip/player state
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn set_status(
        &self,
        trip_id: &str,
        player_id: &str,
        status: AvatarGenerationStatus,
    ) -> Result<()>;

    /// Replace the player's avatar map and mark generation complete
    async fn record_avatars(
        &self,
        trip_id: &str,
        player_id: &str,
        urls: &BTreeMap<String, String>,
    ) -> Result<()>;
}

pub struct FirestoreClient {
    documents_url: String,
    tokens: TokenSource,
    http_client: Client,
}

impl FirestoreClient {
    pub fn new(
        base_url: &str,
        project_id: &str,
        database: &str,
        tokens: TokenSource,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        info!(project_id = %project_id, database = %database, "Firestore client initialized");

        Ok(Self {
            documents_url: format!(
                "{}/v1/projects/{}/databases/{}/documents",
                base_url.trim_end_matches('/'),
                project_id,
                database
            ),
            tokens,
            http_client,
        })
    }

    /// Masked update of `players.{player_id}.*` on `trips/{trip_id}`
    async fn update_player_fields(
        &self,
        trip_id: &str,
        player_id: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let token = self.tokens.access_token().await?;

        let player_path = format!("players.{}", quote_field_segment(player_id));
        let mut query: Vec<(String, String)> = fields
            .keys()
            .map(|field| {
                (
                    "updateMask.fieldPaths".to_string(),
                    format!("{player_path}.{}", quote_field_segment(field)),
                )
            })
            .collect();
        query.push(("currentDocument.exists".to_string(), "true".to_string()));

        let body = json!({
            "fields": {
                "players": map_value(Map::from_iter([(
                    player_id.to_string(),
                    map_value(fields),
                )])),
            }
        });

        let url = format!(
            "{}/{}/{}",
            self.documents_url,
            TRIPS_COLLECTION,
            utf8_percent_encode(trip_id, DOC_ID_SET)
        );

        debug!(trip_id = %trip_id, player_id = %player_id, "Updating trip document");

        let response = self
            .http_client
            .patch(url)
            .query(&query)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Firestore update failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!(
                    "trip document {trip_id}: {body}"
                )));
            }
            return Err(AppError::Upstream(format!(
                "Firestore update of trips/{trip_id} failed with status {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn set_status(
        &self,
        trip_id: &str,
        player_id: &str,
        status: AvatarGenerationStatus,
    ) -> Result<()> {
        let mut fields = Map::new();
        fields.insert("avatarGenerationStatus".into(), string_value(status.as_str()));
        self.update_player_fields(trip_id, player_id, fields).await?;

        info!(
            trip_id = %trip_id,
            player_id = %player_id,
            status = status.as_str(),
            "Avatar status updated"
        );
        Ok(())
    }

    async fn record_avatars(
        &self,
        trip_id: &str,
        player_id: &str,
        urls: &BTreeMap<String, String>,
    ) -> Result<()> {
        let avatars: Map<String, Value> = urls
            .iter()
            .map(|(style_id, url)| (style_id.clone(), string_value(url)))
            .collect();

        let mut fields = Map::new();
        fields.insert("generatedAvatars".into(), map_value(avatars));
        fields.insert(
            "avatarGenerationStatus".into(),
            string_value(AvatarGenerationStatus::Complete.as_str()),
        );
        self.update_player_fields(trip_id, player_id, fields).await?;

        info!(
            trip_id = %trip_id,
            player_id = %player_id,
            count = urls.len(),
            "Generated avatars recorded"
        );
        Ok(())
    }
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

fn map_value(fields: Map<String, Value>) -> Value {
    json!({ "mapValue": { "fields": fields } })
}

/// Quote a field path segment unless it is a plain identifier
pub fn quote_field_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let simple = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
    if simple {
        return segment.to_string();
    }

    let escaped = segment.replace('\\', "\\\\").replace('`', "\\`");
    format!("`{escaped}`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> FirestoreClient {
        FirestoreClient::new(
            &server.uri(),
            "golf-trip",
            "(default)",
            TokenSource::fixed("test-token"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_quote_field_segment() {
        assert_eq!(quote_field_segment("player1"), "player1");
        assert_eq!(quote_field_segment("_p"), "_p");
        assert_eq!(quote_field_segment("1abc"), "`1abc`");
        assert_eq!(quote_field_segment("p-1"), "`p-1`");
        assert_eq!(quote_field_segment("a`b"), "`a\\`b`");
    }

    #[tokio::test]
    async fn test_set_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/projects/golf-trip/databases/(default)/documents/trips/trip1"))
            .and(query_param(
                "updateMask.fieldPaths",
                "players.`p-1`.avatarGenerationStatus",
            ))
            .and(query_param("currentDocument.exists", "true"))
            .and(body_json(json!({
                "fields": {
                    "players": { "mapValue": { "fields": {
                        "p-1": { "mapValue": { "fields": {
                            "avatarGenerationStatus": { "stringValue": "generating" }
                        }}}
                    }}}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .set_status("trip1", "p-1", AvatarGenerationStatus::Generating)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_avatars_masks_both_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(query_param("updateMask.fieldPaths", "players.p1.generatedAvatars"))
            .and(query_param("updateMask.fieldPaths", "players.p1.avatarGenerationStatus"))
            .and(body_json(json!({
                "fields": {
                    "players": { "mapValue": { "fields": {
                        "p1": { "mapValue": { "fields": {
                            "avatarGenerationStatus": { "stringValue": "complete" },
                            "generatedAvatars": { "mapValue": { "fields": {
                                "game-select": { "stringValue": "https://x/game-select.webp" }
                            }}}
                        }}}
                    }}}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let urls = BTreeMap::from([(
            "game-select".to_string(),
            "https://x/game-select.webp".to_string(),
        )]);
        client(&server).record_avatars("trip1", "p1", &urls).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_trip_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404).set_body_string("NOT_FOUND"))
            .mount(&server)
            .await;

        let err = client(&server)
            .set_status("nope", "p1", AvatarGenerationStatus::Error)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
