//! Client for a generic bearer-token REST note service.
//!
//! One POST per note, tags and metadata included in the payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use capnote_core::defaults::{
    ENV_NOTE_TIMEOUT, ENV_REST_TOKEN, ENV_REST_URL, NOTE_TIMEOUT_SECS, REST_NOTE_URL, REST_SOURCE,
};
use capnote_core::{Error, NoteDraft, NoteSink, PublishedNote, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Full endpoint URL notes are POSTed to.
    pub api_url: String,
    /// Sent as `Authorization: Bearer <token>`.
    pub api_token: String,
    /// Value of `metadata.source` in every payload.
    pub source: String,
    pub timeout_seconds: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            api_url: REST_NOTE_URL.to_string(),
            api_token: String::new(),
            source: REST_SOURCE.to_string(),
            timeout_seconds: NOTE_TIMEOUT_SECS,
        }
    }
}

impl RestConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var(ENV_REST_URL).unwrap_or(defaults.api_url),
            api_token: std::env::var(ENV_REST_TOKEN).unwrap_or(defaults.api_token),
            source: defaults.source,
            timeout_seconds: std::env::var(ENV_NOTE_TIMEOUT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "rest api_url must start with http:// or https://, got: {}",
                self.api_url
            )));
        }
        if self.api_token.is_empty() {
            return Err(Error::Config("rest api_token cannot be empty".to_string()));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config("rest timeout_seconds must be > 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SaveNoteRequest<'a> {
    title: &'a str,
    content: &'a str,
    source_url: Option<&'a str>,
    tags: Vec<&'a str>,
    metadata: RequestMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct RequestMetadata<'a> {
    source: &'a str,
    original_sender: Option<&'a str>,
    timestamp: Option<i64>,
}

pub struct RestNoteClient {
    client: Client,
    config: RestConfig,
}

impl RestNoteClient {
    pub fn new(config: RestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "notes",
            component = "rest",
            api_url = %config.api_url,
            timeout_secs = config.timeout_seconds,
            "Initializing note client"
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn payload<'a>(&'a self, draft: &'a NoteDraft) -> SaveNoteRequest<'a> {
        let metadata = draft.metadata();
        SaveNoteRequest {
            title: draft.title(),
            content: draft.body(),
            source_url: draft.source_url(),
            tags: draft.tags().collect(),
            metadata: RequestMetadata {
                source: &self.config.source,
                original_sender: metadata.and_then(|m| m.original_sender.as_deref()),
                timestamp: metadata.and_then(|m| m.timestamp),
            },
        }
    }

    /// POST `draft`. Succeeds on 200 or 201.
    pub async fn save_note(&self, draft: &NoteDraft) -> Result<()> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .json(&self.payload(draft))
            .send()
            .await
            .map_err(|e| {
                error!(subsystem = "notes", component = "rest", op = "save_note", error = %e, "Note request failed");
                Error::Network(e.to_string())
            })?;

        let status = response.status().as_u16();
        if status != 200 && status != 201 {
            let body = response.text().await.unwrap_or_default();
            error!(
                subsystem = "notes",
                component = "rest",
                op = "save_note",
                status,
                body = %body,
                "Note service rejected note"
            );
            return Err(Error::remote(status, body));
        }

        info!(
            subsystem = "notes",
            component = "rest",
            op = "save_note",
            title = draft.title(),
            "Note saved"
        );
        Ok(())
    }
}

#[async_trait]
impl NoteSink for RestNoteClient {
    /// The REST service applies tags itself, so every tag counts as linked.
    async fn publish(&self, draft: &NoteDraft) -> Result<PublishedNote> {
        self.save_note(draft).await?;
        Ok(PublishedNote {
            id: None,
            linked_tags: draft.tags().map(str::to_string).collect(),
            failed_tags: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capnote_core::NoteMetadata;
    use serde_json::json;

    fn client() -> RestNoteClient {
        RestNoteClient::new(RestConfig {
            api_token: "secret".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let client = client();
        let draft = NoteDraft::new("Title", "Body")
            .with_tags(["wechat", "article"])
            .with_source_url("https://example.com/a")
            .with_metadata(NoteMetadata {
                original_sender: Some("Alice".to_string()),
                timestamp: Some(1_700_000_000_000),
            });

        let value = serde_json::to_value(client.payload(&draft)).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Title",
                "content": "Body",
                "source_url": "https://example.com/a",
                "tags": ["article", "wechat"],
                "metadata": {
                    "source": "wechat_helper",
                    "original_sender": "Alice",
                    "timestamp": 1_700_000_000_000i64
                }
            })
        );
    }

    #[test]
    fn test_payload_without_metadata_sends_nulls() {
        let client = client();
        let draft = NoteDraft::new("T", "B");
        let value = serde_json::to_value(client.payload(&draft)).unwrap();
        assert_eq!(value["metadata"]["original_sender"], serde_json::Value::Null);
        assert_eq!(value["source_url"], serde_json::Value::Null);
    }

    #[test]
    fn test_validate_rejects_missing_token() {
        assert!(RestConfig::default().validate().is_err());
        assert!(RestConfig {
            api_token: "t".to_string(),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }
}
