//! Client for the Joplin-style local note API.
//!
//! Every request carries the API token as a `token` query parameter. Note
//! creation is one call; tagging is a best-effort follow-up of
//! find-or-create plus link per tag.
//!
//! Tag upsert is lookup-then-create, not compare-and-swap: two callers
//! tagging with a brand-new name at the same moment can both create it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use capnote_core::defaults::{
    ENV_JOPLIN_TOKEN, ENV_JOPLIN_URL, ENV_NOTE_TIMEOUT, JOPLIN_URL, NOTE_TIMEOUT_SECS,
};
use capnote_core::{Error, NoteDraft, NoteSink, PublishedNote, Result, Tag};

/// Connection settings for [`JoplinClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoplinConfig {
    /// Base URL, e.g. `http://localhost:41184`.
    pub base_url: String,
    /// API token from the note app's web clipper settings.
    pub token: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for JoplinConfig {
    fn default() -> Self {
        Self {
            base_url: JOPLIN_URL.to_string(),
            token: String::new(),
            timeout_seconds: NOTE_TIMEOUT_SECS,
        }
    }
}

impl JoplinConfig {
    /// Read settings from `CAPNOTE_JOPLIN_URL`, `CAPNOTE_JOPLIN_TOKEN` and
    /// `CAPNOTE_NOTE_TIMEOUT`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var(ENV_JOPLIN_URL).unwrap_or(defaults.base_url),
            token: std::env::var(ENV_JOPLIN_TOKEN).unwrap_or(defaults.token),
            timeout_seconds: std::env::var(ENV_NOTE_TIMEOUT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "joplin base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.token.is_empty() {
            return Err(Error::Config("joplin token cannot be empty".to_string()));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config("joplin timeout_seconds must be > 0".to_string()));
        }
        Ok(())
    }
}

/// A note as returned by `GET /notes/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoplinNote {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub created_time: Option<i64>,
    #[serde(default)]
    pub updated_time: Option<i64>,
}

/// Fields to change with [`JoplinClient::update_note`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Serialize)]
struct CreateNoteRequest<'a> {
    title: &'a str,
    body: &'a str,
    created_time: i64,
    updated_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<&'a str>,
}

#[derive(Serialize)]
struct UpdateNoteRequest<'a> {
    #[serde(flatten)]
    fields: &'a NoteUpdate,
    updated_time: i64,
}

#[derive(Serialize)]
struct CreateTagRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct LinkTagRequest<'a> {
    id: &'a str,
}

#[derive(Deserialize)]
struct CreatedResource {
    id: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: String,
    #[serde(default)]
    title: String,
}

/// Joplin-style note service client.
pub struct JoplinClient {
    client: Client,
    config: JoplinConfig,
}

impl JoplinClient {
    pub fn new(config: JoplinConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "notes",
            component = "joplin",
            base_url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            "Initializing note client"
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &JoplinConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Create a note, then attach `tags` best-effort.
    ///
    /// The note is committed once the first call succeeds; tag failures are
    /// logged and listed in [`PublishedNote::failed_tags`].
    pub async fn create_note(
        &self,
        title: &str,
        body: &str,
        tags: &[&str],
        source_url: Option<&str>,
    ) -> Result<PublishedNote> {
        let now = Utc::now().timestamp_millis();
        let request = CreateNoteRequest {
            title,
            body,
            created_time: now,
            updated_time: now,
            source_url,
        };

        let note_id = self.create_resource("notes", &request).await.map_err(|e| {
            error!(
                subsystem = "notes",
                component = "joplin",
                op = "create_note",
                title,
                error = %e,
                "Note creation failed"
            );
            e
        })?;

        let (linked_tags, failed_tags) = self.apply_tags(&note_id, tags).await;

        info!(
            subsystem = "notes",
            component = "joplin",
            op = "create_note",
            note_id = %note_id,
            title,
            linked = linked_tags.len(),
            failed = failed_tags.len(),
            "Note created"
        );

        Ok(PublishedNote {
            id: Some(note_id),
            linked_tags,
            failed_tags,
        })
    }

    /// Attach each tag to `note_id`. Returns (linked, failed) tag names.
    ///
    /// Names are compared case-insensitively; repeats are attempted once.
    pub async fn apply_tags(&self, note_id: &str, tags: &[&str]) -> (Vec<String>, Vec<String>) {
        let mut linked = Vec::new();
        let mut failed = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for &name in tags {
            let key = name.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);

            let result = match self.find_or_create_tag(name).await {
                Ok(tag) => self.link_tag(&tag.id, note_id).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => linked.push(name.to_string()),
                Err(e) => {
                    warn!(
                        subsystem = "notes",
                        component = "joplin",
                        op = "apply_tags",
                        note_id,
                        tag = name,
                        error = %e,
                        "Tag skipped"
                    );
                    failed.push(name.to_string());
                }
            }
        }

        (linked, failed)
    }

    /// Return the tag titled `name` (case-insensitive), creating it if absent.
    pub async fn find_or_create_tag(&self, name: &str) -> Result<Tag> {
        if let Some(tag) = self.find_tag(name).await? {
            trace!(subsystem = "notes", component = "joplin", tag = name, tag_id = %tag.id, "Tag found");
            return Ok(tag);
        }
        self.create_tag(name).await
    }

    /// Search for a tag with exactly this title, ignoring case.
    ///
    /// A non-200 search is treated as "not found".
    pub async fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        let response = self
            .client
            .get(self.endpoint("search"))
            .query(&[
                ("query", name),
                ("type", "tag"),
                ("token", self.config.token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status() != StatusCode::OK {
            debug!(
                subsystem = "notes",
                component = "joplin",
                op = "find_tag",
                tag = name,
                status = response.status().as_u16(),
                "Tag search unavailable, creating"
            );
            return Ok(None);
        }

        let found: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Invalid search response: {}", e)))?;

        let wanted = name.to_lowercase();
        Ok(found
            .items
            .into_iter()
            .find(|item| item.title.to_lowercase() == wanted)
            .map(|item| Tag {
                id: item.id,
                name: item.title,
            }))
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        let id = self
            .create_resource("tags", &CreateTagRequest { title: name })
            .await?;
        debug!(subsystem = "notes", component = "joplin", tag = name, tag_id = %id, "Tag created");
        Ok(Tag {
            id,
            name: name.to_string(),
        })
    }

    pub async fn link_tag(&self, tag_id: &str, note_id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(&format!("tags/{}/notes", tag_id)))
            .query(&[("token", self.config.token.as_str())])
            .json(&LinkTagRequest { id: note_id })
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        expect_status(response, &[200, 201, 204]).await.map(|_| ())
    }

    pub async fn get_note(&self, note_id: &str) -> Result<JoplinNote> {
        let response = self
            .client
            .get(self.endpoint(&format!("notes/{}", note_id)))
            .query(&[("token", self.config.token.as_str())])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let response = expect_status(response, &[200]).await.map_err(|e| {
            error!(subsystem = "notes", component = "joplin", op = "get_note", note_id, error = %e, "Note fetch failed");
            e
        })?;

        response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Invalid note response: {}", e)))
    }

    pub async fn update_note(&self, note_id: &str, fields: &NoteUpdate) -> Result<()> {
        let request = UpdateNoteRequest {
            fields,
            updated_time: Utc::now().timestamp_millis(),
        };

        let response = self
            .client
            .put(self.endpoint(&format!("notes/{}", note_id)))
            .query(&[("token", self.config.token.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        expect_status(response, &[200, 201, 204])
            .await
            .map(|_| ())
            .map_err(|e| {
                error!(subsystem = "notes", component = "joplin", op = "update_note", note_id, error = %e, "Note update failed");
                e
            })
    }

    /// POST a resource and return the id from the response.
    async fn create_resource<T: Serialize + ?Sized>(&self, resource: &str, body: &T) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint(resource))
            .query(&[("token", self.config.token.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let response = expect_status(response, &[200, 201]).await?;

        let created: CreatedResource = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Invalid {} response: {}", resource, e)))?;

        created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Parse(format!("{} response has no id", resource)))
    }
}

/// Pass the response through when its status is in `accepted`; otherwise
/// log the body and return [`Error::Remote`].
async fn expect_status(response: Response, accepted: &[u16]) -> Result<Response> {
    let status = response.status().as_u16();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    warn!(
        subsystem = "notes",
        component = "joplin",
        path = %url,
        status,
        body = %body,
        "Note service rejected request"
    );
    Err(Error::remote(status, body))
}

#[async_trait]
impl NoteSink for JoplinClient {
    async fn publish(&self, draft: &NoteDraft) -> Result<PublishedNote> {
        let tags: Vec<&str> = draft.tags().collect();
        self.create_note(draft.title(), draft.body(), &tags, draft.source_url())
            .await
    }

    fn name(&self) -> &str {
        "joplin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_validation() {
        let mut config = JoplinConfig {
            token: "t".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.base_url = "localhost:41184".to_string();
        assert!(config.validate().is_err());

        config.base_url = JOPLIN_URL.to_string();
        config.token.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = JoplinClient::new(JoplinConfig {
            base_url: "http://localhost:41184/".to_string(),
            token: "t".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(client.endpoint("notes"), "http://localhost:41184/notes");
    }

    #[test]
    fn test_create_request_omits_missing_source_url() {
        let request = CreateNoteRequest {
            title: "t",
            body: "b",
            created_time: 1,
            updated_time: 1,
            source_url: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"title": "t", "body": "b", "created_time": 1, "updated_time": 1})
        );
    }

    #[test]
    fn test_update_request_flattens_fields() {
        let fields = NoteUpdate {
            body: Some("new".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(UpdateNoteRequest {
            fields: &fields,
            updated_time: 7,
        })
        .unwrap();
        assert_eq!(value, json!({"body": "new", "updated_time": 7}));
    }

    #[test]
    fn test_note_deserializes_sparse_response() {
        let note: JoplinNote =
            serde_json::from_value(json!({"id": "n1", "title": "T", "parent_id": "f1"})).unwrap();
        assert_eq!(note.id, "n1");
        assert!(note.body.is_none());
    }
}
