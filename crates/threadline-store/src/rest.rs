use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use threadline_types::{Comment, NewComment, PostId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::CommentStore;

/// Connection settings for a PostgREST-style comment table.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestStoreConfig {
    /// Project URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Sent both as the `apikey` header and as the bearer token.
    pub api_key: String,
    pub table: String,
}

impl Default for RestStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:54321".into(),
            api_key: String::new(),
            table: "comments".into(),
        }
    }
}

impl std::fmt::Debug for RestStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

/// Error body returned by the table endpoint on failure.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(alias = "error_description", alias = "msg")]
    error: Option<String>,
}

/// Comment store backed by a remote table served over HTTP.
///
/// Reads use `GET /rest/v1/{table}?post_id=eq.{id}&order=created_at.asc`;
/// writes `POST` the row to `/rest/v1/{table}`.
#[derive(Clone, Debug)]
pub struct RestCommentStore {
    client: Client,
    config: RestStoreConfig,
}

impl RestCommentStore {
    pub fn new(config: RestStoreConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: RestStoreConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &RestStoreConfig {
        &self.config
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Turn a non-success response into [`StoreError::Remote`], keeping the
    /// store's own message when the body carries one.
    async fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CommentStore for RestCommentStore {
    async fn fetch_comments(&self, post_id: PostId) -> StoreResult<Vec<Comment>> {
        let url = self.table_url();
        debug!(%url, post = %post_id, "fetching comments");

        let response = self
            .authorized(self.client.get(&url))
            .query(&[
                ("select", "*".to_string()),
                ("post_id", format!("eq.{post_id}")),
                ("order", "created_at.asc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::check(response)
            .await?
            .json::<Vec<Comment>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<()> {
        let url = self.table_url();
        debug!(%url, post = %comment.post_id, "inserting comment");

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(comment)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }
}
