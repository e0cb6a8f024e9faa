use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use threadline_store::{CommentStore, InMemoryCommentStore, RestCommentStore, RestStoreConfig};
use threadline_sync::SyncConfig;
use threadline_types::{Comment, Identity};

/// Environment variable that overrides `store.api_key`.
pub const API_KEY_ENV: &str = "THREADLINE_API_KEY";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub store: StoreConfig,
    pub sync: SyncConfig,
    /// Absent means signed out.
    pub identity: Option<Identity>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    Rest(RestStoreConfig),
    Memory {
        /// JSON file holding an array of comment rows.
        #[serde(default)]
        seed: Option<PathBuf>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Memory { seed: None }
    }
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults, then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.override_api_key(key);
        }
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn override_api_key(&mut self, key: String) {
        if let StoreConfig::Rest(rest) = &mut self.store {
            rest.api_key = key;
        }
    }

    /// Open the configured comment store.
    pub fn open_store(&self) -> anyhow::Result<Arc<dyn CommentStore>> {
        match &self.store {
            StoreConfig::Rest(rest) => Ok(Arc::new(RestCommentStore::new(rest.clone()))),
            StoreConfig::Memory { seed: None } => Ok(Arc::new(InMemoryCommentStore::new())),
            StoreConfig::Memory { seed: Some(path) } => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading seed {}", path.display()))?;
                let rows: Vec<Comment> = serde_json::from_str(&text)
                    .with_context(|| format!("parsing seed {}", path.display()))?;
                tracing::debug!(rows = rows.len(), seed = %path.display(), "seeded memory store");
                Ok(Arc::new(InMemoryCommentStore::with_comments(rows)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use threadline_types::PostId;

    #[test]
    fn empty_config_is_memory_and_signed_out() {
        let config = CliConfig::parse("").unwrap();
        assert!(matches!(config.store, StoreConfig::Memory { seed: None }));
        assert_eq!(config.sync, SyncConfig::default());
        assert!(config.identity.is_none());
    }

    #[test]
    fn full_rest_config() {
        let config = CliConfig::parse(
            r#"
            [store]
            kind = "rest"
            base_url = "https://example.supabase.co"
            api_key = "anon"
            table = "post_comments"

            [sync]
            poll_interval_ms = 2000

            [identity]
            user_id = "u-1"
            display_name = "Ada"
            "#,
        )
        .unwrap();
        match &config.store {
            StoreConfig::Rest(rest) => {
                assert_eq!(rest.base_url, "https://example.supabase.co");
                assert_eq!(rest.table, "post_comments");
            }
            other => panic!("expected rest store, got {other:?}"),
        }
        assert_eq!(config.sync.poll_interval_ms, 2000);
        assert_eq!(config.identity, Some(Identity::new("u-1", "Ada")));
    }

    #[test]
    fn rest_table_defaults_to_comments() {
        let config = CliConfig::parse("[store]\nkind = \"rest\"\nbase_url = \"http://x\"\n").unwrap();
        match config.store {
            StoreConfig::Rest(rest) => assert_eq!(rest.table, "comments"),
            other => panic!("expected rest store, got {other:?}"),
        }
    }

    #[test]
    fn api_key_override_only_touches_rest() {
        let mut config = CliConfig::parse("[store]\nkind = \"rest\"\napi_key = \"old\"\n").unwrap();
        config.override_api_key("new".into());
        match config.store {
            StoreConfig::Rest(rest) => assert_eq!(rest.api_key, "new"),
            other => panic!("expected rest store, got {other:?}"),
        }
    }

    #[test]
    fn unknown_store_kind_is_rejected() {
        assert!(CliConfig::parse("[store]\nkind = \"sqlite\"\n").is_err());
    }

    #[test]
    fn load_missing_file_fails_with_path() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/threadline.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/threadline.toml"));
    }

    #[tokio::test]
    async fn memory_store_from_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("comments.json");
        std::fs::write(
            &seed,
            r#"[{"id": 1, "post_id": 4, "parent_comment_id": null, "content": "seeded",
                 "author_id": "u-1", "author_display_name": "Ada",
                 "created_at": "2024-05-01T12:00:00Z"}]"#,
        )
        .unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nkind = \"memory\"\nseed = {:?}", seed.display().to_string()).unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        let store = config.open_store().unwrap();
        let rows = store.fetch_comments(PostId::new(4)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "seeded");
    }
}
