use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use adapter::HttpCommentSink;
use render::{BlockRegistry, PageRenderer};
use storage::{CmsConfig, ContentStore, ImageUrls, MemoryStore, SanityStore};

const ENV_PREFIX: &str = "POSTPAGE_";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub site: SiteSettings,
    pub store: StoreSettings,
    pub comments: CommentSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Deserialize, Clone)]
pub struct SiteSettings {
    pub title: String,
    /// Public origin of the site, used to resolve relative endpoints.
    pub base_url: String,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Sanity,
    Fixture,
}

#[derive(Deserialize, Clone)]
pub struct StoreSettings {
    pub mode: StoreMode,
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    pub api_host: Option<String>,
    // 仅 fixture 模式使用
    pub fixture_path: String,
}

#[derive(Deserialize, Clone)]
pub struct CommentSettings {
    pub endpoint: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origins", "*")?
            .set_default("site.title", "Medium Blog")?
            .set_default("site.base_url", "http://localhost:3000")?
            .set_default("store.mode", "fixture")?
            .set_default("store.project_id", "demo")?
            .set_default("store.dataset", "production")?
            .set_default("store.api_version", "2021-10-21")?
            .set_default("store.use_cdn", false)?
            .set_default("store.fixture_path", "fixtures/posts.json")?
            .set_default("comments.endpoint", "/api/createComment")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(
                &serde_json::to_string(&env_map)
                    .map_err(|e| ConfigError::Message(e.to_string()))?,
                config::FileFormat::Json,
            ))
            .build()?;

        s.try_deserialize()
    }

    pub fn cms_config(&self) -> CmsConfig {
        CmsConfig {
            project_id: self.store.project_id.clone(),
            dataset: self.store.dataset.clone(),
            api_version: self.store.api_version.clone(),
            use_cdn: self.store.use_cdn,
            token: self.store.token.clone().filter(|t| !t.is_empty()),
            api_host: self.store.api_host.clone().filter(|h| !h.is_empty()),
        }
    }

    pub async fn content_store(&self) -> anyhow::Result<Arc<dyn ContentStore>> {
        use anyhow::Context;

        Ok(match self.store.mode {
            StoreMode::Sanity => {
                let cms = self.cms_config();
                tracing::info!(
                    "Using Sanity store: project={} dataset={}",
                    cms.project_id,
                    cms.dataset
                );
                Arc::new(SanityStore::new(cms))
            }
            StoreMode::Fixture => {
                let store = MemoryStore::from_fixture(&self.store.fixture_path)
                    .await
                    .with_context(|| {
                        format!("Failed to load fixture {}", self.store.fixture_path)
                    })?;
                Arc::new(store)
            }
        })
    }

    pub fn renderer(&self) -> PageRenderer {
        PageRenderer::new(
            BlockRegistry::post_body(),
            ImageUrls::new(&self.cms_config()),
            self.site.title.clone(),
        )
    }

    pub fn comment_endpoint(&self) -> String {
        resolve_endpoint(&self.site.base_url, &self.comments.endpoint)
    }

    pub fn comment_sink(&self) -> HttpCommentSink {
        HttpCommentSink::new(self.comment_endpoint())
    }
}

fn resolve_endpoint(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches(ENV_PREFIX)
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_endpoint_against_site() {
        assert_eq!(
            resolve_endpoint("https://blog.example.com/", "/api/createComment"),
            "https://blog.example.com/api/createComment"
        );
        assert_eq!(
            resolve_endpoint("https://blog.example.com", "https://hooks.example.com/c"),
            "https://hooks.example.com/c"
        );
    }

    #[test]
    fn defaults_load_without_files() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.store.mode, StoreMode::Fixture);
        assert_eq!(settings.cms_config().dataset, "production");
        assert!(settings.comment_endpoint().ends_with("/api/createComment"));
    }
}
