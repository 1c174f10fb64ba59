use adapter::CommentSink;
use anyhow::Context;
use axum::extract::FromRef;
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::pages::{static_paths, PageCache};

#[derive(Clone)]
pub struct AppState {
    pub pages: PageCache,
    pub sink: Arc<dyn CommentSink>,
}

impl FromRef<AppState> for PageCache {
    fn from_ref(state: &AppState) -> Self {
        state.pages.clone()
    }
}

impl AppState {
    /// Wires store, renderer and comment sink from settings, then
    /// pre-renders every known post. Fails if the store cannot be read.
    pub async fn build(settings: &Settings) -> anyhow::Result<Self> {
        let store = settings.content_store().await?;
        let pages = PageCache::new(store, Arc::new(settings.renderer()));

        let paths = static_paths(pages.store())
            .await
            .context("Failed to enumerate post paths")?;
        pages
            .prerender(&paths)
            .await
            .context("Failed to pre-render post pages")?;

        let sink = settings.comment_sink();
        info!("Comments will be submitted to {}", sink.endpoint());

        Ok(Self {
            pages,
            sink: Arc::new(sink),
        })
    }
}
