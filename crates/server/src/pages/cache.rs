use domain::{PageProps, Post, Slug, StaticPaths};
use render::{FormView, PageRenderer};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::{ContentStore, StoreError};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::loader::load_post;

/// One rendered post page.
#[derive(Clone)]
pub struct CachedPage {
    pub post: Arc<Post>,
    pub html: Arc<str>,
    pub etag: String,
    pub revalidate: Duration,
    generated_at: Instant,
}

impl CachedPage {
    fn is_stale(&self, now: Instant) -> bool {
        now.duration_since(self.generated_at) >= self.revalidate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Fresh copy from the cache.
    Hit,
    /// Expired copy; a regeneration has been scheduled.
    Stale,
    /// Rendered for this request.
    Miss,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Stale => "STALE",
            CacheStatus::Miss => "MISS",
        }
    }
}

pub enum Lookup {
    Page(CachedPage, CacheStatus),
    NotFound,
}

struct Inner {
    store: Arc<dyn ContentStore>,
    renderer: Arc<PageRenderer>,
    entries: RwLock<HashMap<Slug, CachedPage>>,
    // 正在后台重新生成的路径，避免重复调度
    regenerating: Mutex<HashSet<Slug>>,
}

/// Rendered pages with stale-while-revalidate semantics.
#[derive(Clone)]
pub struct PageCache {
    inner: Arc<Inner>,
}

impl PageCache {
    pub fn new(store: Arc<dyn ContentStore>, renderer: Arc<PageRenderer>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                renderer,
                entries: RwLock::new(HashMap::new()),
                regenerating: Mutex::new(HashSet::new()),
            }),
        }
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.inner.renderer
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.inner.store.as_ref()
    }

    /// Renders every enumerated path up front. Any store failure aborts.
    pub async fn prerender(&self, paths: &StaticPaths) -> Result<usize, StoreError> {
        let mut rendered = 0;
        for slug in paths.slugs() {
            if self.generate(slug).await?.is_some() {
                rendered += 1;
            } else {
                warn!("Enumerated path /post/{} has no post", slug);
            }
        }
        info!("Pre-rendered {} of {} post pages", rendered, paths.paths.len());
        Ok(rendered)
    }

    pub async fn get(&self, raw_slug: &str) -> Result<Lookup, StoreError> {
        let Ok(slug) = Slug::new(raw_slug) else {
            return Ok(Lookup::NotFound);
        };

        let cached = self.inner.entries.read().await.get(&slug).cloned();
        if let Some(page) = cached {
            if !page.is_stale(Instant::now()) {
                return Ok(Lookup::Page(page, CacheStatus::Hit));
            }
            self.schedule_regeneration(slug);
            return Ok(Lookup::Page(page, CacheStatus::Stale));
        }

        // fallback: blocking，当前请求等待渲染完成
        Ok(match self.generate(&slug).await? {
            Some(page) => Lookup::Page(page, CacheStatus::Miss),
            None => Lookup::NotFound,
        })
    }

    /// Loads and renders one path, replacing any cached copy. A post that
    /// no longer exists is evicted.
    async fn generate(&self, slug: &Slug) -> Result<Option<CachedPage>, StoreError> {
        let (post, revalidate) =
            match load_post(self.inner.store.as_ref(), Some(slug.as_str())).await? {
                PageProps::Found { post, revalidate } => (post, revalidate),
                PageProps::NotFound => {
                    if self.inner.entries.write().await.remove(slug).is_some() {
                        info!("Evicted /post/{}: post no longer exists", slug);
                    }
                    return Ok(None);
                }
            };

        let html = self.inner.renderer.render_post(&post, &FormView::default());
        let page = CachedPage {
            etag: etag_for(&html),
            post: Arc::new(post),
            html: Arc::from(html),
            revalidate,
            generated_at: Instant::now(),
        };

        self.inner
            .entries
            .write()
            .await
            .insert(slug.clone(), page.clone());
        Ok(Some(page))
    }

    fn schedule_regeneration(&self, slug: Slug) {
        {
            let mut running = self
                .inner
                .regenerating
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if !running.insert(slug.clone()) {
                return;
            }
        }

        let cache = self.clone();
        tokio::spawn(async move {
            match cache.generate(&slug).await {
                Ok(Some(_)) => info!("Regenerated /post/{}", slug),
                Ok(None) => {}
                Err(e) => error!("Regeneration of /post/{} failed, keeping stale copy: {}", slug, e),
            }
            cache
                .inner
                .regenerating
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&slug);
        });
    }
}

fn etag_for(html: &str) -> String {
    let digest = Sha256::digest(html.as_bytes());
    format!("\"{}\"", hex::encode(&digest[..16]))
}
