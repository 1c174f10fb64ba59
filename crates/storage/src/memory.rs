use async_trait::async_trait;
use domain::{Comment, Post, Slug};
use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

use crate::{ContentStore, StoreError};

#[derive(Default, Deserialize)]
struct Documents {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    comments: Vec<Comment>,
}

/// In-process store. Comments are kept apart from posts and joined at
/// query time, the same way the remote store does it.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Documents>>,
}

impl MemoryStore {
    pub fn new(posts: Vec<Post>, comments: Vec<Comment>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Documents { posts, comments })),
        }
    }

    /// Loads `{ "posts": [...], "comments": [...] }` from a JSON file.
    pub async fn from_fixture(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let docs: Documents = serde_json::from_slice(&raw)?;
        info!(
            "Loaded fixture {}: {} posts, {} comments",
            path.as_ref().display(),
            docs.posts.len(),
            docs.comments.len()
        );
        Ok(Self {
            inner: Arc::new(RwLock::new(docs)),
        })
    }

    pub fn insert_post(&self, post: Post) {
        let mut docs = self.inner.write().unwrap_or_else(|e| e.into_inner());
        docs.posts.retain(|p| p.slug.current != post.slug.current);
        docs.posts.push(post);
    }

    pub fn remove_post(&self, slug: &str) {
        let mut docs = self.inner.write().unwrap_or_else(|e| e.into_inner());
        docs.posts.retain(|p| p.slug.current != slug);
    }

    pub fn insert_comment(&self, comment: Comment) {
        let mut docs = self.inner.write().unwrap_or_else(|e| e.into_inner());
        docs.comments.push(comment);
    }

    /// Flips the approval flag, standing in for the moderation step.
    pub fn approve_comment(&self, id: &str) -> bool {
        let mut docs = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match docs.comments.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.approved = true;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn post_slugs(&self) -> Result<Vec<String>, StoreError> {
        let docs = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(docs.posts.iter().map(|p| p.slug.current.clone()).collect())
    }

    async fn post_by_slug(&self, slug: &Slug) -> Result<Option<Post>, StoreError> {
        let docs = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let Some(post) = docs.posts.iter().find(|p| p.slug.current == slug.as_str()) else {
            return Ok(None);
        };

        let mut post = post.clone();
        post.comments = docs
            .comments
            .iter()
            .filter(|c| c.post.id == post.id && c.approved)
            .cloned()
            .collect();
        Ok(Some(post))
    }
}
