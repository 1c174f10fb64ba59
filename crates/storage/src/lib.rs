use async_trait::async_trait;
use domain::{Post, Slug};

mod config;
mod image;
mod memory;
mod sanity;

pub use config::CmsConfig;
pub use image::ImageUrls;
pub use memory::MemoryStore;
pub use sanity::SanityStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read fixture: {0}")]
    Fixture(#[from] std::io::Error),
}

/// Read side of the headless content store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Slugs of every post, in store order.
    async fn post_slugs(&self) -> Result<Vec<String>, StoreError>;

    /// The post for `slug` with its author and approved comments joined in.
    async fn post_by_slug(&self, slug: &Slug) -> Result<Option<Post>, StoreError>;
}
