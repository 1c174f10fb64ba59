use domain::{PageProps, Slug};
use storage::{ContentStore, StoreError};
use tracing::debug;

/// Loads the data for one post page. A missing or unknown slug is
/// `NotFound`; store failures are returned as errors.
pub async fn load_post(
    store: &dyn ContentStore,
    slug: Option<&str>,
) -> Result<PageProps, StoreError> {
    let Some(raw) = slug else {
        return Ok(PageProps::NotFound);
    };
    let slug = match Slug::new(raw) {
        Ok(s) => s,
        Err(e) => {
            debug!("Rejecting slug '{}': {}", raw, e);
            return Ok(PageProps::NotFound);
        }
    };

    Ok(match store.post_by_slug(&slug).await? {
        Some(post) => PageProps::found(post.retain_approved()),
        None => PageProps::NotFound,
    })
}
