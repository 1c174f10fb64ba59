use domain::{Fallback, PathParams, Slug, StaticPaths};
use storage::{ContentStore, StoreError};
use tracing::{info, warn};

/// Every post path to pre-render. Paths not listed are rendered on
/// demand while the request waits.
pub async fn static_paths(store: &dyn ContentStore) -> Result<StaticPaths, StoreError> {
    let slugs = store.post_slugs().await?;

    let paths: Vec<PathParams> = slugs
        .into_iter()
        .filter_map(|raw| match Slug::new(raw.as_str()) {
            Ok(slug) => Some(PathParams { slug }),
            Err(e) => {
                warn!("Skipping post with unusable slug '{}': {}", raw, e);
                None
            }
        })
        .collect();

    info!("Enumerated {} post paths", paths.len());
    Ok(StaticPaths {
        paths,
        fallback: Fallback::Blocking,
    })
}
