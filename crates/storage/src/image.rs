use domain::ImageRef;

use crate::CmsConfig;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// Resolves image asset references to CDN URLs.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    project_id: String,
    dataset: String,
}

impl ImageUrls {
    pub fn new(config: &CmsConfig) -> Self {
        Self {
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
        }
    }

    /// `image-<id>-<w>x<h>-<fmt>` becomes `<cdn>/<project>/<dataset>/<id>-<w>x<h>.<fmt>`.
    /// Returns `None` for references that are not image assets.
    pub fn url_for_ref(&self, asset_ref: &str) -> Option<String> {
        let rest = asset_ref.strip_prefix("image-")?;
        let (stem, format) = rest.rsplit_once('-')?;
        let (id, dimensions) = stem.rsplit_once('-')?;
        let (w, h) = dimensions.split_once('x')?;
        if id.is_empty() || format.is_empty() {
            return None;
        }
        if w.parse::<u32>().is_err() || h.parse::<u32>().is_err() {
            return None;
        }
        Some(format!(
            "{}/{}/{}/{}-{}.{}",
            CDN_BASE, self.project_id, self.dataset, id, dimensions, format
        ))
    }

    pub fn url_for(&self, image: &ImageRef) -> Option<String> {
        self.url_for_ref(&image.asset.id)
    }
}
