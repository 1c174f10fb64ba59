use serde::Serialize;
use std::time::Duration;

use crate::models::{Post, Slug};

/// Cached renders become stale after this long.
pub const REVALIDATE_AFTER: Duration = Duration::from_secs(60);

/// What happens to a path that was not enumerated at build time. Only
/// blocking rendering is supported: the request waits for the render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    Blocking,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathParams {
    pub slug: Slug,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaticPaths {
    pub paths: Vec<PathParams>,
    pub fallback: Fallback,
}

impl StaticPaths {
    pub fn slugs(&self) -> impl Iterator<Item = &Slug> {
        self.paths.iter().map(|p| &p.slug)
    }
}

/// Output of the page loader for one path.
#[derive(Debug, Clone)]
pub enum PageProps {
    NotFound,
    Found { post: Post, revalidate: Duration },
}

impl PageProps {
    pub fn found(post: Post) -> Self {
        PageProps::Found {
            post,
            revalidate: REVALIDATE_AFTER,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PageProps::NotFound)
    }
}
