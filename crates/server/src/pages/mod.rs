mod cache;
mod loader;
mod paths;

pub use cache::{CacheStatus, CachedPage, Lookup, PageCache};
pub use loader::load_post;
pub use paths::static_paths;
