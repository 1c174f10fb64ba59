pub mod comments;
pub mod paths;
pub mod posts;
