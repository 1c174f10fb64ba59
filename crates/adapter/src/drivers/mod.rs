mod http;

pub use http::HttpCommentSink;
