//! Fixtures shared by the server's unit tests.

use adapter::CommentSink;
use async_trait::async_trait;
use domain::{Author, Comment, CommentForm, Post, Reference, Slug, SlugField, SubmitOutcome, TransportError};
use render::{BlockRegistry, PageRenderer};
use std::sync::Mutex;
use storage::{CmsConfig, ContentStore, ImageUrls, MemoryStore, StoreError};

pub fn post(id: &str, slug: &str) -> Post {
    let title = slug
        .split('-')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Post {
        id: id.into(),
        created_at: "2022-03-01T10:00:00Z".parse().unwrap(),
        title,
        description: "About things".into(),
        main_image: None,
        slug: SlugField {
            current: slug.into(),
        },
        body: vec![],
        author: Author {
            name: "Ada".into(),
            image: None,
        },
        comments: vec![],
    }
}

pub fn comment(id: &str, post_id: &str, approved: bool) -> Comment {
    Comment {
        id: id.into(),
        post: Reference { id: post_id.into() },
        name: format!("reader-{id}"),
        email: None,
        comment: format!("comment {id}"),
        approved,
    }
}

pub fn store_with(posts: Vec<Post>, comments: Vec<Comment>) -> MemoryStore {
    MemoryStore::new(posts, comments)
}

pub fn renderer() -> PageRenderer {
    PageRenderer::new(
        BlockRegistry::post_body(),
        ImageUrls::new(&CmsConfig::new("proj", "production")),
        "Medium Blog",
    )
}

pub struct FailingStore;

#[async_trait]
impl ContentStore for FailingStore {
    async fn post_slugs(&self) -> Result<Vec<String>, StoreError> {
        Err(unreachable_store())
    }

    async fn post_by_slug(&self, _slug: &Slug) -> Result<Option<Post>, StoreError> {
        Err(unreachable_store())
    }
}

fn unreachable_store() -> StoreError {
    StoreError::Fixture(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "store unreachable",
    ))
}

#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<CommentForm>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<CommentForm> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentSink for RecordingSink {
    async fn send(&self, form: &CommentForm) -> SubmitOutcome {
        self.sent.lock().unwrap().push(form.clone());
        if self.fail {
            Err(TransportError("connection refused".into()))
        } else {
            Ok(())
        }
    }
}
