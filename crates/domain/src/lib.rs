mod form;
mod models;
mod page;
pub mod rich_text;
mod submission;

pub use form::{CommentForm, FieldError, FormField};
pub use models::{Author, Comment, ImageRef, Post, Reference, Slug, SlugError, SlugField};
pub use page::{Fallback, PageProps, PathParams, StaticPaths, REVALIDATE_AFTER};
pub use submission::{SubmissionState, SubmitOutcome, TransportError};
