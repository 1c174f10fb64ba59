mod drivers;
mod traits;

pub use drivers::HttpCommentSink;
pub use traits::CommentSink;

use domain::{CommentForm, FieldError, SubmissionState};
use tracing::warn;

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Validation failed; nothing was sent.
    Rejected(Vec<FieldError>),
    /// A request was issued and the state moved accordingly.
    Sent(SubmissionState),
}

/// Comment form of a single page view. State lives only as long as the
/// section does.
#[derive(Debug, Clone)]
pub struct CommentSection {
    post_id: String,
    state: SubmissionState,
}

impl CommentSection {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            state: SubmissionState::default(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Validates, sends at most one request and applies its outcome.
    pub async fn submit(&mut self, mut form: CommentForm, sink: &dyn CommentSink) -> SubmitAttempt {
        // 隐藏字段缺失时用当前文章补上
        if form.post_id.is_empty() {
            form.post_id = self.post_id.clone();
        }

        if let Err(errors) = form.validate() {
            return SubmitAttempt::Rejected(errors);
        }

        let outcome = sink.send(&form).await;
        if let Err(e) = &outcome {
            warn!("Comment submission for post {} failed: {}", form.post_id, e);
        }
        self.state = self.state.transition(&outcome);
        SubmitAttempt::Sent(self.state)
    }
}
