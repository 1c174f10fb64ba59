use async_trait::async_trait;
use domain::{CommentForm, SubmitOutcome};

/// Destination of comment submissions.
#[async_trait]
pub trait CommentSink: Send + Sync {
    /// Sends the form once. Only transport failures are errors; whatever
    /// the endpoint answers counts as delivered.
    async fn send(&self, form: &CommentForm) -> SubmitOutcome;
}
