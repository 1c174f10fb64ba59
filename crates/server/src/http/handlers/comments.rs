use adapter::{CommentSection, SubmitAttempt};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use domain::CommentForm;
use render::FormView;

use crate::pages::Lookup;
use crate::state::AppState;

/// Handles the comment form of a post page and re-renders the page in the
/// resulting state. Every request starts from a fresh form.
pub async fn submit_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<CommentForm>,
) -> Response {
    let post = match state.pages.get(&slug).await {
        Ok(Lookup::Page(page, _)) => page.post,
        Ok(Lookup::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Html(state.pages.renderer().render_not_found()),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load /post/{}: {}", slug, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let mut section = CommentSection::new(post.id.clone());
    let renderer = state.pages.renderer();

    let (status, html) = match section.submit(form.clone(), state.sink.as_ref()).await {
        SubmitAttempt::Rejected(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            renderer.render_post(&post, &FormView::rejected(&errors, &form)),
        ),
        SubmitAttempt::Sent(next) => {
            let view = FormView {
                state: next,
                errors: &[],
                values: next.shows_form().then_some(&form),
            };
            (StatusCode::OK, renderer.render_post(&post, &view))
        }
    };

    (status, [(header::CACHE_CONTROL, "no-store")], Html(html)).into_response()
}
