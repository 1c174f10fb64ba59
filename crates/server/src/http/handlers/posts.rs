use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::pages::{Lookup, PageCache};

pub async fn show_post(
    State(pages): State<PageCache>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let lookup = match pages.get(&slug).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to load /post/{}: {}", slug, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let (page, status) = match lookup {
        Lookup::Page(page, status) => (page, status),
        Lookup::NotFound => {
            return (
                StatusCode::NOT_FOUND,
                Html(pages.renderer().render_not_found()),
            )
                .into_response();
        }
    };

    let cache_control = format!(
        "s-maxage={}, stale-while-revalidate",
        page.revalidate.as_secs()
    );
    let mut out = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(&page.etag) {
        out.insert(header::ETAG, v);
    }
    if let Ok(v) = HeaderValue::from_str(&cache_control) {
        out.insert(header::CACHE_CONTROL, v);
    }
    out.insert("x-cache", HeaderValue::from_static(status.as_str()));

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|tag| tag.trim() == page.etag));
    if not_modified {
        return (StatusCode::NOT_MODIFIED, out).into_response();
    }

    (StatusCode::OK, out, Html(page.html.to_string())).into_response()
}
