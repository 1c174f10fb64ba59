use axum::{extract::State, http::StatusCode, Json};
use domain::StaticPaths;

use crate::pages::{static_paths, PageCache};

pub async fn list_paths(
    State(pages): State<PageCache>,
) -> Result<Json<StaticPaths>, (StatusCode, String)> {
    let paths = static_paths(pages.store())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(paths))
}
