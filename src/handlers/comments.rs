// src/handlers/comments.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{CommentPageRequest, CommentRoot, ListCommentsParams, RootType},
    repositories::Store,
    services::comments::get_paginated_comments,
    utils::jwt::Viewer,
};

/// List one page of comments under a challenge or solution.
///
/// `parent_id` switches from top-level comments to the replies of that comment.
/// Anonymous callers are served too; they just never see `has_voted = true`.
pub async fn list_comments(
    State(store): State<Arc<dyn Store>>,
    Extension(viewer): Extension<Viewer>,
    Path((root_type, root_id)): Path<(String, i64)>,
    Query(params): Query<ListCommentsParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let root_type = root_type
        .parse::<RootType>()
        .map_err(AppError::BadRequest)?;
    let request = CommentPageRequest::from_params(CommentRoot::new(root_type, root_id), &params);

    let page = get_paginated_comments(store.as_ref(), viewer.0, &request).await?;

    Ok(Json(page))
}
