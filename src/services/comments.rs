// src/services/comments.rs

use crate::{
    error::AppError,
    models::comment::{
        CommentFilter, CommentPageRequest, CommentQuery, PAGE_SIZE, PaginatedComments,
        ParentFilter, total_pages,
    },
    repositories::CommentStore,
};

/// Returns one page of visible comments under a root.
///
/// * Counts the comments at the requested level (top-level or replies to `parent_id`).
/// * Counts every reply under the root, whatever its parent.
/// * Fetches the page window with counts and the viewer's vote state attached.
///
/// The three reads are independent and run concurrently.
/// `total_comments` in the result is the sum of both counts,
/// while `total_pages` only covers the requested level.
pub async fn get_paginated_comments<S>(
    store: &S,
    viewer_id: Option<i64>,
    request: &CommentPageRequest,
) -> Result<PaginatedComments, AppError>
where
    S: CommentStore + ?Sized,
{
    if request.page < 1 {
        return Err(AppError::BadRequest(
            "Page must be a positive integer".to_string(),
        ));
    }

    let skip = (request.page - 1)
        .checked_mul(PAGE_SIZE)
        .ok_or_else(|| AppError::BadRequest("Page is out of range".to_string()))?;

    let level = CommentFilter {
        root: request.root,
        parent: ParentFilter::from(request.parent_id),
    };
    let replies = CommentFilter {
        root: request.root,
        parent: ParentFilter::AnyReply,
    };
    let query = CommentQuery {
        filter: level,
        sort_key: request.sort_key,
        sort_order: request.sort_order,
        skip,
        take: PAGE_SIZE,
        viewer_id,
    };

    tracing::debug!(
        root_type = %request.root.root_type(),
        root_id = request.root.id(),
        parent_id = ?request.parent_id,
        page = request.page,
        "Fetching comment page"
    );

    let (level_count, reply_count, comments) = tokio::try_join!(
        store.count(&level),
        store.count(&replies),
        store.find_many(&query),
    )?;

    let total_pages = total_pages(level_count);

    Ok(PaginatedComments {
        total_comments: level_count + reply_count,
        total_pages,
        has_more: request.page < total_pages,
        comments,
    })
}
