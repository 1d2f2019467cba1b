// src/handlers/reports.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::report::CommentReportView,
    repositories::{ReportStore, Store},
};

/// Comment panel of a moderation report.
/// Admin only. Responds `null` when the report is not about a comment.
pub async fn get_comment_report(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let report = store
        .find_report(id)
        .await?
        .ok_or(AppError::NotFound("Report not found".to_string()))?;

    Ok(Json(CommentReportView::from_report(&report)))
}
