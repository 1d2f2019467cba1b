// src/handlers/explore.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, repositories::Store, services::explore::get_explore_sections};

/// Challenge sections for the explore landing page.
pub async fn list_sections(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    let sections = get_explore_sections(store.as_ref()).await?;

    Ok(Json(sections))
}
