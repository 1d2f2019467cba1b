// src/services/explore.rs

use futures::future::try_join_all;

use crate::{
    error::AppError,
    models::challenge::{EXPLORE_SECTION_SIZE, EXPLORE_SECTIONS, ExploreSection},
    repositories::ChallengeStore,
};

/// Fills every explore section, in display order.
pub async fn get_explore_sections<S>(store: &S) -> Result<Vec<ExploreSection>, AppError>
where
    S: ChallengeStore + ?Sized,
{
    try_join_all(EXPLORE_SECTIONS.into_iter().map(|def| async move {
        let challenges = store
            .challenges_by_tag(def.tag, EXPLORE_SECTION_SIZE)
            .await?;

        Ok::<_, AppError>(ExploreSection {
            title: def.title,
            tag: def.tag,
            redirect_route: def.redirect_route,
            challenges,
        })
    }))
    .await
}
