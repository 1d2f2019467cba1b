// src/repositories/mod.rs

//! Persistence seams. Handlers and services only talk to these traits;
//! `PgStore` backs them in production and `MemoryStore` in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        challenge::{ChallengeSummary, ExploreTag},
        comment::{CommentFilter, CommentQuery, PaginatedComment},
        report::Report,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Number of visible comments matching the filter.
    async fn count(&self, filter: &CommentFilter) -> Result<i64, AppError>;

    /// One ordered window of visible comments, with counts and viewer vote state attached.
    async fn find_many(&self, query: &CommentQuery) -> Result<Vec<PaginatedComment>, AppError>;
}

#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn challenges_by_tag(
        &self,
        tag: ExploreTag,
        take: i64,
    ) -> Result<Vec<ChallengeSummary>, AppError>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn find_report(&self, id: i64) -> Result<Option<Report>, AppError>;
}

/// Everything the HTTP layer needs from storage.
pub trait Store: CommentStore + ChallengeStore + ReportStore {}

impl<T> Store for T where T: CommentStore + ChallengeStore + ReportStore {}
