// src/repositories/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::{
        challenge::{ChallengeSummary, Difficulty, ExploreTag},
        comment::{
            CommentAuthor, CommentFilter, CommentQuery, CommentRoot, PaginatedComment,
            ParentFilter, SortKey,
        },
        report::{Report, ReportType, ReportedComment},
    },
    repositories::{ChallengeStore, CommentStore, ReportStore},
};

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Row shape of the comment page query.
#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    root_type: String,
    root_challenge_id: Option<i64>,
    root_solution_id: Option<i64>,
    root_name: Option<String>,
    parent_id: Option<i64>,
    user_id: i64,
    author_name: String,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    reply_count: i64,
    vote_count: i64,
    has_voted: bool,
}

impl TryFrom<CommentRow> for PaginatedComment {
    type Error = AppError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let root = CommentRoot::from_columns(
            &row.root_type,
            row.root_challenge_id,
            row.root_solution_id,
        )
        .ok_or_else(|| {
            AppError::InternalServerError(format!("Comment {} has an inconsistent root", row.id))
        })?;

        Ok(PaginatedComment {
            id: row.id,
            root_type: root.root_type(),
            root_challenge_id: root.challenge_id(),
            root_solution_id: root.solution_id(),
            root_name: row.root_name,
            parent_id: row.parent_id,
            author: CommentAuthor {
                id: row.user_id,
                name: row.author_name,
            },
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
            reply_count: row.reply_count,
            vote_count: row.vote_count,
            has_voted: row.has_voted,
        })
    }
}

#[derive(Debug, FromRow)]
struct ChallengeRow {
    id: i64,
    name: String,
    difficulty: String,
    author_name: String,
    vote_count: i64,
    comment_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChallengeRow> for ChallengeSummary {
    type Error = AppError;

    fn try_from(row: ChallengeRow) -> Result<Self, Self::Error> {
        let difficulty = row
            .difficulty
            .parse::<Difficulty>()
            .map_err(AppError::InternalServerError)?;

        Ok(ChallengeSummary {
            id: row.id,
            name: row.name,
            difficulty,
            author_name: row.author_name,
            vote_count: row.vote_count,
            comment_count: row.comment_count,
            created_at: row.created_at,
        })
    }
}

/// Report joined with its (optional) comment; comment columns are prefixed `c_`.
#[derive(Debug, FromRow)]
struct ReportRow {
    id: i64,
    report_type: String,
    comment_id: Option<i64>,
    created_at: DateTime<Utc>,
    c_id: Option<i64>,
    c_root_type: Option<String>,
    c_root_challenge_id: Option<i64>,
    c_root_solution_id: Option<i64>,
    c_parent_id: Option<i64>,
    c_user_id: Option<i64>,
    c_text: Option<String>,
    c_visible: Option<bool>,
    c_created_at: Option<DateTime<Utc>>,
    challenge_name: Option<String>,
    solution_title: Option<String>,
}

impl TryFrom<ReportRow> for Report {
    type Error = AppError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let report_type = row
            .report_type
            .parse::<ReportType>()
            .map_err(AppError::InternalServerError)?;

        let comment = match (
            row.c_id,
            row.c_root_type,
            row.c_user_id,
            row.c_text,
            row.c_visible,
            row.c_created_at,
        ) {
            (Some(id), Some(root_type), Some(user_id), Some(text), Some(visible), Some(created_at)) => {
                let root = CommentRoot::from_columns(
                    &root_type,
                    row.c_root_challenge_id,
                    row.c_root_solution_id,
                )
                .ok_or_else(|| {
                    AppError::InternalServerError(format!("Comment {} has an inconsistent root", id))
                })?;

                Some(ReportedComment {
                    id,
                    root_type: root.root_type(),
                    root_challenge_id: root.challenge_id(),
                    root_solution_id: root.solution_id(),
                    parent_id: row.c_parent_id,
                    user_id,
                    text,
                    visible,
                    created_at,
                    challenge_name: row.challenge_name,
                    solution_title: row.solution_title,
                })
            }
            _ => None,
        };

        Ok(Report {
            id: row.id,
            report_type,
            comment_id: row.comment_id,
            comment,
            created_at: row.created_at,
        })
    }
}

/// Appends the WHERE conditions shared by every comment query.
fn push_comment_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CommentFilter) {
    let root_type = filter.root.root_type();

    builder.push("c.visible = TRUE AND c.root_type = ");
    builder.push_bind(root_type.as_str());
    builder.push(" AND c.");
    builder.push(root_type.root_column());
    builder.push(" = ");
    builder.push_bind(filter.root.id());

    match filter.parent {
        ParentFilter::TopLevel => {
            builder.push(" AND c.parent_id IS NULL");
        }
        ParentFilter::ChildrenOf(parent_id) => {
            builder.push(" AND c.parent_id = ");
            builder.push_bind(parent_id);
        }
        ParentFilter::AnyReply => {
            builder.push(" AND c.parent_id IS NOT NULL");
        }
    }
}

pub(crate) fn build_count_query(filter: &CommentFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM comments c WHERE ");
    push_comment_filter(&mut builder, filter);
    builder
}

pub(crate) fn build_page_query(query: &CommentQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT
            c.id, c.root_type, c.root_challenge_id, c.root_solution_id,
            COALESCE(ch.name, s.title) AS root_name,
            c.parent_id, c.user_id, u.name AS author_name,
            c.text, c.created_at, c.updated_at,
            (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id AND r.visible = TRUE) AS reply_count,
            (SELECT COUNT(*) FROM comment_votes v WHERE v.comment_id = c.id) AS vote_count,
        "#,
    );

    match query.viewer_id {
        Some(viewer_id) => {
            builder.push(
                "EXISTS (SELECT 1 FROM comment_votes mv WHERE mv.comment_id = c.id AND mv.user_id = ",
            );
            builder.push_bind(viewer_id);
            builder.push(") AS has_voted");
        }
        None => {
            builder.push("FALSE AS has_voted");
        }
    }

    builder.push(
        r#"
        FROM comments c
        JOIN users u ON u.id = c.user_id
        LEFT JOIN challenges ch ON ch.id = c.root_challenge_id
        LEFT JOIN solutions s ON s.id = c.root_solution_id
        WHERE "#,
    );
    push_comment_filter(&mut builder, &query.filter);

    let direction = query.sort_order.as_sql();
    let sort_column = match query.sort_key {
        SortKey::CreatedAt => "c.created_at",
        SortKey::Vote => "vote_count",
        SortKey::Replies => "reply_count",
    };
    // Id tie-break keeps consecutive pages disjoint
    builder.push(format!(
        " ORDER BY {} {}, c.id {} LIMIT ",
        sort_column, direction, direction
    ));
    builder.push_bind(query.take);
    builder.push(" OFFSET ");
    builder.push_bind(query.skip);

    builder
}

pub(crate) fn build_challenges_query(tag: ExploreTag, take: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT
            ch.id, ch.name, ch.difficulty, u.name AS author_name, ch.created_at,
            (SELECT COUNT(*) FROM challenge_votes cv WHERE cv.challenge_id = ch.id) AS vote_count,
            (SELECT COUNT(*) FROM comments c WHERE c.root_challenge_id = ch.id AND c.visible = TRUE) AS comment_count
        FROM challenges ch
        JOIN users u ON u.id = ch.user_id
        "#,
    );

    if let Some(difficulty) = tag.difficulty() {
        builder.push(" WHERE ch.difficulty = ");
        builder.push_bind(difficulty.as_str());
    }

    match tag {
        ExploreTag::Popular => builder.push(" ORDER BY vote_count DESC, ch.id DESC LIMIT "),
        _ => builder.push(" ORDER BY ch.created_at DESC, ch.id DESC LIMIT "),
    };
    builder.push_bind(take);

    builder
}

#[async_trait]
impl CommentStore for PgStore {
    async fn count(&self, filter: &CommentFilter) -> Result<i64, AppError> {
        let mut builder = build_count_query(filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count comments: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(count)
    }

    async fn find_many(&self, query: &CommentQuery) -> Result<Vec<PaginatedComment>, AppError> {
        let mut builder = build_page_query(query);

        let rows = builder
            .build_query_as::<CommentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list comments: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        rows.into_iter().map(PaginatedComment::try_from).collect()
    }
}

#[async_trait]
impl ChallengeStore for PgStore {
    async fn challenges_by_tag(
        &self,
        tag: ExploreTag,
        take: i64,
    ) -> Result<Vec<ChallengeSummary>, AppError> {
        let mut builder = build_challenges_query(tag, take);

        let rows = builder
            .build_query_as::<ChallengeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list challenges for {:?}: {:?}", tag, e);
                AppError::InternalServerError(e.to_string())
            })?;

        rows.into_iter().map(ChallengeSummary::try_from).collect()
    }
}

#[async_trait]
impl ReportStore for PgStore {
    async fn find_report(&self, id: i64) -> Result<Option<Report>, AppError> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT
                r.id, r.type AS report_type, r.comment_id, r.created_at,
                c.id AS c_id, c.root_type AS c_root_type,
                c.root_challenge_id AS c_root_challenge_id,
                c.root_solution_id AS c_root_solution_id,
                c.parent_id AS c_parent_id, c.user_id AS c_user_id,
                c.text AS c_text, c.visible AS c_visible, c.created_at AS c_created_at,
                ch.name AS challenge_name, s.title AS solution_title
            FROM reports r
            LEFT JOIN comments c ON c.id = r.comment_id
            LEFT JOIN challenges ch ON ch.id = c.root_challenge_id
            LEFT JOIN solutions s ON s.id = c.root_solution_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch report {}: {:?}", id, e);
            AppError::InternalServerError(e.to_string())
        })?;

        row.map(Report::try_from).transpose()
    }
}
