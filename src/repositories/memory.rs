// src/repositories/memory.rs

use std::{
    cmp::Ordering,
    collections::HashSet,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{
        challenge::{ChallengeSummary, Difficulty, ExploreTag},
        comment::{
            CommentAuthor, CommentFilter, CommentQuery, CommentRoot, PaginatedComment,
            ParentFilter, SortKey, SortOrder,
        },
        report::{Report, ReportType, ReportedComment},
        user::User,
    },
    repositories::{ChallengeStore, CommentStore, ReportStore},
};

#[derive(Debug, Clone)]
struct ChallengeRecord {
    id: i64,
    name: String,
    difficulty: Difficulty,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SolutionRecord {
    id: i64,
    title: String,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    root: CommentRoot,
    parent_id: Option<i64>,
    user_id: i64,
    text: String,
    visible: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ReportRecord {
    id: i64,
    report_type: ReportType,
    comment_id: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    challenges: Vec<ChallengeRecord>,
    solutions: Vec<SolutionRecord>,
    comments: Vec<CommentRecord>,
    /// (user_id, comment_id)
    comment_votes: HashSet<(i64, i64)>,
    /// (user_id, challenge_id)
    challenge_votes: HashSet<(i64, i64)>,
    reports: Vec<ReportRecord>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_name(&self, id: i64) -> String {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    fn root_name(&self, root: CommentRoot) -> Option<String> {
        match root {
            CommentRoot::Challenge(id) => self
                .challenges
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone()),
            CommentRoot::Solution(id) => self
                .solutions
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.title.clone()),
        }
    }

    fn reply_count(&self, comment_id: i64) -> i64 {
        self.comments
            .iter()
            .filter(|c| c.visible && c.parent_id == Some(comment_id))
            .count() as i64
    }

    fn vote_count(&self, comment_id: i64) -> i64 {
        self.comment_votes
            .iter()
            .filter(|(_, c)| *c == comment_id)
            .count() as i64
    }

    fn matching(&self, filter: &CommentFilter) -> impl Iterator<Item = &CommentRecord> + '_ {
        let filter = *filter;
        self.comments.iter().filter(move |c| {
            c.visible
                && c.root == filter.root
                && match filter.parent {
                    ParentFilter::TopLevel => c.parent_id.is_none(),
                    ParentFilter::ChildrenOf(id) => c.parent_id == Some(id),
                    ParentFilter::AnyReply => c.parent_id.is_some(),
                }
        })
    }
}

/// Fields for seeding a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub root: CommentRoot,
    pub parent_id: Option<i64>,
    pub user_id: i64,
    pub text: String,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
}

/// In-process store with the same query semantics as `PgStore`.
/// Seeding methods stand in for the services that own writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_user(&self, name: &str, role: &str) -> i64 {
        let mut tables = self.write();
        let id = tables.next_id();
        tables.users.push(User {
            id,
            name: name.to_string(),
            role: role.to_string(),
        });
        id
    }

    pub fn add_challenge(
        &self,
        name: &str,
        difficulty: Difficulty,
        user_id: i64,
        created_at: DateTime<Utc>,
    ) -> i64 {
        let mut tables = self.write();
        let id = tables.next_id();
        tables.challenges.push(ChallengeRecord {
            id,
            name: name.to_string(),
            difficulty,
            user_id,
            created_at,
        });
        id
    }

    pub fn add_solution(&self, title: &str) -> i64 {
        let mut tables = self.write();
        let id = tables.next_id();
        tables.solutions.push(SolutionRecord {
            id,
            title: title.to_string(),
        });
        id
    }

    pub fn add_comment(&self, comment: NewComment) -> i64 {
        let mut tables = self.write();
        let id = tables.next_id();
        tables.comments.push(CommentRecord {
            id,
            root: comment.root,
            parent_id: comment.parent_id,
            user_id: comment.user_id,
            text: comment.text,
            visible: comment.visible,
            created_at: comment.created_at,
        });
        id
    }

    /// Records a vote; a second vote by the same user is ignored.
    pub fn add_vote(&self, user_id: i64, comment_id: i64) {
        self.write().comment_votes.insert((user_id, comment_id));
    }

    pub fn add_challenge_vote(&self, user_id: i64, challenge_id: i64) {
        self.write().challenge_votes.insert((user_id, challenge_id));
    }

    pub fn add_report(&self, report_type: ReportType, comment_id: Option<i64>) -> i64 {
        let mut tables = self.write();
        let id = tables.next_id();
        tables.reports.push(ReportRecord {
            id,
            report_type,
            comment_id,
            created_at: Utc::now(),
        });
        id
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn count(&self, filter: &CommentFilter) -> Result<i64, AppError> {
        Ok(self.read().matching(filter).count() as i64)
    }

    async fn find_many(&self, query: &CommentQuery) -> Result<Vec<PaginatedComment>, AppError> {
        let tables = self.read();

        let mut rows: Vec<PaginatedComment> = tables
            .matching(&query.filter)
            .map(|c| PaginatedComment {
                id: c.id,
                root_type: c.root.root_type(),
                root_challenge_id: c.root.challenge_id(),
                root_solution_id: c.root.solution_id(),
                root_name: tables.root_name(c.root),
                parent_id: c.parent_id,
                author: CommentAuthor {
                    id: c.user_id,
                    name: tables.user_name(c.user_id),
                },
                text: c.text.clone(),
                created_at: c.created_at,
                updated_at: c.created_at,
                reply_count: tables.reply_count(c.id),
                vote_count: tables.vote_count(c.id),
                has_voted: query
                    .viewer_id
                    .is_some_and(|viewer| tables.comment_votes.contains(&(viewer, c.id))),
            })
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match query.sort_key {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::Vote => a.vote_count.cmp(&b.vote_count),
                SortKey::Replies => a.reply_count.cmp(&b.reply_count),
            }
            .then(a.id.cmp(&b.id));
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(rows
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(0))
            .take(usize::try_from(query.take).unwrap_or(0))
            .collect())
    }
}

#[async_trait]
impl ChallengeStore for MemoryStore {
    async fn challenges_by_tag(
        &self,
        tag: ExploreTag,
        take: i64,
    ) -> Result<Vec<ChallengeSummary>, AppError> {
        let tables = self.read();

        let mut rows: Vec<ChallengeSummary> = tables
            .challenges
            .iter()
            .filter(|c| tag.difficulty().is_none_or(|d| d == c.difficulty))
            .map(|c| ChallengeSummary {
                id: c.id,
                name: c.name.clone(),
                difficulty: c.difficulty,
                author_name: tables.user_name(c.user_id),
                vote_count: tables
                    .challenge_votes
                    .iter()
                    .filter(|(_, challenge)| *challenge == c.id)
                    .count() as i64,
                comment_count: tables
                    .comments
                    .iter()
                    .filter(|m| m.visible && m.root == CommentRoot::Challenge(c.id))
                    .count() as i64,
                created_at: c.created_at,
            })
            .collect();

        rows.sort_by(|a, b| {
            let primary = match tag {
                ExploreTag::Popular => b.vote_count.cmp(&a.vote_count),
                _ => b.created_at.cmp(&a.created_at),
            };
            match primary {
                Ordering::Equal => b.id.cmp(&a.id),
                other => other,
            }
        });
        rows.truncate(usize::try_from(take).unwrap_or(0));

        Ok(rows)
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn find_report(&self, id: i64) -> Result<Option<Report>, AppError> {
        let tables = self.read();

        let Some(report) = tables.reports.iter().find(|r| r.id == id) else {
            return Ok(None);
        };

        let comment = report
            .comment_id
            .and_then(|comment_id| tables.comments.iter().find(|c| c.id == comment_id))
            .map(|c| ReportedComment {
                id: c.id,
                root_type: c.root.root_type(),
                root_challenge_id: c.root.challenge_id(),
                root_solution_id: c.root.solution_id(),
                parent_id: c.parent_id,
                user_id: c.user_id,
                text: c.text.clone(),
                visible: c.visible,
                created_at: c.created_at,
                challenge_name: c
                    .root
                    .challenge_id()
                    .and_then(|_| tables.root_name(c.root)),
                solution_title: c
                    .root
                    .solution_id()
                    .and_then(|_| tables.root_name(c.root)),
            });

        Ok(Some(Report {
            id: report.id,
            report_type: report.report_type,
            comment_id: report.comment_id,
            comment,
            created_at: report.created_at,
        }))
    }
}
