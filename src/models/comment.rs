// src/models/comment.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of comments returned per page.
pub const PAGE_SIZE: i64 = 10;

/// The kind of entity a comment thread hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RootType {
    Challenge,
    Solution,
}

impl RootType {
    /// Value stored in the `comments.root_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            RootType::Challenge => "CHALLENGE",
            RootType::Solution => "SOLUTION",
        }
    }

    /// Foreign-key column that carries the root id for this root type.
    pub fn root_column(self) -> &'static str {
        match self {
            RootType::Challenge => "root_challenge_id",
            RootType::Solution => "root_solution_id",
        }
    }

    /// Lowercase form used in frontend routes (`/challenge/12`).
    pub fn path_segment(self) -> &'static str {
        match self {
            RootType::Challenge => "challenge",
            RootType::Solution => "solution",
        }
    }
}

impl fmt::Display for RootType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("challenge") {
            Ok(RootType::Challenge)
        } else if s.eq_ignore_ascii_case("solution") {
            Ok(RootType::Solution)
        } else {
            Err(format!("Unknown comment root type '{}'", s))
        }
    }
}

/// The owning root of a comment.
/// Exactly one of challenge / solution is ever set, matching `root_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRoot {
    Challenge(i64),
    Solution(i64),
}

impl CommentRoot {
    pub fn new(root_type: RootType, id: i64) -> Self {
        match root_type {
            RootType::Challenge => CommentRoot::Challenge(id),
            RootType::Solution => CommentRoot::Solution(id),
        }
    }

    /// Rebuilds the root from its stored columns.
    /// Returns `None` when the columns disagree with the discriminator.
    pub fn from_columns(
        root_type: &str,
        root_challenge_id: Option<i64>,
        root_solution_id: Option<i64>,
    ) -> Option<Self> {
        match (root_type.parse::<RootType>().ok()?, root_challenge_id, root_solution_id) {
            (RootType::Challenge, Some(id), None) => Some(CommentRoot::Challenge(id)),
            (RootType::Solution, None, Some(id)) => Some(CommentRoot::Solution(id)),
            _ => None,
        }
    }

    pub fn root_type(self) -> RootType {
        match self {
            CommentRoot::Challenge(_) => RootType::Challenge,
            CommentRoot::Solution(_) => RootType::Solution,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            CommentRoot::Challenge(id) | CommentRoot::Solution(id) => id,
        }
    }

    pub fn challenge_id(self) -> Option<i64> {
        match self {
            CommentRoot::Challenge(id) => Some(id),
            CommentRoot::Solution(_) => None,
        }
    }

    pub fn solution_id(self) -> Option<i64> {
        match self {
            CommentRoot::Solution(id) => Some(id),
            CommentRoot::Challenge(_) => None,
        }
    }
}

/// Column a comment page is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Vote,
    Replies,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Which level of the thread a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentFilter {
    /// Comments without a parent.
    TopLevel,
    /// Direct replies to one comment.
    ChildrenOf(i64),
    /// Every reply under the root, whatever its parent.
    AnyReply,
}

impl From<Option<i64>> for ParentFilter {
    fn from(parent_id: Option<i64>) -> Self {
        match parent_id {
            Some(id) => ParentFilter::ChildrenOf(id),
            None => ParentFilter::TopLevel,
        }
    }
}

/// Filter shared by counts and page fetches. Only visible comments ever match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentFilter {
    pub root: CommentRoot,
    pub parent: ParentFilter,
}

/// A fully resolved page fetch handed to the store.
#[derive(Debug, Clone)]
pub struct CommentQuery {
    pub filter: CommentFilter,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub skip: i64,
    pub take: i64,
    /// User whose votes are checked for `has_voted`.
    pub viewer_id: Option<i64>,
}

/// Query parameters for `GET /api/comments/{root_type}/{root_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct ListCommentsParams {
    /// 1-based page number.
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: i64,

    /// Lists replies to this comment instead of top-level comments.
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub sort_key: SortKey,

    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Input of the comment query service.
#[derive(Debug, Clone, Copy)]
pub struct CommentPageRequest {
    pub root: CommentRoot,
    pub parent_id: Option<i64>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub page: i64,
}

impl CommentPageRequest {
    pub fn from_params(root: CommentRoot, params: &ListCommentsParams) -> Self {
        Self {
            root,
            parent_id: params.parent_id,
            sort_key: params.sort_key,
            sort_order: params.sort_order,
            page: params.page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentAuthor {
    pub id: i64,
    pub name: String,
}

/// A visible comment with its counts and the viewer's vote state.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedComment {
    pub id: i64,
    pub root_type: RootType,
    pub root_challenge_id: Option<i64>,
    pub root_solution_id: Option<i64>,
    /// Challenge name or solution title of the root.
    pub root_name: Option<String>,
    pub parent_id: Option<i64>,
    pub author: CommentAuthor,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reply_count: i64,
    pub vote_count: i64,
    pub has_voted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedComments {
    /// Comments at the requested level plus every reply under the root.
    pub total_comments: i64,
    pub total_pages: i64,
    pub has_more: bool,
    pub comments: Vec<PaginatedComment>,
}

/// `ceil(total / PAGE_SIZE)` for non-negative totals.
pub fn total_pages(total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}
