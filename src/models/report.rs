// src/models/report.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::comment::{CommentRoot, RootType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportType {
    Comment,
    Challenge,
    Solution,
    User,
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMMENT" => Ok(ReportType::Comment),
            "CHALLENGE" => Ok(ReportType::Challenge),
            "SOLUTION" => Ok(ReportType::Solution),
            "USER" => Ok(ReportType::User),
            other => Err(format!("Unknown report type '{}'", other)),
        }
    }
}

/// The comment attached to a report, joined with its root's label.
/// Hidden comments are included: moderators see everything.
#[derive(Debug, Clone, Serialize)]
pub struct ReportedComment {
    pub id: i64,
    pub root_type: RootType,
    pub root_challenge_id: Option<i64>,
    pub root_solution_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub user_id: i64,
    pub text: String,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    /// Name of the root challenge, when the root is a challenge.
    pub challenge_name: Option<String>,
    /// Title of the root solution, when the root is a solution.
    pub solution_title: Option<String>,
}

impl ReportedComment {
    pub fn root(&self) -> Option<CommentRoot> {
        CommentRoot::from_columns(
            self.root_type.as_str(),
            self.root_challenge_id,
            self.root_solution_id,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub id: i64,
    pub report_type: ReportType,
    pub comment_id: Option<i64>,
    pub comment: Option<ReportedComment>,
    pub created_at: DateTime<Utc>,
}

/// Admin panel data for a report filed against a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentReportView {
    pub report_id: i64,
    pub root_type: RootType,
    pub root_id: i64,
    /// Frontend route of the commented root, e.g. `/challenge/12`.
    pub href: String,
    pub root_label: Option<String>,
    pub comment: ReportedComment,
}

impl CommentReportView {
    /// Builds the view, or `None` if the report is not about an existing comment.
    pub fn from_report(report: &Report) -> Option<Self> {
        if report.report_type != ReportType::Comment || report.comment_id.is_none() {
            return None;
        }
        let comment = report.comment.as_ref()?;
        let root = comment.root()?;

        let root_label = match root.root_type() {
            RootType::Challenge => comment.challenge_name.clone(),
            RootType::Solution => comment.solution_title.clone(),
        };

        Some(Self {
            report_id: report.id,
            root_type: root.root_type(),
            root_id: root.id(),
            href: format!("/{}/{}", root.root_type().path_segment(), root.id()),
            root_label,
            comment: comment.clone(),
        })
    }
}
