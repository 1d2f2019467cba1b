// src/models/challenge.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of challenges shown in one explore section.
pub const EXPLORE_SECTION_SIZE: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Extreme => "EXTREME",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEGINNER" => Ok(Difficulty::Beginner),
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            "EXTREME" => Ok(Difficulty::Extreme),
            other => Err(format!("Unknown difficulty '{}'", other)),
        }
    }
}

/// Selector for an explore section: a ranking tag or a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExploreTag {
    Popular,
    Newest,
    Easy,
    Medium,
    Hard,
}

impl ExploreTag {
    /// Difficulty filter implied by the tag, if any.
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            ExploreTag::Easy => Some(Difficulty::Easy),
            ExploreTag::Medium => Some(Difficulty::Medium),
            ExploreTag::Hard => Some(Difficulty::Hard),
            ExploreTag::Popular | ExploreTag::Newest => None,
        }
    }
}

/// Static description of one explore section.
#[derive(Debug, Clone, Copy)]
pub struct ExploreSectionDef {
    pub title: &'static str,
    pub tag: ExploreTag,
    pub redirect_route: &'static str,
}

/// Sections of the explore page, in display order.
pub const EXPLORE_SECTIONS: [ExploreSectionDef; 5] = [
    ExploreSectionDef {
        title: "💕 Most Popular",
        tag: ExploreTag::Popular,
        redirect_route: "/explore/popular",
    },
    ExploreSectionDef {
        title: "🔥 Newest",
        tag: ExploreTag::Newest,
        redirect_route: "/explore/newest",
    },
    ExploreSectionDef {
        title: "Great for Beginners",
        tag: ExploreTag::Easy,
        redirect_route: "/explore/easy",
    },
    ExploreSectionDef {
        title: "Great for Enthusiasts",
        tag: ExploreTag::Medium,
        redirect_route: "/explore/medium",
    },
    ExploreSectionDef {
        title: "For the Experts",
        tag: ExploreTag::Hard,
        redirect_route: "/explore/hard",
    },
];

/// Challenge card data for the explore page.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeSummary {
    pub id: i64,
    pub name: String,
    pub difficulty: Difficulty,
    pub author_name: String,
    pub vote_count: i64,
    /// Visible comments only.
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploreSection {
    pub title: &'static str,
    pub tag: ExploreTag,
    pub redirect_route: &'static str,
    pub challenges: Vec<ChallengeSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_order_and_routes() {
        let tags: Vec<ExploreTag> = EXPLORE_SECTIONS.iter().map(|s| s.tag).collect();
        assert_eq!(
            tags,
            vec![
                ExploreTag::Popular,
                ExploreTag::Newest,
                ExploreTag::Easy,
                ExploreTag::Medium,
                ExploreTag::Hard
            ]
        );
        for section in EXPLORE_SECTIONS.iter() {
            assert!(section.redirect_route.starts_with("/explore/"));
        }
    }

    #[test]
    fn test_tag_difficulty() {
        assert_eq!(ExploreTag::Popular.difficulty(), None);
        assert_eq!(ExploreTag::Newest.difficulty(), None);
        assert_eq!(ExploreTag::Medium.difficulty(), Some(Difficulty::Medium));
    }

    #[test]
    fn test_difficulty_round_trips_through_column_value() {
        for d in [Difficulty::Beginner, Difficulty::Hard, Difficulty::Extreme] {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        assert!("hard".parse::<Difficulty>().is_err());
    }
}
