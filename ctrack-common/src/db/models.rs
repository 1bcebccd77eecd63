//! Database models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Well-known user that owns requests carrying no user header
pub const ANONYMOUS_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Color given to phases created without one
pub const DEFAULT_PHASE_COLOR: &str = "#6366f1";

/// Titles and color of the inbox chain (phase → week → day)
pub const INBOX_PHASE_TITLE: &str = "Migrated Items";
pub const INBOX_PHASE_COLOR: &str = "#9ca3af";
pub const INBOX_WEEK_TITLE: &str = "Unsorted";
pub const INBOX_DAY_TITLE: &str = "Inbox";

/// Resource type tags accepted on create
pub const RESOURCE_TYPES: &[&str] = &[
    "Course",
    "Docs",
    "Article",
    "Video",
    "Project",
    "Lab",
    "Tutorial",
    "Action",
    "Note",
    "Deliverable",
    "Link",
];

pub const DEFAULT_RESOURCE_TYPE: &str = "Link";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Phase {
    pub id: i64,
    pub title: String,
    pub color: String,
    pub order_index: i64,
    pub is_inbox: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Week {
    pub id: i64,
    pub phase_id: i64,
    pub title: String,
    pub order_index: i64,
    pub is_inbox: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Day {
    pub id: i64,
    pub week_id: i64,
    pub title: String,
    pub order_index: i64,
    pub is_inbox: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Resource {
    pub id: i64,
    pub day_id: i64,
    pub title: String,
    pub url: Option<String>,
    pub resource_type: String,
    pub status: ResourceStatus,
    pub difficulty: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub completed_at: Option<String>,
    pub order_index: i64,
}

/// Progress label of a resource. Any label may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ResourceStatus {
    NotStarted,
    InProgress,
    Complete,
    Skipped,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::NotStarted => "not_started",
            ResourceStatus::InProgress => "in_progress",
            ResourceStatus::Complete => "complete",
            ResourceStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(ResourceStatus::NotStarted),
            "in_progress" => Ok(ResourceStatus::InProgress),
            "complete" => Ok(ResourceStatus::Complete),
            "skipped" => Ok(ResourceStatus::Skipped),
            other => Err(crate::Error::InvalidInput(format!("Invalid status: {}", other))),
        }
    }
}
