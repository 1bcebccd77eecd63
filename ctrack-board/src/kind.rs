//! Node kinds of the curriculum tree
//!
//! The four levels share the create/rename/delete/reorder endpoints, so the
//! per-kind differences (table, parent column, valid parent) live in one
//! dispatch table here instead of being spread over string matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Phase,
    Week,
    Day,
    Resource,
}

/// Static facts about one kind
struct KindInfo {
    name: &'static str,
    table: &'static str,
    parent_column: Option<&'static str>,
    parent: Option<NodeKind>,
}

const PHASE: KindInfo = KindInfo {
    name: "phase",
    table: "phases",
    parent_column: None,
    parent: None,
};

const WEEK: KindInfo = KindInfo {
    name: "week",
    table: "weeks",
    parent_column: Some("phase_id"),
    parent: Some(NodeKind::Phase),
};

const DAY: KindInfo = KindInfo {
    name: "day",
    table: "days",
    parent_column: Some("week_id"),
    parent: Some(NodeKind::Week),
};

const RESOURCE: KindInfo = KindInfo {
    name: "resource",
    table: "resources",
    parent_column: Some("day_id"),
    parent: Some(NodeKind::Day),
};

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [NodeKind::Phase, NodeKind::Week, NodeKind::Day, NodeKind::Resource];

    fn info(&self) -> &'static KindInfo {
        match self {
            NodeKind::Phase => &PHASE,
            NodeKind::Week => &WEEK,
            NodeKind::Day => &DAY,
            NodeKind::Resource => &RESOURCE,
        }
    }

    /// Wire name used in URLs, request bodies and the activity log
    pub fn as_str(&self) -> &'static str {
        self.info().name
    }

    pub fn table(&self) -> &'static str {
        self.info().table
    }

    /// Column referencing the parent row; phases hang off the user instead
    pub fn parent_column(&self) -> Option<&'static str> {
        self.info().parent_column
    }

    /// The only kind accepted as this kind's container
    pub fn parent_kind(&self) -> Option<NodeKind> {
        self.info().parent
    }

    /// Filter selecting the sibling set of a node with the given parent.
    ///
    /// Binds: user id, then the parent id when the kind has a parent column.
    pub fn sibling_filter(&self) -> String {
        match self.parent_column() {
            Some(column) => format!("user_id = ? AND {} = ?", column),
            None => "user_id = ?".to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                StructureError::InvalidInput(format!(
                    "Invalid type '{}'. Must be phase, week, day, or resource",
                    s
                ))
            })
    }
}
