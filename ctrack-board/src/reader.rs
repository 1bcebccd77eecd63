//! Structure reader
//!
//! Builds the nested tree in at most two queries: one LEFT JOIN over
//! phases, weeks and days, and one over all of the user's resources. Both
//! run in one read transaction so they see the same snapshot.

use std::collections::HashMap;

use ctrack_common::db::{Day, Phase, Resource, Week};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::store::RESOURCE_COLUMNS;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StructureTree {
    pub phases: Vec<PhaseNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseNode {
    #[serde(flatten)]
    pub phase: Phase,
    pub weeks: Vec<WeekNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekNode {
    #[serde(flatten)]
    pub week: Week,
    pub days: Vec<DayNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayNode {
    #[serde(flatten)]
    pub day: Day,
    /// Empty when resources were not requested
    pub resources: Vec<Resource>,
}

/// One row of the phases ⟕ weeks ⟕ days join
#[derive(sqlx::FromRow)]
struct TreeRow {
    phase_id: i64,
    phase_title: String,
    phase_color: String,
    phase_order: i64,
    phase_inbox: bool,
    week_id: Option<i64>,
    week_title: Option<String>,
    week_order: Option<i64>,
    week_inbox: Option<bool>,
    day_id: Option<i64>,
    day_title: Option<String>,
    day_order: Option<i64>,
    day_inbox: Option<bool>,
}

/// The user's full tree, ordered by `order_index` at every level
pub async fn get_tree(pool: &SqlitePool, user: Uuid, include_resources: bool) -> Result<StructureTree> {
    let user_key = user.to_string();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query_as::<_, TreeRow>(
        r#"
        SELECT
            p.id AS phase_id, p.title AS phase_title, p.color AS phase_color,
            p.order_index AS phase_order, p.is_inbox AS phase_inbox,
            w.id AS week_id, w.title AS week_title,
            w.order_index AS week_order, w.is_inbox AS week_inbox,
            d.id AS day_id, d.title AS day_title,
            d.order_index AS day_order, d.is_inbox AS day_inbox
        FROM phases p
        LEFT JOIN weeks w ON w.phase_id = p.id
        LEFT JOIN days d ON d.week_id = w.id
        WHERE p.user_id = ?
        ORDER BY p.order_index, w.order_index, d.order_index
        "#,
    )
    .bind(&user_key)
    .fetch_all(&mut *tx)
    .await?;

    let mut resources = if include_resources {
        let sql = format!(
            "SELECT {} FROM resources WHERE user_id = ? ORDER BY day_id, order_index",
            RESOURCE_COLUMNS
        );
        let all = sqlx::query_as::<_, Resource>(&sql)
            .bind(&user_key)
            .fetch_all(&mut *tx)
            .await?;
        group_by_day(all)
    } else {
        HashMap::new()
    };

    tx.commit().await?;

    let tree = assemble(rows, &mut resources);
    debug!(
        "Loaded tree for {}: {} phases (resources: {})",
        user,
        tree.phases.len(),
        include_resources
    );
    Ok(tree)
}

/// Resources keyed by day, each list keeping the query's order
fn group_by_day(resources: Vec<Resource>) -> HashMap<i64, Vec<Resource>> {
    let mut by_day: HashMap<i64, Vec<Resource>> = HashMap::new();
    for resource in resources {
        by_day.entry(resource.day_id).or_default().push(resource);
    }
    by_day
}

/// Fold the ordered join rows into nested nodes. Rows arrive grouped by
/// phase then week, so each row extends the last phase/week or opens a new one.
fn assemble(rows: Vec<TreeRow>, resources: &mut HashMap<i64, Vec<Resource>>) -> StructureTree {
    let mut phases: Vec<PhaseNode> = Vec::new();

    for row in rows {
        if phases.last().map(|p| p.phase.id) != Some(row.phase_id) {
            phases.push(PhaseNode {
                phase: Phase {
                    id: row.phase_id,
                    title: row.phase_title,
                    color: row.phase_color,
                    order_index: row.phase_order,
                    is_inbox: row.phase_inbox,
                },
                weeks: Vec::new(),
            });
        }
        let Some(phase) = phases.last_mut() else {
            continue;
        };

        let Some(week_id) = row.week_id else {
            continue;
        };
        if phase.weeks.last().map(|w| w.week.id) != Some(week_id) {
            phase.weeks.push(WeekNode {
                week: Week {
                    id: week_id,
                    phase_id: row.phase_id,
                    title: row.week_title.unwrap_or_default(),
                    order_index: row.week_order.unwrap_or_default(),
                    is_inbox: row.week_inbox.unwrap_or_default(),
                },
                days: Vec::new(),
            });
        }
        let Some(week) = phase.weeks.last_mut() else {
            continue;
        };

        if let Some(day_id) = row.day_id {
            week.days.push(DayNode {
                day: Day {
                    id: day_id,
                    week_id,
                    title: row.day_title.unwrap_or_default(),
                    order_index: row.day_order.unwrap_or_default(),
                    is_inbox: row.day_inbox.unwrap_or_default(),
                },
                resources: resources.remove(&day_id).unwrap_or_default(),
            });
        }
    }

    StructureTree { phases }
}
