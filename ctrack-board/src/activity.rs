//! Activity log
//!
//! Audit records are written by the store and the reorder service inside
//! the same transaction as the change they describe, so a rolled-back
//! mutation never leaves a record behind.

use serde::Serialize;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::Result;
use crate::kind::NodeKind;

/// Largest page returned by [`recent`]
pub const ACTIVITY_LOG_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Rename,
    Delete,
    Reorder,
    Status,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Rename => "rename",
            Action::Delete => "delete",
            Action::Reorder => "reorder",
            Action::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityRecord {
    pub id: i64,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub details: Json<Value>,
    pub created_at: String,
}

/// Append one record on the caller's transaction
pub async fn record(
    conn: &mut SqliteConnection,
    user: Uuid,
    action: Action,
    kind: NodeKind,
    entity_id: i64,
    details: Value,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO activity_log (user_id, action, entity_type, entity_id, details) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user.to_string())
    .bind(action.as_str())
    .bind(kind.as_str())
    .bind(entity_id)
    .bind(Json(details))
    .execute(conn)
    .await?;

    Ok(())
}

/// Newest records first, at most `limit` (clamped to 1..=100)
pub async fn recent(pool: &SqlitePool, user: Uuid, limit: Option<i64>) -> Result<Vec<ActivityRecord>> {
    let limit = limit.unwrap_or(ACTIVITY_LOG_LIMIT).clamp(1, ACTIVITY_LOG_LIMIT);

    let records = sqlx::query_as::<_, ActivityRecord>(
        r#"
        SELECT id, action, entity_type, entity_id, details, CAST(created_at AS TEXT) AS created_at
        FROM activity_log
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(user.to_string())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
