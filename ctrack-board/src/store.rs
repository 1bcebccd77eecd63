//! Structure store
//!
//! Create, rename, delete and status operations on the curriculum tree,
//! plus the sibling-set primitives the reorder service builds on.
//!
//! Every public operation is one transaction whose first statement is a
//! write touching the rows it is about to read. SQLite grants the database
//! write lock on the first write, so no other writer can change a sibling
//! set between our read of it and our commit. Losing that race surfaces as
//! [`StructureError::SerializationConflict`] and the whole transaction is
//! re-run by [`with_retry`].
//!
//! Sibling positions are always rewritten as `0..n-1`, which keeps every
//! sibling set contiguous after creates, deletes and moves.

use chrono::Utc;
use ctrack_common::db::{
    Resource, ResourceStatus, DEFAULT_PHASE_COLOR, DEFAULT_RESOURCE_TYPE, INBOX_DAY_TITLE,
    INBOX_PHASE_COLOR, INBOX_PHASE_TITLE, INBOX_WEEK_TITLE, RESOURCE_TYPES,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::activity::{self, Action};
use crate::error::{Result, StructureError};
use crate::kind::NodeKind;
use crate::retry::{with_retry, RetryPolicy};

/// Column list shared by every query that decodes a [`Resource`]
pub(crate) const RESOURCE_COLUMNS: &str = "id, day_id, title, url, resource_type, status, \
     difficulty, estimated_minutes, completed_at, order_index";

/// One node as returned by create, rename and reorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
    pub order_index: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(sqlx::FromRow)]
struct NodeRow {
    id: i64,
    parent_id: Option<i64>,
    title: String,
    order_index: i64,
    color: Option<String>,
}

/// Fields accepted when creating a node; which ones apply depends on the kind
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewNode {
    /// Containing node; ignored for phases, optional for resources (Inbox)
    pub parent_id: Option<i64>,
    pub title: String,
    pub color: Option<String>,
    pub url: Option<String>,
    pub resource_type: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_minutes: Option<i64>,
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Resources reparented to the Inbox instead of being deleted
    pub moved_to_inbox: usize,
}

// =============================================================================
// Public operations
// =============================================================================

/// Create a node at the end of its sibling set
pub async fn create_node(
    pool: &SqlitePool,
    policy: &RetryPolicy,
    user: Uuid,
    kind: NodeKind,
    node: &NewNode,
) -> Result<NodeView> {
    let fields = ValidatedNode::new(kind, node)?;
    let fields = &fields;

    let view = with_retry(policy, "create", move || create_once(pool, user, kind, fields)).await?;
    info!("Created {} {} '{}' at index {}", kind, view.id, view.title, view.order_index);
    Ok(view)
}

/// Change a node's title (and, for phases, its color)
pub async fn rename_node(
    pool: &SqlitePool,
    policy: &RetryPolicy,
    user: Uuid,
    kind: NodeKind,
    id: i64,
    title: Option<&str>,
    color: Option<&str>,
) -> Result<NodeView> {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let color = match (kind, color) {
        (NodeKind::Phase, Some(color)) => Some(validate_color(color)?),
        _ => None,
    };

    if title.is_none() && color.is_none() {
        let message = if kind == NodeKind::Phase {
            "Title or color is required"
        } else {
            "Title is required"
        };
        return Err(StructureError::InvalidInput(message.to_string()));
    }

    let color = color.as_deref();
    with_retry(policy, "rename", move || rename_once(pool, user, kind, id, title, color)).await
}

/// Delete a node. Structural children are deleted with it; resources below
/// it are moved to the Inbox.
pub async fn delete_node(
    pool: &SqlitePool,
    policy: &RetryPolicy,
    user: Uuid,
    kind: NodeKind,
    id: i64,
) -> Result<DeleteOutcome> {
    let outcome = with_retry(policy, "delete", move || delete_once(pool, user, kind, id)).await?;
    info!(
        "Deleted {} {} ({} resources moved to inbox)",
        kind, id, outcome.moved_to_inbox
    );
    Ok(outcome)
}

/// Set a resource's status; `complete` stamps `completed_at`, anything else clears it
pub async fn set_resource_status(
    pool: &SqlitePool,
    policy: &RetryPolicy,
    user: Uuid,
    id: i64,
    status: ResourceStatus,
) -> Result<Resource> {
    with_retry(policy, "status", move || status_once(pool, user, id, status)).await
}

// =============================================================================
// Transaction bodies
// =============================================================================

async fn create_once(
    pool: &SqlitePool,
    user: Uuid,
    kind: NodeKind,
    node: &ValidatedNode,
) -> Result<NodeView> {
    let user_key = user.to_string();
    let mut tx = pool.begin().await?;

    let parent = match (kind, node.parent_id) {
        (NodeKind::Phase, _) => {
            lock_siblings(&mut tx, &user_key, kind, None).await?;
            None
        }
        (NodeKind::Resource, None) => {
            lock_siblings(&mut tx, &user_key, NodeKind::Phase, None).await?;
            Some(get_or_create_inbox(&mut tx, &user_key).await?)
        }
        (_, Some(parent_id)) => {
            lock_siblings(&mut tx, &user_key, kind, Some(parent_id)).await?;
            ensure_parent(&mut tx, &user_key, kind, parent_id).await?;
            Some(parent_id)
        }
        (_, None) => {
            return Err(StructureError::InvalidParent(format!(
                "parent_id is required for a {}",
                kind
            )));
        }
    };

    let order_index = next_order_index(&mut tx, &user_key, kind, parent).await?;

    let id = match kind {
        NodeKind::Phase => {
            sqlx::query("INSERT INTO phases (user_id, title, color, order_index) VALUES (?, ?, ?, ?)")
                .bind(&user_key)
                .bind(&node.title)
                .bind(node.color.as_deref().unwrap_or(DEFAULT_PHASE_COLOR))
                .bind(order_index)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid()
        }
        NodeKind::Week | NodeKind::Day => {
            let sql = format!(
                "INSERT INTO {} (user_id, {}, title, order_index) VALUES (?, ?, ?, ?)",
                kind.table(),
                kind.parent_column().unwrap_or_default()
            );
            sqlx::query(&sql)
                .bind(&user_key)
                .bind(parent)
                .bind(&node.title)
                .bind(order_index)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid()
        }
        NodeKind::Resource => {
            sqlx::query(
                r#"
                INSERT INTO resources
                    (user_id, day_id, title, url, resource_type, difficulty, estimated_minutes, order_index)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&user_key)
            .bind(parent)
            .bind(&node.title)
            .bind(&node.url)
            .bind(&node.resource_type)
            .bind(&node.difficulty)
            .bind(node.estimated_minutes)
            .bind(order_index)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid()
        }
    };

    activity::record(
        &mut tx,
        user,
        Action::Create,
        kind,
        id,
        json!({ "title": node.title, "parent_id": parent, "order_index": order_index }),
    )
    .await?;

    let view = load_node(&mut tx, &user_key, kind, id).await?;
    tx.commit().await?;
    Ok(view)
}

async fn rename_once(
    pool: &SqlitePool,
    user: Uuid,
    kind: NodeKind,
    id: i64,
    title: Option<&str>,
    color: Option<&str>,
) -> Result<NodeView> {
    let user_key = user.to_string();
    let mut tx = pool.begin().await?;

    lock_node(&mut tx, &user_key, kind, id).await?;

    let sql = if kind == NodeKind::Phase {
        "UPDATE phases SET title = COALESCE(?, title), color = COALESCE(?, color) WHERE id = ? AND user_id = ?"
            .to_string()
    } else {
        format!(
            "UPDATE {} SET title = COALESCE(?, title) WHERE id = ? AND user_id = ?",
            kind.table()
        )
    };

    let mut query = sqlx::query(&sql).bind(title);
    if kind == NodeKind::Phase {
        query = query.bind(color);
    }
    query.bind(id).bind(&user_key).execute(&mut *tx).await?;

    activity::record(
        &mut tx,
        user,
        Action::Rename,
        kind,
        id,
        json!({ "title": title, "color": color }),
    )
    .await?;

    let view = load_node(&mut tx, &user_key, kind, id).await?;
    tx.commit().await?;
    debug!("Renamed {} {} to '{}'", kind, id, view.title);
    Ok(view)
}

async fn delete_once(pool: &SqlitePool, user: Uuid, kind: NodeKind, id: i64) -> Result<DeleteOutcome> {
    let user_key = user.to_string();
    let mut tx = pool.begin().await?;

    lock_node(&mut tx, &user_key, kind, id).await?;
    let node = load_node(&mut tx, &user_key, kind, id).await?;

    let moved_to_inbox = match subtree_day_filter(kind) {
        Some(day_filter) => delete_subtree(&mut tx, &user_key, kind, id, day_filter).await?,
        None => {
            sqlx::query("DELETE FROM resources WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(&user_key)
                .execute(&mut *tx)
                .await?;
            0
        }
    };

    let siblings = sibling_ids(&mut tx, &user_key, kind, node.parent_id).await?;
    write_sibling_order(&mut tx, &user_key, kind, node.parent_id, &siblings).await?;

    activity::record(
        &mut tx,
        user,
        Action::Delete,
        kind,
        id,
        json!({
            "title": node.title,
            "parent_id": node.parent_id,
            "order_index": node.order_index,
            "moved_to_inbox": moved_to_inbox,
        }),
    )
    .await?;

    tx.commit().await?;
    Ok(DeleteOutcome { moved_to_inbox })
}

/// Detach resources below a phase/week/day into the Inbox, then delete
/// days, weeks and the node itself, bottom-up. Returns the number of
/// resources moved.
async fn delete_subtree(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    id: i64,
    day_filter: &str,
) -> Result<usize> {
    let inbox_sql = format!(
        "SELECT d.id FROM days d JOIN weeks w ON d.week_id = w.id \
         WHERE d.user_id = ? AND d.is_inbox = 1 AND {} LIMIT 1",
        day_filter
    );
    let inbox_inside: Option<i64> = sqlx::query_scalar(&inbox_sql)
        .bind(user)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    if inbox_inside.is_some() {
        return Err(StructureError::InvalidInput(
            "The inbox cannot be deleted".to_string(),
        ));
    }

    let orphans_sql = format!(
        "SELECT r.id FROM resources r \
         JOIN days d ON r.day_id = d.id \
         JOIN weeks w ON d.week_id = w.id \
         WHERE r.user_id = ? AND {} \
         ORDER BY w.order_index, d.order_index, r.order_index",
        day_filter
    );
    let orphans: Vec<i64> = sqlx::query_scalar(&orphans_sql)
        .bind(user)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

    if !orphans.is_empty() {
        let inbox = get_or_create_inbox(&mut *conn, user).await?;
        let start = next_order_index(&mut *conn, user, NodeKind::Resource, Some(inbox)).await?;
        for (offset, resource_id) in orphans.iter().enumerate() {
            sqlx::query("UPDATE resources SET day_id = ?, order_index = ? WHERE id = ? AND user_id = ?")
                .bind(inbox)
                .bind(start + offset as i64)
                .bind(resource_id)
                .bind(user)
                .execute(&mut *conn)
                .await?;
        }
        debug!("Moved {} resources to inbox day {}", orphans.len(), inbox);
    }

    let days_sql = format!(
        "DELETE FROM days WHERE id IN \
         (SELECT d.id FROM days d JOIN weeks w ON d.week_id = w.id WHERE d.user_id = ? AND {})",
        day_filter
    );
    sqlx::query(&days_sql)
        .bind(user)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let weeks_sql = match kind {
        NodeKind::Week => Some("DELETE FROM weeks WHERE id = ? AND user_id = ?"),
        NodeKind::Phase => Some("DELETE FROM weeks WHERE phase_id = ? AND user_id = ?"),
        _ => None,
    };
    if let Some(sql) = weeks_sql {
        sqlx::query(sql).bind(id).bind(user).execute(&mut *conn).await?;
    }

    if kind == NodeKind::Phase {
        sqlx::query("DELETE FROM phases WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user)
            .execute(&mut *conn)
            .await?;
    }

    Ok(orphans.len())
}

async fn status_once(
    pool: &SqlitePool,
    user: Uuid,
    id: i64,
    status: ResourceStatus,
) -> Result<Resource> {
    let user_key = user.to_string();
    let mut tx = pool.begin().await?;

    lock_node(&mut tx, &user_key, NodeKind::Resource, id).await?;

    let completed_at = (status == ResourceStatus::Complete).then(|| Utc::now().to_rfc3339());
    sqlx::query("UPDATE resources SET status = ?, completed_at = ? WHERE id = ? AND user_id = ?")
        .bind(status)
        .bind(completed_at)
        .bind(id)
        .bind(&user_key)
        .execute(&mut *tx)
        .await?;

    let sql = format!("SELECT {} FROM resources WHERE id = ? AND user_id = ?", RESOURCE_COLUMNS);
    let resource = sqlx::query_as::<_, Resource>(&sql)
        .bind(id)
        .bind(&user_key)
        .fetch_one(&mut *tx)
        .await?;

    activity::record(
        &mut tx,
        user,
        Action::Status,
        NodeKind::Resource,
        id,
        json!({ "status": status }),
    )
    .await?;

    tx.commit().await?;
    debug!("Resource {} status set to {}", id, status);
    Ok(resource)
}

// =============================================================================
// Sibling-set primitives
// =============================================================================

/// Take the write lock on one node's row. NotFound if it is absent for this user.
pub(crate) async fn lock_node(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    id: i64,
) -> Result<()> {
    let sql = format!(
        "UPDATE {} SET order_index = order_index WHERE id = ? AND user_id = ?",
        kind.table()
    );
    let done = sqlx::query(&sql).bind(id).bind(user).execute(&mut *conn).await?;

    if done.rows_affected() == 0 {
        return Err(StructureError::NotFound(format!("{} {} not found", kind, id)));
    }
    Ok(())
}

/// Take the write lock on a whole sibling set (which may be empty)
pub(crate) async fn lock_siblings(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    parent: Option<i64>,
) -> Result<()> {
    let sql = format!(
        "UPDATE {} SET order_index = order_index WHERE {}",
        kind.table(),
        kind.sibling_filter()
    );
    let mut query = sqlx::query(&sql).bind(user);
    if kind.parent_column().is_some() {
        query = query.bind(parent);
    }
    query.execute(&mut *conn).await?;
    Ok(())
}

/// Ids of a sibling set in display order
pub(crate) async fn sibling_ids(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    parent: Option<i64>,
) -> Result<Vec<i64>> {
    let sql = format!(
        "SELECT id FROM {} WHERE {} ORDER BY order_index, id",
        kind.table(),
        kind.sibling_filter()
    );
    let mut query = sqlx::query_scalar(&sql).bind(user);
    if kind.parent_column().is_some() {
        query = query.bind(parent);
    }
    Ok(query.fetch_all(&mut *conn).await?)
}

/// Make `ids` the complete sibling set of `parent`, positioned `0..n-1`.
///
/// Runs in two passes: first to distinct negative scratch positions, then to
/// the final ones, so the unique `(parent, order_index)` index holds after
/// every single statement.
pub(crate) async fn write_sibling_order(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    parent: Option<i64>,
    ids: &[i64],
) -> Result<()> {
    let set_parent = kind
        .parent_column()
        .map(|column| format!("{} = ?, ", column))
        .unwrap_or_default();
    let sql = format!(
        "UPDATE {} SET {}order_index = ? WHERE id = ? AND user_id = ?",
        kind.table(),
        set_parent
    );

    for scratch in [true, false] {
        for (index, id) in ids.iter().enumerate() {
            let position = if scratch { -(index as i64) - 1 } else { index as i64 };
            let mut query = sqlx::query(&sql);
            if kind.parent_column().is_some() {
                query = query.bind(parent);
            }
            query
                .bind(position)
                .bind(id)
                .bind(user)
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}

pub(crate) async fn next_order_index(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    parent: Option<i64>,
) -> Result<i64> {
    let sql = format!(
        "SELECT COALESCE(MAX(order_index), -1) + 1 FROM {} WHERE {}",
        kind.table(),
        kind.sibling_filter()
    );
    let mut query = sqlx::query_scalar(&sql).bind(user);
    if kind.parent_column().is_some() {
        query = query.bind(parent);
    }
    Ok(query.fetch_one(&mut *conn).await?)
}

/// InvalidParent unless `parent_id` is a container of the right kind for `kind`
pub(crate) async fn ensure_parent(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    parent_id: i64,
) -> Result<()> {
    let Some(parent_kind) = kind.parent_kind() else {
        return Err(StructureError::InvalidParent(format!("A {} has no parent", kind)));
    };

    if !parent_exists(conn, user, parent_kind, parent_id).await? {
        return Err(StructureError::InvalidParent(format!(
            "A {} must be placed in an existing {}; {} {} not found",
            kind, parent_kind, parent_kind, parent_id
        )));
    }
    Ok(())
}

/// Whether `parent_id` is a `parent_kind` row owned by `user`
pub(crate) async fn parent_exists(
    conn: &mut SqliteConnection,
    user: &str,
    parent_kind: NodeKind,
    parent_id: i64,
) -> Result<bool> {
    let sql = format!("SELECT id FROM {} WHERE id = ? AND user_id = ?", parent_kind.table());
    let found: Option<i64> = sqlx::query_scalar(&sql)
        .bind(parent_id)
        .bind(user)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn load_node(
    conn: &mut SqliteConnection,
    user: &str,
    kind: NodeKind,
    id: i64,
) -> Result<NodeView> {
    let sql = format!(
        "SELECT id, {} AS parent_id, title, order_index, {} AS color FROM {} WHERE id = ? AND user_id = ?",
        kind.parent_column().unwrap_or("NULL"),
        if kind == NodeKind::Phase { "color" } else { "NULL" },
        kind.table()
    );
    let row = sqlx::query_as::<_, NodeRow>(&sql)
        .bind(id)
        .bind(user)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| StructureError::NotFound(format!("{} {} not found", kind, id)))?;

    Ok(NodeView {
        kind,
        id: row.id,
        parent_id: row.parent_id,
        title: row.title,
        order_index: row.order_index,
        color: row.color,
    })
}

/// Id of the user's Inbox day, creating the phase → week → day chain as needed.
///
/// The caller must already hold the write lock.
pub(crate) async fn get_or_create_inbox(conn: &mut SqliteConnection, user: &str) -> Result<i64> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM days WHERE user_id = ? AND is_inbox = 1 ORDER BY id LIMIT 1")
            .bind(user)
            .fetch_optional(&mut *conn)
            .await?;
    if let Some(day_id) = existing {
        return Ok(day_id);
    }

    let phase: Option<i64> =
        sqlx::query_scalar("SELECT id FROM phases WHERE user_id = ? AND is_inbox = 1 ORDER BY id LIMIT 1")
            .bind(user)
            .fetch_optional(&mut *conn)
            .await?;
    let phase_id = match phase {
        Some(id) => id,
        None => {
            let order_index = next_order_index(&mut *conn, user, NodeKind::Phase, None).await?;
            sqlx::query(
                "INSERT INTO phases (user_id, title, color, order_index, is_inbox) VALUES (?, ?, ?, ?, 1)",
            )
            .bind(user)
            .bind(INBOX_PHASE_TITLE)
            .bind(INBOX_PHASE_COLOR)
            .bind(order_index)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid()
        }
    };

    let week: Option<i64> =
        sqlx::query_scalar("SELECT id FROM weeks WHERE user_id = ? AND is_inbox = 1 ORDER BY id LIMIT 1")
            .bind(user)
            .fetch_optional(&mut *conn)
            .await?;
    let week_id = match week {
        Some(id) => id,
        None => {
            let order_index = next_order_index(&mut *conn, user, NodeKind::Week, Some(phase_id)).await?;
            sqlx::query(
                "INSERT INTO weeks (user_id, phase_id, title, order_index, is_inbox) VALUES (?, ?, ?, ?, 1)",
            )
            .bind(user)
            .bind(phase_id)
            .bind(INBOX_WEEK_TITLE)
            .bind(order_index)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid()
        }
    };

    let order_index = next_order_index(&mut *conn, user, NodeKind::Day, Some(week_id)).await?;
    let day_id = sqlx::query(
        "INSERT INTO days (user_id, week_id, title, order_index, is_inbox) VALUES (?, ?, ?, ?, 1)",
    )
    .bind(user)
    .bind(week_id)
    .bind(INBOX_DAY_TITLE)
    .bind(order_index)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    info!("Created inbox day {} for user {}", day_id, user);
    Ok(day_id)
}

/// Filter selecting the days below a phase/week/day, over `days d JOIN weeks w`.
/// Binds the node id. None for resources, which have no subtree.
fn subtree_day_filter(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Phase => Some("w.phase_id = ?"),
        NodeKind::Week => Some("d.week_id = ?"),
        NodeKind::Day => Some("d.id = ?"),
        NodeKind::Resource => None,
    }
}

// =============================================================================
// Validation
// =============================================================================

/// A [`NewNode`] after trimming, defaulting and checking
struct ValidatedNode {
    parent_id: Option<i64>,
    title: String,
    color: Option<String>,
    url: Option<String>,
    resource_type: String,
    difficulty: Option<String>,
    estimated_minutes: Option<i64>,
}

impl ValidatedNode {
    fn new(kind: NodeKind, node: &NewNode) -> Result<Self> {
        let title = node.title.trim();
        if title.is_empty() {
            return Err(StructureError::InvalidInput("Title is required".to_string()));
        }

        let color = match (kind, node.color.as_deref()) {
            (NodeKind::Phase, Some(color)) => Some(validate_color(color)?),
            _ => None,
        };

        let resource_type = match node.resource_type.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_RESOURCE_TYPE.to_string(),
            Some(value) => RESOURCE_TYPES
                .iter()
                .find(|known| known.eq_ignore_ascii_case(value))
                .map(|known| known.to_string())
                .ok_or_else(|| {
                    StructureError::InvalidInput(format!("Unknown resource type: {}", value))
                })?,
        };

        if matches!(node.estimated_minutes, Some(minutes) if minutes < 0) {
            return Err(StructureError::InvalidInput(
                "estimated_minutes cannot be negative".to_string(),
            ));
        }

        Ok(Self {
            parent_id: if kind == NodeKind::Phase { None } else { node.parent_id },
            title: title.to_string(),
            color,
            url: non_empty(node.url.as_deref()),
            resource_type,
            difficulty: non_empty(node.difficulty.as_deref()),
            estimated_minutes: node.estimated_minutes,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Accepts `#rgb` or `#rrggbb`
fn validate_color(color: &str) -> Result<String> {
    let color = color.trim();
    let hex = color.strip_prefix('#').unwrap_or("");
    let valid = (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(color.to_string())
    } else {
        Err(StructureError::InvalidInput(format!("Invalid color: {}", color)))
    }
}
